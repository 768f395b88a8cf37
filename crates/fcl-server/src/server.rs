use std::sync::Arc;

use tokio::net::TcpListener;

use fcl_engine::MutationEngine;

use crate::auth::{AuthProvider, HeaderAuth};
use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::handler::AppState;
use crate::router::build_router;

/// HTTP front end over a shared [`MutationEngine`].
pub struct FclServer {
    config: ServerConfig,
    state: AppState,
}

impl FclServer {
    pub fn new(config: ServerConfig, engine: Arc<MutationEngine>) -> Self {
        Self {
            config,
            state: AppState {
                engine,
                auth: Arc::new(HeaderAuth),
            },
        }
    }

    pub fn with_auth(mut self, auth: Arc<dyn AuthProvider>) -> Self {
        self.state.auth = auth;
        self
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> axum::Router {
        build_router(self.state.clone(), &self.config)
    }

    /// Start serving requests until the process is stopped.
    pub async fn serve(self) -> ServerResult<()> {
        let app = self.router();
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        tracing::info!("FCL server listening on {}", self.config.bind_addr);
        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use fcl_types::Identity;

    use super::*;

    #[test]
    fn server_construction() {
        let engine = Arc::new(MutationEngine::initialize(Identity::derive("owner")).unwrap());
        let server = FclServer::new(ServerConfig::default(), engine);
        assert_eq!(server.config().bind_addr.port(), 8545);
        let _router = server.router();
    }
}
