use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::handler::{self, AppState};

/// Build the axum router with all FCL endpoints.
pub fn build_router(state: AppState, config: &ServerConfig) -> Router {
    let router = Router::new()
        .route("/v1/health", get(handler::health_handler))
        .route("/v1/info", get(handler::info_handler))
        .route("/v1/stats", get(handler::stats_handler))
        .route("/v1/calendar", get(handler::calendar_handler))
        .route("/v1/members/:identity", get(handler::member_handler))
        .route(
            "/v1/members/:identity/sessions/:ordinal",
            get(handler::session_handler),
        )
        .route("/v1/challenges/:id", get(handler::challenge_handler))
        .route("/v1/events", get(handler::events_handler))
        .route("/v1/mutations", post(handler::mutation_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    if config.permissive_cors {
        router.layer(CorsLayer::permissive())
    } else {
        router
    }
}
