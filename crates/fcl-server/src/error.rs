use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;
use thiserror::Error;

use fcl_engine::EngineError;
use fcl_types::MutationError;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("authentication failed: {0}")]
    Unauthenticated(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("{0}")]
    Rejected(MutationError),

    #[error("engine error: {0}")]
    Engine(EngineError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<EngineError> for ServerError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Rejected(rejection) => Self::Rejected(rejection),
            other => Self::Engine(other),
        }
    }
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Rejected(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Engine(_) | Self::Config(_) | Self::Io(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            Self::Rejected(rejection) => json!({
                "kind": rejection.kind,
                "reason": rejection.reason,
            }),
            other => {
                if status.is_server_error() {
                    tracing::error!(error = %other, "request failed");
                }
                json!({ "error": other.to_string() })
            }
        };
        (status, Json(body)).into_response()
    }
}

pub type ServerResult<T> = Result<T, ServerError>;

#[cfg(test)]
mod tests {
    use fcl_types::ErrorKind;

    use super::*;

    #[test]
    fn engine_rejections_become_422() {
        let err: ServerError = EngineError::from(ErrorKind::OnlyOwner).into();
        assert!(matches!(err, ServerError::Rejected(_)));
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn internal_engine_errors_become_500() {
        let err: ServerError = EngineError::Invariant("broken".into()).into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            ServerError::Unauthenticated("x".into()).status(),
            StatusCode::UNAUTHORIZED
        );
    }
}
