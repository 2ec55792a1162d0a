/// Server error types
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use harmony_core::HarmonyError;
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ServerError>;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Authorization failed: {0}")]
    Unauthorized(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error(transparent)]
    Core(#[from] HarmonyError),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("Bcrypt error: {0}")]
    Bcrypt(#[from] bcrypt::BcryptError),
}

impl From<harmony_storage::StorageError> for ServerError {
    fn from(err: harmony_storage::StorageError) -> Self {
        ServerError::Core(err.into())
    }
}

impl ServerError {
    /// HTTP status and client-facing message
    ///
    /// Anything the client cannot act on is logged here and replaced with a
    /// generic message.
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            ServerError::Auth(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            ServerError::Unauthorized(msg) => (StatusCode::FORBIDDEN, msg.clone()),
            ServerError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            ServerError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ServerError::Core(e) => core_status(e),
            ServerError::Storage(msg) => {
                tracing::error!("Storage error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Storage error".to_string(),
                )
            }
            ServerError::Config(msg) => {
                tracing::error!("Config error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Configuration error".to_string(),
                )
            }
            ServerError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            ServerError::Io(e) => {
                tracing::error!("IO error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "IO error".to_string())
            }
            ServerError::Jwt(e) => {
                tracing::debug!("JWT error: {:?}", e);
                (StatusCode::UNAUTHORIZED, "Invalid token".to_string())
            }
            ServerError::Bcrypt(e) => {
                tracing::error!("Bcrypt error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Password error".to_string(),
                )
            }
        }
    }
}

fn core_status(err: &HarmonyError) -> (StatusCode, String) {
    match err {
        HarmonyError::NotFound { .. }
        | HarmonyError::PlaylistNotFound(_)
        | HarmonyError::SongNotFound(_) => (StatusCode::NOT_FOUND, err.to_string()),
        HarmonyError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
        HarmonyError::Referential(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg.clone()),
        HarmonyError::Duplicate(msg) => (StatusCode::CONFLICT, msg.clone()),
        HarmonyError::TransactionFailure(msg) => {
            tracing::warn!("Transaction failed: {}", msg);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                "Database busy, retry the request".to_string(),
            )
        }
        other => {
            tracing::error!("Database error: {:?}", other);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Database error".to_string(),
            )
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, error_message) = self.status_and_message();

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use harmony_core::types::PlaylistId;

    fn status_of(err: impl Into<ServerError>) -> StatusCode {
        err.into().into_response().status()
    }

    #[test]
    fn test_core_errors_map_to_statuses() {
        assert_eq!(
            status_of(HarmonyError::PlaylistNotFound(PlaylistId::new(1))),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(HarmonyError::invalid_input("bad")),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(HarmonyError::Referential("song".into())),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status_of(HarmonyError::Duplicate("path".into())),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(HarmonyError::transaction("database is locked")),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            status_of(HarmonyError::Database("disk I/O error".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_detail_is_not_exposed() {
        let err = ServerError::Core(HarmonyError::Database("no such table: secrets".into()));
        let (status, message) = err.status_and_message();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(message, "Database error");
    }

    #[test]
    fn test_auth_errors_are_unauthorized() {
        assert_eq!(
            status_of(ServerError::Auth("Invalid credentials".into())),
            StatusCode::UNAUTHORIZED
        );
    }
}
