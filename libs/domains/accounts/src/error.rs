use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AccountError {
    #[error("Key '{0}' already exists")]
    AlreadyExists(String),

    #[error("Key '{0}' doesn't exist")]
    NotFound(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    InsufficientRole(String),

    #[error("user {0} is already banned")]
    AlreadyBanned(String),

    #[error("user {0} does not have any active bans")]
    NoActiveBan(String),

    #[error("{0}")]
    Validation(String),

    #[error("invalid login params")]
    InvalidCredentials,

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type AccountResult<T> = Result<T, AccountError>;

impl AccountError {
    /// Rejection used whenever the caller cannot be identified.
    pub fn unauthorized() -> Self {
        AccountError::Unauthorized("unauthorized".to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AccountError::Unauthorized(_) | AccountError::InsufficientRole(_) => {
                StatusCode::UNAUTHORIZED
            }
            AccountError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            // NotFound stays in the 422 class, not 404
            AccountError::AlreadyExists(_)
            | AccountError::NotFound(_)
            | AccountError::AlreadyBanned(_)
            | AccountError::NoActiveBan(_)
            | AccountError::Validation(_)
            | AccountError::InvalidCredentials => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    fn error_type(&self) -> &'static str {
        match self {
            AccountError::AlreadyExists(_) => "conflict",
            AccountError::NotFound(_) => "not_found",
            AccountError::Unauthorized(_) => "unauthorized",
            AccountError::InsufficientRole(_) => "insufficient_role",
            AccountError::AlreadyBanned(_) | AccountError::NoActiveBan(_) => "invalid_transition",
            AccountError::Validation(_) => "validation_error",
            AccountError::InvalidCredentials => "invalid_credentials",
            AccountError::Internal(_) => "internal_error",
        }
    }
}

impl IntoResponse for AccountError {
    fn into_response(self) -> Response {
        let message = match &self {
            AccountError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "An internal error occurred".to_string()
            }
            other => other.to_string(),
        };

        (
            self.status(),
            Json(json!({
                "error": {
                    "type": self.error_type(),
                    "message": message
                }
            })),
        )
            .into_response()
    }
}
