//! Error handler for registra.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use validator::ValidationErrors;

pub type Result<T> = std::result::Result<T, ServerError>;

/// Enum representing server-side errors.
///
/// Every error is request-scoped and checked by variant; the
/// [`IntoResponse`] impl below is the only place protocol status
/// codes are produced.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Json(#[from] JsonRejection),

    #[error("User not found")]
    NotFound,

    #[error("Email is already in use")]
    EmailExists,

    #[error("internal server error, {details}")]
    Internal { details: String },
}

impl From<ValidationErrors> for ServerError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(first_violation(&errors))
    }
}

/// The wire contract reports a single violation per response, email
/// before name.
fn first_violation(errors: &ValidationErrors) -> String {
    let fields = errors.field_errors();

    for field in ["email", "name"] {
        if let Some(issue) = fields.get(field).and_then(|issues| issues.first()) {
            return issue
                .message
                .as_ref()
                .map(|message| message.to_string())
                .unwrap_or_else(|| format!("{field} is invalid"));
        }
    }

    "validation error occurred".to_owned()
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = match &self {
            ServerError::Validation(_) | ServerError::Json(_) => StatusCode::BAD_REQUEST,
            ServerError::NotFound => StatusCode::NOT_FOUND,
            ServerError::EmailExists => StatusCode::FORBIDDEN,
            ServerError::Internal { details } => {
                tracing::error!(%details, "server returned 500 status");
                StatusCode::INTERNAL_SERVER_ERROR
            },
        };

        // Internal details are logged above, never sent to the caller.
        let message = match &self {
            ServerError::Internal { .. } => "Internal server error".to_owned(),
            _ => self.to_string(),
        };

        (status, message).into_response()
    }
}
