pub mod register;
pub mod status;
pub mod user;

use axum::Json;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationError};

use crate::error::ServerError;

/// JSON body extractor running `validator` checks after decoding.
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        value.validate()?;
        Ok(Self(value))
    }
}

/// Email rule for registration bodies: non-empty and contains an `@`.
pub(crate) fn validate_register_email(email: &str) -> Result<(), ValidationError> {
    email_rule(email, "Email cannot be empty")
}

/// Email rule for lookup queries. Same checks, historical wording.
pub(crate) fn validate_lookup_email(email: &str) -> Result<(), ValidationError> {
    email_rule(email, "Email must not be empty")
}

fn email_rule(email: &str, empty_message: &'static str) -> Result<(), ValidationError> {
    if email.is_empty() {
        return Err(failure(empty_message));
    }

    if !email.contains('@') {
        return Err(failure("Email must include an '@' symbol"));
    }

    Ok(())
}

fn failure(message: &'static str) -> ValidationError {
    let mut error = ValidationError::new("email");
    error.message = Some(message.into());
    error
}

/// Fresh state over an empty in-memory store.
#[cfg(test)]
pub(crate) fn state() -> crate::AppState {
    use std::sync::Arc;

    use crate::user::{MemoryUserRepository, UserService};

    crate::AppState {
        config: Arc::default(),
        service: UserService::new(Arc::new(MemoryUserRepository::new())),
    }
}
