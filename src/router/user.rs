//! Get a user by email.

use axum::Json;
use axum::extract::{Query, State};
use serde::Deserialize;
use validator::Validate;

use crate::AppState;
use crate::error::Result;
use crate::user::User;

#[derive(Debug, Deserialize, Validate)]
pub struct Params {
    #[validate(custom(function = "crate::router::validate_lookup_email"))]
    pub email: String,
}

/// Handler returning a user by email.
pub async fn handler(
    State(state): State<AppState>,
    Query(params): Query<Params>,
) -> Result<Json<User>> {
    params.validate()?;

    let user = state.service.get_by_email(&params.email)?;
    Ok(Json(user))
}
