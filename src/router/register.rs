use axum::extract::State;
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::AppState;
use crate::error::Result;
use crate::router::ValidatedJson;
use crate::user::RegisterParams;

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct Body {
    #[validate(custom(function = "crate::router::validate_register_email"))]
    pub email: String,
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: String,
}

/// Handler to register a new user.
pub async fn handler(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<Body>,
) -> Result<StatusCode> {
    state.service.register(RegisterParams {
        email: body.email,
        name: body.name,
    })?;

    Ok(StatusCode::CREATED)
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::json;

    use super::*;
    use crate::*;

    #[tokio::test]
    async fn test_register_handler() {
        let state = router::state();
        let app = app(state.clone());

        let response = make_request(
            app,
            Method::POST,
            "/register",
            json!({ "email": "test@example.com", "name": "Test" }).to_string(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::CREATED);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert!(body.is_empty());

        let stored = state.service.get_by_email("test@example.com").unwrap();
        assert_eq!(stored.name, "Test");
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let state = router::state();
        let app = app(state);

        let body = json!({ "email": "test@example.com", "name": "Test" }).to_string();
        let response = make_request(app.clone(), Method::POST, "/register", body.clone()).await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = make_request(app, Method::POST, "/register", body).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let message = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&message[..], b"Email is already in use");
    }

    #[tokio::test]
    async fn test_register_email_without_at() {
        let state = router::state();
        let app = app(state.clone());

        let response = make_request(
            app,
            Method::POST,
            "/register",
            json!({ "email": "no-at-sign.com", "name": "Test" }).to_string(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let message = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&message[..], b"Email must include an '@' symbol");

        // No record was created.
        let err = state.service.get_by_email("no-at-sign.com").unwrap_err();
        assert!(matches!(err, ServerError::NotFound));
    }

    #[tokio::test]
    async fn test_register_empty_name() {
        let state = router::state();
        let app = app(state.clone());

        let response = make_request(
            app,
            Method::POST,
            "/register",
            json!({ "email": "test@example.com", "name": "" }).to_string(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let message = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&message[..], b"Name cannot be empty");

        let err = state.service.get_by_email("test@example.com").unwrap_err();
        assert!(matches!(err, ServerError::NotFound));
    }

    #[tokio::test]
    async fn test_register_malformed_json() {
        let app = app(router::state());

        let response =
            make_request(app, Method::POST, "/register", "{not json".to_owned()).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_register_wrong_method() {
        let app = app(router::state());

        let response = make_request(app, Method::GET, "/register", String::default()).await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_concurrent_registrations_single_winner() {
        let app = app(router::state());

        let mut tasks = tokio::task::JoinSet::new();
        for attempt in 0..16 {
            let app = app.clone();
            tasks.spawn(async move {
                let body =
                    json!({ "email": "race@example.com", "name": format!("attempt-{attempt}") });
                make_request(app, Method::POST, "/register", body.to_string())
                    .await
                    .status()
            });
        }

        let statuses = tasks.join_all().await;
        let created = statuses
            .iter()
            .filter(|status| **status == StatusCode::CREATED)
            .count();

        assert_eq!(created, 1);
        assert!(
            statuses
                .iter()
                .all(|status| *status == StatusCode::CREATED
                    || *status == StatusCode::FORBIDDEN)
        );
    }
}
