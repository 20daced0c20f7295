//! Registra is a small user registration and lookup API over JSON/HTTP.

#![forbid(unsafe_code)]

pub mod config;
pub mod error;
mod router;
mod user;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Bytes;
use axum::http::Method;
use axum::routing::{get, post};
use tower::ServiceBuilder;
use tower_http::LatencyUnit;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{
    DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer,
};

pub use error::ServerError;
pub use user::{
    MemoryUserRepository, RegisterParams, User, UserRepository, UserService,
};

/// MUST NEVER be used in production.
#[cfg(test)]
pub async fn make_request(
    app: Router,
    method: Method,
    path: &str,
    body: String,
) -> axum::http::Response<axum::body::Body> {
    use axum::extract::Request;
    use axum::http::header;
    use tower::util::ServiceExt;

    app.oneshot(
        Request::builder()
            .method(method)
            .uri(path)
            .header(header::CONTENT_TYPE, "application/json")
            .body(axum::body::Body::from(body))
            .unwrap(),
    )
    .await
    .unwrap()
}

/// State sharing between routes.
///
/// The storage implementation is injected here at construction and
/// reached only through [`UserService`], never as global state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<config::Configuration>,
    pub service: UserService,
}

/// Create router.
pub fn app(state: AppState) -> Router {
    let middleware = ServiceBuilder::new()
        // Add high level tracing/logging to all requests.
        .layer(
            TraceLayer::new_for_http()
                .on_body_chunk(|chunk: &Bytes, latency: Duration, _span: &tracing::Span| {
                    tracing::trace!(size_bytes = chunk.len(), latency = ?latency, "sending body chunk")
                })
                .make_span_with(DefaultMakeSpan::new().level(tracing::Level::INFO))
                .on_request(DefaultOnRequest::new())
                .on_response(DefaultOnResponse::new().latency_unit(LatencyUnit::Micros)),
        )
        // Add CORS preflight support.
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers(Any),
        );

    Router::new()
        // `GET /status.json` goes to `status`.
        .route("/status.json", get(router::status::status))
        // `POST /register` goes to `register`.
        .route("/register", post(router::register::handler))
        // `GET /user` goes to `user`.
        .route("/user", get(router::user::handler))
        .with_state(state)
        .layer(middleware)
}
