use crate::state::AppState;
use crate::{api, logging};
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;

pub fn build_http_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route("/v1/notifications", get(api::list_notifications))
        .route("/v1/notifications/read", post(api::mark_read))
        .layer(middleware::from_fn(logging::request_logging))
        .with_state(state)
}
