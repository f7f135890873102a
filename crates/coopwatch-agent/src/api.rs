use crate::logging::TraceId;
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Extension, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use coopwatch_notify::render::RenderView;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Envelope shared by every control API response.
#[derive(Serialize)]
pub struct ApiResponse<T>
where
    T: Serialize,
{
    /// 0 on success
    pub err_code: i32,
    pub err_msg: String,
    pub trace_id: String,
    pub data: Option<T>,
}

pub fn success_response<T>(status: StatusCode, trace_id: &str, data: T) -> Response
where
    T: Serialize,
{
    (
        status,
        Json(ApiResponse {
            err_code: 0,
            err_msg: "success".to_string(),
            trace_id: trace_id.to_string(),
            data: Some(data),
        }),
    )
        .into_response()
}

fn to_custom_error_code(code: &str) -> i32 {
    match code {
        "bad_request" => 1001,
        "not_found" => 1004,
        "internal_error" => 1500,
        _ => 1999,
    }
}

pub fn error_response(status: StatusCode, trace_id: &str, code: &str, msg: &str) -> Response {
    (
        status,
        Json(ApiResponse::<Value> {
            err_code: to_custom_error_code(code),
            err_msg: msg.to_string(),
            trace_id: trace_id.to_string(),
            data: None,
        }),
    )
        .into_response()
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    uptime_secs: u64,
}

pub async fn health(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    success_response(
        StatusCode::OK,
        &trace_id,
        HealthResponse {
            status: "ok",
            version: env!("CARGO_PKG_VERSION"),
            uptime_secs: state.start_time.elapsed().as_secs(),
        },
    )
}

/// Current alert log as a render view.
pub async fn list_notifications(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let view = state
        .engine
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .view();
    success_response(StatusCode::OK, &trace_id, view)
}

#[derive(Debug, Deserialize)]
pub struct MarkReadRequest {
    pub message: String,
}

#[derive(Serialize)]
struct MarkReadResponse {
    removed: usize,
    view: RenderView,
}

pub async fn mark_read(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
    payload: Result<Json<MarkReadRequest>, JsonRejection>,
) -> impl IntoResponse {
    let req = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            return error_response(
                StatusCode::BAD_REQUEST,
                &trace_id,
                "bad_request",
                &rejection.body_text(),
            );
        }
    };

    if req.message.trim().is_empty() {
        return error_response(
            StatusCode::BAD_REQUEST,
            &trace_id,
            "bad_request",
            "message must not be empty",
        );
    }

    let engine = state.engine.clone();
    let message = req.message;
    let result = tokio::task::spawn_blocking(move || {
        let mut engine = engine
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let removed = engine.mark_read(&message);
        (removed, engine.view())
    })
    .await;

    let (removed, view) = match result {
        Ok(pair) => pair,
        Err(e) => {
            tracing::error!(error = %e, "Mark-read task failed");
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &trace_id,
                "internal_error",
                "failed to mark notification as read",
            );
        }
    };

    if removed == 0 {
        return error_response(
            StatusCode::NOT_FOUND,
            &trace_id,
            "not_found",
            "notification not found",
        );
    }

    tracing::info!(removed, "Notification marked as read");
    success_response(StatusCode::OK, &trace_id, MarkReadResponse { removed, view })
}
