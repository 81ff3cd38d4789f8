use std::collections::HashMap;

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::{Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Json;
use ruuter_core::types::HttpMethod;
use ruuter_exec::IncomingRequest;
use serde_json::{json, Value};

use super::state::AppState;
use crate::version::Heartbeat;

pub async fn healthz(State(state): State<AppState>) -> Json<Heartbeat> {
    Json(state.heartbeat.at(chrono::Utc::now()))
}

pub async fn openapi(State(state): State<AppState>) -> Response {
    Json(state.openapi.as_ref()).into_response()
}

/// Routes any other request to the pipeline registered for its method and path.
pub async fn dispatch(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    Query(params): Query<HashMap<String, String>>,
    body: Bytes,
) -> Response {
    let path = uri.path();
    let pipeline = method
        .as_str()
        .parse::<HttpMethod>()
        .ok()
        .and_then(|m| state.routes.match_route(m, path));
    let Some(pipeline) = pipeline else {
        if state.routes.has_path(path) {
            return error(StatusCode::METHOD_NOT_ALLOWED, format!("{method} not allowed on {path}"));
        }
        return error(StatusCode::NOT_FOUND, format!("no pipeline at {path}"));
    };

    let body = if body.is_empty() {
        Value::Null
    } else {
        match serde_json::from_slice::<Value>(&body) {
            Ok(v) => v,
            Err(e) => {
                return error(
                    StatusCode::BAD_REQUEST,
                    format!("request body is not valid JSON: {e}"),
                )
            }
        }
    };

    let request = IncomingRequest::new(pipeline.declaration().method)
        .with_body(body)
        .with_params(params);

    match state.engine.execute(pipeline, &request).await {
        Ok(out) => (StatusCode::OK, Json(out.body)).into_response(),
        Err(err) => {
            let status = StatusCode::from_u16(err.http_status())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            tracing::warn!(
                pipeline = %err.dsl_name,
                step = %err.step_name,
                cause = %err.cause_code,
                "pipeline failed"
            );
            (status, Json(err.error_object())).into_response()
        }
    }
}

fn error(status: StatusCode, message: String) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}
