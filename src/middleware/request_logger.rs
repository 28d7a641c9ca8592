use axum::{
    body::Body,
    extract::{Request, State},
    http::{HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::time::Instant;
use uuid::Uuid;

use crate::AppState;

const MAX_BODY_LOG_SIZE: usize = 1024; // 1KB limit for body logging
const MAX_REQUEST_BODY_SIZE: usize = 2 * 1024 * 1024; // same as axum's default body limit

pub async fn request_logger_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    let request_id = Uuid::new_v4().to_string();
    let request_id_header = HeaderValue::from_str(&request_id).ok();
    let method = req.method().clone();
    let uri = req.uri().clone();
    let start = Instant::now();

    if let Some(value) = &request_id_header {
        req.headers_mut().insert("x-request-id", value.clone());
    }

    if state.log_request_body {
        let (parts, body) = req.into_parts();
        let bytes = match axum::body::to_bytes(body, MAX_REQUEST_BODY_SIZE).await {
            Ok(bytes) => bytes,
            Err(_) => {
                tracing::warn!(
                    request_id = %request_id,
                    method = %method,
                    uri = %uri,
                    "Request body too large or failed to read"
                );
                return (StatusCode::PAYLOAD_TOO_LARGE, "Request body too large").into_response();
            }
        };

        let sanitized_body = match serde_json::from_slice::<serde_json::Value>(&bytes) {
            Ok(json) => {
                let sanitized = crate::utils::sanitize::sanitize_json(&json);
                serde_json::to_string(&sanitized).unwrap_or_else(|_| "[invalid json]".to_string())
            }
            Err(_) => format!("[non-json, {} bytes]", bytes.len()),
        };
        let sanitized_body = truncate_for_log(sanitized_body);

        tracing::info!(
            request_id = %request_id,
            method = %method,
            uri = %uri,
            body_size = bytes.len(),
            body = %sanitized_body,
            "Incoming request"
        );

        req = Request::from_parts(parts, Body::from(bytes));
    } else {
        tracing::info!(
            request_id = %request_id,
            method = %method,
            uri = %uri,
            "Incoming request"
        );
    }

    let response = next.run(req).await;

    tracing::info!(
        request_id = %request_id,
        method = %method,
        uri = %uri,
        status = %response.status().as_u16(),
        latency_ms = start.elapsed().as_millis(),
        "Outgoing response"
    );

    let (mut parts, body) = response.into_parts();
    if let Some(value) = request_id_header {
        parts.headers.insert("x-request-id", value);
    }

    Response::from_parts(parts, body)
}

/// Cuts the logged body to `MAX_BODY_LOG_SIZE` bytes on a char boundary.
fn truncate_for_log(mut body: String) -> String {
    if body.len() <= MAX_BODY_LOG_SIZE {
        return body;
    }

    let mut end = MAX_BODY_LOG_SIZE;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    body.truncate(end);
    body.push_str("...[truncated]");
    body
}
