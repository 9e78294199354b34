//! Diagnostic echo endpoint.
//!
//! Accepts any POST/PUT, logs method, URL, and a bounded body preview, and
//! answers 200. No authentication. Useful for proving what Metrc actually
//! sends when wiring up a new deployment; deliberately side-effect free
//! otherwise.

use axum::extract::Request;
use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;
use tracing::info;

use super::webhook::MAX_BODY_BYTES;

/// Longest body preview written to the logs.
const PREVIEW_CHARS: usize = 2000;

/// Inspect handler: log the request, acknowledge, do nothing else.
pub async fn inspect_handler(request: Request) -> (StatusCode, &'static str) {
    let (parts, body) = request.into_parts();

    let content_type = parts
        .headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("(none)");

    info!(
        method = %parts.method,
        uri = %parts.uri,
        content_type,
        "inspect request arrived"
    );

    // Same cap as the webhook endpoint; an over-limit read logs as empty.
    let body = axum::body::to_bytes(body, MAX_BODY_BYTES)
        .await
        .unwrap_or_default();
    let text = String::from_utf8_lossy(&body);
    let preview: String = text.chars().take(PREVIEW_CHARS).collect();

    info!(body_len = text.len(), %preview, "inspect request body");

    (StatusCode::OK, "accepted")
}
