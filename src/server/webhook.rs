//! Package webhook endpoint handler.
//!
//! The ingestion pipeline: authenticate, read the body, normalize the
//! payload, filter through the seen-event store, and relay the fresh events
//! to the notifier in one batched message.
//!
//! The response is always `200 accepted` once the request reaches this
//! handler. An authentication failure looks identical to success so probing
//! clients get no oracle; a parse failure is acknowledged because Metrc would
//! only resend the same bytes; a dispatch failure is the notifier owner's
//! problem, not Metrc's. Operational visibility into all three lives in the
//! logs.

use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;
use tracing::{debug, info, warn};

use super::AppState;
use crate::notify::Notifier;
use crate::webhooks::{auth, parse_payload, summary};

/// Title used for every relayed notification.
const NOTIFICATION_TITLE: &str = "Metrc package update";

/// Upper bound on buffered body size, shared with the inspect endpoint.
/// Metrc batches are small; anything near this limit is noise.
pub(crate) const MAX_BODY_BYTES: usize = 4 * 1024 * 1024;

/// The fixed acknowledgment sent for every request.
const ACK: (StatusCode, &'static str) = (StatusCode::OK, "accepted");

/// Package webhook handler.
///
/// # Request
///
/// - Method: POST or PUT
/// - Query parameter `secret` (or `X-Metrc-Secret` header): pre-shared token
/// - Body: JSON in envelope, bare-array, or single-object form
///
/// # Response
///
/// Always `200 accepted`, whatever happened internally. Metrc cannot fix a
/// bad secret, a malformed payload, or a broken notifier; a non-200 would
/// only trigger retry storms of input that will fail identically.
pub async fn webhook_handler<N>(
    State(app_state): State<AppState<N>>,
    request: Request,
) -> (StatusCode, &'static str)
where
    N: Notifier + Send + Sync + 'static,
{
    let (parts, body) = request.into_parts();

    let content_type = parts
        .headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("(none)");
    debug!(
        method = %parts.method,
        path = %parts.uri.path(),
        content_type,
        "received package webhook"
    );

    // Authenticate before touching the body; an unauthenticated sender
    // should cost nothing beyond this check.
    if !auth::is_authentic(
        &parts.uri,
        &parts.headers,
        app_state.expected_secret().as_deref(),
    ) {
        warn!("webhook failed authentication; acknowledging without processing");
        return ACK;
    }

    let body = match axum::body::to_bytes(body, MAX_BODY_BYTES).await {
        Ok(bytes) => bytes,
        Err(error) => {
            warn!(%error, "failed to read webhook body");
            return ACK;
        }
    };

    if body.iter().all(u8::is_ascii_whitespace) {
        debug!("empty webhook body");
        return ACK;
    }

    let payload = match parse_payload(&body) {
        Ok(payload) => payload,
        Err(error) => {
            warn!(%error, body_len = body.len(), "unparseable webhook payload");
            return ACK;
        }
    };

    let total = payload.events.len();

    // The atomic check-and-insert in the store makes this safe against the
    // same event arriving in concurrent requests. Payload order is kept.
    let fresh: Vec<_> = payload
        .events
        .into_iter()
        .filter(|event| app_state.seen().is_fresh(event))
        .collect();

    if fresh.is_empty() {
        debug!(total, "no fresh events in webhook");
        return ACK;
    }

    info!(
        total,
        fresh = fresh.len(),
        declared = ?payload.declared_count,
        "relaying fresh package events"
    );

    // One notification per request, however many events it carried.
    let message = summary::format_batch(&fresh, payload.declared_count);
    if let Err(error) = app_state
        .notifier()
        .send(NOTIFICATION_TITLE, &message)
        .await
    {
        // Deliberately does not change the response.
        warn!(%error, "notification dispatch failed");
    }

    ACK
}
