//! Health check endpoint for liveness probes.
//!
//! Returns 200 OK if the server is running. Intended for load balancers and
//! orchestration systems.

use axum::http::StatusCode;

/// Health check handler.
///
/// Returns 200 OK with a fixed string. No logic; if this answers, the
/// process is alive.
pub async fn ping_handler() -> (StatusCode, &'static str) {
    (StatusCode::OK, "OK - metrc-relay is live")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn ping_returns_200_ok() {
        let (status, body) = ping_handler().await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "OK - metrc-relay is live");
    }
}
