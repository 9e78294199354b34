//! Pushover-backed [`Notifier`] implementation.
//!
//! Posts form-encoded (token, user, title, message) to the Pushover messages
//! API. Credentials come from the environment on every send, so they can be
//! rotated without a restart and their absence is a per-send error rather
//! than a startup crash.

use tracing::debug;

use super::{Notifier, NotifyError};
use crate::config;

/// The Pushover messages endpoint.
pub const PUSHOVER_MESSAGES_URL: &str = "https://api.pushover.net/1/messages.json";

/// Sends notifications through the Pushover HTTP API.
#[derive(Debug, Clone)]
pub struct PushoverNotifier {
    client: reqwest::Client,
    endpoint: String,
}

impl PushoverNotifier {
    /// Creates a notifier targeting the real Pushover API.
    pub fn new() -> Self {
        PushoverNotifier::with_endpoint(PUSHOVER_MESSAGES_URL)
    }

    /// Creates a notifier targeting an alternate endpoint (local test
    /// servers).
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        PushoverNotifier {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

impl Default for PushoverNotifier {
    fn default() -> Self {
        PushoverNotifier::new()
    }
}

impl Notifier for PushoverNotifier {
    async fn send(&self, title: &str, message: &str) -> Result<(), NotifyError> {
        let token = config::pushover_app_token()
            .ok_or(NotifyError::MissingCredential(config::PUSHOVER_TOKEN_VAR))?;
        let user = config::pushover_user_key()
            .ok_or(NotifyError::MissingCredential(config::PUSHOVER_USER_VAR))?;

        let params = [
            ("token", token.as_str()),
            ("user", user.as_str()),
            ("title", title),
            ("message", message),
        ];

        let response = self
            .client
            .post(&self.endpoint)
            .form(&params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::Rejected { status });
        }

        debug!(%status, "notification delivered");
        Ok(())
    }
}
