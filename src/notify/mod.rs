//! Push-notification dispatch.
//!
//! The orchestrator only knows the [`Notifier`] trait: send a title and a
//! message, get success or failure. The production implementation talks to
//! the Pushover API; tests substitute a recording mock.
//!
//! Dispatch failures are the notifier owner's problem, not the webhook
//! sender's: callers are expected to catch and log [`NotifyError`] without
//! letting it affect the HTTP response.

use std::future::Future;

use thiserror::Error;

pub mod pushover;

pub use pushover::PushoverNotifier;

/// Errors from notification dispatch.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// A required credential is missing from the environment.
    #[error("missing notifier credential: {0}")]
    MissingCredential(&'static str),

    /// The HTTP request to the notification API failed outright.
    #[error("notification request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The notification API answered with a non-success status.
    #[error("notification rejected: HTTP {status}")]
    Rejected { status: reqwest::StatusCode },
}

/// Sends a (title, message) pair to a human.
///
/// # Example (mock for testing)
///
/// ```ignore
/// #[derive(Default)]
/// struct RecordingNotifier {
///     calls: Mutex<Vec<(String, String)>>,
/// }
///
/// impl Notifier for RecordingNotifier {
///     async fn send(&self, title: &str, message: &str) -> Result<(), NotifyError> {
///         self.calls.lock().unwrap().push((title.into(), message.into()));
///         Ok(())
///     }
/// }
/// ```
pub trait Notifier {
    /// Delivers one notification.
    fn send(
        &self,
        title: &str,
        message: &str,
    ) -> impl Future<Output = Result<(), NotifyError>> + Send;
}
