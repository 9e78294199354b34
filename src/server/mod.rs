//! HTTP server for the Metrc webhook relay.
//!
//! This module implements the HTTP surface that:
//! - Accepts Metrc package webhooks, authenticates them, and relays fresh
//!   events to the notifier
//! - Provides a diagnostic echo endpoint for debugging sender behavior
//! - Provides a health check for liveness probes
//!
//! # Endpoints
//!
//! - `POST|PUT /metrc/packages/webhook` - Package webhook ingestion (always 200)
//! - `POST|PUT /metrc/packages/inspect` - Logs the raw request, no auth (always 200)
//! - `GET /ping` - Returns 200 if the server is running

use std::sync::Arc;

use crate::config::SecretSource;
use crate::notify::Notifier;
use crate::webhooks::SeenEvents;

pub mod health;
pub mod inspect;
pub mod webhook;

pub use health::ping_handler;
pub use inspect::inspect_handler;
pub use webhook::webhook_handler;

/// Shared application state.
///
/// Passed to handlers via Axum's `State` extractor. Carries the only
/// cross-request mutable resource (the seen-event store) plus the injected
/// secret source and notifier; the handlers themselves are stateless.
pub struct AppState<N> {
    inner: Arc<AppStateInner<N>>,
}

// Derived Clone would require N: Clone; the Arc makes that unnecessary.
impl<N> Clone for AppState<N> {
    fn clone(&self) -> Self {
        AppState {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct AppStateInner<N> {
    /// Fingerprints of events already relayed. Process lifetime, no eviction.
    seen: SeenEvents,

    /// Where the expected webhook secret comes from.
    secret: SecretSource,

    /// Notification dispatcher.
    notifier: N,
}

impl<N: Notifier> AppState<N> {
    /// Creates a new `AppState` with an empty seen-event store.
    pub fn new(secret: SecretSource, notifier: N) -> Self {
        AppState {
            inner: Arc::new(AppStateInner {
                seen: SeenEvents::new(),
                secret,
                notifier,
            }),
        }
    }

    /// Returns the seen-event store.
    pub fn seen(&self) -> &SeenEvents {
        &self.inner.seen
    }

    /// Returns the currently expected webhook secret, if configured.
    ///
    /// Resolved on every call so secret rotation in the environment takes
    /// effect without a restart.
    pub fn expected_secret(&self) -> Option<String> {
        self.inner.secret.current()
    }

    /// Returns the notifier.
    pub fn notifier(&self) -> &N {
        &self.inner.notifier
    }
}

/// Builds the axum Router with all endpoints.
///
/// The webhook and inspect routes accept PUT as well as POST because some
/// Metrc deployments deliver with PUT.
pub fn build_router<N>(app_state: AppState<N>) -> axum::Router
where
    N: Notifier + Send + Sync + 'static,
{
    use axum::routing::{get, post};

    axum::Router::new()
        .route(
            "/metrc/packages/webhook",
            post(webhook_handler::<N>).put(webhook_handler::<N>),
        )
        .route(
            "/metrc/packages/inspect",
            post(inspect_handler).put(inspect_handler),
        )
        .route("/ping", get(ping_handler))
        .with_state(app_state)
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::{Arc, Mutex};

    use crate::notify::{Notifier, NotifyError};

    /// Records every send; optionally fails each one after recording it.
    #[derive(Debug, Default, Clone)]
    pub struct RecordingNotifier {
        calls: Arc<Mutex<Vec<(String, String)>>>,
        fail: bool,
    }

    impl RecordingNotifier {
        pub fn failing() -> Self {
            RecordingNotifier {
                fail: true,
                ..RecordingNotifier::default()
            }
        }

        pub fn calls(&self) -> Vec<(String, String)> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl Notifier for RecordingNotifier {
        async fn send(&self, title: &str, message: &str) -> Result<(), NotifyError> {
            self.calls
                .lock()
                .unwrap()
                .push((title.to_string(), message.to_string()));
            if self.fail {
                return Err(NotifyError::MissingCredential("test"));
            }
            Ok(())
        }
    }
}
