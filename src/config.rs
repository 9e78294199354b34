//! Environment-sourced configuration.
//!
//! All credentials are read at call time, not cached at startup, so rotating
//! a secret in the environment takes effect without a restart. Absence of the
//! webhook secret makes the authenticator reject everything; absence of a
//! Pushover credential surfaces as a dispatch error on the next send, never a
//! startup crash.

use std::env;

/// Environment variable holding the expected webhook secret.
pub const WEBHOOK_SECRET_VAR: &str = "METRC_WEBHOOK_SECRET";

/// Environment variable holding the Pushover application token.
pub const PUSHOVER_TOKEN_VAR: &str = "PUSHOVER_APP_TOKEN";

/// Environment variable holding the Pushover user key.
pub const PUSHOVER_USER_VAR: &str = "PUSHOVER_USER_KEY";

/// The configured webhook secret, if any. Blank values count as unset.
pub fn webhook_secret() -> Option<String> {
    read_non_blank(WEBHOOK_SECRET_VAR)
}

/// The Pushover application token, if configured.
pub fn pushover_app_token() -> Option<String> {
    read_non_blank(PUSHOVER_TOKEN_VAR)
}

/// The Pushover user key, if configured.
pub fn pushover_user_key() -> Option<String> {
    read_non_blank(PUSHOVER_USER_VAR)
}

fn read_non_blank(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Where the expected webhook secret comes from.
///
/// Production uses [`SecretSource::Env`] so rotation is honored per request.
/// Tests inject [`SecretSource::Fixed`] to avoid touching process-wide
/// environment state.
#[derive(Debug, Clone)]
pub enum SecretSource {
    /// Read [`WEBHOOK_SECRET_VAR`] from the environment on every call.
    Env,
    /// A fixed value (or deliberately none, to exercise fail-closed paths).
    Fixed(Option<String>),
}

impl SecretSource {
    /// The currently expected secret, if any.
    pub fn current(&self) -> Option<String> {
        match self {
            SecretSource::Env => webhook_secret(),
            SecretSource::Fixed(value) => value.clone(),
        }
    }
}
