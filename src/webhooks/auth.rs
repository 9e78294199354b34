//! Webhook request authentication using a pre-shared secret.
//!
//! Metrc does not sign webhook payloads; it authenticates by echoing back a
//! pre-shared secret, conventionally as a `secret` query parameter. This
//! module checks that parameter (and, as an additional path, an
//! `X-Metrc-Secret` header) against the expected secret.
//!
//! The query string is walked manually rather than through a query-string
//! library, to stay independent of hosting-stack parsing quirks. The
//! parameter *key* matches case-insensitively and its value is
//! percent-unescaped; the secret *value* comparison is exact and
//! case-sensitive.
//!
//! Authentication fails closed: no configured secret, no query string, a
//! malformed query string, or a missing parameter all yield `false`, never a
//! panic.

use axum::http::{HeaderMap, Uri};

/// Query parameter carrying the pre-shared secret.
pub const SECRET_PARAM: &str = "secret";

/// Optional header carrying the pre-shared secret.
pub const SECRET_HEADER: &str = "x-metrc-secret";

/// Checks whether a request carries the expected pre-shared secret.
///
/// `expected` is the secret configured for this deployment (read from the
/// environment at call time by the caller, so rotation takes effect without a
/// restart). `None` or a blank value means authentication always fails.
///
/// # Examples
///
/// ```
/// use axum::http::{HeaderMap, Uri};
/// use metrc_relay::webhooks::is_authentic;
///
/// let uri: Uri = "/metrc/packages/webhook?secret=tip-top".parse().unwrap();
/// assert!(is_authentic(&uri, &HeaderMap::new(), Some("tip-top")));
/// assert!(!is_authentic(&uri, &HeaderMap::new(), Some("other")));
/// assert!(!is_authentic(&uri, &HeaderMap::new(), None));
/// ```
pub fn is_authentic(uri: &Uri, headers: &HeaderMap, expected: Option<&str>) -> bool {
    let Some(expected) = expected.filter(|s| !s.trim().is_empty()) else {
        // Fail closed when no secret is configured.
        return false;
    };

    if let Some(candidate) = header_secret(headers) {
        if candidate == expected {
            return true;
        }
    }

    query_secret(uri.query()).is_some_and(|candidate| candidate == expected)
}

/// Extracts the secret from the `X-Metrc-Secret` header, if present and
/// readable as UTF-8.
fn header_secret(headers: &HeaderMap) -> Option<&str> {
    headers.get(SECRET_HEADER).and_then(|v| v.to_str().ok())
}

/// Extracts the `secret` query parameter value, percent-unescaped.
///
/// The first occurrence of the key wins. Pairs without `=` are skipped.
fn query_secret(query: Option<&str>) -> Option<String> {
    let query = query?;

    for pair in query.split('&').filter(|p| !p.is_empty()) {
        let Some((key, value)) = pair.split_once('=') else {
            continue;
        };
        if key.eq_ignore_ascii_case(SECRET_PARAM) {
            return Some(percent_unescape(value));
        }
    }

    None
}

/// Decodes `%XX` escapes. Invalid escapes are passed through literally, and
/// `+` is not treated as a space (this is URI unescaping, not form decoding).
fn percent_unescape(value: &str) -> String {
    let bytes = value.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            let hi = (bytes[i + 1] as char).to_digit(16);
            let lo = (bytes[i + 2] as char).to_digit(16);
            if let (Some(hi), Some(lo)) = (hi, lo) {
                out.push((hi * 16 + lo) as u8);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }

    String::from_utf8_lossy(&out).into_owned()
}
