//! Webhook ingestion: authentication, payload normalization, deduplication,
//! and notification text.

pub mod auth;
pub mod dedupe;
pub mod parser;
pub mod summary;

pub use auth::is_authentic;
pub use dedupe::{Fingerprint, SeenEvents};
pub use parser::{NormalizedPayload, PackageEvent, ParseError, parse_payload};
pub use summary::{format_batch, format_event, format_event_details};
