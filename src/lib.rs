//! Metrc package webhook relay.
//!
//! Ingests webhook callbacks from the Metrc regulatory tracking platform
//! describing inventory package changes, deduplicates them, and relays a
//! human-readable summary of each new event to Pushover.

pub mod config;
pub mod notify;
pub mod server;
pub mod webhooks;
