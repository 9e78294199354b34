//! Deduplication of package events across webhook deliveries.
//!
//! Metrc redelivers the same package change freely, so each event is reduced
//! to a fingerprint and checked against a process-wide seen set before it is
//! relayed.
//!
//! # Fingerprint Format
//!
//! `<id>:<lastModified>`, built only when both parts are non-blank. An event
//! missing either part has no stable fingerprint: it is always treated as
//! fresh and never recorded, because recording an empty or partial key would
//! make unrelated events collide.
//!
//! # Lifetime
//!
//! The seen set lives for the process lifetime with no eviction. Unbounded
//! growth is an accepted limitation of this service, not an oversight; the
//! store is injected through `AppState` so a bounded implementation can
//! replace it if that ever changes.

use std::collections::HashSet;
use std::fmt;
use std::sync::Mutex;

use super::parser::PackageEvent;

/// A deduplication key identifying one logical package event.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Derives the fingerprint of an event, or `None` when the event has no
    /// stable identity (blank or missing `id` or `lastModified`).
    pub fn of(event: &PackageEvent) -> Option<Fingerprint> {
        let id = non_blank(event.id.as_deref())?;
        let last_modified = non_blank(event.last_modified.as_deref())?;
        Some(Fingerprint(format!("{id}:{last_modified}")))
    }

    /// Returns the fingerprint as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.trim().is_empty())
}

/// Process-wide store of already-handled event fingerprints.
///
/// The check-and-insert is atomic per key: of two identical events arriving
/// concurrently, exactly one is reported fresh.
#[derive(Debug, Default)]
pub struct SeenEvents {
    seen: Mutex<HashSet<Fingerprint>>,
}

impl SeenEvents {
    /// Creates an empty store.
    pub fn new() -> Self {
        SeenEvents::default()
    }

    /// Reports whether `event` has not been handled before, recording its
    /// fingerprint as handled when so.
    ///
    /// Events without a stable fingerprint are always fresh and never
    /// recorded.
    pub fn is_fresh(&self, event: &PackageEvent) -> bool {
        match Fingerprint::of(event) {
            Some(fingerprint) => self.insert_if_absent(fingerprint),
            None => true,
        }
    }

    /// Atomically records a fingerprint, returning `true` if it was absent.
    pub fn insert_if_absent(&self, fingerprint: Fingerprint) -> bool {
        self.seen
            .lock()
            .expect("seen-event lock poisoned")
            .insert(fingerprint)
    }

    /// Number of recorded fingerprints.
    pub fn len(&self) -> usize {
        self.seen.lock().expect("seen-event lock poisoned").len()
    }

    /// Whether no fingerprints have been recorded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Barrier};

    fn event(id: Option<&str>, last_modified: Option<&str>) -> PackageEvent {
        PackageEvent {
            id: id.map(str::to_string),
            label: Some("TESTLABEL".into()),
            quantity: Some(5.0),
            last_modified: last_modified.map(str::to_string),
            package_type: None,
            item_name: None,
            unit_of_measure: None,
            location: None,
            lab_testing_state: None,
            is_on_hold: None,
            is_under_investigation: None,
            is_on_recall: None,
            is_finished: None,
        }
    }

    #[test]
    fn fingerprint_joins_id_and_last_modified() {
        let fp = Fingerprint::of(&event(Some("1"), Some("t1"))).unwrap();
        assert_eq!(fp.as_str(), "1:t1");
        assert_eq!(fp.to_string(), "1:t1");
    }

    #[test]
    fn fingerprint_requires_both_parts() {
        assert!(Fingerprint::of(&event(None, Some("t1"))).is_none());
        assert!(Fingerprint::of(&event(Some("1"), None)).is_none());
        assert!(Fingerprint::of(&event(Some(""), Some("t1"))).is_none());
        assert!(Fingerprint::of(&event(Some("1"), Some("   "))).is_none());
    }

    #[test]
    fn first_sighting_is_fresh_second_is_not() {
        let seen = SeenEvents::new();
        let e = event(Some("1"), Some("t1"));

        assert!(seen.is_fresh(&e));
        assert!(!seen.is_fresh(&e));
    }

    #[test]
    fn distinct_fingerprints_are_independently_fresh() {
        let seen = SeenEvents::new();

        assert!(seen.is_fresh(&event(Some("1"), Some("t1"))));
        assert!(seen.is_fresh(&event(Some("1"), Some("t2"))));
        assert!(seen.is_fresh(&event(Some("2"), Some("t1"))));
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn unstable_events_are_always_fresh_and_never_recorded() {
        let seen = SeenEvents::new();
        let e = event(None, Some("t1"));

        assert!(seen.is_fresh(&e));
        assert!(seen.is_fresh(&e));
        assert!(seen.is_empty());
    }

    #[test]
    fn concurrent_identical_events_yield_exactly_one_fresh() {
        const THREADS: usize = 16;

        let seen = Arc::new(SeenEvents::new());
        let barrier = Arc::new(Barrier::new(THREADS));

        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                let seen = Arc::clone(&seen);
                let barrier = Arc::clone(&barrier);
                std::thread::spawn(move || {
                    let e = event(Some("1"), Some("t1"));
                    barrier.wait();
                    seen.is_fresh(&e)
                })
            })
            .collect();

        let fresh_count = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|&fresh| fresh)
            .count();

        assert_eq!(fresh_count, 1);
        assert_eq!(seen.len(), 1);
    }
}
