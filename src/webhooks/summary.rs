//! Notification text for package events.
//!
//! Rendering is pure and total: every field has a display fallback, so
//! formatting never fails and the same event always produces byte-identical
//! output. A batch renders one compact line per event; a batch of exactly one
//! event gets the extended form with the full attribute set.

use super::parser::PackageEvent;

/// Marker rendered for any absent field.
pub const NOT_AVAILABLE: &str = "n/a";

/// Formats a batch of events into one notification message.
///
/// When `declared_count` is known it is prefixed as its own line. A single
/// event renders in the extended form; multiple events render one compact
/// line each, in payload order.
pub fn format_batch(events: &[PackageEvent], declared_count: Option<u64>) -> String {
    let mut lines = Vec::with_capacity(events.len() + 1);

    if let Some(count) = declared_count {
        lines.push(format!("Metrc reported {count} package event(s)"));
    }

    match events {
        [single] => lines.push(format_event_details(single)),
        _ => lines.extend(events.iter().map(format_event)),
    }

    lines.join("\n")
}

/// Formats the compact one-line form: identifier, label, quantity.
pub fn format_event(event: &PackageEvent) -> String {
    format!(
        "Id {} | Label {} | Qty {}",
        text(&event.id),
        text(&event.label),
        quantity(event),
    )
}

/// Formats the extended single-event form with the full attribute set.
pub fn format_event_details(event: &PackageEvent) -> String {
    format!(
        "Id {} | Label {} | Qty {} | Type {} | Item {} | Location {} | Lab {} \
         | Hold {} | Investigation {} | Recall {} | Finished {} | Modified {}",
        text(&event.id),
        text(&event.label),
        quantity(event),
        text(&event.package_type),
        text(&event.item_name),
        text(&event.location),
        text(&event.lab_testing_state),
        yn(event.is_on_hold),
        yn(event.is_under_investigation),
        yn(event.is_on_recall),
        yn(event.is_finished),
        text(&event.last_modified),
    )
}

fn text(field: &Option<String>) -> &str {
    field.as_deref().unwrap_or(NOT_AVAILABLE)
}

/// Renders the quantity with its unit label when both are known.
fn quantity(event: &PackageEvent) -> String {
    match (event.quantity, event.unit_of_measure.as_deref()) {
        (Some(q), Some(unit)) => format!("{q} {unit}"),
        (Some(q), None) => q.to_string(),
        (None, _) => NOT_AVAILABLE.to_string(),
    }
}

fn yn(flag: Option<bool>) -> &'static str {
    if flag == Some(true) { "Y" } else { "N" }
}
