//! Metrc package webhook payload parser.
//!
//! Metrc's webhook payloads are loosely specified and arrive in one of three
//! shapes:
//!
//! 1. **Envelope**: `{"data": [...], "datacount": n}` — an object wrapping the
//!    events in a `data` array plus a declared count
//! 2. **Bare array**: `[...]` — the events with no wrapper
//! 3. **Single object**: `{...}` — exactly one event
//!
//! # Parsing Strategy
//!
//! 1. The root is classified into one of the shapes above (tried in that
//!    order; anything else is a [`ParseError`])
//! 2. Each object element becomes one [`PackageEvent`]; non-object elements
//!    are silently skipped
//! 3. Per-field extraction is tolerant: every field is independently
//!    optional, numeric fields accept a JSON number or a numeric string, and
//!    boolean fields accept JSON `true`/`false` only

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Error type for payload parsing failures.
///
/// Parse failures are an expected, frequent path here (the sender's format is
/// what it is), so they are plain values rather than something to panic over.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The body is not valid JSON at all.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The JSON root is a scalar or null — none of the three known shapes.
    #[error("unrecognized payload root: expected object or array, got {kind}")]
    UnrecognizedRoot { kind: &'static str },
}

/// One inventory package change notice.
///
/// Immutable once constructed. Every field is optional because the sender
/// omits, renames, or re-types fields freely between deliveries; display
/// fallbacks live in [`crate::webhooks::summary`]. Serializes for
/// structured-log payloads.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PackageEvent {
    /// Opaque identifier assigned by the sender.
    pub id: Option<String>,
    /// Human-facing package label.
    pub label: Option<String>,
    /// Package quantity. Absent if missing or unparseable.
    pub quantity: Option<f64>,
    /// Opaque timestamp string. Used only for fingerprinting and display;
    /// its format is not guaranteed, so it is never parsed as a date.
    pub last_modified: Option<String>,
    /// Package type label.
    pub package_type: Option<String>,
    /// Name of the nested item (`Item.Name`).
    pub item_name: Option<String>,
    /// Unit-of-measure label for the quantity.
    pub unit_of_measure: Option<String>,
    /// Location label.
    pub location: Option<String>,
    /// Lab-testing state label.
    pub lab_testing_state: Option<String>,
    /// Whether the package is on administrative hold.
    pub is_on_hold: Option<bool>,
    /// Whether the package is under regulatory investigation.
    pub is_under_investigation: Option<bool>,
    /// Whether the package is subject to a recall.
    pub is_on_recall: Option<bool>,
    /// Whether the package is finished (closed out).
    pub is_finished: Option<bool>,
}

/// The uniform result of normalizing one webhook body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedPayload {
    /// The events, in payload order.
    pub events: Vec<PackageEvent>,
    /// The sender-declared event count (`datacount`) when present and
    /// numeric; otherwise the number of elements actually found.
    pub declared_count: Option<u64>,
}

/// The classified root shape of a webhook body.
enum PayloadShape<'a> {
    /// `{"data": [...], "datacount": n}`
    Envelope {
        data: &'a [Value],
        declared: Option<u64>,
    },
    /// `[...]`
    Array(&'a [Value]),
    /// `{...}`
    SingleObject(&'a Value),
}

/// Parses a raw webhook body into a uniform sequence of package events.
///
/// The three payload shapes all normalize to the same event sequence; the
/// caller never needs to know which shape arrived.
///
/// # Examples
///
/// ```
/// use metrc_relay::webhooks::parse_payload;
///
/// let body = br#"{"data":[{"Id":"1","Label":"L1","Quantity":5}],"datacount":1}"#;
/// let payload = parse_payload(body).unwrap();
///
/// assert_eq!(payload.events.len(), 1);
/// assert_eq!(payload.declared_count, Some(1));
/// assert_eq!(payload.events[0].label.as_deref(), Some("L1"));
/// ```
pub fn parse_payload(raw: &[u8]) -> Result<NormalizedPayload, ParseError> {
    let root: Value = serde_json::from_slice(raw)?;

    let (elements, declared_count): (&[Value], Option<u64>) = match classify(&root)? {
        PayloadShape::Envelope { data, declared } => (data, declared.or(Some(data.len() as u64))),
        PayloadShape::Array(items) => (items, Some(items.len() as u64)),
        PayloadShape::SingleObject(obj) => (std::slice::from_ref(obj), Some(1)),
    };

    // Non-object elements are skipped, not treated as parse failures.
    let events = elements
        .iter()
        .filter_map(Value::as_object)
        .map(extract_event)
        .collect();

    Ok(NormalizedPayload {
        events,
        declared_count,
    })
}

/// Classifies the JSON root into one of the three known payload shapes.
///
/// Tried in order, first match wins: an object with a `data` array is an
/// envelope; a bare array is an array; any other object is a single event.
/// Scalars and null are unrecognized.
fn classify(root: &Value) -> Result<PayloadShape<'_>, ParseError> {
    if let Value::Object(map) = root {
        if let Some(Value::Array(data)) = map.get("data") {
            // `datacount` must be numeric to be honored; anything else falls
            // back to the observed element count.
            let declared = map.get("datacount").and_then(Value::as_u64);
            return Ok(PayloadShape::Envelope {
                data: data.as_slice(),
                declared,
            });
        }
        return Ok(PayloadShape::SingleObject(root));
    }

    if let Value::Array(items) = root {
        return Ok(PayloadShape::Array(items.as_slice()));
    }

    Err(ParseError::UnrecognizedRoot {
        kind: json_kind(root),
    })
}

/// Extracts one event from an object element. Total: every field that is
/// absent or of the wrong kind is simply `None`.
fn extract_event(obj: &serde_json::Map<String, Value>) -> PackageEvent {
    PackageEvent {
        id: get_string(obj, "Id"),
        label: get_string(obj, "Label"),
        quantity: get_number(obj, "Quantity"),
        last_modified: get_string(obj, "LastModified"),
        package_type: get_string(obj, "PackageType"),
        item_name: obj
            .get("Item")
            .and_then(Value::as_object)
            .and_then(|item| get_string(item, "Name")),
        unit_of_measure: get_string(obj, "UnitOfMeasureName"),
        location: get_string(obj, "LocationName"),
        lab_testing_state: get_string(obj, "LabTestingState"),
        is_on_hold: get_bool(obj, "IsOnHold"),
        is_under_investigation: get_bool(obj, "IsUnderInvestigation"),
        is_on_recall: get_bool(obj, "IsOnRecall"),
        is_finished: get_bool(obj, "IsFinished"),
    }
}

fn get_string(obj: &serde_json::Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key).and_then(Value::as_str).map(str::to_string)
}

/// Accepts a JSON number or a numeric string ("5" and 5 both parse).
fn get_number(obj: &serde_json::Map<String, Value>, key: &str) -> Option<f64> {
    match obj.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Accepts JSON `true`/`false` only — no string coercion.
fn get_bool(obj: &serde_json::Map<String, Value>, key: &str) -> Option<bool> {
    obj.get(key).and_then(Value::as_bool)
}

/// Names a JSON value kind for error messages.
fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
