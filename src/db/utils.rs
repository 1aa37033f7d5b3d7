//! Database utility functions.

use std::cmp::Ordering;

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;
use uuid::Uuid;

/// Generate a fresh identifier for a new todo.
pub fn generate_entity_id() -> Uuid {
    Uuid::new_v4()
}

/// Format a timestamp the way every backend stores it.
///
/// Fixed microsecond precision keeps stored dates lexicographically sortable.
pub fn format_timestamp(time: DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Get current datetime as an RFC 3339 string.
pub fn current_timestamp() -> String {
    format_timestamp(Utc::now())
}

/// Order two stored field values.
///
/// Strings that both parse as RFC 3339 compare as instants rounded to the
/// millisecond, the resolution SQLite's `julianday` sorts on, so both stores
/// order offsets and mixed fractional precision alike. Missing values sort
/// before present ones.
pub fn compare_field_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(Value::String(a)), Some(Value::String(b))) => {
            match (instant_millis(a), instant_millis(b)) {
                (Some(a), Some(b)) => a.cmp(&b),
                _ => a.cmp(b),
            }
        }
        (Some(Value::Number(a)), Some(Value::Number(b))) => {
            let a = a.as_f64().unwrap_or_default();
            let b = b.as_f64().unwrap_or_default();
            a.partial_cmp(&b).unwrap_or(Ordering::Equal)
        }
        (Some(Value::Bool(a)), Some(Value::Bool(b))) => a.cmp(b),
        (Some(a), Some(b)) => a.to_string().cmp(&b.to_string()),
    }
}

fn instant_millis(raw: &str) -> Option<i64> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|d| (d.timestamp_micros() + 500).div_euclid(1000))
}
