//! Todo schema validation.
//!
//! Every value that crosses a trust boundary (a row read back from a store,
//! an identifier from a URL, content from a request body) is decoded here
//! into typed values or rejected with a `ValidationError` naming each
//! failing field. Nothing is coerced.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::db::{Issue, Todo, ValidationError};

/// Decode a stored row into a `Todo`.
///
/// All four fields are checked and every failure is reported.
pub fn validate_todo(value: &Value) -> Result<Todo, ValidationError> {
    let Some(object) = value.as_object() else {
        return Err(ValidationError::single(
            "",
            format!("expected an object, received {}", type_name(value)),
        ));
    };

    let mut issues = Vec::new();

    let id = field(object, "id", &mut issues, |v| match v {
        Value::String(s) => parse_uuid(s),
        other => Err(expected("a string", other)),
    });
    let date = field(object, "date", &mut issues, |v| match v {
        Value::String(s) => parse_date(s),
        other => Err(expected("a string", other)),
    });
    let content = field(object, "content", &mut issues, |v| match v {
        Value::String(s) => check_content(s).map(str::to_string),
        other => Err(expected("a string", other)),
    });
    let done = field(object, "done", &mut issues, |v| match v {
        Value::Bool(b) => Ok(*b),
        other => Err(expected("a boolean", other)),
    });

    match (id, date, content, done) {
        (Some(id), Some(date), Some(content), Some(done)) if issues.is_empty() => Ok(Todo {
            id,
            date,
            content,
            done,
        }),
        _ => Err(ValidationError::new(issues)),
    }
}

/// Decode a list of rows, failing on the first malformed one.
pub fn validate_todos(values: &[Value]) -> Result<Vec<Todo>, ValidationError> {
    values
        .iter()
        .enumerate()
        .map(|(index, value)| validate_todo(value).map_err(|e| e.nested(&format!("[{}]", index))))
        .collect()
}

/// Check a caller-supplied identifier.
pub fn validate_id(raw: &str) -> Result<Uuid, ValidationError> {
    parse_uuid(raw).map_err(|message| ValidationError::single("id", message))
}

/// Check caller-supplied content for a new or updated todo.
pub fn validate_content(raw: &str) -> Result<&str, ValidationError> {
    check_content(raw).map_err(|message| ValidationError::single("content", message))
}

fn check_content(raw: &str) -> Result<&str, String> {
    if raw.trim().is_empty() {
        Err("must not be empty".to_string())
    } else {
        Ok(raw)
    }
}

/// Only the lowercase hyphenated form is accepted; stores match ids by text.
fn parse_uuid(raw: &str) -> Result<Uuid, String> {
    Uuid::try_parse(raw)
        .ok()
        .filter(|id| id.hyphenated().to_string() == raw)
        .ok_or_else(|| "must be a valid UUID".to_string())
}

fn parse_date(raw: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(raw)
        .map(|d| d.with_timezone(&Utc))
        .map_err(|_| "must be an ISO-8601 datetime".to_string())
}

fn field<T>(
    object: &Map<String, Value>,
    name: &str,
    issues: &mut Vec<Issue>,
    decode: impl FnOnce(&Value) -> Result<T, String>,
) -> Option<T> {
    let result = match object.get(name) {
        None => Err("is required".to_string()),
        Some(value) => decode(value),
    };
    result.map_err(|message| issues.push(Issue::new(name, message))).ok()
}

fn expected(what: &str, received: &Value) -> String {
    format!("expected {}, received {}", what, type_name(received))
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
