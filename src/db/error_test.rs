//! Tests for database error types.

use crate::db::{DbError, Issue, ValidationError};

#[test]
fn not_found_error_displays_correctly() {
    let err = DbError::NotFound {
        entity_type: "Todo".to_string(),
        id: "70905d7e-c969-45b1-99f0-1aa155477204".to_string(),
    };
    assert_eq!(
        err.to_string(),
        "Todo with id \"70905d7e-c969-45b1-99f0-1aa155477204\" not found"
    );
}

#[test]
fn todo_not_found_uses_todo_entity() {
    let err = DbError::todo_not_found("abc");
    assert!(matches!(
        err,
        DbError::NotFound { ref entity_type, ref id } if entity_type == "Todo" && id == "abc"
    ));
}

#[test]
fn create_failed_error_hides_detail() {
    assert_eq!(DbError::CreateFailed.to_string(), "Failed to create todo!");
}

#[test]
fn storage_error_displays_correctly() {
    let err = DbError::storage("disk full");
    assert_eq!(err.to_string(), "Storage error: disk full");
}

#[test]
fn migration_error_displays_correctly() {
    let err = DbError::Migration {
        message: "failed to apply migration 1".to_string(),
    };
    assert_eq!(err.to_string(), "Migration error: failed to apply migration 1");
}

#[test]
fn validation_error_lists_every_issue() {
    let err = ValidationError::new(vec![
        Issue::new("id", "must be a valid UUID"),
        Issue::new("content", "must not be empty"),
    ]);
    assert_eq!(
        err.to_string(),
        "Validation failed: id: must be a valid UUID; content: must not be empty"
    );
}

#[test]
fn validation_error_is_transparent_inside_db_error() {
    let err: DbError =
        ValidationError::single("done", "expected a boolean, received string").into();
    assert_eq!(
        err.to_string(),
        "Validation failed: done: expected a boolean, received string"
    );
}

#[test]
fn nested_validation_error_prefixes_fields() {
    let err = ValidationError::new(vec![
        Issue::new("content", "must not be empty"),
        Issue::new("", "expected an object, received null"),
    ])
    .nested("[2]");
    assert_eq!(err.issues[0].field, "[2].content");
    assert_eq!(err.issues[1].field, "[2]");
}
