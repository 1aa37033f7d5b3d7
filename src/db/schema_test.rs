//! Tests for todo schema validation.

use serde_json::json;

use crate::db::schema::{validate_content, validate_id, validate_todo, validate_todos};

const ID: &str = "70905d7e-c969-45b1-99f0-1aa155477204";

fn valid_row() -> serde_json::Value {
    json!({
        "id": ID,
        "date": "2023-04-15T19:46:51.109Z",
        "content": "Test todo",
        "done": false
    })
}

fn fields(err: &crate::db::ValidationError) -> Vec<&str> {
    err.issues.iter().map(|i| i.field.as_str()).collect()
}

#[test]
fn valid_row_decodes() {
    let todo = validate_todo(&valid_row()).expect("Row should validate");

    assert_eq!(todo.id.to_string(), ID);
    assert_eq!(todo.date.to_rfc3339(), "2023-04-15T19:46:51.109+00:00");
    assert_eq!(todo.content, "Test todo");
    assert!(!todo.done);
}

#[test]
fn extra_fields_are_ignored() {
    let mut row = valid_row();
    row["extra"] = json!(42);
    assert!(validate_todo(&row).is_ok());
}

#[test]
fn non_object_is_rejected() {
    let err = validate_todo(&json!(null)).unwrap_err();
    assert_eq!(err.issues.len(), 1);
    assert_eq!(err.issues[0].message, "expected an object, received null");

    let err = validate_todo(&json!([1, 2])).unwrap_err();
    assert_eq!(err.issues[0].message, "expected an object, received array");
}

#[test]
fn every_missing_field_is_reported() {
    let err = validate_todo(&json!({})).unwrap_err();
    assert_eq!(fields(&err), vec!["id", "date", "content", "done"]);
    assert!(err.issues.iter().all(|i| i.message == "is required"));
}

#[test]
fn wrong_types_are_reported() {
    let err = validate_todo(&json!({
        "id": 12,
        "date": true,
        "content": null,
        "done": "false"
    }))
    .unwrap_err();

    assert_eq!(fields(&err), vec!["id", "date", "content", "done"]);
    assert_eq!(err.issues[0].message, "expected a string, received number");
    assert_eq!(err.issues[3].message, "expected a boolean, received string");
}

#[test]
fn malformed_id_is_rejected() {
    let mut row = valid_row();
    row["id"] = json!("not-a-uuid");

    let err = validate_todo(&row).unwrap_err();
    assert_eq!(fields(&err), vec!["id"]);
    assert_eq!(err.issues[0].message, "must be a valid UUID");
}

#[test]
fn malformed_date_is_rejected() {
    let mut row = valid_row();
    row["date"] = json!("yesterday");

    let err = validate_todo(&row).unwrap_err();
    assert_eq!(fields(&err), vec!["date"]);
}

#[test]
fn empty_content_is_rejected() {
    let mut row = valid_row();
    row["content"] = json!("");
    let err = validate_todo(&row).unwrap_err();
    assert_eq!(fields(&err), vec!["content"]);

    row["content"] = json!("   ");
    assert!(validate_todo(&row).is_err());
}

#[test]
fn validate_todos_fails_on_first_bad_row_with_index() {
    let mut bad = valid_row();
    bad["done"] = json!(1);

    let err = validate_todos(&[valid_row(), bad, json!("garbage")]).unwrap_err();
    assert_eq!(fields(&err), vec!["[1].done"]);
}

#[test]
fn validate_todos_accepts_empty_and_valid_lists() {
    assert!(validate_todos(&[]).unwrap().is_empty());
    assert_eq!(validate_todos(&[valid_row(), valid_row()]).unwrap().len(), 2);
}

#[test]
fn validate_id_accepts_uuid_and_rejects_garbage() {
    assert_eq!(validate_id(ID).unwrap().to_string(), ID);

    let err = validate_id("123").unwrap_err();
    assert_eq!(fields(&err), vec!["id"]);
    assert!(validate_id("").is_err());
}

#[test]
fn validate_id_rejects_other_uuid_spellings() {
    let id = uuid::Uuid::parse_str(ID).unwrap();
    for spelling in [
        id.simple().to_string(),
        id.braced().to_string(),
        id.urn().to_string(),
        ID.to_uppercase(),
        format!(" {} ", ID),
        format!("{}\n", ID),
    ] {
        let err = validate_id(&spelling).unwrap_err();
        assert_eq!(fields(&err), vec!["id"], "{:?} should be rejected", spelling);
        assert_eq!(err.issues[0].message, "must be a valid UUID");
    }
}

#[test]
fn validate_todo_rejects_stored_id_in_simple_form() {
    let mut row = valid_row();
    row["id"] = json!(uuid::Uuid::parse_str(ID).unwrap().simple().to_string());

    let err = validate_todo(&row).unwrap_err();
    assert_eq!(fields(&err), vec!["id"]);
}

#[test]
fn validate_content_rejects_blank() {
    assert_eq!(validate_content("Buy milk").unwrap(), "Buy milk");
    assert_eq!(validate_content("  padded ").unwrap(), "  padded ");

    let err = validate_content("").unwrap_err();
    assert_eq!(fields(&err), vec!["content"]);
    assert_eq!(err.issues[0].message, "must not be empty");
    assert!(validate_content("\n\t ").is_err());
}
