//! Tests for JsonFileStore.

use std::sync::Arc;

use serde_json::{Value, json};
use tempfile::TempDir;
use uuid::Uuid;

use crate::db::{
    DbError, JsonFileStore, NewTodo, OrderKey, RangeQuery, SortOrder, TodoPatch, TodoStore,
};

async fn setup_store() -> (TempDir, JsonFileStore) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let store = JsonFileStore::open(temp_dir.path().join("db.json"))
        .await
        .expect("Failed to open JSON store");
    (temp_dir, store)
}

fn new_todo(content: &str) -> NewTodo {
    NewTodo {
        content: content.to_string(),
    }
}

fn newest_first(start: usize, end: usize) -> RangeQuery {
    RangeQuery {
        order_by: OrderKey::Date,
        sort_order: SortOrder::Desc,
        start,
        end,
    }
}

fn row_id(row: &Value) -> Uuid {
    Uuid::parse_str(row["id"].as_str().unwrap()).unwrap()
}

fn contents(rows: &[Value]) -> Vec<&str> {
    rows.iter().map(|r| r["content"].as_str().unwrap()).collect()
}

fn write_rows(store: &JsonFileStore, rows: &[(&str, &str)]) {
    let todos: Vec<Value> = rows
        .iter()
        .map(|(date, content)| {
            json!({ "id": Uuid::new_v4(), "date": date, "content": content, "done": false })
        })
        .collect();
    std::fs::write(
        store.path(),
        serde_json::to_string(&json!({ "todos": todos })).unwrap(),
    )
    .unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn open_creates_empty_document() {
    let (_dir, store) = setup_store().await;

    let text = std::fs::read_to_string(store.path()).unwrap();
    let document: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(document, json!({ "todos": [] }));
}

#[tokio::test(flavor = "multi_thread")]
async fn insert_assigns_generated_fields() {
    let (_dir, store) = setup_store().await;

    let row = store.insert(&new_todo("Write docs")).await.unwrap();

    assert_eq!(row["content"], "Write docs");
    assert_eq!(row["done"], false);
    assert!(Uuid::parse_str(row["id"].as_str().unwrap()).is_ok());
    assert!(chrono::DateTime::parse_from_rfc3339(row["date"].as_str().unwrap()).is_ok());
}

#[tokio::test(flavor = "multi_thread")]
async fn insert_persists_pretty_printed_document() {
    let (_dir, store) = setup_store().await;

    store.insert(&new_todo("First")).await.unwrap();

    let text = std::fs::read_to_string(store.path()).unwrap();
    assert!(text.starts_with("{\n  \"todos\": [\n"));

    let document: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(document["todos"].as_array().unwrap().len(), 1);
    assert_eq!(document["todos"][0]["content"], "First");
}

#[tokio::test(flavor = "multi_thread")]
async fn select_range_orders_newest_first_and_counts_all() {
    let (_dir, store) = setup_store().await;

    for content in ["one", "two", "three", "four"] {
        store.insert(&new_todo(content)).await.unwrap();
    }

    let page = store.select_range(&newest_first(0, 1)).await.unwrap();
    assert_eq!(page.total, 4);
    let contents: Vec<&str> = page
        .rows
        .iter()
        .map(|r| r["content"].as_str().unwrap())
        .collect();
    assert_eq!(contents, vec!["four", "three"]);

    let page = store.select_range(&newest_first(2, 3)).await.unwrap();
    let contents: Vec<&str> = page
        .rows
        .iter()
        .map(|r| r["content"].as_str().unwrap())
        .collect();
    assert_eq!(contents, vec!["two", "one"]);
}

#[tokio::test(flavor = "multi_thread")]
async fn select_range_sorts_by_date_not_file_order() {
    let (_dir, store) = setup_store().await;

    std::fs::write(
        store.path(),
        serde_json::to_string(&json!({
            "todos": [
                { "id": Uuid::new_v4(), "date": "2023-04-15T10:00:00.000Z", "content": "middle", "done": false },
                { "id": Uuid::new_v4(), "date": "2023-04-16T10:00:00.000Z", "content": "newest", "done": false },
                { "id": Uuid::new_v4(), "date": "2023-04-14T10:00:00.000Z", "content": "oldest", "done": true }
            ]
        }))
        .unwrap(),
    )
    .unwrap();

    let page = store.select_range(&newest_first(0, 9)).await.unwrap();
    let contents: Vec<&str> = page
        .rows
        .iter()
        .map(|r| r["content"].as_str().unwrap())
        .collect();
    assert_eq!(contents, vec!["newest", "middle", "oldest"]);

    let ascending = RangeQuery {
        sort_order: SortOrder::Asc,
        ..newest_first(0, 0)
    };
    let page = store.select_range(&ascending).await.unwrap();
    assert_eq!(page.rows[0]["content"], "oldest");
}

#[tokio::test(flavor = "multi_thread")]
async fn same_date_ties_resolve_newest_inserted_first() {
    let (_dir, store) = setup_store().await;
    let date = "2023-04-15T10:00:00.000000Z";
    write_rows(&store, &[(date, "a"), (date, "b"), (date, "c")]);

    let page = store.select_range(&newest_first(0, 1)).await.unwrap();
    assert_eq!(contents(&page.rows), vec!["c", "b"]);

    let page = store.select_range(&newest_first(2, 3)).await.unwrap();
    assert_eq!(contents(&page.rows), vec!["a"]);

    let ascending = RangeQuery {
        sort_order: SortOrder::Asc,
        ..newest_first(0, 2)
    };
    let page = store.select_range(&ascending).await.unwrap();
    assert_eq!(contents(&page.rows), vec!["a", "b", "c"]);
}

#[tokio::test(flavor = "multi_thread")]
async fn select_range_compares_dates_as_instants() {
    let (_dir, store) = setup_store().await;
    write_rows(
        &store,
        &[
            ("2023-04-15T10:00:00.500Z", "newest"),
            ("2023-04-15T10:00:00Z", "middle"),
            ("2023-04-15T11:00:00+02:00", "oldest"),
        ],
    );

    let page = store.select_range(&newest_first(0, 9)).await.unwrap();
    assert_eq!(contents(&page.rows), vec!["newest", "middle", "oldest"]);
}

#[tokio::test(flavor = "multi_thread")]
async fn sub_millisecond_differences_tie() {
    let (_dir, store) = setup_store().await;
    write_rows(
        &store,
        &[
            ("2023-04-15T19:46:51.1091Z", "first"),
            ("2023-04-15T19:46:51.109Z", "second"),
        ],
    );

    let page = store.select_range(&newest_first(0, 9)).await.unwrap();
    assert_eq!(contents(&page.rows), vec!["second", "first"]);
}

#[tokio::test(flavor = "multi_thread")]
async fn concurrent_inserts_are_all_kept() {
    let (_dir, store) = setup_store().await;
    let store = Arc::new(store);

    let handles: Vec<_> = (0..20)
        .map(|i| {
            let store = Arc::clone(&store);
            tokio::spawn(async move { store.insert(&new_todo(&format!("todo {}", i))).await })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let page = store.select_range(&newest_first(0, 99)).await.unwrap();
    assert_eq!(page.total, 20);
    let ids: std::collections::HashSet<Uuid> = page.rows.iter().map(row_id).collect();
    assert_eq!(ids.len(), 20);
}

#[tokio::test(flavor = "multi_thread")]
async fn lookups_match_the_stored_id_text_exactly() {
    let (_dir, store) = setup_store().await;
    let id = Uuid::new_v4();
    std::fs::write(
        store.path(),
        serde_json::to_string(&json!({
            "todos": [
                { "id": id.simple().to_string(), "date": "2023-04-15T10:00:00.000Z", "content": "short", "done": false }
            ]
        }))
        .unwrap(),
    )
    .unwrap();

    assert!(store.select_by_id(id).await.unwrap().is_none());
    assert!(matches!(
        store.update_where(id, &TodoPatch::done(true)).await,
        Err(DbError::NotFound { .. })
    ));
    assert_eq!(store.delete_where(id).await.unwrap(), 0);
    assert_eq!(store.rows().await.unwrap().len(), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn select_range_past_the_end_is_empty() {
    let (_dir, store) = setup_store().await;
    store.insert(&new_todo("only")).await.unwrap();

    let page = store.select_range(&newest_first(10, 19)).await.unwrap();
    assert!(page.rows.is_empty());
    assert_eq!(page.total, 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn blank_file_reads_as_empty() {
    let (_dir, store) = setup_store().await;
    std::fs::write(store.path(), "").unwrap();

    let page = store.select_range(&newest_first(0, 9)).await.unwrap();
    assert_eq!(page.total, 0);

    std::fs::write(store.path(), "{}").unwrap();
    let page = store.select_range(&newest_first(0, 9)).await.unwrap();
    assert_eq!(page.total, 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn corrupt_document_is_a_storage_error() {
    let (_dir, store) = setup_store().await;
    std::fs::write(store.path(), "{ not json").unwrap();

    let result = store.select_range(&newest_first(0, 9)).await;
    assert!(matches!(result, Err(DbError::Storage { .. })));

    std::fs::write(store.path(), r#"{"todos": 3}"#).unwrap();
    let result = store.select_range(&newest_first(0, 9)).await;
    assert!(matches!(result, Err(DbError::Storage { .. })));
}

#[tokio::test(flavor = "multi_thread")]
async fn select_by_id_finds_row() {
    let (_dir, store) = setup_store().await;
    let row = store.insert(&new_todo("find me")).await.unwrap();

    let found = store.select_by_id(row_id(&row)).await.unwrap();
    assert_eq!(found, Some(row));

    let missing = store.select_by_id(Uuid::new_v4()).await.unwrap();
    assert!(missing.is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn update_where_applies_patch_only() {
    let (_dir, store) = setup_store().await;
    let row = store.insert(&new_todo("before")).await.unwrap();
    let id = row_id(&row);

    let updated = store
        .update_where(id, &TodoPatch::done(true))
        .await
        .unwrap();
    assert_eq!(updated["done"], true);
    assert_eq!(updated["content"], "before");
    assert_eq!(updated["date"], row["date"]);

    let updated = store
        .update_where(id, &TodoPatch::content("after"))
        .await
        .unwrap();
    assert_eq!(updated["content"], "after");
    assert_eq!(updated["done"], true);

    let stored = store.select_by_id(id).await.unwrap().unwrap();
    assert_eq!(stored, updated);
}

#[tokio::test(flavor = "multi_thread")]
async fn update_where_missing_id_is_not_found() {
    let (_dir, store) = setup_store().await;

    let result = store
        .update_where(Uuid::new_v4(), &TodoPatch::done(true))
        .await;
    assert!(matches!(result, Err(DbError::NotFound { .. })));
}

#[tokio::test(flavor = "multi_thread")]
async fn update_where_duplicate_ids_is_storage_error() {
    let (_dir, store) = setup_store().await;
    let id = Uuid::new_v4();
    let row = json!({ "id": id, "date": "2023-04-15T10:00:00.000Z", "content": "dup", "done": false });
    std::fs::write(
        store.path(),
        serde_json::to_string(&json!({ "todos": [row.clone(), row] })).unwrap(),
    )
    .unwrap();

    let result = store.update_where(id, &TodoPatch::done(true)).await;
    assert!(matches!(result, Err(DbError::Storage { .. })));
}

#[tokio::test(flavor = "multi_thread")]
async fn delete_where_reports_affected_rows() {
    let (_dir, store) = setup_store().await;
    let row = store.insert(&new_todo("doomed")).await.unwrap();
    store.insert(&new_todo("survivor")).await.unwrap();

    assert_eq!(store.delete_where(row_id(&row)).await.unwrap(), 1);
    assert_eq!(store.delete_where(row_id(&row)).await.unwrap(), 0);

    let rows = store.rows().await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["content"], "survivor");
}

#[tokio::test(flavor = "multi_thread")]
async fn clear_empties_the_document() {
    let (_dir, store) = setup_store().await;
    store.insert(&new_todo("a")).await.unwrap();
    store.insert(&new_todo("b")).await.unwrap();

    store.clear().await.unwrap();

    assert!(store.rows().await.unwrap().is_empty());
}
