//! JSON file TodoStore implementation.

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

use super::document::{read_document, write_document};
use crate::db::utils::{compare_field_values, current_timestamp, generate_entity_id};
use crate::db::{
    DbError, DbResult, NewTodo, RangeQuery, Row, RowPage, SortOrder, TodoPatch, TodoStore,
};

/// File-backed todo store.
///
/// Read-modify-write cycles from this process are serialized by a lock;
/// writers in other processes are last-write-wins.
pub struct JsonFileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileStore {
    /// Open the store at `path`, creating an empty document if none exists.
    pub async fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let store = Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        };

        if tokio::fs::metadata(&store.path).await.is_err() {
            write_document(&store.path, &[]).await?;
        }

        Ok(store)
    }

    /// Path of the backing document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remove every todo.
    pub async fn clear(&self) -> DbResult<()> {
        let _guard = self.lock.lock().await;
        write_document(&self.path, &[]).await
    }

    /// Read every stored row in file order.
    pub async fn rows(&self) -> DbResult<Vec<Row>> {
        let _guard = self.lock.lock().await;
        read_document(&self.path).await
    }
}

impl TodoStore for JsonFileStore {
    async fn select_range(&self, query: &RangeQuery) -> DbResult<RowPage> {
        let mut rows = {
            let _guard = self.lock.lock().await;
            read_document(&self.path).await?
        };
        let total = rows.len();
        let key = query.order_by.field();

        // Reverse first so the stable sort leaves newer rows ahead on ties.
        if query.sort_order == SortOrder::Desc {
            rows.reverse();
        }
        rows.sort_by(|a, b| {
            let ordering = compare_field_values(a.get(key), b.get(key));
            match query.sort_order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });

        let rows = rows
            .into_iter()
            .skip(query.start)
            .take(query.len())
            .collect();

        Ok(RowPage { rows, total })
    }

    async fn select_by_id(&self, id: Uuid) -> DbResult<Option<Row>> {
        let _guard = self.lock.lock().await;
        let rows = read_document(&self.path).await?;
        Ok(rows.into_iter().find(|row| matches_id(row, id)))
    }

    async fn insert(&self, todo: &NewTodo) -> DbResult<Row> {
        let _guard = self.lock.lock().await;
        let mut rows = read_document(&self.path).await?;

        let mut row = Map::new();
        row.insert("id".into(), Value::String(generate_entity_id().to_string()));
        row.insert("date".into(), Value::String(current_timestamp()));
        row.insert("content".into(), Value::String(todo.content.clone()));
        row.insert("done".into(), Value::Bool(false));
        let row = Value::Object(row);

        rows.push(row.clone());
        write_document(&self.path, &rows).await?;

        debug!(path = %self.path.display(), "Inserted todo");
        Ok(row)
    }

    async fn update_where(&self, id: Uuid, patch: &TodoPatch) -> DbResult<Row> {
        let _guard = self.lock.lock().await;
        let mut rows = read_document(&self.path).await?;

        let matches = rows.iter().filter(|row| matches_id(row, id)).count();
        match matches {
            0 => return Err(DbError::todo_not_found(id)),
            1 => {}
            n => {
                return Err(DbError::storage(format!(
                    "Expected one todo with id {}, found {}",
                    id, n
                )));
            }
        }

        let mut updated = Value::Null;
        for row in rows.iter_mut().filter(|row| matches_id(row, id)) {
            if let Value::Object(fields) = row {
                apply_patch(fields, patch);
            }
            updated = row.clone();
        }

        write_document(&self.path, &rows).await?;
        Ok(updated)
    }

    async fn delete_where(&self, id: Uuid) -> DbResult<u64> {
        let _guard = self.lock.lock().await;
        let mut rows = read_document(&self.path).await?;

        let before = rows.len();
        rows.retain(|row| !matches_id(row, id));
        let removed = (before - rows.len()) as u64;

        if removed > 0 {
            write_document(&self.path, &rows).await?;
        }

        Ok(removed)
    }
}

/// Rows match on the exact id text, as the SQLite backend does.
fn matches_id(row: &Row, id: Uuid) -> bool {
    let mut buffer = Uuid::encode_buffer();
    let id = id.hyphenated().encode_lower(&mut buffer);
    row.get("id").and_then(Value::as_str) == Some(&*id)
}

fn apply_patch(fields: &mut Map<String, Value>, patch: &TodoPatch) {
    if let Some(content) = &patch.content {
        fields.insert("content".into(), Value::String(content.clone()));
    }
    if let Some(done) = patch.done {
        fields.insert("done".into(), Value::Bool(done));
    }
}
