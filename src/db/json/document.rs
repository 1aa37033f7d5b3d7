//! Reading and writing the todo document.

use std::io::ErrorKind;
use std::path::Path;

use serde_json::{Value, json};

use crate::db::{DbError, DbResult, Row};

/// Read the rows stored in the document at `path`.
///
/// A missing or blank file, or a document without a `todos` field, reads as
/// an empty collection.
pub async fn read_document(path: &Path) -> DbResult<Vec<Row>> {
    let text = match tokio::fs::read_to_string(path).await {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => {
            return Err(DbError::storage(format!(
                "Failed to read {}: {}",
                path.display(),
                e
            )));
        }
    };

    if text.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut document: Value = serde_json::from_str(&text).map_err(|e| {
        DbError::storage(format!("Invalid JSON in {}: {}", path.display(), e))
    })?;

    match document.get_mut("todos").map(Value::take) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(rows)) => Ok(rows),
        Some(_) => Err(DbError::storage(format!(
            "Field `todos` in {} is not an array",
            path.display()
        ))),
    }
}

/// Replace the document at `path` with the given rows.
///
/// Parent directories are created as needed.
pub async fn write_document(path: &Path, rows: &[Row]) -> DbResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent).await.map_err(|e| {
            DbError::storage(format!("Failed to create {}: {}", parent.display(), e))
        })?;
    }

    let text = serde_json::to_string_pretty(&json!({ "todos": rows }))
        .map_err(|e| DbError::storage(format!("Failed to serialize todos: {}", e)))?;

    tokio::fs::write(path, text)
        .await
        .map_err(|e| DbError::storage(format!("Failed to write {}: {}", path.display(), e)))
}
