//! SQLite TodoStore implementation.

use sqlx::Row as _;
use sqlx::sqlite::SqliteRow;
use tracing::debug;
use uuid::Uuid;

use super::connection::SqliteStore;
use super::helpers::{TODO_JSON, build_limit_offset_clause, build_order_clause};
use crate::db::utils::{current_timestamp, generate_entity_id};
use crate::db::{DbError, DbResult, NewTodo, RangeQuery, Row, RowPage, TodoPatch, TodoStore};

impl TodoStore for SqliteStore {
    async fn select_range(&self, query: &RangeQuery) -> DbResult<RowPage> {
        let sql = format!(
            "SELECT {} FROM todos {} {}",
            TODO_JSON,
            build_order_clause(query),
            build_limit_offset_clause(query)
        );

        // One read transaction so the page and the total see the same rows.
        let mut tx = self.pool.begin().await.map_err(DbError::storage)?;

        let rows = sqlx::query(&sql)
            .fetch_all(&mut *tx)
            .await
            .map_err(DbError::storage)?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM todos")
            .fetch_one(&mut *tx)
            .await
            .map_err(DbError::storage)?;

        tx.commit().await.map_err(DbError::storage)?;

        let rows = rows.iter().map(decode_row).collect::<DbResult<Vec<_>>>()?;

        Ok(RowPage {
            rows,
            total: total as usize,
        })
    }

    async fn select_by_id(&self, id: Uuid) -> DbResult<Option<Row>> {
        let sql = format!("SELECT {} FROM todos WHERE id = ?", TODO_JSON);

        let row = sqlx::query(&sql)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(DbError::storage)?;

        row.as_ref().map(decode_row).transpose()
    }

    async fn insert(&self, todo: &NewTodo) -> DbResult<Row> {
        let sql = format!(
            "INSERT INTO todos (id, date, content, done) VALUES (?, ?, ?, 0) RETURNING {}",
            TODO_JSON
        );

        let row = sqlx::query(&sql)
            .bind(generate_entity_id().to_string())
            .bind(current_timestamp())
            .bind(&todo.content)
            .fetch_one(&self.pool)
            .await
            .map_err(DbError::storage)?;

        debug!("Inserted todo");
        decode_row(&row)
    }

    async fn update_where(&self, id: Uuid, patch: &TodoPatch) -> DbResult<Row> {
        let sql = format!(
            r#"
            UPDATE todos
            SET content = COALESCE(?, content), done = COALESCE(?, done)
            WHERE id = ?
            RETURNING {}
            "#,
            TODO_JSON
        );

        let rows = sqlx::query(&sql)
            .bind(&patch.content)
            .bind(patch.done)
            .bind(id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(DbError::storage)?;

        match rows.as_slice() {
            [] => Err(DbError::todo_not_found(id)),
            [row] => decode_row(row),
            rows => Err(DbError::storage(format!(
                "Expected one todo with id {}, updated {}",
                id,
                rows.len()
            ))),
        }
    }

    async fn delete_where(&self, id: Uuid) -> DbResult<u64> {
        let result = sqlx::query("DELETE FROM todos WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(DbError::storage)?;

        Ok(result.rows_affected())
    }
}

/// Parse the JSON projection of a row without interpreting it.
fn decode_row(row: &SqliteRow) -> DbResult<Row> {
    let raw: String = row.try_get("row").map_err(DbError::storage)?;
    serde_json::from_str(&raw).map_err(DbError::storage)
}
