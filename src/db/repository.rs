//! Todo repository.
//!
//! Business-level operations composed from `TodoStore` calls and schema
//! checks. The repository holds no state of its own beyond the store handle.

use tracing::{debug, error, instrument, warn};
use uuid::Uuid;

use crate::db::schema::{validate_todo, validate_todos};
use crate::db::{
    DbError, DbResult, NewTodo, OrderKey, RangeQuery, SortOrder, Todo, TodoPage, TodoPatch,
    TodoStore,
};

/// Page used when the caller omits one (or passes zero).
const DEFAULT_PAGE: u32 = 1;

/// Page size used when the caller omits one (or passes zero).
const DEFAULT_LIMIT: u32 = 10;

/// Todo operations over any storage backend.
pub struct TodoRepository<S> {
    store: S,
}

impl<S: TodoStore> TodoRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Get a reference to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Fetch one page of todos, newest first.
    ///
    /// A single malformed row fails the whole page.
    #[instrument(skip(self))]
    pub async fn get(&self, page: Option<u32>, limit: Option<u32>) -> DbResult<TodoPage> {
        let page = page.filter(|p| *p > 0).unwrap_or(DEFAULT_PAGE) as usize;
        let limit = limit.filter(|l| *l > 0).unwrap_or(DEFAULT_LIMIT) as usize;

        let query = RangeQuery {
            order_by: OrderKey::Date,
            sort_order: SortOrder::Desc,
            start: (page - 1) * limit,
            end: page * limit - 1,
        };

        let result = self.store.select_range(&query).await?;
        let todos = validate_todos(&result.rows).inspect_err(|e| {
            warn!(error = %e, "Stored todo failed validation");
        })?;

        debug!(total = result.total, returned = todos.len(), "Fetched todo page");

        Ok(TodoPage {
            todos,
            total: result.total,
            pages: result.total.div_ceil(limit),
        })
    }

    /// Create a todo from already validated content.
    #[instrument(skip(self))]
    pub async fn create_by_content(&self, content: &str) -> DbResult<Todo> {
        let row = self
            .store
            .insert(&NewTodo {
                content: content.to_string(),
            })
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to insert todo");
                DbError::CreateFailed
            })?;

        Ok(validate_todo(&row)?)
    }

    /// Fetch a single todo.
    #[instrument(skip(self))]
    pub async fn get_by_id(&self, id: Uuid) -> DbResult<Todo> {
        let row = self
            .store
            .select_by_id(id)
            .await?
            .ok_or_else(|| DbError::todo_not_found(id))?;

        Ok(validate_todo(&row)?)
    }

    /// Flip the `done` flag of a todo and return the stored result.
    ///
    /// Read and write are separate store round-trips; a concurrent toggle in
    /// between is not detected and the last write wins.
    #[instrument(skip(self))]
    pub async fn toggle_done(&self, id: Uuid) -> DbResult<Todo> {
        let current = self.get_by_id(id).await.map_err(|e| match e {
            DbError::NotFound { .. } | DbError::Validation(_) => {
                warn!(error = %e, "Cannot toggle todo");
                DbError::todo_not_found(id)
            }
            other => other,
        })?;

        let row = self
            .store
            .update_where(id, &TodoPatch::done(!current.done))
            .await?;

        Ok(validate_todo(&row)?)
    }

    /// Apply a partial update to a todo.
    #[instrument(skip(self))]
    pub async fn update(&self, id: Uuid, patch: &TodoPatch) -> DbResult<Todo> {
        let row = self.store.update_where(id, patch).await?;
        Ok(validate_todo(&row)?)
    }

    /// Delete a todo, failing with `NotFound` if nothing was removed.
    #[instrument(skip(self))]
    pub async fn delete_by_id(&self, id: Uuid) -> DbResult<()> {
        let affected = self.store.delete_where(id).await?;

        if affected == 0 {
            warn!(%id, "Delete matched no todo");
            return Err(DbError::todo_not_found(id));
        }

        Ok(())
    }
}

/// Keep the todos whose content contains `search`, ignoring case.
///
/// Runs in memory over an already fetched page; order is preserved.
pub fn filter_todos_by_content(search: &str, todos: Vec<Todo>) -> Vec<Todo> {
    let search = search.to_lowercase();
    todos
        .into_iter()
        .filter(|todo| todo.content.to_lowercase().contains(&search))
        .collect()
}
