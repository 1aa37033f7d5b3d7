//! Application state for the API server.

use std::sync::Arc;

use crate::db::{TodoRepository, TodoStore};

/// Shared application state.
///
/// Generic over `S: TodoStore` so handlers work with any backend. The store
/// is injected via the constructor, never created here.
pub struct AppState<S: TodoStore> {
    repo: Arc<TodoRepository<S>>,
}

// Manual Clone impl - only the Arc needs to be cloneable, not S
impl<S: TodoStore> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            repo: Arc::clone(&self.repo),
        }
    }
}

impl<S: TodoStore> AppState<S> {
    /// Wrap a store in a repository shared by every request.
    pub fn new(store: S) -> Self {
        Self {
            repo: Arc::new(TodoRepository::new(store)),
        }
    }

    /// Get a reference to the todo repository.
    pub fn repo(&self) -> &TodoRepository<S> {
        &self.repo
    }
}
