//! Domain models for the todo store.
//!
//! These models are storage-agnostic and represent the core entity
//! plus the query types shared by every backend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// Query Types for Pagination and Sorting
// =============================================================================

/// Sort order for range queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// Field a range query is ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderKey {
    /// Creation timestamp.
    #[default]
    Date,
}

impl OrderKey {
    /// Name of the field in a stored row (and of the SQL column).
    pub fn field(&self) -> &'static str {
        match self {
            OrderKey::Date => "date",
        }
    }
}

/// An inclusive, zero-based slice of the ordered collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeQuery {
    pub order_by: OrderKey,
    pub sort_order: SortOrder,
    /// First row index to return.
    pub start: usize,
    /// Last row index to return (inclusive).
    pub end: usize,
}

impl RangeQuery {
    /// Number of rows the range spans.
    pub fn len(&self) -> usize {
        if self.end < self.start {
            0
        } else {
            self.end - self.start + 1
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// An untyped stored record, validated by `schema::validate_todo` before use.
pub type Row = serde_json::Value;

/// Rows of a range query plus the size of the whole collection.
#[derive(Debug, Clone, Default)]
pub struct RowPage {
    pub rows: Vec<Row>,
    /// Total count of all rows (before slicing).
    pub total: usize,
}

// =============================================================================
// Entities
// =============================================================================

/// A single task in the feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: Uuid,
    pub date: DateTime<Utc>,
    pub content: String,
    pub done: bool,
}

/// Fields supplied by the caller when creating a todo.
///
/// `id`, `date` and `done` are assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodo {
    pub content: String,
}

/// Partial update applied by `TodoStore::update_where`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub done: Option<bool>,
}

impl TodoPatch {
    pub fn done(done: bool) -> Self {
        Self {
            done: Some(done),
            ..Default::default()
        }
    }

    pub fn content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Default::default()
        }
    }
}

/// One page of todos, newest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoPage {
    pub todos: Vec<Todo>,
    /// Number of todos in the whole collection.
    pub total: usize,
    /// Number of pages at the requested limit.
    pub pages: usize,
}
