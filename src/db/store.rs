//! Storage adapter trait.
//!
//! A `TodoStore` is the only component that performs I/O. It hands back
//! untyped rows; the repository validates them before they are trusted.

use std::future::Future;

use uuid::Uuid;

use crate::db::{DbResult, NewTodo, RangeQuery, Row, RowPage, TodoPatch};

/// Persistence backend for todos.
///
/// Implementations must be interchangeable: the repository relies only on
/// the contract documented on each method.
pub trait TodoStore: Send + Sync {
    /// Return the rows in `query.start..=query.end` of the collection ordered
    /// by `query.order_by`, plus the total row count.
    ///
    /// Rows with equal keys are returned newest-inserted first when sorting
    /// descending.
    fn select_range(&self, query: &RangeQuery) -> impl Future<Output = DbResult<RowPage>> + Send;

    /// Return the row with the given id, if any.
    fn select_by_id(&self, id: Uuid) -> impl Future<Output = DbResult<Option<Row>>> + Send;

    /// Persist a new row, assigning `id`, `date` and `done = false`.
    fn insert(&self, todo: &NewTodo) -> impl Future<Output = DbResult<Row>> + Send;

    /// Apply `patch` to the single row matching `id` and return it.
    ///
    /// Fails with `NotFound` on zero matches and `Storage` on more than one.
    fn update_where(
        &self,
        id: Uuid,
        patch: &TodoPatch,
    ) -> impl Future<Output = DbResult<Row>> + Send;

    /// Remove the row matching `id`, returning the number of rows removed.
    fn delete_where(&self, id: Uuid) -> impl Future<Output = DbResult<u64>> + Send;
}
