//! Todo persistence and query layer.
//!
//! This module provides a trait-based storage abstraction so that the
//! JSON file backend and the SQLite backend can be swapped without
//! changing the repository's business logic.
//!
//! # Architecture
//!
//! - `error`: Storage-agnostic error types
//! - `models`: Domain entities and query types
//! - `schema`: Typed decoding of untrusted values into `Todo`
//! - `store`: The `TodoStore` trait implemented by every backend
//! - `repository`: Pagination, creation, toggling and deletion on top of a store
//! - `json` / `sqlite`: The two backends

mod error;
pub mod json;
mod models;
mod repository;
pub mod schema;
pub mod sqlite;
mod store;
pub mod utils;

#[cfg(test)]
mod error_test;
#[cfg(test)]
mod schema_test;

pub use error::{DbError, DbResult, Issue, ValidationError};
pub use json::JsonFileStore;
pub use models::*;
pub use repository::{TodoRepository, filter_todos_by_content};
pub use sqlite::SqliteStore;
pub use store::TodoStore;
