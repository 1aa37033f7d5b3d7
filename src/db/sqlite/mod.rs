//! SQLite implementation of the storage trait.
//!
//! This module provides a SQLite-backed implementation of `TodoStore`
//! on top of an sqlx connection pool.

mod connection;
mod helpers;
mod todo;


pub use connection::SqliteStore;
