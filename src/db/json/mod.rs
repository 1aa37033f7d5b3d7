//! JSON file implementation of the storage trait.
//!
//! The whole collection lives in one document, `{"todos": [...]}`, which is
//! read on every operation and rewritten on every change.

mod document;
mod store;

#[cfg(test)]
mod store_test;

pub use document::{read_document, write_document};
pub use store::JsonFileStore;
