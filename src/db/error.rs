//! Database error types.
//!
//! This module provides abstracted error types for todo persistence.
//! It uses miette for fancy diagnostic output and thiserror for derive macros.
//! The error types are storage-backend agnostic.

use std::fmt;

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single failing field reported by the schema validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// Path of the failing field (`content`, `[2].id`, ...).
    pub field: String,
    /// Why the field was rejected.
    pub message: String,
}

impl Issue {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.field.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.field, self.message)
        }
    }
}

/// Structured validation failure, one issue per failing field.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
#[error("Validation failed: {}", format_issues(.issues))]
#[diagnostic(code(todo_feed::db::validation))]
pub struct ValidationError {
    pub issues: Vec<Issue>,
}

impl ValidationError {
    pub fn new(issues: Vec<Issue>) -> Self {
        Self { issues }
    }

    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            issues: vec![Issue::new(field, message)],
        }
    }

    /// Prefix every issue field, e.g. with a row index.
    pub fn nested(self, prefix: &str) -> Self {
        let issues = self
            .issues
            .into_iter()
            .map(|issue| {
                let field = if issue.field.is_empty() {
                    prefix.to_string()
                } else {
                    format!("{}.{}", prefix, issue.field)
                };
                Issue { field, ..issue }
            })
            .collect();
        Self { issues }
    }
}

fn format_issues(issues: &[Issue]) -> String {
    issues
        .iter()
        .map(Issue::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Todo persistence errors.
#[derive(Error, Diagnostic, Debug)]
pub enum DbError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Validation(#[from] ValidationError),

    #[error("{entity_type} with id \"{id}\" not found")]
    #[diagnostic(code(todo_feed::db::not_found))]
    NotFound { entity_type: String, id: String },

    #[error("Failed to create todo!")]
    #[diagnostic(code(todo_feed::db::create_failed))]
    CreateFailed,

    #[error("Storage error: {message}")]
    #[diagnostic(code(todo_feed::db::storage))]
    Storage { message: String },

    #[error("Migration error: {message}")]
    #[diagnostic(code(todo_feed::db::migration))]
    Migration { message: String },
}

impl DbError {
    pub fn todo_not_found(id: impl ToString) -> Self {
        DbError::NotFound {
            entity_type: "Todo".to_string(),
            id: id.to_string(),
        }
    }

    pub fn storage(message: impl ToString) -> Self {
        DbError::Storage {
            message: message.to_string(),
        }
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;
