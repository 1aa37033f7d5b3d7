//! Error responses shared by the v1 handlers.

use axum::{Json, http::StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};
use utoipa::ToSchema;

use crate::db::{DbError, Issue, ValidationError};

/// Error response wrapper
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

/// Error details
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    /// Human readable error message
    #[schema(example = "You must provide a valid id")]
    pub message: String,
    /// Individual validation issues, when the error came from validation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Vec<IssueResponse>>,
}

/// One failed validation check
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct IssueResponse {
    /// Offending field, empty for the whole value
    #[schema(example = "content")]
    pub field: String,
    #[schema(example = "must not be empty")]
    pub message: String,
}

impl From<Issue> for IssueResponse {
    fn from(issue: Issue) -> Self {
        Self {
            field: issue.field,
            message: issue.message,
        }
    }
}

/// Result type returned by the v1 handlers.
pub type ApiResult<T> = Result<T, (StatusCode, Json<ErrorResponse>)>;

pub(crate) fn error_response(
    status: StatusCode,
    message: impl Into<String>,
    description: Option<ValidationError>,
) -> (StatusCode, Json<ErrorResponse>) {
    (
        status,
        Json(ErrorResponse {
            error: ErrorBody {
                message: message.into(),
                description: description
                    .map(|v| v.issues.into_iter().map(IssueResponse::from).collect()),
            },
        }),
    )
}

/// 400 with a plain message.
pub(crate) fn bad_request(message: impl Into<String>) -> (StatusCode, Json<ErrorResponse>) {
    error_response(StatusCode::BAD_REQUEST, message, None)
}

/// 400 with a message and the issues that caused it.
pub(crate) fn invalid_input(
    message: impl Into<String>,
    issues: ValidationError,
) -> (StatusCode, Json<ErrorResponse>) {
    error_response(StatusCode::BAD_REQUEST, message, Some(issues))
}

/// Map a repository error onto a status code and body.
///
/// Storage details are logged and replaced by a generic message.
pub(crate) fn db_error_response(e: DbError) -> (StatusCode, Json<ErrorResponse>) {
    match e {
        DbError::NotFound { .. } => {
            error_response(StatusCode::NOT_FOUND, e.to_string(), None)
        }
        DbError::Validation(issues) => {
            warn!(error = %issues, "Todo failed validation");
            invalid_input(issues.to_string(), issues)
        }
        DbError::CreateFailed => bad_request(e.to_string()),
        DbError::Storage { .. } | DbError::Migration { .. } => {
            error!(error = %e, "Storage failure");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error", None)
        }
    }
}
