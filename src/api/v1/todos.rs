//! Todo feed handlers.

use std::num::IntErrorKind;

use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::api::AppState;
use crate::db::schema::{validate_content, validate_id};
use crate::db::utils::format_timestamp;
use crate::db::{Todo, TodoPatch, TodoStore, ValidationError};

use super::error::{ApiResult, ErrorResponse, bad_request, db_error_response, invalid_input};

const INVALID_ID: &str = "You must provide a valid id";
const CONTENT_REQUIRED: &str = "You need to provide a content to create a TODO";

// =============================================================================
// DTOs
// =============================================================================

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TodoResponse {
    #[schema(example = "70905d7e-c969-45b1-99f0-1aa155477204")]
    pub id: String,
    #[schema(example = "2023-04-15T19:46:51.109000Z")]
    pub date: String,
    #[schema(example = "Buy milk")]
    pub content: String,
    pub done: bool,
}

impl From<Todo> for TodoResponse {
    fn from(t: Todo) -> Self {
        Self {
            id: t.id.to_string(),
            date: format_timestamp(t.date),
            content: t.content,
            done: t.done,
        }
    }
}

/// Single todo wrapped in an envelope
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TodoEnvelope {
    pub todo: TodoResponse,
}

impl From<Todo> for TodoEnvelope {
    fn from(t: Todo) -> Self {
        Self { todo: t.into() }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PaginatedTodos {
    /// Number of todos in the whole feed
    pub total: usize,
    /// Number of pages at the requested limit
    pub pages: usize,
    pub todos: Vec<TodoResponse>,
}

#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct CreateTodoRequest {
    #[schema(example = "Buy milk")]
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateTodoRequest {
    #[schema(example = "Buy oat milk")]
    #[serde(default)]
    pub content: String,
}

/// Raw pagination parameters; parsed by the handler so bad input maps to 400.
#[derive(Debug, Deserialize, IntoParams)]
pub struct ListTodosQuery {
    /// Page number, starting at 1; zero means the first page
    #[param(example = "1")]
    pub page: Option<String>,
    /// Page size
    #[param(example = "10")]
    pub limit: Option<String>,
}

// =============================================================================
// Handlers
// =============================================================================

/// List one page of the feed, newest first
#[utoipa::path(
    get,
    path = "/api/todos",
    tag = "todos",
    params(ListTodosQuery),
    responses(
        (status = 200, description = "Paginated list of todos", body = PaginatedTodos),
        (status = 400, description = "Invalid page or limit", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn list_todos<S: TodoStore + 'static>(
    State(state): State<AppState<S>>,
    Query(query): Query<ListTodosQuery>,
) -> ApiResult<Json<PaginatedTodos>> {
    // A zero page falls back to the first one; a zero limit is rejected.
    let page = parse_count(query.page.as_deref(), "page")?;
    let limit = match parse_count(query.limit.as_deref(), "limit")? {
        Some(0) => return Err(bad_request("`limit` must be a positive integer")),
        limit => limit,
    };

    let result = state
        .repo()
        .get(page, limit)
        .await
        .map_err(db_error_response)?;

    Ok(Json(PaginatedTodos {
        total: result.total,
        pages: result.pages,
        todos: result.todos.into_iter().map(TodoResponse::from).collect(),
    }))
}

#[utoipa::path(
    post,
    path = "/api/todos",
    tag = "todos",
    request_body = CreateTodoRequest,
    responses(
        (status = 201, description = "Todo created", body = TodoEnvelope),
        (status = 400, description = "Missing content or create failed", body = ErrorResponse)
    )
)]
#[instrument(skip(state, payload))]
pub async fn create_todo<S: TodoStore + 'static>(
    State(state): State<AppState<S>>,
    payload: Result<Json<CreateTodoRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<TodoEnvelope>)> {
    let content = content_from(payload.map(|Json(req)| req.content))?;

    let todo = state
        .repo()
        .create_by_content(&content)
        .await
        .map_err(db_error_response)?;

    Ok((StatusCode::CREATED, Json(todo.into())))
}

#[utoipa::path(
    get,
    path = "/api/todos/{id}",
    tag = "todos",
    params(("id" = String, Path, description = "Todo ID (UUID)")),
    responses(
        (status = 200, description = "Todo found", body = TodoEnvelope),
        (status = 400, description = "Invalid id", body = ErrorResponse),
        (status = 404, description = "Todo not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_todo<S: TodoStore + 'static>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> ApiResult<Json<TodoEnvelope>> {
    let id = parse_id(&id)?;

    let todo = state
        .repo()
        .get_by_id(id)
        .await
        .map_err(db_error_response)?;

    Ok(Json(todo.into()))
}

/// Replace the content of a todo
#[utoipa::path(
    patch,
    path = "/api/todos/{id}",
    tag = "todos",
    params(("id" = String, Path, description = "Todo ID (UUID)")),
    request_body = UpdateTodoRequest,
    responses(
        (status = 200, description = "Todo updated", body = TodoEnvelope),
        (status = 400, description = "Invalid id or content", body = ErrorResponse),
        (status = 404, description = "Todo not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, payload))]
pub async fn update_todo<S: TodoStore + 'static>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateTodoRequest>, JsonRejection>,
) -> ApiResult<Json<TodoEnvelope>> {
    let id = parse_id(&id)?;
    let content = content_from(payload.map(|Json(req)| req.content))?;

    let todo = state
        .repo()
        .update(id, &TodoPatch::content(content))
        .await
        .map_err(db_error_response)?;

    Ok(Json(todo.into()))
}

/// Flip the done flag of a todo
#[utoipa::path(
    put,
    path = "/api/todos/{id}/toggle-done",
    tag = "todos",
    params(("id" = String, Path, description = "Todo ID (UUID)")),
    responses(
        (status = 200, description = "Todo toggled", body = TodoEnvelope),
        (status = 400, description = "Invalid id", body = ErrorResponse),
        (status = 404, description = "Todo not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn toggle_done<S: TodoStore + 'static>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> ApiResult<Json<TodoEnvelope>> {
    let id = parse_id(&id)?;

    let todo = state
        .repo()
        .toggle_done(id)
        .await
        .map_err(db_error_response)?;

    Ok(Json(todo.into()))
}

#[utoipa::path(
    delete,
    path = "/api/todos/{id}",
    tag = "todos",
    params(("id" = String, Path, description = "Todo ID (UUID)")),
    responses(
        (status = 204, description = "Todo deleted"),
        (status = 400, description = "Invalid id", body = ErrorResponse),
        (status = 404, description = "Todo not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_todo<S: TodoStore + 'static>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_id(&id)?;

    state
        .repo()
        .delete_by_id(id)
        .await
        .map_err(db_error_response)?;

    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Helpers
// =============================================================================

/// Parse an optional query parameter as a non-negative integer.
///
/// Absent or blank means "use the default".
fn parse_count(raw: Option<&str>, name: &str) -> ApiResult<Option<u32>> {
    let Some(value) = raw.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };

    value.parse::<u32>().map(Some).map_err(|e| {
        let message = match e.kind() {
            IntErrorKind::PosOverflow => format!("`{}` is too large", name),
            _ if is_negative_integer(value) => format!("`{}` must be a positive integer", name),
            _ => format!("`{}` must be a number", name),
        };
        bad_request(message)
    })
}

fn is_negative_integer(value: &str) -> bool {
    value
        .strip_prefix('-')
        .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
}

fn parse_id(raw: &str) -> ApiResult<Uuid> {
    validate_id(raw).map_err(|e| {
        warn!(id = raw, "Rejected malformed todo id");
        invalid_input(INVALID_ID, e)
    })
}

/// Extract non-empty content from a JSON body.
fn content_from(body: Result<String, JsonRejection>) -> ApiResult<String> {
    let content = body.map_err(|rejection| {
        warn!(error = %rejection, "Rejected todo body");
        invalid_input(
            CONTENT_REQUIRED,
            ValidationError::single("", rejection.body_text()),
        )
    })?;

    validate_content(&content).map_err(|e| invalid_input(CONTENT_REQUIRED, e))?;
    Ok(content)
}
