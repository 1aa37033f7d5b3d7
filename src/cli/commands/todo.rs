use crate::cli::api_client::ApiClient;
use crate::cli::error::CliResult;
use crate::cli::utils::{apply_table_style, format_done, truncate_with_ellipsis};
use crate::db::schema::{validate_content, validate_id};
use crate::db::utils::format_timestamp;
use crate::db::{Todo, filter_todos_by_content};
use serde::{Deserialize, Serialize};
use tabled::{Table, Tabled};

/// Page size used by `todo list` when none is given.
pub const FEED_PAGE_SIZE: u32 = 2;

#[derive(Debug, Serialize)]
pub(crate) struct ContentRequest<'a> {
    pub(crate) content: &'a str,
}

#[derive(Debug, Deserialize)]
struct TodoEnvelope {
    todo: Todo,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TodoListResponse {
    pub(crate) total: usize,
    pub(crate) pages: usize,
    pub(crate) todos: Vec<Todo>,
}

#[derive(Tabled)]
pub(crate) struct TodoDisplay {
    #[tabled(rename = "ID")]
    pub(crate) id: String,
    #[tabled(rename = "Done")]
    pub(crate) done: String,
    #[tabled(rename = "Content")]
    pub(crate) content: String,
    #[tabled(rename = "Date")]
    pub(crate) date: String,
}

impl From<&Todo> for TodoDisplay {
    fn from(todo: &Todo) -> Self {
        Self {
            id: todo.id.to_string(),
            done: format_done(todo.done).to_string(),
            content: truncate_with_ellipsis(&todo.content, 50),
            date: format_timestamp(todo.date),
        }
    }
}

/// Options for `todo list`
#[derive(Debug, Default)]
pub struct ListTodosFilter<'a> {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub search: Option<&'a str>,
}

/// Fetch one page of the feed, optionally narrowed by content
pub async fn list_todos(
    api_client: &ApiClient,
    filter: ListTodosFilter<'_>,
    format: &str,
) -> CliResult<String> {
    let page = filter.page.unwrap_or(1);
    let limit = filter.limit.unwrap_or(FEED_PAGE_SIZE);

    let response = api_client
        .get("/api/todos")
        .query(&[("page", page), ("limit", limit)])
        .send()
        .await?;

    let mut result: TodoListResponse = ApiClient::handle_response(response).await?;

    if let Some(search) = filter.search {
        result.todos = filter_todos_by_content(search, result.todos);
    }

    match format {
        "json" => Ok(serde_json::to_string_pretty(&result.todos)?),
        _ => Ok(format!(
            "{}\nPage {} of {} ({} total)",
            format_table(&result.todos),
            page,
            result.pages,
            result.total
        )),
    }
}

pub(crate) fn format_table(todos: &[Todo]) -> String {
    if todos.is_empty() {
        return "No todos found.".to_string();
    }

    let display_todos: Vec<TodoDisplay> = todos.iter().map(|t| t.into()).collect();
    let mut table = Table::new(display_todos);
    apply_table_style(&mut table);
    table.to_string()
}

/// Create a todo
///
/// Empty content is rejected before any request is sent.
pub async fn create_todo(api_client: &ApiClient, content: &str) -> CliResult<String> {
    let content = validate_content(content)?;

    let response = api_client
        .post("/api/todos")
        .json(&ContentRequest { content })
        .send()
        .await?;

    let created: TodoEnvelope = ApiClient::handle_response(response).await?;
    Ok(format!(
        "✓ Created todo: {} ({})",
        created.todo.content, created.todo.id
    ))
}

/// Flip the done flag of a todo
pub async fn toggle_todo(api_client: &ApiClient, id: &str) -> CliResult<String> {
    let id = validate_id(id)?;

    let response = api_client
        .put(&format!("/api/todos/{}/toggle-done", id))
        .send()
        .await?;

    let toggled: TodoEnvelope = ApiClient::handle_response(response).await?;
    let state = if toggled.todo.done { "done" } else { "not done" };
    Ok(format!("✓ Todo {} marked as {}", toggled.todo.id, state))
}

/// Replace the content of a todo
pub async fn update_todo(api_client: &ApiClient, id: &str, content: &str) -> CliResult<String> {
    let id = validate_id(id)?;
    let content = validate_content(content)?;

    let response = api_client
        .patch(&format!("/api/todos/{}", id))
        .json(&ContentRequest { content })
        .send()
        .await?;

    let updated: TodoEnvelope = ApiClient::handle_response(response).await?;
    Ok(format!(
        "✓ Updated todo: {} ({})",
        updated.todo.content, updated.todo.id
    ))
}

/// Delete a todo
pub async fn delete_todo(api_client: &ApiClient, id: &str) -> CliResult<String> {
    let id = validate_id(id)?;

    let response = api_client
        .delete(&format!("/api/todos/{}", id))
        .send()
        .await?;

    // 204 carries no body, so handle_response does not apply
    ApiClient::handle_empty_response(response).await?;
    Ok(format!("✓ Deleted todo: {}", id))
}
