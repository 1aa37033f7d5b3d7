//! API route configuration.

use axum::Router;
use axum::routing::{delete, get, patch, post, put};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use super::state::AppState;
use super::v1::{
    self, CreateTodoRequest, ErrorBody, ErrorResponse, HealthResponse, IssueResponse,
    PaginatedTodos, TodoEnvelope, TodoResponse, UpdateTodoRequest,
};
use crate::db::TodoStore;

/// Build routes with generic store type.
///
/// This macro reduces boilerplate when registering handlers that are generic
/// over the TodoStore trait. It applies the turbofish operator automatically.
macro_rules! routes {
    ($S:ty => {
        $($method:ident $path:literal => $($handler:ident)::+),* $(,)?
    }) => {{
        let router = Router::new();
        $(
            let router = router.route($path, $method($($handler)::+::<$S>));
        )*
        router
    }};
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Todo Feed API",
        version = "0.3.0",
        description = "Paginated todo feed backed by a JSON file or SQLite",
        license(name = "GPL-2.0")
    ),
    paths(
        v1::health,
        v1::list_todos,
        v1::create_todo,
        v1::get_todo,
        v1::update_todo,
        v1::toggle_done,
        v1::delete_todo,
    ),
    components(
        schemas(
            HealthResponse,
            TodoResponse,
            TodoEnvelope,
            PaginatedTodos,
            CreateTodoRequest,
            UpdateTodoRequest,
            ErrorResponse,
            ErrorBody,
            IssueResponse,
        )
    ),
    tags(
        (name = "system", description = "System health and status endpoints"),
        (name = "todos", description = "Todo feed endpoints")
    )
)]
pub struct ApiDoc;

/// Create the API router with OpenAPI documentation
pub fn create_router<S: TodoStore + 'static>(state: AppState<S>) -> Router {
    let api = ApiDoc::openapi();

    // System routes (non-generic)
    let system_routes = Router::new().route("/health", get(v1::health));

    // Todo routes (generic over TodoStore)
    let todo_routes = routes!(S => {
        get "/api/todos" => v1::list_todos,
        post "/api/todos" => v1::create_todo,
        get "/api/todos/{id}" => v1::get_todo,
        patch "/api/todos/{id}" => v1::update_todo,
        delete "/api/todos/{id}" => v1::delete_todo,
        put "/api/todos/{id}/toggle-done" => v1::toggle_done,
    });

    system_routes
        .merge(todo_routes)
        .merge(Scalar::with_url("/docs", api))
        .with_state(state)
}
