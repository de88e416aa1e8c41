/// Todo endpoints
///
/// All handlers run behind the session middleware and receive the caller's
/// [`AuthContext`]. Reads and mutations of a single todo go through
/// [`authorize_todo`], which reports a missing todo (404) before a todo
/// owned by someone else (403).
///
/// # Endpoints
///
/// - `GET    /todo`       - List the caller's todos
/// - `POST   /todo`       - Create a todo owned by the caller
/// - `GET    /todo/:id`   - Read one todo
/// - `PATCH  /todos/:id`  - Sparse update
/// - `DELETE /todos/:id`  - Delete

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{validate_body, ApiJson},
};
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use todolist_shared::{
    auth::{authorization::authorize_todo, middleware::AuthContext},
    models::todo::{CreateTodo, Todo, TodoPatch, TodoStatus},
    response::ApiResponse,
};
use uuid::Uuid;
use validator::Validate;

/// List item
#[derive(Debug, Serialize)]
pub struct TodoSummary {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub status: TodoStatus,
}

impl From<Todo> for TodoSummary {
    fn from(todo: Todo) -> Self {
        Self {
            id: todo.id,
            name: todo.name,
            description: todo.description,
            status: todo.status,
        }
    }
}

/// Single-todo view
#[derive(Debug, Serialize)]
pub struct TodoDetail {
    pub name: String,
    pub description: Option<String>,
    pub status: TodoStatus,
}

impl From<Todo> for TodoDetail {
    fn from(todo: Todo) -> Self {
        Self {
            name: todo.name,
            description: todo.description,
            status: todo.status,
        }
    }
}

/// Create request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTodoRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Todo Name is required"))]
    pub name: String,

    pub description: Option<String>,
}

/// Update request
///
/// `status` is kept as a string so that an unknown value is reported as
/// 422 rather than a body deserialization failure.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTodoRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
}

/// List the caller's todos
///
/// # Response
///
/// ```json
/// {
///   "success": true,
///   "data": [{ "id": "uuid", "name": "buy milk", "description": null, "status": "active" }],
///   "message": "Todos retrieved Successfully"
/// }
/// ```
pub async fn list_todos(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<ApiResponse<Vec<TodoSummary>>>> {
    let todos = state.store.list_todos_by_owner(auth.user_id).await?;

    let summaries: Vec<TodoSummary> = todos.into_iter().map(TodoSummary::from).collect();

    Ok(Json(
        ApiResponse::data(summaries).with_message("Todos retrieved Successfully"),
    ))
}

/// Create a todo owned by the caller
///
/// # Errors
///
/// - `400 Bad Request`: Name missing or empty, or (with owner validation
///   enabled) the caller no longer exists
pub async fn create_todo(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ApiJson(req): ApiJson<CreateTodoRequest>,
) -> ApiResult<Json<ApiResponse<()>>> {
    validate_body(&req, &["name"])?;

    if state.config.todos.validate_owner_exists
        && state.store.find_user_by_id(auth.user_id).await?.is_none()
    {
        tracing::debug!(user_id = %auth.user_id, "Session subject no longer exists");
        return Err(ApiError::Unauthenticated("User not logged in".to_string()));
    }

    let todo = state
        .store
        .create_todo(CreateTodo {
            user_id: auth.user_id,
            name: req.name,
            description: req.description,
        })
        .await?;

    tracing::debug!(todo_id = %todo.id, user_id = %auth.user_id, "Todo created");

    Ok(Json(ApiResponse::message("Todo Added Successfully")))
}

/// Read one todo
///
/// # Errors
///
/// - `403 Forbidden`: Todo belongs to another user
/// - `404 Not Found`: No such todo
pub async fn get_todo(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<TodoDetail>>> {
    let todo_id = parse_todo_id(&id)?;

    let todo = authorize_todo(state.store.as_ref(), todo_id, &auth).await?;

    Ok(Json(ApiResponse::data(TodoDetail::from(todo))))
}

/// Sparse update
///
/// Order of checks: status value, ownership guard, then the patch itself.
///
/// # Errors
///
/// - `403 Forbidden`: Todo belongs to another user
/// - `404 Not Found`: No such todo, or it was deleted concurrently
/// - `422 Unprocessable Entity`: Unknown status, or nothing to update
pub async fn update_todo(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<UpdateTodoRequest>,
) -> ApiResult<Json<ApiResponse<()>>> {
    let status = req
        .status
        .as_deref()
        .map(str::parse::<TodoStatus>)
        .transpose()?;

    let todo_id = parse_todo_id(&id)?;
    authorize_todo(state.store.as_ref(), todo_id, &auth).await?;

    let patch = TodoPatch::from_fields(req.name, req.description, status);
    if patch.is_empty() {
        return Err(ApiError::Unprocessable(
            "No valid fields provided for update.".to_string(),
        ));
    }

    if !state.store.update_todo(todo_id, auth.user_id, patch).await? {
        return Err(todo_not_found());
    }

    tracing::debug!(todo_id = %todo_id, "Todo updated");

    Ok(Json(ApiResponse::message("Todo updated successfully")))
}

/// Delete a todo
///
/// # Errors
///
/// - `403 Forbidden`: Todo belongs to another user
/// - `404 Not Found`: No such todo (including a repeated delete)
pub async fn delete_todo(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<()>>> {
    let todo_id = parse_todo_id(&id)?;
    authorize_todo(state.store.as_ref(), todo_id, &auth).await?;

    if !state.store.delete_todo(todo_id, auth.user_id).await? {
        return Err(todo_not_found());
    }

    tracing::debug!(todo_id = %todo_id, "Todo deleted");

    Ok(Json(ApiResponse::message("Todo deleted successfully")))
}

/// A malformed ID cannot name a stored todo
fn parse_todo_id(raw: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| todo_not_found())
}

fn todo_not_found() -> ApiError {
    ApiError::NotFound("Todo not found".to_string())
}
