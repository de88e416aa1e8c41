/// Todo model and database operations
///
/// Every todo has exactly one owner (`user_id`), fixed at creation. Mutations
/// are always filtered by both the todo ID and the owner ID so that a single
/// statement both checks ownership and applies the change.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE todo_status AS ENUM ('active', 'inactive');
///
/// CREATE TABLE todos (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID NOT NULL REFERENCES users(id),
///     name TEXT NOT NULL,
///     description TEXT,
///     status todo_status NOT NULL DEFAULT 'active',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Todo status
///
/// Stored as the PostgreSQL enum `todo_status`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "todo_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TodoStatus {
    /// Default for new todos
    #[default]
    Active,

    Inactive,
}

impl TodoStatus {
    /// Gets status as string
    pub fn as_str(&self) -> &'static str {
        match self {
            TodoStatus::Active => "active",
            TodoStatus::Inactive => "inactive",
        }
    }
}

impl fmt::Display for TodoStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown status value
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid status '{0}', expected 'active' or 'inactive'")]
pub struct InvalidStatus(pub String);

impl FromStr for TodoStatus {
    type Err = InvalidStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(TodoStatus::Active),
            "inactive" => Ok(TodoStatus::Inactive),
            other => Err(InvalidStatus(other.to_string())),
        }
    }
}

/// Todo model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Todo {
    /// Unique todo ID (UUID v4)
    pub id: Uuid,

    /// Owner (user ID), immutable after creation
    pub user_id: Uuid,

    /// Todo name, never empty
    pub name: String,

    /// Optional free-form description
    pub description: Option<String>,

    /// Current status
    pub status: TodoStatus,

    /// When the todo was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new todo
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTodo {
    /// Owner of the new todo (the authenticated caller)
    pub user_id: Uuid,

    /// Todo name
    pub name: String,

    /// Optional description
    pub description: Option<String>,
}

/// Sparse update for a todo
///
/// Only `Some` fields are written; the owner can never be changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<TodoStatus>,
}

impl TodoPatch {
    /// Builds a patch from raw request fields
    ///
    /// Text fields are kept only when present and non-empty. The status is
    /// kept whenever present (it has already been validated by parsing).
    pub fn from_fields(
        name: Option<String>,
        description: Option<String>,
        status: Option<TodoStatus>,
    ) -> Self {
        Self {
            name: name.filter(|n| !n.is_empty()),
            description: description.filter(|d| !d.is_empty()),
            status,
        }
    }

    /// Returns true when the patch would not change anything
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.status.is_none()
    }

    /// Applies the patch to an in-memory record
    pub fn apply_to(&self, todo: &mut Todo) {
        if let Some(name) = &self.name {
            todo.name = name.clone();
        }
        if let Some(description) = &self.description {
            todo.description = Some(description.clone());
        }
        if let Some(status) = self.status {
            todo.status = status;
        }
    }
}

impl Todo {
    /// Creates a new todo owned by `data.user_id`
    pub async fn create(pool: &PgPool, data: CreateTodo) -> Result<Self, sqlx::Error> {
        let todo = sqlx::query_as::<_, Todo>(
            r#"
            INSERT INTO todos (user_id, name, description)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, name, description, status, created_at
            "#,
        )
        .bind(data.user_id)
        .bind(data.name)
        .bind(data.description)
        .fetch_one(pool)
        .await?;

        Ok(todo)
    }

    /// Finds a todo by ID regardless of owner
    ///
    /// Callers are responsible for the ownership check.
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let todo = sqlx::query_as::<_, Todo>(
            r#"
            SELECT id, user_id, name, description, status, created_at
            FROM todos
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(todo)
    }

    /// Lists all todos owned by a user, oldest first
    pub async fn list_by_owner(pool: &PgPool, user_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let todos = sqlx::query_as::<_, Todo>(
            r#"
            SELECT id, user_id, name, description, status, created_at
            FROM todos
            WHERE user_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(todos)
    }

    /// Applies a patch to a todo owned by `user_id`
    ///
    /// Returns false if no row matched both the ID and the owner.
    pub async fn update_owned(
        pool: &PgPool,
        id: Uuid,
        user_id: Uuid,
        patch: TodoPatch,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE todos
            SET name = COALESCE($3, name),
                description = COALESCE($4, description),
                status = COALESCE($5, status)
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(patch.name)
        .bind(patch.description)
        .bind(patch.status)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Deletes a todo owned by `user_id`
    ///
    /// Returns false if no row matched both the ID and the owner.
    pub async fn delete_owned(pool: &PgPool, id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM todos WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
