/// PostgreSQL-backed credential store

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{CredentialStore, StoreError, StoreResult};
use crate::db::pool::health_check;
use crate::models::{
    todo::{CreateTodo, Todo, TodoPatch},
    user::{CreateUser, User},
};

/// Credential store over a sqlx connection pool
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets the underlying pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl CredentialStore for PgStore {
    async fn create_user(&self, data: CreateUser) -> StoreResult<User> {
        let username = data.username.clone();

        User::create(&self.pool, data).await.map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                StoreError::DuplicateUsername(username)
            }
            other => StoreError::Database(other),
        })
    }

    async fn find_user_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        Ok(User::find_by_id(&self.pool, id).await?)
    }

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        Ok(User::find_by_username(&self.pool, username).await?)
    }

    async fn list_todos_by_owner(&self, owner_id: Uuid) -> StoreResult<Vec<Todo>> {
        Ok(Todo::list_by_owner(&self.pool, owner_id).await?)
    }

    async fn create_todo(&self, data: CreateTodo) -> StoreResult<Todo> {
        Ok(Todo::create(&self.pool, data).await?)
    }

    async fn find_todo(&self, id: Uuid) -> StoreResult<Option<Todo>> {
        Ok(Todo::find_by_id(&self.pool, id).await?)
    }

    async fn update_todo(&self, id: Uuid, owner_id: Uuid, patch: TodoPatch) -> StoreResult<bool> {
        Ok(Todo::update_owned(&self.pool, id, owner_id, patch).await?)
    }

    async fn delete_todo(&self, id: Uuid, owner_id: Uuid) -> StoreResult<bool> {
        Ok(Todo::delete_owned(&self.pool, id, owner_id).await?)
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(health_check(&self.pool).await?)
    }
}
