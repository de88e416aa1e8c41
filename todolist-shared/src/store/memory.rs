/// In-memory credential store
///
/// Keeps users and todos in process memory behind a `tokio::sync::RwLock`.
/// Each method holds the lock for its whole body, so every operation is
/// atomic with respect to the others, matching the single-statement
/// guarantees of the PostgreSQL store. Intended for tests and local runs;
/// nothing survives a restart.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{CredentialStore, StoreError, StoreResult};
use crate::models::{
    todo::{CreateTodo, Todo, TodoPatch, TodoStatus},
    user::{CreateUser, User},
};

#[derive(Debug, Default)]
struct State {
    users: HashMap<Uuid, User>,
    // Insertion order doubles as creation order
    todos: Vec<Todo>,
}

/// Credential store held entirely in memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored todos across all owners
    pub async fn todo_count(&self) -> usize {
        self.state.read().await.todos.len()
    }
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn create_user(&self, data: CreateUser) -> StoreResult<User> {
        let mut state = self.state.write().await;

        if state.users.values().any(|u| u.username == data.username) {
            return Err(StoreError::DuplicateUsername(data.username));
        }

        let user = User {
            id: Uuid::new_v4(),
            username: data.username,
            password_hash: data.password_hash,
            created_at: Utc::now(),
        };
        state.users.insert(user.id, user.clone());

        Ok(user)
    }

    async fn find_user_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        Ok(self.state.read().await.users.get(&id).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let state = self.state.read().await;
        Ok(state.users.values().find(|u| u.username == username).cloned())
    }

    async fn list_todos_by_owner(&self, owner_id: Uuid) -> StoreResult<Vec<Todo>> {
        let state = self.state.read().await;
        Ok(state
            .todos
            .iter()
            .filter(|t| t.user_id == owner_id)
            .cloned()
            .collect())
    }

    async fn create_todo(&self, data: CreateTodo) -> StoreResult<Todo> {
        let todo = Todo {
            id: Uuid::new_v4(),
            user_id: data.user_id,
            name: data.name,
            description: data.description,
            status: TodoStatus::default(),
            created_at: Utc::now(),
        };
        self.state.write().await.todos.push(todo.clone());

        Ok(todo)
    }

    async fn find_todo(&self, id: Uuid) -> StoreResult<Option<Todo>> {
        let state = self.state.read().await;
        Ok(state.todos.iter().find(|t| t.id == id).cloned())
    }

    async fn update_todo(&self, id: Uuid, owner_id: Uuid, patch: TodoPatch) -> StoreResult<bool> {
        let mut state = self.state.write().await;

        match state
            .todos
            .iter_mut()
            .find(|t| t.id == id && t.user_id == owner_id)
        {
            Some(todo) => {
                patch.apply_to(todo);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_todo(&self, id: Uuid, owner_id: Uuid) -> StoreResult<bool> {
        let mut state = self.state.write().await;
        let before = state.todos.len();
        state.todos.retain(|t| !(t.id == id && t.user_id == owner_id));

        Ok(state.todos.len() < before)
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}
