/// Credential store
///
/// Durable user and todo records behind an async trait so that the
/// authorization layer can run against PostgreSQL in production and against
/// an in-memory fake in tests.
///
/// # Implementations
///
/// - [`postgres::PgStore`]: sqlx / PostgreSQL
/// - [`memory::MemoryStore`]: `tokio::sync::RwLock`-guarded maps
///
/// # Atomicity
///
/// Each method is a single atomic operation. `update_todo` and `delete_todo`
/// filter on both the todo ID and the owner ID in one statement, so a
/// mutation can never touch a todo that is not owned by the caller even if
/// the record changes between an ownership check and the write.

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{
    todo::{CreateTodo, Todo, TodoPatch},
    user::{CreateUser, User},
};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Error type for store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Username is already registered
    #[error("Username '{0}' is already taken")]
    DuplicateUsername(String),

    /// Underlying database failure
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Store result type alias
pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence operations used by the service
#[async_trait]
pub trait CredentialStore: Send + Sync + 'static {
    /// Inserts a new user
    async fn create_user(&self, data: CreateUser) -> StoreResult<User>;

    async fn find_user_by_id(&self, id: Uuid) -> StoreResult<Option<User>>;

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>>;

    /// Lists todos owned by `owner_id`, oldest first
    async fn list_todos_by_owner(&self, owner_id: Uuid) -> StoreResult<Vec<Todo>>;

    async fn create_todo(&self, data: CreateTodo) -> StoreResult<Todo>;

    /// Fetches a todo by ID without any ownership filter
    async fn find_todo(&self, id: Uuid) -> StoreResult<Option<Todo>>;

    /// Applies `patch` to the todo matching both `id` and `owner_id`
    ///
    /// Returns false when nothing matched.
    async fn update_todo(&self, id: Uuid, owner_id: Uuid, patch: TodoPatch) -> StoreResult<bool>;

    /// Deletes the todo matching both `id` and `owner_id`
    ///
    /// Returns false when nothing matched.
    async fn delete_todo(&self, id: Uuid, owner_id: Uuid) -> StoreResult<bool>;

    /// Connectivity check
    async fn ping(&self) -> StoreResult<()>;
}
