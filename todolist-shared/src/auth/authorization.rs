/// Ownership guard for todo access
///
/// Every id-addressed todo operation goes through [`authorize_todo`] before
/// touching the record:
///
/// ```text
/// find_todo(id) ── Err ──────────────> AuthzError::Storage   (500)
///       │
///       ├── None ────────────────────> AuthzError::NotFound  (404)
///       │
///       ├── owner != caller ─────────> AuthzError::Forbidden (403)
///       │
///       └── owner == caller ─────────> Ok(todo)
/// ```
///
/// Existence is always checked before ownership. Not-found and forbidden are
/// reported with distinct status codes, so any authenticated caller can tell
/// whether a todo ID exists; it can never read or change a todo it does not
/// own.
///
/// # Example
///
/// ```no_run
/// use todolist_shared::auth::authorization::authorize_todo;
/// use todolist_shared::auth::middleware::AuthContext;
/// use todolist_shared::store::MemoryStore;
/// use uuid::Uuid;
///
/// # async fn example(auth: AuthContext, todo_id: Uuid) -> Result<(), Box<dyn std::error::Error>> {
/// let store = MemoryStore::new();
/// let todo = authorize_todo(&store, todo_id, &auth).await?;
/// println!("{} may access {}", auth.user_id, todo.name);
/// # Ok(())
/// # }
/// ```

use tracing::warn;
use uuid::Uuid;

use super::middleware::AuthContext;
use crate::models::todo::Todo;
use crate::store::{CredentialStore, StoreError};

/// Error type for ownership checks
#[derive(Debug, thiserror::Error)]
pub enum AuthzError {
    /// No todo with this ID exists
    #[error("Todo {0} not found")]
    NotFound(Uuid),

    /// Caller is authenticated but does not own the resource
    #[error("Not authorized to access this resource")]
    Forbidden,

    /// Store lookup failed
    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),
}

/// Checks that the authenticated user owns a resource
pub fn require_ownership(auth: &AuthContext, resource_owner_id: Uuid) -> Result<(), AuthzError> {
    if auth.user_id != resource_owner_id {
        return Err(AuthzError::Forbidden);
    }

    Ok(())
}

/// Loads a todo and checks that the caller owns it
///
/// Returns the fetched record on success so the caller needs no second
/// round trip.
pub async fn authorize_todo<S>(store: &S, todo_id: Uuid, auth: &AuthContext) -> Result<Todo, AuthzError>
where
    S: CredentialStore + ?Sized,
{
    let todo = store
        .find_todo(todo_id)
        .await?
        .ok_or(AuthzError::NotFound(todo_id))?;

    if let Err(e) = require_ownership(auth, todo.user_id) {
        warn!(
            todo_id = %todo_id,
            caller = %auth.user_id,
            "Ownership check failed"
        );
        return Err(e);
    }

    Ok(todo)
}
