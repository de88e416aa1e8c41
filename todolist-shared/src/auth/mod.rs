/// Authentication and authorization
///
/// # Modules
///
/// - [`jwt`]: Stateless session tokens (HS256, one-hour lifetime)
/// - [`session`]: Session cookie parsing, resolution and `Set-Cookie` values
/// - [`middleware`]: Axum middleware that gates protected routes
/// - [`authorization`]: Ownership guard for todo access
/// - [`password`]: Argon2id password hashing
///
/// # Request flow
///
/// ```text
/// request ─> session cookie ─> TokenService::verify ─> AuthContext
///                                                        │
///          authorize_todo(store, id, &AuthContext) <─────┘
///                  │
///                  └─> NotFound | Forbidden | Ok(todo)
/// ```

pub mod authorization;
pub mod jwt;
pub mod middleware;
pub mod password;
pub mod session;
