/// API route handlers
///
/// - `health`: Banner and health check
/// - `auth`: Signup, login, logout
/// - `todos`: Todo CRUD scoped to the session's user

pub mod auth;
pub mod health;
pub mod todos;
