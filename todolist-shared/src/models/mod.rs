/// Database models for Todolist
///
/// # Models
///
/// - `user`: User accounts and credentials
/// - `todo`: Todo items, each owned by exactly one user

pub mod todo;
pub mod user;
