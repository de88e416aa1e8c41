//! # Todolist Shared Library
//!
//! This crate contains the types, storage access and authorization logic used
//! by the Todolist API server.
//!
//! ## Module Organization
//!
//! - `models`: Database models and data structures
//! - `store`: Credential store trait with PostgreSQL and in-memory backends
//! - `auth`: Session tokens, session resolution and ownership checks
//! - `db`: Connection pool and migrations
//! - `response`: JSON envelope shared by every endpoint

pub mod auth;
pub mod db;
pub mod models;
pub mod response;
pub mod store;

/// Current version of the Todolist shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
