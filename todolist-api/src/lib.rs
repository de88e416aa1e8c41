//! # Todolist API Server Library
//!
//! HTTP surface of the todo service: session login via a signed cookie,
//! and todo CRUD where every record belongs to exactly one user.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `extract`: JSON body extraction and validation
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod extract;
pub mod routes;
