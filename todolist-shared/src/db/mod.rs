/// Database layer for Todolist
///
/// # Modules
///
/// - `pool`: PostgreSQL connection pool with a startup health check
/// - `migrations`: Embedded schema migrations, applied at startup
///
/// Models live in the `models` module at crate root level.

pub mod migrations;
pub mod pool;
