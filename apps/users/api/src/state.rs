//! Application state management.
//!
//! The state is cloned into the health handler and read once when the
//! user routes are built; the connection inside is a shared pool.

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded from environment variables
    pub config: crate::config::Config,
    /// PostgreSQL database connection pool
    pub db: database::postgres::DatabaseConnection,
}
