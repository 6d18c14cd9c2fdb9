//! PostgreSQL pool construction, migrations and the readiness check

mod config;
mod connector;
mod health;

pub use config::PostgresConfig;
pub use connector::{close, connect_from_config_with_retry, run_migrations};
pub use health::check_health;

pub use sea_orm::DatabaseConnection;
