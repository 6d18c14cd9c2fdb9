//! PostgreSQL connection management for the workspace services.
//!
//! # Features
//!
//! - `postgres` (default) - SeaORM connection pool, migrations and ping check
//! - `config` - `core_config::FromEnv` for [`postgres::PostgresConfig`]
//!
//! ```ignore
//! use database::postgres;
//! use migration::Migrator;
//!
//! let config = postgres::PostgresConfig::from_env()?;
//! let db = postgres::connect_from_config_with_retry(config, None).await?;
//! postgres::run_migrations::<Migrator>(&db, "users_api").await?;
//! ```

pub mod common;

#[cfg(feature = "postgres")]
pub mod postgres;

pub use common::{DatabaseError, DatabaseResult};
