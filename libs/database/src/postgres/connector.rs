use sea_orm::{Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use tracing::info;

use super::PostgresConfig;
use crate::common::{DatabaseError, DatabaseResult, RetryConfig, retry_with_backoff};

/// Validate `config` and open a pool with its settings, retrying with
/// exponential backoff.
///
/// Configuration errors fail immediately; only connection attempts are retried.
/// `None` uses [`RetryConfig::default`].
pub async fn connect_from_config_with_retry(
    config: PostgresConfig,
    retry_config: Option<RetryConfig>,
) -> DatabaseResult<DatabaseConnection> {
    config.validate()?;
    let options = config.into_connect_options();

    let db = retry_with_backoff(
        || Database::connect(options.clone()),
        retry_config.unwrap_or_default(),
    )
    .await
    .map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;

    info!("Connected to PostgreSQL");
    Ok(db)
}

/// Apply all pending migrations of `M`.
pub async fn run_migrations<M: MigratorTrait>(
    db: &DatabaseConnection,
    app_name: &str,
) -> DatabaseResult<()> {
    info!(app = app_name, "Running database migrations");
    M::up(db, None)
        .await
        .map_err(|e| DatabaseError::MigrationError(e.to_string()))?;
    info!(app = app_name, "Migrations completed");
    Ok(())
}

/// Drain and close the pool.
pub async fn close(db: DatabaseConnection) -> DatabaseResult<()> {
    db.close().await?;
    info!("PostgreSQL pool closed");
    Ok(())
}
