/// Errors raised while connecting to or probing the database
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    /// Driver error surfaced by SeaORM
    #[cfg(feature = "postgres")]
    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] sea_orm::DbErr),

    /// The pool could not be established, even after retries
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// The ping query did not answer
    #[error("Health check failed: {0}")]
    HealthCheckFailed(String),

    /// Rejected connection settings (bad DSN scheme, impossible pool bounds)
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Migration error: {0}")]
    MigrationError(String),
}

pub type DatabaseResult<T> = Result<T, DatabaseError>;
