use core_config::{AppInfo, FromEnv, LogFormat, app_info, env_parse, server::ServerConfig};

// Import database configs from the database library
use database::postgres::PostgresConfig;

// Re-export Environment for use in other modules
pub use core_config::Environment;

/// Application-specific configuration
/// Composes shared config components from the `config` library
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub database: PostgresConfig,
    pub server: ServerConfig,
    pub environment: Environment,
    pub log_format: LogFormat,
    /// Apply pending migrations before serving (`RUN_MIGRATIONS`)
    pub run_migrations: bool,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let log_format = LogFormat::from_env(&environment)?;
        let database = PostgresConfig::from_env()?; // Required - will fail if not set
        let server = ServerConfig::from_env()?; // Uses defaults: HOST=0.0.0.0, PORT=8080
        let run_migrations = env_parse("RUN_MIGRATIONS", "false")?;

        Ok(Self {
            app: app_info!(),
            database,
            server,
            environment,
            log_format,
            run_migrations,
        })
    }
}
