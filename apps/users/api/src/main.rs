use axum_helpers::server::create_production_app;
use core_config::tracing::{init_tracing, install_color_eyre};
use database::postgres::{close, connect_from_config_with_retry, run_migrations};
use migration::Migrator;
use std::time::Duration;
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Install color-eyre first for colored error output (before any fallible operations)
    install_color_eyre();

    // Load configuration from environment variables
    let config = Config::from_env()?;

    // Initialize tracing with ErrorLayer for span trace capture
    init_tracing(&config.environment, config.log_format);

    info!(
        app = config.app.name,
        version = config.app.version,
        "Connecting to PostgreSQL"
    );

    let db = connect_from_config_with_retry(config.database.clone(), None)
        .await
        .map_err(|e| eyre::eyre!("PostgreSQL connection failed: {}", e))?;

    if config.run_migrations {
        run_migrations::<Migrator>(&db, config.app.name).await?;
    }

    let state = AppState { config, db };

    // Build router with API routes (pass reference, not ownership!)
    let api_routes = api::routes(&state);

    // create_router adds docs/middleware to our composed routes
    let app = axum_helpers::create_router::<openapi::ApiDoc>(api_routes);

    info!("Starting users API with production-ready shutdown (30s timeout)");

    let server = state.config.server.clone();
    create_production_app(app, &server, Duration::from_secs(30), async move {
        info!("Shutting down: closing database connections");
        if let Err(e) = close(state.db).await {
            tracing::error!("Error closing PostgreSQL: {}", e);
        }
    })
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Users API shutdown complete");
    Ok(())
}
