//! Router assembly, serving with graceful shutdown, and health aggregation.
//!
//! ```ignore
//! use axum_helpers::server::{create_production_app, create_router};
//!
//! let router = create_router::<ApiDoc>(api_routes);
//! create_production_app(router, &config.server, Duration::from_secs(30), cleanup).await?;
//! ```

pub mod app;
pub mod health;
pub mod shutdown;

pub use app::{create_production_app, create_router};
pub use health::{HealthCheckFuture, HealthStatus, run_health_checks};
pub use shutdown::{ShutdownCoordinator, shutdown_signal};
