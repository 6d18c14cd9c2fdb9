//! # Axum Helpers
//!
//! Shared HTTP plumbing for the workspace services.
//!
//! - **[`errors`]**: the error body, stable error codes and OpenAPI response types
//! - **[`extractors`]**: [`ValidatedJson`]
//! - **[`server`]**: router assembly, graceful shutdown, health aggregation

pub mod errors;
pub mod extractors;
pub mod server;

pub use errors::{AppError, ErrorCode, ErrorResponse, error_response, validation_details};
pub use extractors::ValidatedJson;
pub use server::{
    HealthCheckFuture, HealthStatus, ShutdownCoordinator, create_production_app, create_router,
    run_health_checks, shutdown_signal,
};
