//! Health check backed by a `SELECT 1` query on the shared pool.

use crate::state::AppState;
use axum::extract::State;
use axum_helpers::server::health::HealthReport;
use axum_helpers::server::{HealthCheckFuture, run_health_checks};
use database::postgres::check_health;

/// Service health
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Every component is UP"),
        (status = 503, description = "At least one component is DOWN")
    )
)]
pub async fn health_handler(State(state): State<AppState>) -> HealthReport {
    let checks: Vec<(&str, HealthCheckFuture<'_>)> = vec![(
        "database",
        Box::pin(async {
            check_health(&state.db)
                .await
                .map_err(|e| format!("Database ping failed: {}", e))
        }),
    )];

    run_health_checks(checks).await
}
