use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use futures::future::join_all;
use serde::Serialize;
use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;
use utoipa::ToSchema;

/// A boxed health check; `Err` carries the reason the dependency is down
pub type HealthCheckFuture<'a> = Pin<Box<dyn Future<Output = Result<(), String>> + Send + 'a>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum HealthStatus {
    Up,
    Down,
}

/// Result of one named check
#[derive(Debug, Serialize, ToSchema)]
pub struct ComponentHealth {
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// `{"status":"UP","details":{"database":{"status":"UP"}}}`
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub details: BTreeMap<String, ComponentHealth>,
}

impl HealthReport {
    pub fn is_up(&self) -> bool {
        self.status == HealthStatus::Up
    }
}

impl IntoResponse for HealthReport {
    fn into_response(self) -> Response {
        let status = if self.is_up() {
            StatusCode::OK
        } else {
            StatusCode::SERVICE_UNAVAILABLE
        };
        (status, Json(self)).into_response()
    }
}

/// Run all checks concurrently. The report is `UP` only if every check passed.
///
/// ```ignore
/// let checks: Vec<(&str, HealthCheckFuture)> = vec![(
///     "database",
///     Box::pin(async { check_health(&db).await.map_err(|e| e.to_string()) }),
/// )];
/// run_health_checks(checks).await.into_response()
/// ```
pub async fn run_health_checks(checks: Vec<(&str, HealthCheckFuture<'_>)>) -> HealthReport {
    let names: Vec<_> = checks.iter().map(|(name, _)| *name).collect();
    let futures: Vec<_> = checks.into_iter().map(|(_, check)| check).collect();
    let results = join_all(futures).await;

    let mut details = BTreeMap::new();
    let mut all_up = true;

    for (name, result) in names.into_iter().zip(results) {
        let component = match result {
            Ok(()) => ComponentHealth {
                status: HealthStatus::Up,
                error: None,
            },
            Err(e) => {
                tracing::error!(check = name, error = %e, "Health check failed");
                all_up = false;
                ComponentHealth {
                    status: HealthStatus::Down,
                    error: Some(e),
                }
            }
        };
        details.insert(name.to_string(), component);
    }

    HealthReport {
        status: if all_up {
            HealthStatus::Up
        } else {
            HealthStatus::Down
        },
        details,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    #[tokio::test]
    async fn test_all_checks_up() {
        let database: HealthCheckFuture = Box::pin(async { Ok::<(), String>(()) });
        let checks = vec![("database", database)];

        let response = run_health_checks(checks).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"status": "UP", "details": {"database": {"status": "UP"}}})
        );
    }

    #[tokio::test]
    async fn test_one_failing_check_marks_report_down() {
        let database: HealthCheckFuture =
            Box::pin(async { Err::<(), String>("connection refused".to_string()) });
        let disk: HealthCheckFuture = Box::pin(async { Ok::<(), String>(()) });
        let checks = vec![("database", database), ("disk", disk)];

        let report = run_health_checks(checks).await;
        assert!(!report.is_up());
        assert_eq!(report.details["database"].status, HealthStatus::Down);
        assert_eq!(report.details["disk"].status, HealthStatus::Up);

        let response = report.into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_no_checks_is_up() {
        let report = run_health_checks(Vec::new()).await;
        assert!(report.is_up());
    }
}
