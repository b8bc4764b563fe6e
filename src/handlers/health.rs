use axum::{extract::State, http::StatusCode, response::Json};

use crate::services::health_check::{HealthCheckStatus, HealthStatus};
use crate::services::HealthChecker;

/// Health check endpoint; 503 when the database is unreachable
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthStatus),
        (status = 503, description = "A dependency is unhealthy", body = HealthStatus)
    )
)]
pub async fn health_check(
    State(checker): State<HealthChecker>,
) -> (StatusCode, Json<HealthStatus>) {
    let health = checker.check().await;
    let status = match health.status {
        HealthCheckStatus::Healthy => StatusCode::OK,
        HealthCheckStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };
    (status, Json(health))
}
