// Metrics endpoint for Prometheus

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};

use crate::{error::ApiError, AppState};

/// Prometheus metrics endpoint; 404 when metrics are disabled
#[utoipa::path(
    get,
    path = "/metrics",
    tag = "metrics",
    responses(
        (status = 200, description = "Prometheus metrics", content_type = "text/plain"),
        (status = 404, description = "Metrics are disabled")
    )
)]
pub async fn get_prometheus_metrics(State(app_state): State<AppState>) -> Result<Response, ApiError> {
    let handle = app_state
        .metrics_handle
        .as_ref()
        .ok_or_else(|| ApiError::NotFound("Metrics are disabled".to_string()))?;

    Ok((
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        handle.render(),
    )
        .into_response())
}
