//! Prometheus scrape endpoint.

use crate::{error::AppError, state::AppState};
use axum::{
    extract::State,
    http::{StatusCode, header},
    response::IntoResponse,
};
use order_ledger_runtime::metrics::MetricsRecorder;

/// Content type of the Prometheus text exposition format.
pub const PROMETHEUS_CONTENT_TYPE: &str = "text/plain; version=0.0.4";

/// Render every recorded metric.
///
/// # Endpoint
///
/// ```text
/// GET /metrics
/// ```
///
/// # Errors
///
/// 404 when no recorder was installed for this server.
pub async fn metrics(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let body = state
        .metrics
        .as_ref()
        .and_then(MetricsRecorder::render)
        .ok_or_else(|| {
            AppError::new(
                StatusCode::NOT_FOUND,
                "Metrics are not enabled".to_string(),
                "NOT_FOUND".to_string(),
            )
        })?;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, PROMETHEUS_CONTENT_TYPE)],
        body,
    ))
}
