//! Health check endpoint.
//!
//! Used by load balancers and monitoring systems to verify the service is up.

use crate::state::AppState;
use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Events in the log
    pub events: usize,
    /// Orders in the read model
    pub orders: usize,
}

/// Liveness check with ledger counters.
///
/// # Endpoint
///
/// ```text
/// GET /health
/// ```
///
/// # Response
///
/// ```json
/// {
///   "status": "ok",
///   "events": 3,
///   "orders": 1
/// }
/// ```
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let stats = state.ledger.stats().await;
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok".to_string(),
            events: stats.events,
            orders: stats.orders,
        }),
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use order_ledger_runtime::{Ledger, LedgerEnvironment};

    #[tokio::test]
    async fn test_health_check_reports_counts() {
        let ledger = Ledger::new(LedgerEnvironment::production());
        ledger.create_order().await.unwrap();
        ledger.pay_order("unknown".into()).await.unwrap();

        let (status, Json(body)) = health_check(State(AppState::new(ledger))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.status, "ok");
        assert_eq!(body.events, 2);
        assert_eq!(body.orders, 1);
    }
}
