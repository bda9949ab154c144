//! Router configuration for the order ledger.

use crate::handlers::{events, health_check, metrics, orders};
use crate::middleware::correlation_id;
use crate::state::AppState;
use axum::{
    Router, middleware,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

/// Build the complete Axum router.
///
/// Configures:
/// - Order commands and queries under `/orders`
/// - Raw history at `/events`
/// - `/health` and `/metrics`
///
/// Every request runs inside a span carrying its correlation id, which the
/// order command handlers also read.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/orders", post(orders::create_order))
        .route("/orders/:id", get(orders::get_order))
        .route("/orders/:id/pay", post(orders::pay_order))
        .route("/orders/:id/cancel", post(orders::cancel_order))
        .route("/events", get(events::list_events))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics::metrics))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(correlation_id))
        .with_state(state)
}
