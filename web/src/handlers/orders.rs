//! Order command and query endpoints.
//!
//! - POST /orders - Create a new order
//! - POST /orders/:id/pay - Record a payment
//! - POST /orders/:id/cancel - Record a cancellation
//! - GET /orders/:id - Current projected state
//!
//! Pay and cancel are accepted for any identifier. Whether they have an
//! effect is decided when the event is folded into the read model.

use crate::{error::AppError, middleware::CorrelationId, state::AppState};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use order_ledger_core::{Order, OrderId};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Response after creating an order.
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateOrderResponse {
    /// Identifier of the new order
    pub order_id: OrderId,
}

/// Create a new order.
///
/// # Example
///
/// ```bash
/// curl -X POST http://localhost:8080/orders
/// # {"order_id":"550e8400-e29b-41d4-a716-446655440000"}
/// ```
pub async fn create_order(
    Extension(correlation_id): Extension<CorrelationId>,
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<CreateOrderResponse>), AppError> {
    let order_id = state.ledger.create_order().await?;
    info!(%correlation_id, %order_id, "Order created");
    Ok((StatusCode::CREATED, Json(CreateOrderResponse { order_id })))
}

/// Record that an order was paid.
///
/// # Example
///
/// ```bash
/// curl -X POST http://localhost:8080/orders/550e8400-e29b-41d4-a716-446655440000/pay
/// ```
pub async fn pay_order(
    Path(order_id): Path<OrderId>,
    Extension(correlation_id): Extension<CorrelationId>,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    let position = state.ledger.pay_order(order_id.clone()).await?;
    info!(%correlation_id, %order_id, %position, "Payment recorded");
    Ok(StatusCode::NO_CONTENT)
}

/// Record that an order was canceled.
pub async fn cancel_order(
    Path(order_id): Path<OrderId>,
    Extension(correlation_id): Extension<CorrelationId>,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    let position = state.ledger.cancel_order(order_id.clone()).await?;
    info!(%correlation_id, %order_id, %position, "Cancellation recorded");
    Ok(StatusCode::NO_CONTENT)
}

/// Get the current state of an order.
///
/// # Example
///
/// ```bash
/// curl http://localhost:8080/orders/550e8400-e29b-41d4-a716-446655440000
/// # {"id":"550e8400-e29b-41d4-a716-446655440000","status":"PENDING"}
/// ```
pub async fn get_order(
    Path(order_id): Path<OrderId>,
    State(state): State<AppState>,
) -> Result<Json<Order>, AppError> {
    let order = state.ledger.order(&order_id).await?;
    Ok(Json(order))
}
