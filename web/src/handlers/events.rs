//! Raw event history.

use crate::state::AppState;
use axum::{Json, extract::State};
use order_ledger_core::RecordedEvent;

/// Every event in the log, in append order.
///
/// # Example
///
/// ```bash
/// curl http://localhost:8080/events
/// # [{"type":"OrderCreated","order_id":"...","position":1,"timestamp":"...","data":[]}]
/// ```
pub async fn list_events(State(state): State<AppState>) -> Json<Vec<RecordedEvent>> {
    Json(state.ledger.history().await)
}
