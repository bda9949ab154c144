//! Axum HTTP binding for the order ledger.
//!
//! Handlers are thin: each one turns a request into a single ledger call and
//! maps the result (or [`LedgerError`](order_ledger_runtime::LedgerError)) to
//! an HTTP response.
//!
//! # Endpoints
//!
//! | Method | Path | Success |
//! |--------|------|---------|
//! | `POST` | `/orders` | `201 {"order_id"}` |
//! | `POST` | `/orders/:id/pay` | `204` |
//! | `POST` | `/orders/:id/cancel` | `204` |
//! | `GET` | `/orders/:id` | `200 {"id","status"}` |
//! | `GET` | `/events` | `200 [event, ...]` |
//! | `GET` | `/health` | `200 {"status","events","orders"}` |
//! | `GET` | `/metrics` | Prometheus text |
//!
//! # Example
//!
//! ```ignore
//! use order_ledger_runtime::{Ledger, LedgerEnvironment};
//! use order_ledger_web::{AppState, build_router};
//!
//! let ledger = Ledger::new(LedgerEnvironment::production());
//! let app = build_router(AppState::new(ledger));
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//! axum::serve(listener, app).await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

// Re-export key types for convenience
pub use error::AppError;
pub use middleware::{CORRELATION_ID_HEADER, CorrelationId, correlation_id};
pub use router::build_router;
pub use state::AppState;
