//! # Order Ledger Runtime
//!
//! Runtime for the order ledger.
//!
//! This crate provides the [`Ledger`]: the owned, shareable store that keeps
//! the event log and the order read model consistent, and exposes the
//! command and query surface on top of them.
//!
//! ## Core Components
//!
//! - **Ledger**: serializes "append + project" through one lock
//! - **Commands**: `create_order`, `pay_order`, `cancel_order`
//! - **Queries**: `order`, `history`, `stats`
//! - **Replay**: cold-start replay in [`Ledger::with_log`], on-demand
//!   [`Ledger::rebuild`] and [`Ledger::verify_replay`]
//!
//! ## Example
//!
//! ```ignore
//! use order_ledger_runtime::{Ledger, LedgerEnvironment};
//!
//! let ledger = Ledger::new(LedgerEnvironment::production());
//!
//! let id = ledger.create_order().await?;
//! ledger.cancel_order(id.clone()).await?;
//!
//! let order = ledger.order(&id).await?;
//! ```

/// Prometheus metrics for observability
pub mod metrics;

mod ledger;

pub use error::LedgerError;
pub use ledger::{Ledger, LedgerEnvironment, LedgerStats};

/// Error types for the ledger
pub mod error {
    use order_ledger_core::{EventLogError, OrderId};
    use thiserror::Error;

    /// Errors surfaced by ledger commands and queries
    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum LedgerError {
        /// No order has been created under this identifier
        ///
        /// Also returned for identifiers that only ever received payment or
        /// cancellation events.
        #[error("Order not found: {0}")]
        NotFound(OrderId),

        /// The event log could not accept the event
        ///
        /// Fatal to the request that triggered it, not to the ledger. The
        /// log and the read model are unchanged.
        #[error("Event store unavailable: {0}")]
        StoreUnavailable(String),
    }

    impl From<EventLogError> for LedgerError {
        fn from(error: EventLogError) -> Self {
            match error {
                EventLogError::StoreUnavailable(reason) => Self::StoreUnavailable(reason),
                other @ EventLogError::OutOfSequence { .. } => {
                    Self::StoreUnavailable(other.to_string())
                }
            }
        }
    }
}
