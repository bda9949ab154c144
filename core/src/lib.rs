//! # Order Ledger Core
//!
//! Core types for an event-sourced order ledger.
//!
//! State changes are recorded as an append-only sequence of immutable events;
//! the current state of every order is derived by folding that sequence.
//!
//! ## Core Concepts
//!
//! - **Event**: an immutable fact (`OrderCreated`, `OrderPaid`, `OrderCanceled`)
//! - **Event Log**: append-only, totally ordered store of events
//! - **State Machine**: pure `(Option<status>, event) → Option<status>` fold
//! - **Projection**: read model derived by folding the log
//! - **Environment**: injected clock and identifier generator
//!
//! ## Example
//!
//! ```
//! use chrono::Utc;
//! use order_ledger_core::event::NewEvent;
//! use order_ledger_core::event_log::{EventLog, InMemoryEventLog};
//! use order_ledger_core::projection::{OrderProjection, Projection};
//! use order_ledger_core::state_machine::OrderStatus;
//! use order_ledger_core::stream::OrderId;
//!
//! let id = OrderId::new("order-1");
//! let mut log = InMemoryEventLog::new();
//! let mut orders = OrderProjection::new();
//!
//! for event in [NewEvent::created(id.clone()), NewEvent::paid(id.clone())] {
//!     let recorded = log.append(event, Utc::now()).unwrap();
//!     orders.apply_event(&recorded);
//! }
//!
//! assert_eq!(orders.status(&id), Some(OrderStatus::Paid));
//! ```

// Re-export commonly used types
pub use chrono::{DateTime, Utc};

pub mod event;
pub mod event_log;
pub mod projection;
pub mod state_machine;
pub mod stream;

pub use event::{NewEvent, OrderEventKind, Payload, RecordedEvent};
pub use event_log::{EventLog, EventLogError, InMemoryEventLog};
pub use projection::{Applied, Order, OrderProjection, Projection};
pub use state_machine::{OrderStatus, transition};
pub use stream::{OrderId, ParseOrderIdError, Position};

/// Environment module - Dependency injection traits
///
/// External collaborators the ledger depends on, abstracted behind traits so
/// tests can inject deterministic versions.
pub mod environment {
    use crate::stream::OrderId;
    use chrono::{DateTime, Utc};
    use uuid::Uuid;

    /// Clock trait - abstracts time operations for testability
    ///
    /// # Examples
    ///
    /// ```ignore
    /// // Test - fixed time for deterministic tests
    /// struct FixedClock { time: DateTime<Utc> }
    /// impl Clock for FixedClock {
    ///     fn now(&self) -> DateTime<Utc> {
    ///         self.time
    ///     }
    /// }
    /// ```
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Wall-clock time.
    #[derive(Clone, Copy, Debug, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }

    /// Source of fresh order identifiers.
    ///
    /// Every call must return an identifier never returned before.
    pub trait IdGenerator: Send + Sync {
        /// Mint a new, globally unique order identifier.
        fn next_id(&self) -> OrderId;
    }

    /// Random UUID v4 identifiers, rendered in hyphenated form.
    #[derive(Clone, Copy, Debug, Default)]
    pub struct UuidIdGenerator;

    impl IdGenerator for UuidIdGenerator {
        fn next_id(&self) -> OrderId {
            OrderId::new(Uuid::new_v4().to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::environment::{Clock, IdGenerator, SystemClock, UuidIdGenerator};

    #[test]
    fn uuid_ids_are_distinct() {
        let ids = UuidIdGenerator;
        let a = ids.next_id();
        let b = ids.next_id();
        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), 36);
    }

    #[test]
    fn system_clock_moves_forward() {
        let clock = SystemClock;
        let t1 = clock.now();
        let t2 = clock.now();
        assert!(t2 >= t1);
    }
}
