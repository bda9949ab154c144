//! # Order Ledger Testing
//!
//! Testing utilities and helpers for the order ledger.
//!
//! This crate provides:
//! - Deterministic implementations of the environment traits
//! - Ledger builders and script helpers
//! - Property-based testing strategies
//!
//! ## Example
//!
//! ```
//! use order_ledger_core::OrderStatus;
//! use order_ledger_testing::{SequentialIdGenerator, test_ledger};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let ledger = test_ledger();
//!
//! let id = ledger.create_order().await.unwrap();
//! assert_eq!(id, SequentialIdGenerator::id_for(1));
//!
//! let order = ledger.order(&id).await.unwrap();
//! assert_eq!(order.status, OrderStatus::Pending);
//! # }
//! ```

use chrono::{DateTime, TimeDelta, Utc};
use order_ledger_core::environment::{Clock, IdGenerator};
use order_ledger_core::stream::OrderId;

/// Mock implementations of Environment traits
pub mod mocks {
    use super::{Clock, DateTime, IdGenerator, OrderId, TimeDelta, Utc};
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::{Mutex, PoisonError};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use order_ledger_testing::mocks::FixedClock;
    /// use order_ledger_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// let time1 = clock.now();
    /// let time2 = clock.now();
    /// assert_eq!(time1, time2); // Always the same!
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }

    /// Clock that moves by a fixed step on every read.
    ///
    /// The step may be negative, which makes the clock run backwards. The
    /// current reading can also be [`set`](Self::set) directly.
    #[derive(Debug)]
    pub struct SteppingClock {
        next: Mutex<DateTime<Utc>>,
        step: TimeDelta,
    }

    impl SteppingClock {
        /// Start at `start`, moving by `step` after each reading.
        #[must_use]
        pub const fn new(start: DateTime<Utc>, step: TimeDelta) -> Self {
            Self {
                next: Mutex::new(start),
                step,
            }
        }

        /// Make the next reading return `time`.
        pub fn set(&self, time: DateTime<Utc>) {
            *self.next.lock().unwrap_or_else(PoisonError::into_inner) = time;
        }
    }

    impl Clock for SteppingClock {
        fn now(&self) -> DateTime<Utc> {
            let mut next = self.next.lock().unwrap_or_else(PoisonError::into_inner);
            let now = *next;
            *next = now + self.step;
            now
        }
    }

    /// Predictable identifiers: `order-1`, `order-2`, ...
    #[derive(Debug, Default)]
    pub struct SequentialIdGenerator {
        issued: AtomicU64,
    }

    impl SequentialIdGenerator {
        /// Create a generator whose first identifier is `order-1`.
        #[must_use]
        pub const fn new() -> Self {
            Self {
                issued: AtomicU64::new(0),
            }
        }

        /// The identifier returned by the `n`-th call to `next_id`.
        #[must_use]
        pub fn id_for(n: u64) -> OrderId {
            OrderId::new(format!("order-{n}"))
        }
    }

    impl IdGenerator for SequentialIdGenerator {
        fn next_id(&self) -> OrderId {
            let n = self.issued.fetch_add(1, Ordering::Relaxed) + 1;
            Self::id_for(n)
        }
    }
}

/// Test helpers and utilities
pub mod helpers {
    use super::Clock;
    use super::mocks::{SequentialIdGenerator, test_clock};
    use order_ledger_core::{EventLog, NewEvent, Position, RecordedEvent};
    use order_ledger_runtime::{Ledger, LedgerEnvironment, LedgerError};
    use std::sync::Arc;

    /// Environment with [`test_clock`] and a fresh [`SequentialIdGenerator`].
    #[must_use]
    pub fn test_environment() -> LedgerEnvironment {
        LedgerEnvironment::new(Arc::new(test_clock()), Arc::new(SequentialIdGenerator::new()))
    }

    /// Empty, unbounded ledger over [`test_environment`].
    #[must_use]
    pub fn test_ledger() -> Ledger {
        Ledger::new(test_environment())
    }

    /// Record `events` as a log would, at positions 1..=n and the test clock's time.
    #[must_use]
    pub fn record_all(events: impl IntoIterator<Item = NewEvent>) -> Vec<RecordedEvent> {
        let now = test_clock().now();
        events
            .into_iter()
            .enumerate()
            .map(|(index, event)| RecordedEvent::record(event, Position::after(index), now))
            .collect()
    }

    /// Append every event of a script, in order, through the ledger.
    ///
    /// # Errors
    ///
    /// Stops at and returns the first append error.
    pub async fn run_script<L>(
        ledger: &Ledger<L>,
        script: impl IntoIterator<Item = NewEvent>,
    ) -> Result<Vec<Position>, LedgerError>
    where
        L: EventLog,
    {
        let mut positions = Vec::new();
        for event in script {
            positions.push(ledger.append(event).await?.position);
        }
        Ok(positions)
    }
}

/// Property-based testing utilities using proptest.
pub mod properties {
    use order_ledger_core::{NewEvent, OrderEventKind, OrderId, Payload};
    use proptest::prelude::*;

    /// Any event kind.
    pub fn arb_event_kind() -> impl Strategy<Value = OrderEventKind> {
        prop::sample::select(OrderEventKind::ALL.to_vec())
    }

    /// An identifier from a small pool, so scripts hit the same order often.
    pub fn arb_order_id() -> impl Strategy<Value = OrderId> {
        (0..5u8).prop_map(|n| OrderId::new(format!("order-{n}")))
    }

    /// Arbitrary opaque payload bytes.
    pub fn arb_payload() -> impl Strategy<Value = Payload> {
        prop::collection::vec(any::<u8>(), 0..16).prop_map(Payload::from_bytes)
    }

    /// A single event for some order in the pool.
    pub fn arb_new_event() -> impl Strategy<Value = NewEvent> {
        (arb_event_kind(), arb_order_id(), arb_payload())
            .prop_map(|(kind, id, payload)| NewEvent::new(kind, id).with_payload(payload))
    }

    /// A script of up to `max_len` events.
    pub fn arb_script(max_len: usize) -> impl Strategy<Value = Vec<NewEvent>> {
        prop::collection::vec(arb_new_event(), 0..=max_len)
    }
}

// Re-export commonly used items
pub use helpers::{record_all, run_script, test_environment, test_ledger};
pub use mocks::{FixedClock, SequentialIdGenerator, SteppingClock, test_clock};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock() {
        let clock = test_clock();
        let time1 = clock.now();
        let time2 = clock.now();
        assert_eq!(time1, time2);
    }

    #[test]
    fn stepping_clock_can_run_backwards() {
        let start = test_clock().now();
        let clock = SteppingClock::new(start, TimeDelta::seconds(-1));

        assert_eq!(clock.now(), start);
        assert_eq!(clock.now(), start - TimeDelta::seconds(1));

        clock.set(start);
        assert_eq!(clock.now(), start);
    }

    #[test]
    fn sequential_ids_count_from_one() {
        let ids = SequentialIdGenerator::new();
        assert_eq!(ids.next_id().as_str(), "order-1");
        assert_eq!(ids.next_id().as_str(), "order-2");
        assert_eq!(SequentialIdGenerator::id_for(3), ids.next_id());
    }
}
