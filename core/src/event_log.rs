//! The append-only event log.
//!
//! The log is the source of truth: an ordered sequence of [`RecordedEvent`]s
//! where each position is assigned exactly once, in acceptance order, with no
//! gaps and no reordering.
//!
//! # Implementations
//!
//! - [`InMemoryEventLog`]: the log used by the ledger. Unbounded by default;
//!   [`InMemoryEventLog::with_capacity`] gives a bounded variant that refuses
//!   appends with [`EventLogError::StoreUnavailable`] once full.
//!
//! # Design
//!
//! The trait takes `&mut self` for appends. Mutual exclusion between appends
//! (and between appends and reads) is the owner's job; the runtime `Ledger`
//! keeps the log and the read model behind one lock so that "append + project"
//! is a single atomic unit.
//!
//! # Example
//!
//! ```
//! use chrono::Utc;
//! use order_ledger_core::event::NewEvent;
//! use order_ledger_core::event_log::{EventLog, InMemoryEventLog};
//! use order_ledger_core::stream::{OrderId, Position};
//!
//! let mut log = InMemoryEventLog::new();
//! let recorded = log
//!     .append(NewEvent::created(OrderId::new("order-1")), Utc::now())
//!     .unwrap();
//!
//! assert_eq!(recorded.position, Position::FIRST);
//! assert_eq!(log.all().len(), 1);
//! ```

use crate::event::{NewEvent, RecordedEvent};
use crate::stream::Position;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors that can occur during event log operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EventLogError {
    /// The log cannot accept the event right now.
    ///
    /// The event was not stored and no position was consumed.
    #[error("Event store unavailable: {0}")]
    StoreUnavailable(String),

    /// Restored events are not numbered 1, 2, 3, ... in order.
    #[error("Out of sequence event: expected position {expected}, found {found}")]
    OutOfSequence {
        /// Position the event should have held
        expected: Position,
        /// Position the event actually carries
        found: Position,
    },
}

/// Append-only, totally ordered store of events.
///
/// No deletion or mutation operation exists.
pub trait EventLog: Send + Sync {
    /// Append an event at the next sequential position.
    ///
    /// `timestamp` is the acceptance time chosen by the store owner, never by
    /// the submitter of the event.
    ///
    /// # Errors
    ///
    /// - `StoreUnavailable`: the event could not be stored. Nothing was
    ///   written and the next append will get the same position.
    fn append(
        &mut self,
        event: NewEvent,
        timestamp: DateTime<Utc>,
    ) -> Result<RecordedEvent, EventLogError>;

    /// Every appended event, in append order.
    fn all(&self) -> Vec<RecordedEvent>;

    /// Number of events in the log.
    fn len(&self) -> usize;

    /// Whether the log holds no events.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The most recently appended event, if any.
    fn last(&self) -> Option<&RecordedEvent>;

    /// Position the next successful append will receive.
    fn next_position(&self) -> Position {
        Position::after(self.len())
    }
}

/// In-memory event log backed by a `Vec`.
#[derive(Clone, Debug, Default)]
pub struct InMemoryEventLog {
    events: Vec<RecordedEvent>,
    capacity: Option<usize>,
}

impl InMemoryEventLog {
    /// Create an empty, unbounded log.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            events: Vec::new(),
            capacity: None,
        }
    }

    /// Create an empty log that refuses appends beyond `capacity` events.
    #[must_use]
    pub const fn with_capacity(capacity: usize) -> Self {
        Self {
            events: Vec::new(),
            capacity: Some(capacity),
        }
    }

    /// Rebuild a log from events recorded earlier, e.g. by another process.
    ///
    /// Events keep the positions, timestamps and payloads they were
    /// recorded with.
    ///
    /// # Errors
    ///
    /// - `OutOfSequence`: the events are not numbered gaplessly from 1.
    pub fn from_recorded(
        events: impl IntoIterator<Item = RecordedEvent>,
    ) -> Result<Self, EventLogError> {
        let events: Vec<RecordedEvent> = events.into_iter().collect();
        for (index, event) in events.iter().enumerate() {
            let expected = Position::after(index);
            if event.position != expected {
                return Err(EventLogError::OutOfSequence {
                    expected,
                    found: event.position,
                });
            }
        }
        Ok(Self {
            events,
            capacity: None,
        })
    }

    /// Configured capacity, `None` when unbounded.
    #[must_use]
    pub const fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    /// Borrow the recorded events without cloning.
    #[must_use]
    pub fn as_slice(&self) -> &[RecordedEvent] {
        &self.events
    }
}

impl EventLog for InMemoryEventLog {
    fn append(
        &mut self,
        event: NewEvent,
        timestamp: DateTime<Utc>,
    ) -> Result<RecordedEvent, EventLogError> {
        if let Some(capacity) = self.capacity {
            if self.events.len() >= capacity {
                return Err(EventLogError::StoreUnavailable(format!(
                    "log is full ({capacity} events)"
                )));
            }
        }

        let recorded = RecordedEvent::record(event, self.next_position(), timestamp);
        self.events.push(recorded.clone());
        Ok(recorded)
    }

    fn all(&self) -> Vec<RecordedEvent> {
        self.events.clone()
    }

    fn len(&self) -> usize {
        self.events.len()
    }

    fn last(&self) -> Option<&RecordedEvent> {
        self.events.last()
    }
}
