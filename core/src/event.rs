//! Order events: the immutable facts recorded in the log.
//!
//! A caller describes what happened with a [`NewEvent`]. The log turns it into
//! a [`RecordedEvent`] by assigning a position and an acceptance timestamp.
//! Recorded events are never mutated or removed.
//!
//! # Example
//!
//! ```
//! use order_ledger_core::event::{NewEvent, OrderEventKind};
//! use order_ledger_core::stream::OrderId;
//!
//! let event = NewEvent::new(OrderEventKind::OrderPaid, OrderId::new("order-1"));
//! assert_eq!(event.kind.event_type(), "OrderPaid");
//! assert!(event.payload.is_empty());
//! ```

use crate::stream::{OrderId, Position};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of fact an event records.
///
/// Closed set: adding a lifecycle stage is a compile-time-checked change in
/// the state machine.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderEventKind {
    /// A new order was opened.
    OrderCreated,
    /// The order was paid.
    OrderPaid,
    /// The order was canceled.
    OrderCanceled,
}

impl OrderEventKind {
    /// Every kind, in declaration order.
    pub const ALL: [Self; 3] = [Self::OrderCreated, Self::OrderPaid, Self::OrderCanceled];

    /// Stable identifier of this kind, used in logs, metrics and on the wire.
    #[must_use]
    pub const fn event_type(self) -> &'static str {
        match self {
            Self::OrderCreated => "OrderCreated",
            Self::OrderPaid => "OrderPaid",
            Self::OrderCanceled => "OrderCanceled",
        }
    }
}

impl fmt::Display for OrderEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.event_type())
    }
}

/// Opaque, type-specific auxiliary data carried by an event.
///
/// The ledger never inspects these bytes; they are stored and returned
/// exactly as given.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Payload(Vec<u8>);

impl Payload {
    /// The empty payload used by every command in this domain.
    #[must_use]
    pub const fn empty() -> Self {
        Self(Vec::new())
    }

    /// Wrap raw bytes.
    #[must_use]
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Borrow the raw bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Number of bytes carried.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the payload carries no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Take back the raw bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

/// An event submitted for appending.
///
/// It has no timestamp and no position yet; both are assigned by the log at
/// acceptance time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewEvent {
    /// What happened.
    pub kind: OrderEventKind,
    /// The order it happened to.
    pub order_id: OrderId,
    /// Opaque auxiliary data.
    pub payload: Payload,
}

impl NewEvent {
    /// Build an event with an empty payload.
    #[must_use]
    pub const fn new(kind: OrderEventKind, order_id: OrderId) -> Self {
        Self {
            kind,
            order_id,
            payload: Payload::empty(),
        }
    }

    /// Replace the payload.
    #[must_use]
    pub fn with_payload(mut self, payload: Payload) -> Self {
        self.payload = payload;
        self
    }

    /// Shorthand for an `OrderCreated` event.
    #[must_use]
    pub const fn created(order_id: OrderId) -> Self {
        Self::new(OrderEventKind::OrderCreated, order_id)
    }

    /// Shorthand for an `OrderPaid` event.
    #[must_use]
    pub const fn paid(order_id: OrderId) -> Self {
        Self::new(OrderEventKind::OrderPaid, order_id)
    }

    /// Shorthand for an `OrderCanceled` event.
    #[must_use]
    pub const fn canceled(order_id: OrderId) -> Self {
        Self::new(OrderEventKind::OrderCanceled, order_id)
    }
}

/// An event as stored in the log.
///
/// Serialized as `{"type", "order_id", "position", "timestamp", "data"}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedEvent {
    /// What happened.
    #[serde(rename = "type")]
    pub kind: OrderEventKind,
    /// The order it happened to.
    pub order_id: OrderId,
    /// Sequence number assigned by the log.
    pub position: Position,
    /// When the log accepted the event.
    pub timestamp: DateTime<Utc>,
    /// Opaque auxiliary data, untouched by the ledger.
    #[serde(rename = "data")]
    pub payload: Payload,
}

impl RecordedEvent {
    /// Seal a submitted event with its position and acceptance time.
    #[must_use]
    pub fn record(event: NewEvent, position: Position, timestamp: DateTime<Utc>) -> Self {
        Self {
            kind: event.kind,
            order_id: event.order_id,
            position,
            timestamp,
            payload: event.payload,
        }
    }
}

impl fmt::Display for RecordedEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} {} {{ order: {}, payload: {} bytes }}",
            self.position,
            self.kind,
            self.order_id,
            self.payload.len()
        )
    }
}
