//! Projections: read models derived by folding the event log.
//!
//! # Overview
//!
//! Projections are the **query side** of the ledger. The log answers "what
//! happened"; a projection answers "what is true now" by folding every event,
//! in append order, into a view optimized for lookups.
//!
//! ```text
//! Write side:                    Read side:
//! ┌──────────────────┐  apply   ┌──────────────────┐
//! │  Event log       │ ───────▶ │ OrderProjection  │
//! │  #1 OrderCreated │          │  id → status     │
//! │  #2 OrderPaid    │          └──────────────────┘
//! └──────────────────┘                  ▲
//!          │          replay (rebuild)  │
//!          └────────────────────────────┘
//! ```
//!
//! ## Replay determinism
//!
//! Replaying the full log into an empty projection must give exactly the same
//! read model as applying each event once, as it was appended. Projections
//! therefore never look at anything but the event they are given and their
//! own state.

use crate::event::{OrderEventKind, RecordedEvent};
use crate::state_machine::{OrderStatus, transition};
use crate::stream::{OrderId, Position};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Outcome of applying one event to a projection.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Applied {
    /// The read model changed.
    Changed,
    /// The event did not apply here (a no-op fold).
    NoOp,
}

impl Applied {
    /// Whether the read model changed.
    #[must_use]
    pub const fn is_change(self) -> bool {
        matches!(self, Self::Changed)
    }
}

/// A projection builds and maintains a read model from events.
///
/// # Contract
///
/// - [`apply_event`](Projection::apply_event) is deterministic and
///   infallible. Events that do not apply are no-ops, never errors.
/// - [`rebuild`](Projection::rebuild) returns the projection to its empty
///   state so that a full replay can start from scratch.
pub trait Projection: Send + Sync {
    /// The event type this projection folds.
    type Event;

    /// Projection name, used in logs and metrics.
    fn name(&self) -> &str;

    /// Fold one event into the read model.
    fn apply_event(&mut self, event: &Self::Event) -> Applied;

    /// Drop all projected state.
    fn rebuild(&mut self);

    /// Rebuild from scratch by folding `events` in order.
    ///
    /// Returns how many events changed the read model.
    fn replay<'a, I>(&mut self, events: I) -> usize
    where
        I: IntoIterator<Item = &'a Self::Event>,
        Self::Event: 'a,
    {
        self.rebuild();
        events
            .into_iter()
            .filter(|event| self.apply_event(event).is_change())
            .count()
    }
}

/// Current projected state of one order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Order identifier.
    pub id: OrderId,
    /// Status derived from the order's events.
    pub status: OrderStatus,
}

/// Read model of every order that has been created.
///
/// Orders enter the map only through `OrderCreated` and are never removed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OrderProjection {
    orders: HashMap<OrderId, Order>,
    last_position: Option<Position>,
}

impl OrderProjection {
    /// Name reported by [`Projection::name`].
    pub const NAME: &'static str = "orders";

    /// Create an empty read model.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a read model by folding `events` from empty.
    #[must_use]
    pub fn from_events<'a>(events: impl IntoIterator<Item = &'a RecordedEvent>) -> Self {
        let mut projection = Self::new();
        projection.replay(events);
        projection
    }

    /// Look up one order.
    #[must_use]
    pub fn get(&self, id: &OrderId) -> Option<&Order> {
        self.orders.get(id)
    }

    /// Current status of one order, `None` if it was never created.
    #[must_use]
    pub fn status(&self, id: &OrderId) -> Option<OrderStatus> {
        self.orders.get(id).map(|order| order.status)
    }

    /// Number of orders in the read model.
    #[must_use]
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    /// Whether no order has been created yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Iterate over all orders, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &Order> {
        self.orders.values()
    }

    /// Position of the last event folded in, `None` before the first.
    #[must_use]
    pub const fn last_position(&self) -> Option<Position> {
        self.last_position
    }

    fn fold(&mut self, id: &OrderId, kind: OrderEventKind) -> Applied {
        let current = self.status(id);
        match transition(current, kind) {
            Some(next) if current != Some(next) => {
                self.orders.insert(
                    id.clone(),
                    Order {
                        id: id.clone(),
                        status: next,
                    },
                );
                Applied::Changed
            }
            Some(_) | None => Applied::NoOp,
        }
    }
}

impl Projection for OrderProjection {
    type Event = RecordedEvent;

    fn name(&self) -> &str {
        Self::NAME
    }

    fn apply_event(&mut self, event: &RecordedEvent) -> Applied {
        self.last_position = Some(event.position);
        self.fold(&event.order_id, event.kind)
    }

    fn rebuild(&mut self) {
        self.orders.clear();
        self.last_position = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::NewEvent;
    use chrono::Utc;

    fn recorded(events: Vec<NewEvent>) -> Vec<RecordedEvent> {
        let now = Utc::now();
        events
            .into_iter()
            .enumerate()
            .map(|(i, e)| RecordedEvent::record(e, Position::after(i), now))
            .collect()
    }

    #[test]
    fn created_order_is_pending() {
        let id = OrderId::new("x");
        let mut projection = OrderProjection::new();

        let applied = projection.apply_event(&recorded(vec![NewEvent::created(id.clone())])[0]);

        assert_eq!(applied, Applied::Changed);
        assert_eq!(projection.status(&id), Some(OrderStatus::Pending));
        assert_eq!(projection.last_position(), Some(Position::FIRST));
    }

    #[test]
    fn events_for_unknown_orders_are_no_ops() {
        let id = OrderId::new("ghost");
        let events = recorded(vec![NewEvent::paid(id.clone()), NewEvent::canceled(id.clone())]);
        let mut projection = OrderProjection::new();

        for event in &events {
            assert_eq!(projection.apply_event(event), Applied::NoOp);
        }

        assert!(projection.get(&id).is_none());
        assert!(projection.is_empty());
    }

    #[test]
    fn second_create_keeps_existing_state() {
        let id = OrderId::new("x");
        let events = recorded(vec![
            NewEvent::created(id.clone()),
            NewEvent::paid(id.clone()),
            NewEvent::created(id.clone()),
        ]);

        let projection = OrderProjection::from_events(&events);

        assert_eq!(projection.status(&id), Some(OrderStatus::Paid));
        assert_eq!(projection.len(), 1);
    }

    #[test]
    fn replay_equals_incremental_application() {
        let a = OrderId::new("a");
        let b = OrderId::new("b");
        let events = recorded(vec![
            NewEvent::created(a.clone()),
            NewEvent::created(b.clone()),
            NewEvent::canceled(a.clone()),
            NewEvent::paid(a),
            NewEvent::paid(b),
            NewEvent::paid(OrderId::new("c")),
        ]);

        let mut live = OrderProjection::new();
        for event in &events {
            live.apply_event(event);
        }
        let replayed = OrderProjection::from_events(&events);

        assert_eq!(live, replayed);
    }

    #[test]
    fn replay_discards_previous_state() {
        let mut projection = OrderProjection::new();
        let first = recorded(vec![NewEvent::created(OrderId::new("old"))]);
        projection.replay(&first);

        let changed = projection.replay(&recorded(vec![NewEvent::created(OrderId::new("new"))]));

        assert_eq!(changed, 1);
        assert!(projection.get(&OrderId::new("old")).is_none());
        assert!(projection.get(&OrderId::new("new")).is_some());
    }
}
