//! The order lifecycle as a pure transition function.
//!
//! ```text
//!               OrderCreated
//!   (absent) ────────────────▶ PENDING ──OrderPaid──────▶ PAID
//!                                 │
//!                                 └──────OrderCanceled──▶ CANCELED
//! ```
//!
//! Every other combination is a no-op fold: the input state comes back
//! unchanged and nothing is reported as an error. An event for an order that
//! was never created therefore never brings that order into existence.

use crate::event::OrderEventKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of an order, derived only by folding its events.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Created and awaiting payment or cancellation.
    Pending,
    /// Paid. Settled; no further transitions.
    Paid,
    /// Canceled. Terminal.
    Canceled,
}

impl OrderStatus {
    /// Wire name of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Paid => "PAID",
            Self::Canceled => "CANCELED",
        }
    }

    /// Whether no event can move the order out of this status.
    #[must_use]
    pub const fn is_final(self) -> bool {
        matches!(self, Self::Paid | Self::Canceled)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fold one event into the current status of an order.
///
/// `current` is `None` when the order has never been created. The function
/// is total and pure: it depends only on its arguments, so the same history
/// always folds to the same status.
///
/// # Examples
///
/// ```
/// use order_ledger_core::event::OrderEventKind;
/// use order_ledger_core::state_machine::{transition, OrderStatus};
///
/// let pending = transition(None, OrderEventKind::OrderCreated);
/// assert_eq!(pending, Some(OrderStatus::Pending));
///
/// let paid = transition(pending, OrderEventKind::OrderPaid);
/// assert_eq!(paid, Some(OrderStatus::Paid));
///
/// // No way out of a settled order
/// assert_eq!(transition(paid, OrderEventKind::OrderCanceled), paid);
///
/// // Payment for an unknown order does not create it
/// assert_eq!(transition(None, OrderEventKind::OrderPaid), None);
/// ```
#[must_use]
pub const fn transition(current: Option<OrderStatus>, kind: OrderEventKind) -> Option<OrderStatus> {
    match (current, kind) {
        (None, OrderEventKind::OrderCreated) => Some(OrderStatus::Pending),
        (Some(OrderStatus::Pending), OrderEventKind::OrderPaid) => Some(OrderStatus::Paid),
        (Some(OrderStatus::Pending), OrderEventKind::OrderCanceled) => Some(OrderStatus::Canceled),
        // A second create keeps whatever the first one started.
        (Some(_), OrderEventKind::OrderCreated)
        | (None, OrderEventKind::OrderPaid | OrderEventKind::OrderCanceled)
        | (
            Some(OrderStatus::Paid | OrderStatus::Canceled),
            OrderEventKind::OrderPaid | OrderEventKind::OrderCanceled,
        ) => current,
    }
}

/// Fold a whole history of event kinds from the absent state.
#[must_use]
pub fn fold<I>(kinds: I) -> Option<OrderStatus>
where
    I: IntoIterator<Item = OrderEventKind>,
{
    kinds.into_iter().fold(None, transition)
}
