//! Order identification and log positions.
//!
//! This module defines strong types for order identification (`OrderId`)
//! and for the sequence number an event receives when it is appended to the
//! log (`Position`).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error type for `OrderId` parsing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid order ID: {0}")]
pub struct ParseOrderIdError(String);

/// Opaque identifier of an order.
///
/// Assigned once when the order is created and stable for the order's
/// lifetime. The ledger never interprets its contents.
///
/// # Validation
///
/// - `FromStr::from_str()`: Validates input (rejects empty strings)
/// - `From::from()` and `new()`: No validation (for ids minted by the ledger)
///
/// # Examples
///
/// ```
/// use order_ledger_core::stream::OrderId;
///
/// let id = OrderId::new("order-12345");
/// assert_eq!(id.as_str(), "order-12345");
///
/// let parsed: OrderId = "order-abc".parse().unwrap();
/// assert_eq!(parsed, OrderId::new("order-abc"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(String);

impl OrderId {
    /// Create a new `OrderId` from a string.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the order ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert the `OrderId` into its inner `String`.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for OrderId {
    type Err = ParseOrderIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(ParseOrderIdError("Order ID cannot be empty".to_string()));
        }
        Ok(Self(s.to_string()))
    }
}

impl From<String> for OrderId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for OrderId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for OrderId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Sequence number of an event in the log.
///
/// Positions start at 1 for the first appended event and increase by exactly
/// one per append, so the position of the last event always equals the
/// number of events in the log. A position, once assigned, never changes.
///
/// # Examples
///
/// ```
/// use order_ledger_core::stream::Position;
///
/// let first = Position::FIRST;
/// assert_eq!(first.value(), 1);
/// assert_eq!(first.next(), Position::new(2));
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Position(u64);

impl Position {
    /// Position of the first event ever appended.
    pub const FIRST: Self = Self(1);

    /// Create a new `Position` with the given value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Get the raw sequence number.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Get the position that follows this one.
    ///
    /// Saturates at `u64::MAX`; a log never gets that long.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// Position for a log that already holds `len` events.
    #[must_use]
    pub const fn after(len: usize) -> Self {
        Self((len as u64).saturating_add(1))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Position {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<Position> for u64 {
    fn from(position: Position) -> Self {
        position.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn order_id_rejects_empty_input() {
        let result: Result<OrderId, _> = "".parse();
        assert!(result.is_err());
    }

    #[test]
    fn order_id_display_is_raw_string() {
        let id = OrderId::new("6f1c2a");
        assert_eq!(id.to_string(), "6f1c2a");
        assert_eq!(id.into_inner(), "6f1c2a");
    }

    #[test]
    fn position_after_len_is_next_free_slot() {
        assert_eq!(Position::after(0), Position::FIRST);
        assert_eq!(Position::after(41), Position::new(42));
    }

    #[test]
    fn positions_are_ordered() {
        let p1 = Position::FIRST;
        let p2 = p1.next();
        assert!(p1 < p2);
        assert_eq!(u64::from(p2), 2);
    }

    #[test]
    fn serializes_transparently() {
        let json = serde_json::to_string(&OrderId::new("o-1")).unwrap();
        assert_eq!(json, "\"o-1\"");
        let json = serde_json::to_string(&Position::new(7)).unwrap();
        assert_eq!(json, "7");
    }
}
