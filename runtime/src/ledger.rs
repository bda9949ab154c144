//! The ledger: event log and read model behind one critical section.

use crate::error::LedgerError;
use crate::metrics::LedgerMetrics;
use order_ledger_core::environment::{Clock, IdGenerator, SystemClock, UuidIdGenerator};
use order_ledger_core::{
    Applied, EventLog, InMemoryEventLog, NewEvent, Order, OrderId, OrderProjection, Position,
    Projection, RecordedEvent,
};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;

/// Injected dependencies of a [`Ledger`].
#[derive(Clone)]
pub struct LedgerEnvironment {
    /// Source of acceptance timestamps.
    pub clock: Arc<dyn Clock>,
    /// Source of fresh order identifiers.
    pub ids: Arc<dyn IdGenerator>,
}

impl LedgerEnvironment {
    /// Create an environment from explicit collaborators.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, ids: Arc<dyn IdGenerator>) -> Self {
        Self { clock, ids }
    }

    /// Wall-clock time and random UUID identifiers.
    #[must_use]
    pub fn production() -> Self {
        Self::new(Arc::new(SystemClock), Arc::new(UuidIdGenerator))
    }
}

impl Default for LedgerEnvironment {
    fn default() -> Self {
        Self::production()
    }
}

/// Counters reported by [`Ledger::stats`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LedgerStats {
    /// Events in the log.
    pub events: usize,
    /// Orders in the read model.
    pub orders: usize,
}

/// Everything guarded by the ledger's lock.
struct LedgerState<L> {
    log: L,
    orders: OrderProjection,
}

/// The order ledger.
///
/// The Ledger manages:
/// 1. The event log (source of truth)
/// 2. The order read model (derived by folding the log)
/// 3. The environment (clock and identifier generator)
///
/// Log and read model live behind a single `RwLock`. An append takes the
/// write guard, stores the event, folds exactly that event into the read
/// model and only then releases the guard, so no reader ever sees the log
/// and the read model disagree. Acquisition order of the write guard is the
/// total order of the log.
///
/// Cloning a `Ledger` is cheap and yields another handle to the same state.
///
/// # Example
///
/// ```
/// use order_ledger_runtime::{Ledger, LedgerEnvironment};
/// use order_ledger_core::OrderStatus;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let ledger = Ledger::new(LedgerEnvironment::production());
///
/// let id = ledger.create_order().await?;
/// ledger.pay_order(id.clone()).await?;
///
/// let order = ledger.order(&id).await?;
/// assert_eq!(order.status, OrderStatus::Paid);
/// # Ok(())
/// # }
/// ```
pub struct Ledger<L = InMemoryEventLog> {
    state: Arc<RwLock<LedgerState<L>>>,
    environment: LedgerEnvironment,
}

impl<L> Clone for Ledger<L> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            environment: self.environment.clone(),
        }
    }
}

impl Ledger<InMemoryEventLog> {
    /// Create a ledger over an empty, unbounded in-memory log.
    #[must_use]
    pub fn new(environment: LedgerEnvironment) -> Self {
        Self::with_log(InMemoryEventLog::new(), environment)
    }
}

impl<L: EventLog> Ledger<L> {
    /// Create a ledger over an existing log.
    ///
    /// Any events already in the log are replayed into a fresh read model
    /// before the ledger is returned, so the first query sees the same state
    /// a long-running ledger would have built incrementally.
    #[must_use]
    pub fn with_log(log: L, environment: LedgerEnvironment) -> Self {
        let started = Instant::now();
        let events = log.all();
        let orders = OrderProjection::from_events(&events);
        LedgerMetrics::record_replay(events.len(), started.elapsed());

        tracing::info!(
            events = events.len(),
            orders = orders.len(),
            "Replayed event log into read model"
        );

        Self {
            state: Arc::new(RwLock::new(LedgerState { log, orders })),
            environment,
        }
    }

    /// Append an event and project it, as one atomic unit.
    ///
    /// The store assigns the position and the acceptance timestamp.
    /// Timestamps never go backwards along the log: if the clock reads
    /// earlier than the previous event, the previous timestamp is reused.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::StoreUnavailable`]: the log refused the event. Neither
    ///   the log nor the read model changed.
    pub async fn append(&self, event: NewEvent) -> Result<RecordedEvent, LedgerError> {
        let mut state = self.state.write().await;

        let now = self.environment.clock.now();
        let timestamp = state
            .log
            .last()
            .map_or(now, |previous| previous.timestamp.max(now));
        let kind = event.kind;

        let recorded = match state.log.append(event, timestamp) {
            Ok(recorded) => recorded,
            Err(error) => {
                LedgerMetrics::record_append_failure();
                tracing::warn!(event_type = %kind, error = %error, "Append refused by event log");
                return Err(error.into());
            }
        };

        let applied = state.orders.apply_event(&recorded);
        LedgerMetrics::record_append(kind, state.log.len());
        if applied == Applied::NoOp {
            LedgerMetrics::record_noop(kind);
        }

        tracing::debug!(
            position = %recorded.position,
            event_type = %recorded.kind,
            order_id = %recorded.order_id,
            changed = applied.is_change(),
            "Event appended and projected"
        );

        Ok(recorded)
    }

    /// Open a new order under a freshly minted identifier.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::StoreUnavailable`]: the event could not be stored.
    #[tracing::instrument(skip(self), name = "create_order")]
    pub async fn create_order(&self) -> Result<OrderId, LedgerError> {
        let order_id = self.environment.ids.next_id();
        let recorded = self.append(NewEvent::created(order_id.clone())).await?;
        tracing::info!(order_id = %order_id, position = %recorded.position, "Order created");
        Ok(order_id)
    }

    /// Record that an order was paid.
    ///
    /// Accepted unconditionally: the order's existence and status are not
    /// checked. A payment that does not apply is kept in the log and folds as
    /// a no-op. Returns the position the event received.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::StoreUnavailable`]: the event could not be stored.
    #[tracing::instrument(skip(self, order_id), name = "pay_order", fields(order_id = %order_id))]
    pub async fn pay_order(&self, order_id: OrderId) -> Result<Position, LedgerError> {
        let recorded = self.append(NewEvent::paid(order_id)).await?;
        tracing::info!(position = %recorded.position, "Order payment recorded");
        Ok(recorded.position)
    }

    /// Record that an order was canceled.
    ///
    /// Accepted unconditionally, like [`pay_order`](Self::pay_order).
    ///
    /// # Errors
    ///
    /// - [`LedgerError::StoreUnavailable`]: the event could not be stored.
    #[tracing::instrument(skip(self, order_id), name = "cancel_order", fields(order_id = %order_id))]
    pub async fn cancel_order(&self, order_id: OrderId) -> Result<Position, LedgerError> {
        let recorded = self.append(NewEvent::canceled(order_id)).await?;
        tracing::info!(position = %recorded.position, "Order cancellation recorded");
        Ok(recorded.position)
    }

    /// Current projected state of one order.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::NotFound`]: no `OrderCreated` event exists for `order_id`.
    pub async fn order(&self, order_id: &OrderId) -> Result<Order, LedgerError> {
        let state = self.state.read().await;
        state
            .orders
            .get(order_id)
            .cloned()
            .ok_or_else(|| LedgerError::NotFound(order_id.clone()))
    }

    /// The full event history, in append order.
    pub async fn history(&self) -> Vec<RecordedEvent> {
        self.state.read().await.log.all()
    }

    /// A copy of the whole read model.
    pub async fn read_model(&self) -> OrderProjection {
        self.state.read().await.orders.clone()
    }

    /// Event and order counts, read under one guard.
    pub async fn stats(&self) -> LedgerStats {
        let state = self.state.read().await;
        LedgerStats {
            events: state.log.len(),
            orders: state.orders.len(),
        }
    }

    /// Rebuild the read model from the log.
    ///
    /// Holds the write guard for the whole replay, so appends wait and
    /// queries never see a half-built model. Returns the number of events
    /// that changed the read model.
    pub async fn rebuild(&self) -> usize {
        let mut state = self.state.write().await;
        let started = Instant::now();

        let events = state.log.all();
        let changed = state.orders.replay(&events);
        LedgerMetrics::record_replay(events.len(), started.elapsed());

        tracing::info!(
            events = events.len(),
            changed,
            orders = state.orders.len(),
            "Rebuilt read model from event log"
        );
        changed
    }

    /// Check that replaying the log from empty gives the live read model.
    pub async fn verify_replay(&self) -> bool {
        let state = self.state.read().await;
        let replayed = OrderProjection::from_events(&state.log.all());
        let consistent = replayed == state.orders;
        if !consistent {
            tracing::error!(
                live_orders = state.orders.len(),
                replayed_orders = replayed.len(),
                "Read model diverged from event log replay"
            );
        }
        consistent
    }
}
