//! Application state for Axum handlers.

use order_ledger_runtime::Ledger;
use order_ledger_runtime::metrics::MetricsRecorder;

/// Application state shared across all HTTP handlers.
///
/// Cloned for each request; both fields are cheap handles onto shared state.
#[derive(Clone)]
pub struct AppState {
    /// The order ledger (commands and queries).
    pub ledger: Ledger,

    /// Installed Prometheus recorder, `None` when metrics are disabled.
    pub metrics: Option<MetricsRecorder>,
}

impl AppState {
    /// Create state serving `ledger`, with metrics disabled.
    #[must_use]
    pub const fn new(ledger: Ledger) -> Self {
        Self {
            ledger,
            metrics: None,
        }
    }

    /// Serve metrics from `recorder` at `GET /metrics`.
    #[must_use]
    pub fn with_metrics(mut self, recorder: MetricsRecorder) -> Self {
        self.metrics = Some(recorder);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use order_ledger_runtime::LedgerEnvironment;

    #[test]
    fn test_state_is_clone() {
        // Ensure AppState implements Clone (required for Axum)
        fn assert_clone<T: Clone>() {}
        assert_clone::<AppState>();
    }

    #[test]
    fn test_metrics_disabled_by_default() {
        let state = AppState::new(Ledger::new(LedgerEnvironment::production()));
        assert!(state.metrics.is_none());

        let state = state.with_metrics(MetricsRecorder::new());
        assert!(state.metrics.is_some());
    }
}
