//! Prometheus metrics for the ledger.
//!
//! Metrics are recorded through the `metrics` facade, so recording is a
//! no-op until a recorder is installed. The server installs the Prometheus
//! recorder at startup and the web layer renders it at `GET /metrics`.
//!
//! # Example
//!
//! ```rust,no_run
//! use order_ledger_runtime::metrics::MetricsRecorder;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut recorder = MetricsRecorder::new();
//! recorder.install()?;
//!
//! if let Some(text) = recorder.render() {
//!     println!("{text}");
//! }
//! # Ok(())
//! # }
//! ```

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use order_ledger_core::OrderEventKind;
use std::time::Duration;
use thiserror::Error;

/// Errors from metrics operations.
#[derive(Error, Debug)]
pub enum MetricsError {
    /// Failed to build metrics exporter
    #[error("Failed to build metrics exporter: {0}")]
    Build(String),
    /// Failed to install metrics exporter
    #[error("Failed to install metrics exporter: {0}")]
    Install(String),
}

/// Installs the Prometheus recorder and renders its contents.
#[derive(Clone, Default)]
pub struct MetricsRecorder {
    handle: Option<PrometheusHandle>,
}

impl MetricsRecorder {
    /// Create a recorder that has not been installed yet.
    #[must_use]
    pub const fn new() -> Self {
        Self { handle: None }
    }

    /// Install the global recorder and register metric descriptions with it.
    ///
    /// # Errors
    ///
    /// Returns `MetricsError` if the exporter cannot be built or installed.
    ///
    /// # Note
    ///
    /// If a recorder is already installed (e.g., by another test), this logs
    /// a warning and succeeds without a handle.
    pub fn install(&mut self) -> Result<(), MetricsError> {
        let builder = PrometheusBuilder::new()
            .set_buckets_for_metric(
                Matcher::Suffix("duration_seconds".to_string()),
                &[0.000_1, 0.000_5, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0],
            )
            .map_err(|e| MetricsError::Build(e.to_string()))?;

        match builder.install_recorder() {
            Ok(handle) => {
                self.handle = Some(handle);
                register_metrics();
                tracing::info!("Prometheus metrics recorder installed");
                Ok(())
            }
            Err(e) => {
                let err_msg = e.to_string();
                if err_msg.contains("already initialized") {
                    tracing::warn!("Metrics recorder already initialized, skipping re-initialization");
                    Ok(())
                } else {
                    Err(MetricsError::Install(err_msg))
                }
            }
        }
    }

    /// Render current metrics in Prometheus format.
    ///
    /// Returns `None` if this recorder was never installed.
    #[must_use]
    pub fn render(&self) -> Option<String> {
        self.handle.as_ref().map(PrometheusHandle::render)
    }
}

/// Register all metric descriptions.
fn register_metrics() {
    describe_counter!(
        "ledger_events_appended_total",
        "Total number of events appended to the log"
    );
    describe_counter!(
        "ledger_append_failures_total",
        "Total number of appends refused by the log"
    );
    describe_counter!(
        "ledger_projection_noop_total",
        "Events recorded in the log that did not change the read model"
    );
    describe_gauge!("ledger_log_length", "Number of events in the log");
    describe_counter!(
        "ledger_replay_events_total",
        "Total number of events folded during full replays"
    );
    describe_histogram!(
        "ledger_replay_duration_seconds",
        "Time taken to rebuild the read model from the log"
    );
}

/// Ledger metrics recorder.
pub struct LedgerMetrics;

impl LedgerMetrics {
    /// Record a successful append.
    #[allow(clippy::cast_precision_loss)] // log length fits comfortably in f64 for a gauge
    pub fn record_append(kind: OrderEventKind, log_len: usize) {
        counter!("ledger_events_appended_total", "event_type" => kind.event_type()).increment(1);
        gauge!("ledger_log_length").set(log_len as f64);
    }

    /// Record an append the log refused.
    pub fn record_append_failure() {
        counter!("ledger_append_failures_total").increment(1);
    }

    /// Record an event that folded as a no-op.
    pub fn record_noop(kind: OrderEventKind) {
        counter!("ledger_projection_noop_total", "event_type" => kind.event_type()).increment(1);
    }

    /// Record a full replay of the log.
    pub fn record_replay(count: usize, duration: Duration) {
        counter!("ledger_replay_events_total").increment(count as u64);
        histogram!("ledger_replay_duration_seconds").record(duration.as_secs_f64());
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn recorder_starts_without_handle() {
        let recorder = MetricsRecorder::new();
        assert!(recorder.render().is_none());
    }

    #[test]
    fn recorder_renders_ledger_metrics() {
        let mut recorder = MetricsRecorder::new();
        recorder.install().unwrap();

        LedgerMetrics::record_append(OrderEventKind::OrderCreated, 1);
        LedgerMetrics::record_noop(OrderEventKind::OrderPaid);
        LedgerMetrics::record_replay(3, Duration::from_millis(2));

        // The only test in this binary that installs the global recorder.
        let rendered = recorder.render().unwrap();
        assert!(rendered.contains("# HELP ledger_events_appended_total"));
        assert!(rendered.contains("# HELP ledger_log_length"));
        assert!(rendered.contains("ledger_projection_noop_total"));
        assert!(rendered.contains("ledger_replay_duration_seconds"));
    }
}
