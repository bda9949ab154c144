//! Order ledger HTTP server.
//!
//! Event-sourced order ledger: an append-only event log with a synchronous,
//! replayable read model, served over HTTP.

mod config;

use anyhow::Context as _;
use config::{Config, LogFormat};
use order_ledger_core::InMemoryEventLog;
use order_ledger_runtime::metrics::MetricsRecorder;
use order_ledger_runtime::{Ledger, LedgerEnvironment};
use order_ledger_web::{AppState, build_router};
use std::future::IntoFuture;
use std::time::Duration;
use tokio::signal;
use tokio::sync::oneshot;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("Failed to load configuration")?;
    init_tracing(&config)?;

    info!(
        address = %config.bind_address(),
        log_format = %config.log_format,
        event_log_capacity = ?config.event_log_capacity,
        metrics_enabled = config.metrics_enabled,
        "Starting order ledger server"
    );

    let metrics = if config.metrics_enabled {
        let mut recorder = MetricsRecorder::new();
        recorder
            .install()
            .context("Failed to install metrics recorder")?;
        Some(recorder)
    } else {
        None
    };

    // Replays any existing events before the first request is served.
    let log = config
        .event_log_capacity
        .map_or_else(InMemoryEventLog::new, InMemoryEventLog::with_capacity);
    let ledger = Ledger::with_log(log, LedgerEnvironment::production());

    let mut state = AppState::new(ledger);
    if let Some(recorder) = metrics {
        state = state.with_metrics(recorder);
    }
    let app = build_router(state);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Server listening on {}", addr);

    let (signalled_tx, signalled_rx) = oneshot::channel();
    let shutdown = async move {
        shutdown_signal().await;
        let _ = signalled_tx.send(());
    };
    let server = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .into_future();

    tokio::select! {
        result = server => result.context("Server error")?,
        () = shutdown_deadline(signalled_rx, config.shutdown_timeout()) => {
            warn!(
                timeout_secs = config.shutdown_timeout,
                "Graceful shutdown timed out, dropping open connections"
            );
        }
    }

    info!("Server stopped");
    Ok(())
}

/// Install the global tracing subscriber.
fn init_tracing(config: &Config) -> anyhow::Result<()> {
    let filter = EnvFilter::try_new(&config.log_level)
        .with_context(|| format!("Invalid RUST_LOG directives: {}", config.log_level))?;

    let registry = tracing_subscriber::registry().with(filter);
    match config.log_format {
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).try_init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init(),
    }
    .context("Failed to install tracing subscriber")
}

/// Resolves `timeout` after the shutdown signal fired; never resolves otherwise.
async fn shutdown_deadline(signalled: oneshot::Receiver<()>, timeout: Duration) {
    if signalled.await.is_err() {
        std::future::pending::<()>().await;
    }
    tokio::time::sleep(timeout).await;
}

/// Graceful shutdown signal handler.
///
/// Waits for:
/// - Ctrl+C (SIGINT)
/// - SIGTERM (in production environments)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C signal, shutting down gracefully...");
        },
        () = terminate => {
            info!("Received SIGTERM signal, shutting down gracefully...");
        },
    }
}
