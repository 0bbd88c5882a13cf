//! Strangler proxy demo.
//!
//! Wires the proxy over scripted backends and runs bookings through the
//! configured strategy.
//!
//! ```text
//!                      ┌──────────────────────────────────────────┐
//!                      │            ReservationProxy              │
//!   book_apartments()  │  ┌──────────┐                            │
//!   ───────────────────┼─▶│ Strategy │──▶ feature_flag ──┐        │
//!                      │  │ (config) │──▶ dual_run ──────┼──────┐ │
//!                      │  └──────────┘──▶ retry_fallback│      │ │
//!                      │                    │            │      │ │
//!                      │                    ▼            ▼      ▼ │
//!                      │              ┌──────────┐  ┌──────────┐  │
//!                      │              │   new    │  │  legacy  │  │
//!                      │              │accommoda-│  │reserva-  │  │
//!                      │              │tion API  │  │tion svc  │  │
//!                      │              └──────────┘  └──────────┘  │
//!                      └──────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use futures_util::future::join_all;
use serde::Serialize;

use strangler_proxy::config::{load_config, ConfigWatcher, ProxyConfig};
use strangler_proxy::lifecycle::{signals, startup, CancelSignal};
use strangler_proxy::observability;
use strangler_proxy::routing::{ComparisonSummary, Strategy, Target};
use strangler_proxy::{ProxyError, ReservationProxy};

#[derive(Parser)]
#[command(name = "strangler-proxy")]
#[command(about = "Route bookings between a new and a legacy backend", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the configured strategy.
    #[arg(short, long, value_enum)]
    strategy: Option<Strategy>,

    /// Concurrent bookings per batch.
    #[arg(short, long, default_value_t = 1)]
    bookings: usize,

    /// Keep running batches and reload the config file on change until Ctrl+C.
    #[arg(short, long)]
    watch: bool,

    /// Pause between batches in watch mode, in milliseconds.
    #[arg(long, default_value_t = 1000)]
    interval_ms: u64,
}

#[derive(Debug, Default, Serialize)]
struct BatchSummary {
    strategy: String,
    bookings: usize,
    handled_by_new: usize,
    handled_by_legacy: usize,
    failed: usize,
    cancelled: usize,
    accommodation_calls: usize,
    reservation_calls: usize,
    comparisons: ComparisonSummary,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ProxyConfig::default(),
    };
    if let Some(strategy) = cli.strategy {
        config.strategy = strategy;
    }

    observability::logging::init(&config.observability.log_level);
    tracing::info!("strangler-proxy v0.1.0 starting");

    if config.observability.metrics_enabled {
        let addr = config.observability.metrics_address.parse()?;
        observability::metrics::init_metrics(addr);
    }

    let wiring = startup::build(&config);
    let proxy = Arc::new(wiring.proxy);

    let cancel = CancelSignal::new();
    tokio::spawn(signals::cancel_on_ctrl_c(cancel.clone()));

    // Keep the watcher alive for the whole run.
    let _watcher = match (&cli.config, cli.watch) {
        (Some(path), true) => {
            let (watcher, mut updates) = ConfigWatcher::new(path, config.clone());
            let watcher = watcher.run()?;
            let proxy = proxy.clone();
            tokio::spawn(async move {
                while let Some(new_config) = updates.recv().await {
                    proxy.apply_config(&new_config);
                }
            });
            Some(watcher)
        }
        _ => None,
    };

    loop {
        let results = join_all((0..cli.bookings).map(|_| proxy.book_apartments_until(&cancel))).await;

        let mut summary = summarize(&proxy, &results);
        summary.accommodation_calls = wiring.accommodation.calls();
        summary.reservation_calls = wiring.reservation.calls();
        println!("{}", serde_json::to_string_pretty(&summary)?);

        if !cli.watch || cancel.is_cancelled() {
            break;
        }
        tokio::select! {
            _ = tokio::time::sleep(Duration::from_millis(cli.interval_ms)) => {}
            _ = cancel.cancelled() => break,
        }
    }

    tracing::info!("Shutdown complete");
    Ok(())
}

fn summarize(
    proxy: &ReservationProxy,
    results: &[Result<strangler_proxy::BookingReport, ProxyError>],
) -> BatchSummary {
    let mut summary = BatchSummary {
        strategy: proxy.strategy().to_string(),
        bookings: results.len(),
        comparisons: proxy.comparisons().summary(),
        ..BatchSummary::default()
    };

    for result in results {
        match result {
            Ok(report) if report.handled_by == Target::New => summary.handled_by_new += 1,
            Ok(_) => summary.handled_by_legacy += 1,
            Err(ProxyError::Cancelled { .. }) => summary.cancelled += 1,
            Err(e) => {
                let last = e.last_booking_error().map(ToString::to_string);
                tracing::error!(error = %e, last_error = ?last, "Booking failed");
                summary.failed += 1;
            }
        }
    }
    summary
}
