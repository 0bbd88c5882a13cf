//! Startup orchestration.
//!
//! # Responsibilities
//! - Build the observer chain from observability settings
//! - Build the in-process collaborators from the simulation settings
//! - Assemble the proxy with the configured strategy
//!
//! # Design Decisions
//! - Collaborators are returned alongside the proxy so callers can inspect call counts
//! - The metrics observer is only attached when metrics are enabled

use std::sync::Arc;

use crate::config::ProxyConfig;
use crate::observability::{MetricsObserver, TracingObserver};
use crate::proxy::{ProxySettings, ReservationProxy};
use crate::resilience::{CompositeObserver, ResilientRouter};
use crate::routing::ComparisonStore;
use crate::services::{ScriptedBackend, StaticFlags};

/// A fully wired proxy and the collaborators behind it.
pub struct Wiring {
    pub proxy: ReservationProxy,
    pub accommodation: Arc<ScriptedBackend>,
    pub reservation: Arc<ScriptedBackend>,
    pub flags: Arc<StaticFlags>,
}

/// Observers for the router: tracing always, metrics when enabled.
pub fn build_observer(config: &ProxyConfig) -> CompositeObserver {
    let observer = CompositeObserver::new().with(Arc::new(TracingObserver));
    if config.observability.metrics_enabled {
        observer.with(Arc::new(MetricsObserver))
    } else {
        observer
    }
}

/// Wire a proxy over scripted backends described by `config.simulation`.
pub fn build(config: &ProxyConfig) -> Wiring {
    let accommodation = Arc::new(ScriptedBackend::new(
        "accommodation",
        config.simulation.accommodation.clone(),
    ));
    let reservation = Arc::new(ScriptedBackend::new(
        "legacy reservation",
        config.simulation.reservation.clone(),
    ));
    let flags = Arc::new(StaticFlags::new(config.feature_flags.accommodation_api_enabled));

    let router = ResilientRouter::with_observer(Arc::new(build_observer(config)));
    let proxy = ReservationProxy::new(
        accommodation.clone(),
        reservation.clone(),
        flags.clone(),
        ProxySettings::from_config(config),
    )
    .with_router(router)
    .with_comparison_store(ComparisonStore::with_capacity(config.comparisons.capacity));

    tracing::info!(
        strategy = %config.strategy,
        max_attempts = config.retries.max_attempts,
        delay_ms = config.retries.delay_ms,
        "Proxy wired"
    );

    Wiring {
        proxy,
        accommodation,
        reservation,
        flags,
    }
}
