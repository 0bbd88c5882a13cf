//! Shared utilities for integration testing.

use std::sync::Arc;

use strangler_proxy::config::ProxyConfig;
use strangler_proxy::proxy::{ProxySettings, ReservationProxy};
use strangler_proxy::routing::{ComparisonStore, Strategy};
use strangler_proxy::services::{ScriptStep, ScriptedBackend, StaticFlags};

/// A proxy over scripted backends, with handles to the backends.
#[allow(dead_code)]
pub struct Harness {
    pub proxy: ReservationProxy,
    pub accommodation: Arc<ScriptedBackend>,
    pub reservation: Arc<ScriptedBackend>,
    pub flags: Arc<StaticFlags>,
}

/// Default config with the given strategy.
pub fn config(strategy: Strategy) -> ProxyConfig {
    let mut config = ProxyConfig::default();
    config.strategy = strategy;
    config
}

/// Build a harness around `config` with the given backend scripts.
pub fn harness(config: &ProxyConfig, accommodation: Vec<ScriptStep>, reservation: Vec<ScriptStep>) -> Harness {
    let accommodation = Arc::new(ScriptedBackend::new("accommodation", accommodation));
    let reservation = Arc::new(ScriptedBackend::new("legacy reservation", reservation));
    let flags = Arc::new(StaticFlags::new(config.feature_flags.accommodation_api_enabled));

    let proxy = ReservationProxy::new(
        accommodation.clone(),
        reservation.clone(),
        flags.clone(),
        ProxySettings::from_config(config),
    )
    .with_comparison_store(ComparisonStore::with_capacity(config.comparisons.capacity));

    Harness {
        proxy,
        accommodation,
        reservation,
        flags,
    }
}

#[allow(dead_code)]
pub fn status(code: u16) -> ScriptStep {
    ScriptStep::Status { code }
}
