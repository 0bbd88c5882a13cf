//! Strategy selection and switching.

use strangler_proxy::config::parse_config;
use strangler_proxy::routing::{RunOutcome, Strategy, Target};
use strangler_proxy::services::{BookingError, FeatureFlagService, ScriptStep};
use strangler_proxy::ProxyError;

mod common;
use common::status;

#[tokio::test]
async fn test_feature_flag_routes_without_retry() {
    let mut config = common::config(Strategy::FeatureFlag);
    config.feature_flags.accommodation_api_enabled = true;
    let h = common::harness(&config, vec![status(408)], vec![]);

    let err = h.proxy.book_apartments().await.unwrap_err();
    assert!(matches!(err, ProxyError::Booking(BookingError::Api(_))));
    assert_eq!(h.accommodation.calls(), 1);
    assert_eq!(h.reservation.calls(), 0);

    h.flags.set_accommodation_api_enabled(false);
    let report = h.proxy.book_apartments().await.unwrap();
    assert_eq!(report.handled_by, Target::Legacy);
    assert_eq!(h.reservation.calls(), 1);
}

#[tokio::test]
async fn test_dual_run_hides_new_backend_failures() {
    let config = common::config(Strategy::DualRun);
    let h = common::harness(&config, vec![status(500), ScriptStep::Ok], vec![]);

    let first = h.proxy.book_apartments().await.expect("legacy result is authoritative");
    let second = h.proxy.book_apartments().await.unwrap();

    assert_eq!(first.handled_by, Target::Legacy);
    assert_eq!(h.accommodation.calls(), 2);
    assert_eq!(h.reservation.calls(), 2);

    let comparisons = h.proxy.comparisons();
    let mismatch = comparisons.get(&first.comparison_id.unwrap()).unwrap();
    assert_eq!(mismatch.legacy, RunOutcome::Succeeded);
    assert!(matches!(mismatch.new, RunOutcome::Failed { .. }));
    assert!(comparisons.get(&second.comparison_id.unwrap()).unwrap().agrees());

    let summary = comparisons.summary();
    assert_eq!(summary.total, 2);
    assert_eq!(summary.mismatches, 1);
    assert_eq!(summary.new_failures, 1);
}

#[tokio::test]
async fn test_dual_run_surfaces_legacy_failure() {
    let config = common::config(Strategy::DualRun);
    let h = common::harness(&config, vec![], vec![ScriptStep::Unavailable]);

    let err = h.proxy.book_apartments().await.unwrap_err();
    assert!(matches!(err, ProxyError::Booking(BookingError::Unavailable { .. })));
    assert_eq!(h.accommodation.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_reload_moves_traffic_to_new_backend() {
    let initial = parse_config(
        r#"
        strategy = "feature_flag"
        [feature_flags]
        accommodation_api_enabled = false
        "#,
    )
    .unwrap();
    let h = common::harness(&initial, vec![], vec![]);

    assert_eq!(h.proxy.book_apartments().await.unwrap().handled_by, Target::Legacy);

    let reloaded = parse_config(
        r#"
        strategy = "retry_fallback"
        [retries]
        max_attempts = 5
        delay_ms = 0
        "#,
    )
    .unwrap();
    h.proxy.apply_config(&reloaded);

    let report = h.proxy.book_apartments().await.unwrap();
    assert_eq!(report.strategy, Strategy::RetryFallback);
    assert_eq!(report.handled_by, Target::New);
    assert_eq!(h.proxy.settings().retry.max_attempts(), 5);
}

#[tokio::test]
async fn test_reload_applies_feature_flag() {
    let initial = parse_config(
        r#"
        strategy = "feature_flag"
        [feature_flags]
        accommodation_api_enabled = false
        "#,
    )
    .unwrap();
    let h = common::harness(&initial, vec![], vec![]);
    assert_eq!(h.proxy.book_apartments().await.unwrap().handled_by, Target::Legacy);

    let flipped = parse_config(
        r#"
        strategy = "feature_flag"
        [feature_flags]
        accommodation_api_enabled = true
        "#,
    )
    .unwrap();
    h.proxy.apply_config(&flipped);

    assert!(h.flags.is_accommodation_api_enabled());
    assert_eq!(h.proxy.book_apartments().await.unwrap().handled_by, Target::New);
    assert_eq!(h.accommodation.calls(), 1);
    assert_eq!(h.reservation.calls(), 1);
}

#[tokio::test]
async fn test_dual_run_keeps_only_recent_comparisons() {
    let config = parse_config(
        r#"
        strategy = "dual_run"
        [comparisons]
        capacity = 5
        "#,
    )
    .unwrap();
    let h = common::harness(&config, vec![], vec![]);

    let mut ids = Vec::new();
    for _ in 0..200 {
        ids.push(h.proxy.book_apartments().await.unwrap().comparison_id.unwrap());
    }

    let comparisons = h.proxy.comparisons();
    assert_eq!(comparisons.len(), 5);
    assert!(comparisons.get(&ids[0]).is_none());
    assert!(comparisons.get(&ids[199]).is_some());
    assert_eq!(h.reservation.calls(), 200);
}

#[test]
fn test_example_config_is_valid() {
    let config = parse_config(include_str!("../strangler.example.toml")).unwrap();
    assert_eq!(config.strategy, Strategy::RetryFallback);
    assert_eq!(config.simulation.accommodation.len(), 3);
    assert_eq!(config.comparisons.capacity, 10_000);
}
