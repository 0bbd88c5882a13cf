//! The strangler proxy in front of the accommodation and reservation backends.

use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use serde::Serialize;
use uuid::Uuid;

use crate::config::ProxyConfig;
use crate::lifecycle::CancelSignal;
use crate::proxy::ProxyError;
use crate::resilience::timeouts::with_deadline;
use crate::resilience::{ExecutionOutcome, FallbackPolicy, ResilientRouter, RetryPolicy};
use crate::routing::{ComparisonStore, DualRunExecutor, FlagRoutedExecutor, Strategy, Target};
use crate::services::errors::retryable_statuses;
use crate::services::{AccommodationService, BookingError, FeatureFlagService, ReservationService};

/// Runtime settings derived from configuration.
#[derive(Debug, Clone)]
pub struct ProxySettings {
    pub strategy: Strategy,
    pub retry: RetryPolicy<BookingError>,
    pub attempt_deadline: Option<Duration>,
}

impl ProxySettings {
    pub fn from_config(config: &ProxyConfig) -> Self {
        Self {
            strategy: config.strategy,
            retry: RetryPolicy::new(
                config.retries.max_attempts,
                retryable_statuses(config.retries.retryable_status_codes.clone()),
                config.retries.delay(),
            ),
            attempt_deadline: config.timeouts.attempt_deadline(),
        }
    }
}

impl Default for ProxySettings {
    fn default() -> Self {
        Self::from_config(&ProxyConfig::default())
    }
}

/// What happened to a successful booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookingReport {
    pub strategy: Strategy,
    /// Backend whose booking counts.
    pub handled_by: Target,
    /// Calls made to the backend that was tried first.
    pub attempts: u32,
    /// Set for dual runs.
    pub comparison_id: Option<Uuid>,
}

/// Routes apartment bookings between the new and the legacy backend.
pub struct ReservationProxy {
    accommodation: Arc<dyn AccommodationService>,
    reservation: Arc<dyn ReservationService>,
    flags: Arc<dyn FeatureFlagService>,
    router: ResilientRouter,
    dual_run: DualRunExecutor,
    settings: ArcSwap<ProxySettings>,
}

impl ReservationProxy {
    pub fn new(
        accommodation: Arc<dyn AccommodationService>,
        reservation: Arc<dyn ReservationService>,
        flags: Arc<dyn FeatureFlagService>,
        settings: ProxySettings,
    ) -> Self {
        Self {
            accommodation,
            reservation,
            flags,
            router: ResilientRouter::new(),
            dual_run: DualRunExecutor::default(),
            settings: ArcSwap::from_pointee(settings),
        }
    }

    pub fn with_router(mut self, router: ResilientRouter) -> Self {
        self.router = router;
        self
    }

    pub fn with_comparison_store(mut self, store: ComparisonStore) -> Self {
        self.dual_run = DualRunExecutor::new(store);
        self
    }

    pub fn settings(&self) -> Arc<ProxySettings> {
        self.settings.load_full()
    }

    pub fn strategy(&self) -> Strategy {
        self.settings.load().strategy
    }

    pub fn comparisons(&self) -> &ComparisonStore {
        self.dual_run.store()
    }

    /// Replace the active settings. Bookings already in flight are unaffected.
    pub fn apply_settings(&self, settings: ProxySettings) {
        let previous = self.strategy();
        tracing::info!(
            from = %previous,
            to = %settings.strategy,
            max_attempts = settings.retry.max_attempts(),
            "Applying proxy settings"
        );
        self.settings.store(Arc::new(settings));
    }

    /// Apply a (re)loaded configuration: settings, feature flags and comparison retention.
    pub fn apply_config(&self, config: &ProxyConfig) {
        self.apply_settings(ProxySettings::from_config(config));
        self.apply_flags(config.feature_flags.accommodation_api_enabled);
        self.comparisons().set_capacity(config.comparisons.capacity);
    }

    fn apply_flags(&self, accommodation_api_enabled: bool) {
        if self.flags.is_accommodation_api_enabled() == accommodation_api_enabled {
            return;
        }
        if self.flags.apply_accommodation_api_enabled(accommodation_api_enabled) {
            tracing::info!(accommodation_api_enabled, "Feature flag updated");
        } else {
            tracing::warn!(
                accommodation_api_enabled,
                "Feature flag source is read-only; configured value not applied"
            );
        }
    }

    /// Book an apartment through the active strategy.
    pub async fn book_apartments(&self) -> Result<BookingReport, ProxyError> {
        self.dispatch(None).await
    }

    /// Like [`book_apartments`](Self::book_apartments), but retry waits abort when `cancel` fires.
    pub async fn book_apartments_until(&self, cancel: &CancelSignal) -> Result<BookingReport, ProxyError> {
        self.dispatch(Some(cancel)).await
    }

    async fn dispatch(&self, cancel: Option<&CancelSignal>) -> Result<BookingReport, ProxyError> {
        let settings = self.settings.load_full();
        match settings.strategy {
            Strategy::FeatureFlag => self.book_with_feature_flag(&settings).await,
            Strategy::DualRun => self.book_in_both(&settings).await,
            Strategy::RetryFallback => self.book_with_fallback(&settings, cancel).await,
        }
    }

    async fn book_with_feature_flag(&self, settings: &ProxySettings) -> Result<BookingReport, ProxyError> {
        let enabled = self.flags.is_accommodation_api_enabled();
        let deadline = settings.attempt_deadline;

        let handled_by = FlagRoutedExecutor::new()
            .execute(
                enabled,
                || self.call_accommodation(deadline),
                || self.call_reservation(deadline),
            )
            .await?;

        Ok(BookingReport {
            strategy: Strategy::FeatureFlag,
            handled_by,
            attempts: 1,
            comparison_id: None,
        })
    }

    async fn book_in_both(&self, settings: &ProxySettings) -> Result<BookingReport, ProxyError> {
        let deadline = settings.attempt_deadline;

        let run = self
            .dual_run
            .execute(|| self.call_reservation(deadline), || self.call_accommodation(deadline))
            .await;
        run.legacy?;

        Ok(BookingReport {
            strategy: Strategy::DualRun,
            handled_by: Target::Legacy,
            attempts: 1,
            comparison_id: Some(run.comparison_id),
        })
    }

    async fn book_with_fallback(
        &self,
        settings: &ProxySettings,
        cancel: Option<&CancelSignal>,
    ) -> Result<BookingReport, ProxyError> {
        let deadline = settings.attempt_deadline;
        let primary = || self.call_accommodation(deadline);
        let fallback = FallbackPolicy::new(|| self.call_reservation(deadline));

        let outcome = match cancel {
            Some(signal) => {
                self.router
                    .execute_with_cancel(primary, &settings.retry, fallback, signal)
                    .await
            }
            None => self.router.execute(primary, &settings.retry, fallback).await,
        };

        let (handled_by, attempts) = match outcome {
            ExecutionOutcome::Succeeded { attempts } => (Target::New, attempts),
            ExecutionOutcome::SucceededViaFallback { attempts, .. } => (Target::Legacy, attempts),
            ExecutionOutcome::Failed(failure) => return Err(ProxyError::Fallback(failure)),
            ExecutionOutcome::Cancelled { attempts, last_error } => {
                return Err(ProxyError::Cancelled { attempts, last_error })
            }
        };

        Ok(BookingReport {
            strategy: Strategy::RetryFallback,
            handled_by,
            attempts,
            comparison_id: None,
        })
    }

    async fn call_accommodation(&self, deadline: Option<Duration>) -> Result<(), BookingError> {
        with_deadline(deadline, self.accommodation.book_apartment(), BookingError::Timeout).await
    }

    async fn call_reservation(&self, deadline: Option<Duration>) -> Result<(), BookingError> {
        with_deadline(deadline, self.reservation.book_apartment(), BookingError::Timeout).await
    }
}
