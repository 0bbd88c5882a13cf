//! In-process feature flags.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::services::FeatureFlagService;

/// A single flag held in memory. Not a flag store: whoever owns it sets it.
#[derive(Debug, Default)]
pub struct StaticFlags {
    accommodation_api_enabled: AtomicBool,
}

impl StaticFlags {
    pub fn new(accommodation_api_enabled: bool) -> Self {
        Self {
            accommodation_api_enabled: AtomicBool::new(accommodation_api_enabled),
        }
    }

    pub fn set_accommodation_api_enabled(&self, enabled: bool) {
        self.accommodation_api_enabled.store(enabled, Ordering::Relaxed);
    }
}

impl FeatureFlagService for StaticFlags {
    fn is_accommodation_api_enabled(&self) -> bool {
        self.accommodation_api_enabled.load(Ordering::Relaxed)
    }

    fn apply_accommodation_api_enabled(&self, enabled: bool) -> bool {
        self.set_accommodation_api_enabled(enabled);
        true
    }
}
