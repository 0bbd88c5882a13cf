//! Feature-flag routing.

use std::future::Future;

use crate::routing::Target;

/// Runs the new action when the flag is on, the legacy one otherwise.
///
/// No retry and no fallback: whichever backend is picked, its error is the
/// caller's error.
#[derive(Debug, Default, Clone, Copy)]
pub struct FlagRoutedExecutor;

impl FlagRoutedExecutor {
    pub fn new() -> Self {
        Self
    }

    /// Pick a target from the flag.
    pub fn select(flag_enabled: bool) -> Target {
        if flag_enabled {
            Target::New
        } else {
            Target::Legacy
        }
    }

    /// Run exactly one of the two actions and report which one ran.
    pub async fn execute<E, N, NFut, L, LFut>(
        &self,
        flag_enabled: bool,
        new_action: N,
        legacy_action: L,
    ) -> Result<Target, E>
    where
        N: FnOnce() -> NFut,
        NFut: Future<Output = Result<(), E>>,
        L: FnOnce() -> LFut,
        LFut: Future<Output = Result<(), E>>,
    {
        let target = Self::select(flag_enabled);
        match target {
            Target::New => new_action().await?,
            Target::Legacy => legacy_action().await?,
        }
        Ok(target)
    }
}
