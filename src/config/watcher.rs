//! Configuration file watcher for hot reload.
//!
//! Swapping strategies at runtime is how traffic moves from legacy to the
//! new backend without a restart.

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::load_config;
use crate::config::schema::ProxyConfig;

/// A watcher that monitors the configuration file for changes.
pub struct ConfigWatcher {
    path: PathBuf,
    current: ProxyConfig,
    update_tx: mpsc::UnboundedSender<ProxyConfig>,
}

impl ConfigWatcher {
    /// Create a new ConfigWatcher seeded with the configuration already in use.
    ///
    /// Returns the watcher and a receiver for configuration updates.
    pub fn new(path: &Path, current: ProxyConfig) -> (Self, mpsc::UnboundedReceiver<ProxyConfig>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();

        (
            Self {
                path: path.to_path_buf(),
                current,
                update_tx,
            },
            update_rx,
        )
    }

    /// Start watching the file in a background thread.
    ///
    /// The parent directory is watched so editors that replace the file
    /// instead of writing in place are still picked up.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let watch_dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let path = self.path.clone();
        let tx = self.update_tx.clone();
        let mut current = self.current;

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if let Some(new_config) = reload_on_event(&path, &event, &current) {
                        current = new_config.clone();
                        let _ = tx.send(new_config);
                    }
                }
                Err(e) => tracing::error!("Watch error: {:?}", e),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&watch_dir, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?self.path, "Config watcher started");
        Ok(watcher)
    }
}

/// Reload the config if `event` touches `path` and the file now holds a
/// valid configuration different from `current`.
pub fn reload_on_event(path: &Path, event: &Event, current: &ProxyConfig) -> Option<ProxyConfig> {
    if !(event.kind.is_modify() || event.kind.is_create()) {
        return None;
    }
    if !event.paths.iter().any(|p| same_file(p, path)) {
        return None;
    }

    tracing::info!("Config file change detected, reloading...");
    match load_config(path) {
        Ok(new_config) if new_config == *current => {
            tracing::debug!("Config unchanged, ignoring event");
            None
        }
        Ok(new_config) => Some(new_config),
        Err(e) => {
            tracing::error!("Failed to reload config: {}. Keeping current configuration.", e);
            None
        }
    }
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a.file_name().is_some() && a.file_name() == b.file_name(),
    }
}
