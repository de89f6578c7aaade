//! Configuration file watcher for hot reload.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::features::ConfigFeatureFlags;
use crate::config::loader::load_config;
use crate::config::schema::FrontendConfig;

/// A watcher that monitors the configuration file for changes.
pub struct ConfigWatcher {
    path: PathBuf,
    update_tx: mpsc::UnboundedSender<FrontendConfig>,
}

impl ConfigWatcher {
    /// Create a new ConfigWatcher.
    ///
    /// Returns the watcher and a receiver for validated configuration updates.
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<FrontendConfig>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();

        (
            Self {
                path: path.to_path_buf(),
                update_tx,
            },
            update_rx,
        )
    }

    /// Start watching the file. The returned handle must be kept alive.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let tx = self.update_tx.clone();
        let path = self.path.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| {
                let event = match res {
                    Ok(event) => event,
                    Err(e) => {
                        tracing::error!(error = %e, "Config watch error");
                        return;
                    }
                };
                let touches_config = event.paths.iter().any(|p| p.file_name() == path.file_name());
                if !(event.kind.is_modify() || event.kind.is_create()) || !touches_config {
                    return;
                }

                match load_config(&path) {
                    Ok(config) => {
                        tracing::info!(path = ?path, "Config reloaded");
                        let _ = tx.send(config);
                    }
                    Err(e) => {
                        tracing::warn!(path = ?path, error = %e, "Config reload rejected, keeping previous flags");
                    }
                }
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&self.path, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?self.path, "Config watcher started");
        Ok(watcher)
    }
}

/// Apply reloaded configurations to the live feature flags until the channel closes.
///
/// Site context and route groups are fixed at construction; only feature flags
/// change for an already-mounted shell.
pub async fn apply_updates(
    mut updates: mpsc::UnboundedReceiver<FrontendConfig>,
    flags: Arc<ConfigFeatureFlags>,
) {
    while let Some(config) = updates.recv().await {
        flags.store(config.experimental_features);
    }
    tracing::debug!("Config update channel closed");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::features::FeatureFlags;
    use crate::config::schema::ExperimentalFeatures;

    #[tokio::test]
    async fn test_apply_updates_swaps_flags() {
        let flags = Arc::new(ConfigFeatureFlags::default());
        let (tx, rx) = mpsc::unbounded_channel();

        let mut config = FrontendConfig::default();
        config.experimental_features = ExperimentalFeatures {
            show_multiline_search_console: true,
            ..ExperimentalFeatures::default()
        };
        tx.send(config).unwrap();
        drop(tx);

        apply_updates(rx, flags.clone()).await;
        assert!(flags.snapshot().show_multiline_search_console);
    }
}
