//! Feature-flag source.
//!
//! Synchronous, read-only access to experimental feature toggles. Readers take a
//! snapshot; the config watcher swaps in new values without blocking them.

use arc_swap::ArcSwap;
use std::sync::Arc;

use crate::config::schema::{ExperimentalFeatures, QueryInputKind};

/// A named flag value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlagValue {
    Bool(bool),
    Str(String),
}

/// Read access to feature flags.
pub trait FeatureFlags: Send + Sync {
    /// Current snapshot of all experimental features.
    fn snapshot(&self) -> Arc<ExperimentalFeatures>;

    /// Look up a single flag by its settings name.
    fn flag(&self, name: &str) -> Option<FlagValue> {
        let features = self.snapshot();
        match name {
            "searchQueryInput" => Some(FlagValue::Str(
                match features.search_query_input {
                    QueryInputKind::Standard => "v1",
                    QueryInputKind::Experimental => "experimental",
                }
                .to_string(),
            )),
            "showMultilineSearchConsole" => {
                Some(FlagValue::Bool(features.show_multiline_search_console))
            }
            "applySearchQuerySuggestionOnEnter" => Some(FlagValue::Bool(
                features.apply_search_query_suggestion_on_enter,
            )),
            _ => None,
        }
    }
}

/// Feature flags backed by the loaded configuration.
#[derive(Debug)]
pub struct ConfigFeatureFlags {
    current: ArcSwap<ExperimentalFeatures>,
}

impl ConfigFeatureFlags {
    pub fn new(features: ExperimentalFeatures) -> Self {
        Self {
            current: ArcSwap::from_pointee(features),
        }
    }

    /// Atomically replace the active feature set.
    pub fn store(&self, features: ExperimentalFeatures) {
        self.current.store(Arc::new(features));
        tracing::info!("Experimental features updated");
    }
}

impl Default for ConfigFeatureFlags {
    fn default() -> Self {
        Self::new(ExperimentalFeatures::default())
    }
}

impl FeatureFlags for ConfigFeatureFlags {
    fn snapshot(&self) -> Arc<ExperimentalFeatures> {
        self.current.load_full()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_flags() {
        let flags = ConfigFeatureFlags::default();
        assert_eq!(
            flags.flag("searchQueryInput"),
            Some(FlagValue::Str("v1".to_string()))
        );
        assert_eq!(
            flags.flag("showMultilineSearchConsole"),
            Some(FlagValue::Bool(false))
        );
        assert_eq!(flags.flag("unknown"), None);
    }

    #[test]
    fn test_store_replaces_snapshot() {
        let flags = ConfigFeatureFlags::default();
        let before = flags.snapshot();

        flags.store(ExperimentalFeatures {
            show_multiline_search_console: true,
            ..ExperimentalFeatures::default()
        });

        assert!(!before.show_multiline_search_console);
        assert!(flags.snapshot().show_multiline_search_console);
    }
}
