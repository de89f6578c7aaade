//! Shared query-state store.
//!
//! The store is owned outside the search input. The input reads a projection at
//! call time and changes it only through the named setters.

use tokio::sync::watch;

use crate::config::SearchDefaults;
use crate::search::query::{PatternType, ProjectedQueryState, SearchMode};

/// Read/subscribe/setter interface to the shared query state.
pub trait QueryStateStore: Send + Sync {
    /// Current pattern type, case sensitivity and search mode.
    fn projected_state(&self) -> ProjectedQueryState;

    /// Receive every change to the projected state.
    fn subscribe(&self) -> watch::Receiver<ProjectedQueryState>;

    fn set_case_sensitivity(&self, case_sensitive: bool);

    fn set_pattern_type(&self, pattern_type: PatternType);

    fn set_search_mode(&self, search_mode: SearchMode);
}

/// Process-local store backed by a watch channel.
#[derive(Debug)]
pub struct InMemoryQueryStore {
    state: watch::Sender<ProjectedQueryState>,
}

impl InMemoryQueryStore {
    pub fn new(initial: ProjectedQueryState) -> Self {
        let (state, _) = watch::channel(initial);
        Self { state }
    }

    pub fn from_defaults(defaults: &SearchDefaults) -> Self {
        Self::new(ProjectedQueryState {
            pattern_type: defaults.pattern_type,
            case_sensitive: defaults.case_sensitive,
            search_mode: defaults.search_mode,
        })
    }
}

impl Default for InMemoryQueryStore {
    fn default() -> Self {
        Self::new(ProjectedQueryState::default())
    }
}

impl QueryStateStore for InMemoryQueryStore {
    fn projected_state(&self) -> ProjectedQueryState {
        *self.state.borrow()
    }

    fn subscribe(&self) -> watch::Receiver<ProjectedQueryState> {
        self.state.subscribe()
    }

    fn set_case_sensitivity(&self, case_sensitive: bool) {
        tracing::debug!(case_sensitive, "Query state: case sensitivity");
        self.state.send_if_modified(|s| {
            let changed = s.case_sensitive != case_sensitive;
            s.case_sensitive = case_sensitive;
            changed
        });
    }

    fn set_pattern_type(&self, pattern_type: PatternType) {
        tracing::debug!(%pattern_type, "Query state: pattern type");
        self.state.send_if_modified(|s| {
            let changed = s.pattern_type != pattern_type;
            s.pattern_type = pattern_type;
            changed
        });
    }

    fn set_search_mode(&self, search_mode: SearchMode) {
        tracing::debug!(?search_mode, "Query state: search mode");
        self.state.send_if_modified(|s| {
            let changed = s.search_mode != search_mode;
            s.search_mode = search_mode;
            changed
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_setters_notify_subscribers() {
        let store = InMemoryQueryStore::default();
        let mut rx = store.subscribe();

        store.set_pattern_type(PatternType::Literal);
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().pattern_type, PatternType::Literal);

        // Setting the same value is not a change
        store.set_pattern_type(PatternType::Literal);
        assert!(!rx.has_changed().unwrap());

        store.set_case_sensitivity(true);
        store.set_search_mode(SearchMode::SmartSearch);
        let state = store.projected_state();
        assert!(state.case_sensitive);
        assert_eq!(state.search_mode, SearchMode::SmartSearch);
    }
}
