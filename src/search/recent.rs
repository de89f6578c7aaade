//! Recently submitted searches shown by the search box's history menu.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::search::navigation::NavigationSink;
use crate::search::query::SubmitSearchParameters;

const DEFAULT_CAPACITY: usize = 20;

/// Read side of the recent search list, most recent first.
pub trait RecentSearchSource: Send + Sync {
    fn recent_searches(&self) -> Vec<String>;
}

/// No history, for inputs mounted without one.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoRecentSearches;

impl RecentSearchSource for NoRecentSearches {
    fn recent_searches(&self) -> Vec<String> {
        Vec::new()
    }
}

/// Bounded, deduplicated list fed by submitted searches.
#[derive(Debug)]
pub struct InMemoryRecentSearches {
    queries: Mutex<VecDeque<String>>,
    capacity: usize,
}

impl Default for InMemoryRecentSearches {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl InMemoryRecentSearches {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            queries: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    /// Move `query` to the front, dropping the oldest entry past capacity.
    pub fn record(&self, query: &str) {
        let query = query.trim();
        if query.is_empty() || self.capacity == 0 {
            return;
        }

        let mut queries = self.lock();
        queries.retain(|existing| existing != query);
        queries.push_front(query.to_string());
        queries.truncate(self.capacity);
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<String>> {
        self.queries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl RecentSearchSource for InMemoryRecentSearches {
    fn recent_searches(&self) -> Vec<String> {
        self.lock().iter().cloned().collect()
    }
}

impl NavigationSink for InMemoryRecentSearches {
    fn submit_search(&self, params: &SubmitSearchParameters) {
        self.record(params.query());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_most_recent_first_without_duplicates() {
        let recent = InMemoryRecentSearches::new();
        recent.record("lang:go");
        recent.record("repo:foo bar");
        recent.record("  lang:go ");

        assert_eq!(recent.recent_searches(), vec!["lang:go", "repo:foo bar"]);
    }

    #[test]
    fn test_capacity_and_blank_queries() {
        let recent = InMemoryRecentSearches::with_capacity(2);
        recent.record("a");
        recent.record("");
        recent.record("b");
        recent.record("c");

        assert_eq!(recent.recent_searches(), vec!["c", "b"]);
        assert!(NoRecentSearches.recent_searches().is_empty());
    }
}
