//! Browser history model.
//!
//! Receives both kinds of navigation the front-end performs: search submissions
//! (pushed as `/search?...` URLs) and route-level effects (redirect replacements
//! and hard reloads for pass-through paths).

use serde::Serialize;
use std::sync::{Mutex, PoisonError};
use uuid::Uuid;

use crate::routing::Navigator;
use crate::search::navigation::{build_search_url, NavigationSink};
use crate::search::query::SubmitSearchParameters;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryAction {
    Push,
    Replace,
    Reload,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryEntry {
    pub id: Uuid,
    pub action: HistoryAction,
    pub url: String,
}

/// Append-only record of navigations.
#[derive(Debug, Default)]
pub struct History {
    entries: Mutex<Vec<HistoryEntry>>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<HistoryEntry> {
        self.lock().clone()
    }

    pub fn last(&self) -> Option<HistoryEntry> {
        self.lock().last().cloned()
    }

    fn record(&self, action: HistoryAction, url: &str) {
        let entry = HistoryEntry {
            id: Uuid::new_v4(),
            action,
            url: url.to_string(),
        };
        tracing::info!(id = %entry.id, ?action, url, "Navigation");
        self.lock().push(entry);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<HistoryEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl NavigationSink for History {
    fn submit_search(&self, params: &SubmitSearchParameters) {
        self.record(HistoryAction::Push, &build_search_url(params));
    }
}

impl Navigator for History {
    fn replace(&self, path: &str) {
        self.record(HistoryAction::Replace, path);
    }

    fn hard_reload(&self, path: &str) {
        self.record(HistoryAction::Reload, path);
    }
}
