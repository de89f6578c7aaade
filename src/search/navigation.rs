//! Search navigation dispatch.
//!
//! # Data Flow
//! ```text
//! controller.submit()
//!     → NavigationDispatcher (keeps only the latest pending submission)
//!     → NavigationReceiver (consumer on the UI event loop)
//!     → NavigationSink (serializes /search?... and pushes history)
//! ```
//!
//! # Design Decisions
//! - Submissions that arrive before the consumer runs are coalesced: last one wins
//! - Fire-and-forget from the controller's side; no return value, no retry

use tokio::sync::watch;
use url::form_urlencoded;

use crate::search::query::SubmitSearchParameters;

/// Performs the client-side transition for a search.
pub trait NavigationSink: Send + Sync {
    fn submit_search(&self, params: &SubmitSearchParameters);
}

#[derive(Debug, Clone)]
struct Pending {
    seq: u64,
    params: SubmitSearchParameters,
}

/// Sending half: owned by the search input.
#[derive(Debug)]
pub struct NavigationDispatcher {
    tx: watch::Sender<Option<Pending>>,
}

/// Receiving half: drained by whoever performs navigations.
#[derive(Debug)]
pub struct NavigationReceiver {
    rx: watch::Receiver<Option<Pending>>,
}

/// Create a connected dispatcher/receiver pair.
pub fn channel() -> (NavigationDispatcher, NavigationReceiver) {
    let (tx, rx) = watch::channel(None);
    (NavigationDispatcher { tx }, NavigationReceiver { rx })
}

impl NavigationDispatcher {
    /// Queue a navigation, replacing any that has not been consumed yet.
    pub fn dispatch(&self, params: SubmitSearchParameters) {
        self.tx.send_modify(|pending| {
            let seq = pending.as_ref().map_or(1, |p| p.seq + 1);
            if pending.is_some() {
                tracing::trace!(seq, "Superseding pending navigation");
            }
            *pending = Some(Pending { seq, params });
        });
    }
}

impl NavigationReceiver {
    /// Take the pending navigation if one arrived since the last call.
    pub fn try_next(&mut self) -> Option<SubmitSearchParameters> {
        match self.rx.has_changed() {
            Ok(true) => self.latest(),
            _ => None,
        }
    }

    /// Wait for the next navigation. Returns `None` once the dispatcher is gone.
    pub async fn next(&mut self) -> Option<SubmitSearchParameters> {
        loop {
            self.rx.changed().await.ok()?;
            if let Some(params) = self.latest() {
                return Some(params);
            }
        }
    }

    /// Forward navigations to `sink` until the dispatcher is dropped.
    pub async fn run(mut self, sink: &dyn NavigationSink) {
        while let Some(params) = self.next().await {
            sink.submit_search(&params);
        }
        tracing::debug!("Navigation dispatcher closed");
    }

    fn latest(&mut self) -> Option<SubmitSearchParameters> {
        self.rx
            .borrow_and_update()
            .as_ref()
            .map(|pending| pending.params.clone())
    }
}

/// Serialize a search as the `/search` URL the results page reads.
///
/// A selected context is prepended as a `context:` filter unless the query
/// already carries one.
pub fn build_search_url(params: &SubmitSearchParameters) -> String {
    let query = match params.selected_search_context_spec() {
        Some(spec) if !has_context_filter(params.query()) => {
            format!("context:{} {}", spec, params.query())
        }
        _ => params.query().to_string(),
    };

    let mut serializer = form_urlencoded::Serializer::new(String::new());
    serializer.append_pair("q", &query);
    serializer.append_pair("patternType", params.pattern_type().as_str());
    serializer.append_pair("sm", params.search_mode().url_value());
    if params.case_sensitive() {
        serializer.append_pair("case", "yes");
    }

    format!("/search?{}", serializer.finish())
}

fn has_context_filter(query: &str) -> bool {
    query.split_whitespace().any(|token| {
        let token = token.strip_prefix('-').unwrap_or(token);
        token.to_ascii_lowercase().starts_with("context:")
    })
}
