//! Query suggestion source.
//!
//! # Responsibilities
//! - Complete filter keywords (`repo:`, `lang:`, ...) and their fixed values
//! - Complete `context:` values from the search-context fetcher
//! - Memoize the source per dependency identity
//! - Discard results of superseded or torn-down requests
//!
//! # Design Decisions
//! - The source is a supplier, not a cache: nothing is fetched until queried
//! - Fetch failures degrade to "no suggestions" with an error flag
//! - Identity is `Arc` pointer identity, not value equality

use futures_util::future::{self, BoxFuture, FutureExt};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;

use crate::observability::metrics;
use crate::session::{AuthenticatedUser, PlatformContext};

const MAX_CONTEXT_SUGGESTIONS: usize = 10;

/// Filters offered for completion: (keyword, description, fixed values).
const FILTERS: &[(&str, &str, &[&str])] = &[
    ("repo", "Include only results from repositories matching the given pattern", &[]),
    ("file", "Include only results from files matching the given pattern", &[]),
    ("lang", "Include only results from the given language", &[]),
    ("context", "Search only inside the given search context", &[]),
    ("case", "Treat the search pattern as case-sensitive", &["yes", "no"]),
    ("type", "Limit results to the given type", &["diff", "commit", "symbol", "repo", "path", "file"]),
    ("patterntype", "The pattern type to use", &["standard", "literal", "regexp", "structural", "keyword"]),
    ("rev", "Search a revision instead of the default branch", &[]),
    ("select", "Show only the selected part of each result", &["repo", "file", "content", "symbol", "commit.diff.added", "commit.diff.removed"]),
    ("fork", "Include results from forked repositories", &["yes", "no", "only"]),
    ("archived", "Include results from archived repositories", &["yes", "no", "only"]),
    ("count", "Maximum number of results", &["all"]),
    ("timeout", "Duration before the search times out", &[]),
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("not authorized")]
    Unauthorized,
}

/// A search context as listed by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchContextDescriptor {
    pub spec: String,
    pub description: String,
    /// Owning user or organization id; `None` for instance-level contexts.
    pub namespace: Option<String>,
    pub auto_defined: bool,
}

/// Arguments to `SearchContextFetcher::fetch_search_contexts`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchContextsParams {
    pub first: usize,
    pub query: String,
    /// Namespaces to include besides instance-level contexts.
    pub namespaces: Vec<String>,
}

pub trait SearchContextFetcher: Send + Sync {
    fn fetch_search_contexts(
        &self,
        params: FetchContextsParams,
    ) -> BoxFuture<'static, Result<Vec<SearchContextDescriptor>, FetchError>>;
}

pub trait NamespaceFetcher: Send + Sync {
    fn user_search_context_namespaces(
        &self,
        user: Option<&AuthenticatedUser>,
    ) -> BoxFuture<'static, Result<Vec<String>, FetchError>>;
}

/// Namespaces of a user: the user itself and each of their organizations.
#[derive(Debug, Default, Clone, Copy)]
pub struct UserNamespaces;

impl NamespaceFetcher for UserNamespaces {
    fn user_search_context_namespaces(
        &self,
        user: Option<&AuthenticatedUser>,
    ) -> BoxFuture<'static, Result<Vec<String>, FetchError>> {
        let namespaces = user
            .map(|u| {
                std::iter::once(u.id.clone())
                    .chain(u.organizations.iter().cloned())
                    .collect()
            })
            .unwrap_or_default();
        future::ready(Ok(namespaces)).boxed()
    }
}

/// A fixed list of contexts, filtered the way the backend filters them.
#[derive(Debug, Default, Clone)]
pub struct StaticSearchContexts {
    contexts: Vec<SearchContextDescriptor>,
}

impl StaticSearchContexts {
    pub fn new(contexts: Vec<SearchContextDescriptor>) -> Self {
        Self { contexts }
    }
}

impl SearchContextFetcher for StaticSearchContexts {
    fn fetch_search_contexts(
        &self,
        params: FetchContextsParams,
    ) -> BoxFuture<'static, Result<Vec<SearchContextDescriptor>, FetchError>> {
        let query = params.query.to_lowercase();
        let matches = self
            .contexts
            .iter()
            .filter(|c| match &c.namespace {
                None => true,
                Some(ns) => params.namespaces.contains(ns),
            })
            .filter(|c| c.spec.to_lowercase().contains(&query))
            .take(params.first)
            .cloned()
            .collect();
        future::ready(Ok(matches)).boxed()
    }
}

/// Everything a suggestion source is bound to.
#[derive(Clone)]
pub struct SuggestionDeps {
    pub platform_context: Arc<PlatformContext>,
    pub authenticated_user: Option<Arc<AuthenticatedUser>>,
    pub fetch_search_contexts: Arc<dyn SearchContextFetcher>,
    pub get_user_namespaces: Arc<dyn NamespaceFetcher>,
}

impl SuggestionDeps {
    /// True when every dependency is the same instance in both.
    pub fn same_identity(&self, other: &SuggestionDeps) -> bool {
        let user_same = match (&self.authenticated_user, &other.authenticated_user) {
            (None, None) => true,
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        };
        Arc::ptr_eq(&self.platform_context, &other.platform_context)
            && user_same
            && same_object(&self.fetch_search_contexts, &other.fetch_search_contexts)
            && same_object(&self.get_user_namespaces, &other.get_user_namespaces)
    }
}

// Compares data pointers only; vtable pointers of the same type may differ.
fn same_object<T: ?Sized>(a: &Arc<T>, b: &Arc<T>) -> bool {
    std::ptr::eq(Arc::as_ptr(a) as *const (), Arc::as_ptr(b) as *const ())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SuggestionKind {
    Filter,
    FilterValue,
    SearchContext,
}

/// One completion candidate. `from..to` is the byte range of the query it replaces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    pub label: String,
    pub insert_text: String,
    pub kind: SuggestionKind,
    pub from: usize,
    pub to: usize,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Suggestions {
    pub items: Vec<Suggestion>,
    /// A fetch failed; `items` may be incomplete.
    pub error: bool,
}

impl Suggestions {
    fn failed() -> Self {
        Self {
            items: Vec::new(),
            error: true,
        }
    }
}

/// Provides completions for a partially typed query.
pub struct SuggestionSource {
    deps: SuggestionDeps,
}

impl SuggestionSource {
    pub fn new(deps: SuggestionDeps) -> Self {
        Self { deps }
    }

    pub fn deps(&self) -> &SuggestionDeps {
        &self.deps
    }

    /// Completions for the token ending at byte `position` of `query`.
    pub async fn suggest(&self, query: &str, position: usize) -> Suggestions {
        let mut position = position.min(query.len());
        while !query.is_char_boundary(position) {
            position -= 1;
        }
        let start = query[..position]
            .char_indices()
            .rev()
            .find(|(_, c)| c.is_whitespace())
            .map_or(0, |(i, c)| i + c.len_utf8());
        let token = &query[start..position];
        if token.is_empty() {
            return Suggestions::default();
        }

        match token.split_once(':') {
            Some((field, value)) => {
                let value_start = start + field.len() + 1;
                let field = field.trim_start_matches('-').to_ascii_lowercase();
                if field == "context" {
                    self.context_suggestions(value, value_start, position).await
                } else {
                    filter_value_suggestions(&field, value, value_start, position)
                }
            }
            None => filter_suggestions(token, start, position),
        }
    }

    async fn context_suggestions(&self, value: &str, from: usize, to: usize) -> Suggestions {
        let user = self.deps.authenticated_user.as_deref();
        let namespaces = match self
            .deps
            .get_user_namespaces
            .user_search_context_namespaces(user)
            .await
        {
            Ok(namespaces) => namespaces,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to fetch search context namespaces");
                metrics::record_suggestion_fetch_error("namespaces");
                return Suggestions::failed();
            }
        };

        let params = FetchContextsParams {
            first: MAX_CONTEXT_SUGGESTIONS,
            query: value.to_string(),
            namespaces,
        };
        match self.deps.fetch_search_contexts.fetch_search_contexts(params).await {
            Ok(contexts) => Suggestions {
                items: contexts
                    .into_iter()
                    .map(|c| Suggestion {
                        label: c.spec.clone(),
                        insert_text: format!("{} ", c.spec),
                        kind: SuggestionKind::SearchContext,
                        from,
                        to,
                        description: (!c.description.is_empty()).then_some(c.description),
                    })
                    .collect(),
                error: false,
            },
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    url = %self.deps.platform_context.sourcegraph_url,
                    "Failed to fetch search contexts"
                );
                metrics::record_suggestion_fetch_error("contexts");
                Suggestions::failed()
            }
        }
    }
}

fn filter_suggestions(token: &str, from: usize, to: usize) -> Suggestions {
    let negated = token.starts_with('-');
    let prefix = token.trim_start_matches('-').to_ascii_lowercase();
    let items = FILTERS
        .iter()
        .filter(|(keyword, _, _)| keyword.starts_with(&prefix))
        .map(|(keyword, description, _)| {
            let label = format!("{}{}:", if negated { "-" } else { "" }, keyword);
            Suggestion {
                insert_text: label.clone(),
                label,
                kind: SuggestionKind::Filter,
                from,
                to,
                description: Some((*description).to_string()),
            }
        })
        .collect();
    Suggestions { items, error: false }
}

fn filter_value_suggestions(field: &str, value: &str, from: usize, to: usize) -> Suggestions {
    let value = value.to_ascii_lowercase();
    let items = FILTERS
        .iter()
        .find(|(keyword, _, _)| *keyword == field)
        .map(|(_, _, values)| {
            values
                .iter()
                .filter(|v| v.starts_with(&value))
                .map(|v| Suggestion {
                    label: (*v).to_string(),
                    insert_text: format!("{} ", v),
                    kind: SuggestionKind::FilterValue,
                    from,
                    to,
                    description: None,
                })
                .collect()
        })
        .unwrap_or_default();
    Suggestions { items, error: false }
}

/// Holds the suggestion source for the current dependencies.
#[derive(Default)]
pub struct SuggestionSourceCache {
    current: Mutex<Option<Arc<SuggestionSource>>>,
}

impl SuggestionSourceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached source if `deps` are the same instances, otherwise build a new one.
    pub fn get(&self, deps: &SuggestionDeps) -> Arc<SuggestionSource> {
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(source) = current.as_ref().filter(|s| s.deps.same_identity(deps)) {
            return Arc::clone(source);
        }

        tracing::debug!("Building suggestion source");
        let source = Arc::new(SuggestionSource::new(deps.clone()));
        *current = Some(Arc::clone(&source));
        source
    }
}

/// Identifies one suggestion request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// Tracks which suggestion request is the most recent.
///
/// Results are accepted by recency of the triggering keystroke, not by
/// completion order.
#[derive(Debug, Default)]
pub struct SuggestionRequests {
    latest: AtomicU64,
    torn_down: AtomicBool,
}

impl SuggestionRequests {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a request, superseding every earlier one.
    pub fn begin(&self) -> Ticket {
        Ticket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        !self.torn_down.load(Ordering::SeqCst) && self.latest.load(Ordering::SeqCst) == ticket.0
    }

    /// Pass `value` through only if `ticket` is still the latest live request.
    pub fn accept<T>(&self, ticket: Ticket, value: T) -> Option<T> {
        if self.is_current(ticket) {
            Some(value)
        } else {
            tracing::trace!(ticket = ticket.0, "Discarding stale suggestions");
            None
        }
    }

    /// The owning input is gone; every outstanding result is discarded.
    pub fn teardown(&self) {
        self.torn_down.store(true, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingContexts;

    impl SearchContextFetcher for FailingContexts {
        fn fetch_search_contexts(
            &self,
            _params: FetchContextsParams,
        ) -> BoxFuture<'static, Result<Vec<SearchContextDescriptor>, FetchError>> {
            future::ready(Err(FetchError::Transport("connection reset".into()))).boxed()
        }
    }

    fn context(spec: &str, namespace: Option<&str>) -> SearchContextDescriptor {
        SearchContextDescriptor {
            spec: spec.to_string(),
            description: String::new(),
            namespace: namespace.map(str::to_string),
            auto_defined: false,
        }
    }

    fn deps(user: Option<Arc<AuthenticatedUser>>) -> SuggestionDeps {
        SuggestionDeps {
            platform_context: Arc::new(PlatformContext::new("https://sourcegraph.test")),
            authenticated_user: user,
            fetch_search_contexts: Arc::new(StaticSearchContexts::new(vec![
                context("global", None),
                context("@alice", Some("u1")),
                context("@alice/work", Some("u1")),
                context("@bob", Some("u2")),
            ])),
            get_user_namespaces: Arc::new(UserNamespaces),
        }
    }

    fn labels(s: &Suggestions) -> Vec<&str> {
        s.items.iter().map(|i| i.label.as_str()).collect()
    }

    #[tokio::test]
    async fn test_filter_keywords() {
        let source = SuggestionSource::new(deps(None));

        let s = source.suggest("foo re", 6).await;
        assert_eq!(labels(&s), vec!["repo:", "rev:"]);
        assert_eq!((s.items[0].from, s.items[0].to), (4, 6));

        let negated = source.suggest("-la", 3).await;
        assert_eq!(labels(&negated), vec!["-lang:"]);

        assert!(source.suggest("foo ", 4).await.items.is_empty());
    }

    #[tokio::test]
    async fn test_filter_values() {
        let source = SuggestionSource::new(deps(None));

        let s = source.suggest("fork:o", 6).await;
        assert_eq!(labels(&s), vec!["only"]);
        assert_eq!(s.items[0].from, 5);

        assert!(source.suggest("repo:so", 7).await.items.is_empty());
    }

    #[tokio::test]
    async fn test_context_values_respect_namespaces() {
        let anonymous = SuggestionSource::new(deps(None));
        let s = anonymous.suggest("context:", 8).await;
        assert_eq!(labels(&s), vec!["global"]);

        let alice = Arc::new(AuthenticatedUser::new("u1", "alice"));
        let signed_in = SuggestionSource::new(deps(Some(alice)));
        let s = signed_in.suggest("context:@a", 10).await;
        assert_eq!(labels(&s), vec!["@alice", "@alice/work"]);
        assert!(!s.error);

        let member = Arc::new(AuthenticatedUser::new("u1", "alice").with_organization("u2"));
        let with_org = SuggestionSource::new(deps(Some(member)));
        let s = with_org.suggest("context:@", 9).await;
        assert_eq!(labels(&s), vec!["@alice", "@alice/work", "@bob"]);
    }

    #[tokio::test]
    async fn test_fetch_failure_degrades_to_empty() {
        let mut d = deps(None);
        d.fetch_search_contexts = Arc::new(FailingContexts);
        let source = SuggestionSource::new(d);

        let s = source.suggest("context:glo", 11).await;
        assert!(s.items.is_empty());
        assert!(s.error);
    }

    #[test]
    fn test_cache_rebuilds_only_on_identity_change() {
        let cache = SuggestionSourceCache::new();
        let d = deps(None);

        let first = cache.get(&d);
        let again = cache.get(&d.clone());
        assert!(Arc::ptr_eq(&first, &again));

        let mut changed = d.clone();
        changed.authenticated_user = Some(Arc::new(AuthenticatedUser::new("u1", "alice")));
        let rebuilt = cache.get(&changed);
        assert!(!Arc::ptr_eq(&first, &rebuilt));

        // Equal value, different instance
        let mut copied = changed.clone();
        copied.platform_context = Arc::new((*changed.platform_context).clone());
        assert!(!Arc::ptr_eq(&rebuilt, &cache.get(&copied)));
    }

    #[test]
    fn test_stale_requests_are_discarded() {
        let requests = SuggestionRequests::new();
        let older = requests.begin();
        let newer = requests.begin();

        // Newer completes first, older arrives late
        assert_eq!(requests.accept(newer, "ab"), Some("ab"));
        assert_eq!(requests.accept(older, "a"), None);

        let last = requests.begin();
        requests.teardown();
        assert_eq!(requests.accept(last, "abc"), None);
    }
}
