//! Search home page input.
//!
//! # Responsibilities
//! - Own the draft query and the selected search context
//! - Decide whether the draft may be submitted
//! - Build submission parameters from the shared store at submit time
//! - Pick the input widget for the environment
//! - Hand out the memoized suggestion source and filter stale results
//!
//! # Design Decisions
//! - Shared state is read when `submit` runs, never cached from an earlier render
//! - The experimental input never forwards the selected context (global unless explicit)
//! - Environment signals are evaluated once, at construction

use serde::Serialize;
use std::sync::Arc;

use crate::config::{Enablement, ExternalServicesUserMode};
use crate::observability::metrics;
use crate::search::environment::InputEnvironment;
use crate::search::navigation::NavigationDispatcher;
use crate::search::query::{
    can_submit, PatternType, SearchMode, SubmissionSource, SubmitOverrides,
    SubmitSearchParameters,
};
use crate::search::recent::{NoRecentSearches, RecentSearchSource};
use crate::search::store::QueryStateStore;
use crate::search::suggestions::{
    SuggestionDeps, SuggestionRequests, SuggestionSource, SuggestionSourceCache, Suggestions,
};

pub const EXPERIMENTAL_PLACEHOLDER: &str = "Search for code or files...";

/// Inputs of the standard search box.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchBoxProps {
    pub show_search_context: bool,
    pub show_search_context_management: bool,
    pub case_sensitive: bool,
    pub pattern_type: PatternType,
    pub search_mode: SearchMode,
    pub auto_focus: bool,
    pub is_external_services_user_mode_all: bool,
    pub structural_search_disabled: bool,
    pub apply_suggestions_on_enter: bool,
    pub show_search_history: bool,
    /// Most recent first.
    pub recent_searches: Vec<String>,
}

/// Inputs of the experimental query input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExperimentalInputProps {
    pub pattern_type: PatternType,
    pub interpret_comments: bool,
    pub placeholder: &'static str,
}

/// The two mutually exclusive input widgets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "widget", rename_all = "camelCase")]
pub enum InputWidget {
    SearchBox(SearchBoxProps),
    Experimental(ExperimentalInputProps),
}

/// Construction options for [`SearchInputController`].
pub struct SearchInputOptions {
    pub store: Arc<dyn QueryStateStore>,
    pub dispatcher: NavigationDispatcher,
    pub environment: InputEnvironment,
    pub source: SubmissionSource,
    pub search_contexts_enabled: bool,
    pub selected_search_context_spec: Option<String>,
    /// Caller-requested autofocus; still suppressed on touch-only devices.
    pub auto_focus: bool,
}

/// State and behavior behind the search page input.
pub struct SearchInputController {
    draft: String,
    selected_search_context_spec: Option<String>,
    store: Arc<dyn QueryStateStore>,
    dispatcher: NavigationDispatcher,
    environment: InputEnvironment,
    source: SubmissionSource,
    search_contexts_enabled: bool,
    auto_focus: bool,
    recent_searches: Arc<dyn RecentSearchSource>,
    suggestion_sources: SuggestionSourceCache,
    suggestion_requests: SuggestionRequests,
}

impl SearchInputController {
    pub fn new(options: SearchInputOptions) -> Self {
        Self {
            draft: String::new(),
            selected_search_context_spec: options.selected_search_context_spec,
            store: options.store,
            dispatcher: options.dispatcher,
            environment: options.environment,
            source: options.source,
            search_contexts_enabled: options.search_contexts_enabled,
            auto_focus: options.auto_focus,
            recent_searches: Arc::new(NoRecentSearches),
            suggestion_sources: SuggestionSourceCache::new(),
            suggestion_requests: SuggestionRequests::new(),
        }
    }

    /// Use `recent` for the search box's history menu.
    pub fn with_recent_searches(mut self, recent: Arc<dyn RecentSearchSource>) -> Self {
        self.recent_searches = recent;
        self
    }

    pub fn query(&self) -> &str {
        &self.draft
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.draft = query.into();
    }

    pub fn selected_search_context_spec(&self) -> Option<&str> {
        self.selected_search_context_spec.as_deref()
    }

    pub fn select_search_context(&mut self, spec: Option<String>) {
        self.selected_search_context_spec = spec;
    }

    pub fn environment(&self) -> &InputEnvironment {
        &self.environment
    }

    pub fn can_submit(&self) -> bool {
        can_submit(&self.draft, self.selected_search_context_spec.as_deref())
    }

    /// Submit the draft with optional overrides. A no-op when nothing is submittable.
    pub fn submit(&self, overrides: SubmitOverrides) {
        let state = self.store.projected_state();
        let context = if self.environment.experimental_input {
            None
        } else {
            self.selected_search_context_spec.clone()
        };

        let params = overrides.apply(SubmitSearchParameters::new(
            self.draft.clone(),
            state,
            context,
            self.source,
        ));

        if !can_submit(params.query(), params.selected_search_context_spec()) {
            tracing::trace!("Empty query, not submitting");
            return;
        }

        tracing::debug!(
            query = params.query(),
            pattern_type = %params.pattern_type(),
            source = params.source().as_str(),
            "Submitting search"
        );
        metrics::record_submission(params.source().as_str());
        self.dispatcher.dispatch(params);
    }

    /// Form submit handler.
    pub fn on_submit(&self) {
        self.submit(SubmitOverrides::default());
    }

    pub fn toggle_case_sensitivity(&self) {
        let current = self.store.projected_state().case_sensitive;
        self.store.set_case_sensitivity(!current);
    }

    pub fn set_pattern_type(&self, pattern_type: PatternType) {
        self.store.set_pattern_type(pattern_type);
    }

    pub fn set_search_mode(&self, search_mode: SearchMode) {
        self.store.set_search_mode(search_mode);
    }

    /// Describe the widget to render with the current shared state.
    pub fn input_widget(&self) -> InputWidget {
        let state = self.store.projected_state();
        let env = &self.environment;

        if env.experimental_input {
            return InputWidget::Experimental(ExperimentalInputProps {
                pattern_type: state.pattern_type,
                interpret_comments: false,
                placeholder: EXPERIMENTAL_PLACEHOLDER,
            });
        }

        InputWidget::SearchBox(SearchBoxProps {
            show_search_context: self.search_contexts_enabled,
            show_search_context_management: true,
            case_sensitive: state.case_sensitive,
            pattern_type: state.pattern_type,
            search_mode: state.search_mode,
            auto_focus: !env.touch_only && self.auto_focus,
            is_external_services_user_mode_all: env.site.external_services_user_mode
                == ExternalServicesUserMode::All,
            structural_search_disabled: env.site.structural_search == Enablement::Disabled,
            apply_suggestions_on_enter: env.apply_suggestions_on_enter,
            show_search_history: true,
            recent_searches: self.recent_searches.recent_searches(),
        })
    }

    /// The suggestion source for `deps`, rebuilt only when a dependency changes identity.
    pub fn suggestion_source(&self, deps: &SuggestionDeps) -> Arc<SuggestionSource> {
        self.suggestion_sources.get(deps)
    }

    /// Fetch suggestions for the current draft.
    ///
    /// Returns `None` when a newer request started meanwhile or the input was torn down.
    pub async fn fetch_suggestions(
        &self,
        deps: &SuggestionDeps,
        position: usize,
    ) -> Option<Suggestions> {
        let ticket = self.suggestion_requests.begin();
        let source = self.suggestion_source(deps);
        let query = self.draft.clone();
        let suggestions = source.suggest(&query, position).await;
        self.suggestion_requests.accept(ticket, suggestions)
    }

    /// The input is unmounted; in-flight suggestion results are dropped on arrival.
    pub fn teardown(&self) {
        self.suggestion_requests.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigFeatureFlags, ExperimentalFeatures, QueryInputKind, SiteConfig};
    use crate::search::environment::StaticEnvironment;
    use crate::search::navigation::{self, NavigationReceiver};
    use crate::search::store::InMemoryQueryStore;

    fn controller(
        experimental: bool,
        env: StaticEnvironment,
    ) -> (SearchInputController, NavigationReceiver, Arc<InMemoryQueryStore>) {
        let flags = ConfigFeatureFlags::new(ExperimentalFeatures {
            search_query_input: if experimental {
                QueryInputKind::Experimental
            } else {
                QueryInputKind::Standard
            },
            ..ExperimentalFeatures::default()
        });
        let store = Arc::new(InMemoryQueryStore::default());
        let (dispatcher, receiver) = navigation::channel();
        let controller = SearchInputController::new(SearchInputOptions {
            store: store.clone(),
            dispatcher,
            environment: InputEnvironment::evaluate(&env, &flags),
            source: SubmissionSource::Home,
            search_contexts_enabled: true,
            selected_search_context_spec: Some("repo:foo".to_string()),
            auto_focus: true,
        });
        (controller, receiver, store)
    }

    #[test]
    fn test_empty_draft_is_noop() {
        let (mut c, mut rx, _) = controller(false, StaticEnvironment::desktop(SiteConfig::default()));

        c.on_submit();
        c.set_query("   ");
        c.on_submit();
        assert!(!c.can_submit());
        assert!(rx.try_next().is_none());
    }

    #[test]
    fn test_context_forwarded_only_in_standard_input() {
        let (mut standard, mut rx, _) =
            controller(false, StaticEnvironment::desktop(SiteConfig::default()));
        standard.set_query("foo");
        standard.on_submit();
        assert_eq!(
            rx.try_next().unwrap().selected_search_context_spec(),
            Some("repo:foo")
        );

        let (mut experimental, mut rx, _) =
            controller(true, StaticEnvironment::desktop(SiteConfig::default()));
        experimental.set_query("foo");
        experimental.on_submit();
        assert_eq!(rx.try_next().unwrap().selected_search_context_spec(), None);
    }

    #[test]
    fn test_reads_store_at_submit_time() {
        let (mut c, mut rx, store) = controller(false, StaticEnvironment::desktop(SiteConfig::default()));
        c.set_query("foo");

        store.set_pattern_type(PatternType::Regexp);
        c.toggle_case_sensitivity();
        c.on_submit();

        let params = rx.try_next().unwrap();
        assert_eq!(params.pattern_type(), PatternType::Regexp);
        assert!(params.case_sensitive());
        assert_eq!(params.source(), SubmissionSource::Home);
    }

    #[test]
    fn test_overrides_can_supply_query() {
        let (c, mut rx, _) = controller(false, StaticEnvironment::desktop(SiteConfig::default()));

        c.submit(SubmitOverrides::default().query("lang:go").source(SubmissionSource::Filter));
        let params = rx.try_next().unwrap();
        assert_eq!(params.query(), "lang:go");
        assert_eq!(params.source(), SubmissionSource::Filter);
    }

    #[test]
    fn test_rapid_submits_coalesce() {
        let (mut c, mut rx, _) = controller(false, StaticEnvironment::desktop(SiteConfig::default()));

        c.set_query("a");
        c.on_submit();
        c.set_query("ab");
        c.on_submit();

        assert_eq!(rx.try_next().unwrap().query(), "ab");
        assert!(rx.try_next().is_none());
    }

    #[test]
    fn test_widget_selection() {
        let (touch, _, _) = controller(false, StaticEnvironment::touch(SiteConfig::default()));
        match touch.input_widget() {
            InputWidget::SearchBox(props) => {
                assert!(!props.auto_focus);
                assert!(props.show_search_context);
                assert!(props.apply_suggestions_on_enter);
            }
            other => panic!("unexpected widget: {:?}", other),
        }

        let (desktop, _, _) = controller(false, StaticEnvironment::desktop(SiteConfig::default()));
        assert!(matches!(
            desktop.input_widget(),
            InputWidget::SearchBox(SearchBoxProps { auto_focus: true, .. })
        ));

        let (experimental, _, _) = controller(true, StaticEnvironment::touch(SiteConfig::default()));
        assert!(matches!(
            experimental.input_widget(),
            InputWidget::Experimental(ExperimentalInputProps {
                placeholder: EXPERIMENTAL_PLACEHOLDER,
                ..
            })
        ));
    }

    #[test]
    fn test_search_box_lists_recent_searches() {
        use crate::search::recent::InMemoryRecentSearches;

        let (c, _, _) = controller(false, StaticEnvironment::desktop(SiteConfig::default()));
        match c.input_widget() {
            InputWidget::SearchBox(props) => assert!(props.recent_searches.is_empty()),
            other => panic!("unexpected widget: {:?}", other),
        }

        let recent = Arc::new(InMemoryRecentSearches::new());
        let mut c = c.with_recent_searches(recent.clone());
        recent.record("lang:rust");
        c.set_query("repo:foo");
        recent.record(c.query());

        match c.input_widget() {
            InputWidget::SearchBox(props) => {
                assert!(props.show_search_history);
                assert_eq!(props.recent_searches, vec!["repo:foo", "lang:rust"]);
            }
            other => panic!("unexpected widget: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_suggestions_dropped_after_teardown() {
        use crate::search::suggestions::{StaticSearchContexts, UserNamespaces};
        use crate::session::PlatformContext;

        let (mut c, _, _) = controller(false, StaticEnvironment::desktop(SiteConfig::default()));
        let deps = SuggestionDeps {
            platform_context: Arc::new(PlatformContext::new("https://sourcegraph.test")),
            authenticated_user: None,
            fetch_search_contexts: Arc::new(StaticSearchContexts::new(Vec::new())),
            get_user_namespaces: Arc::new(UserNamespaces),
        };

        c.set_query("la");
        let live = c.fetch_suggestions(&deps, 2).await.unwrap();
        assert_eq!(live.items[0].label, "lang:");
        assert!(Arc::ptr_eq(&c.suggestion_source(&deps), &c.suggestion_source(&deps)));

        c.teardown();
        assert!(c.fetch_suggestions(&deps, 2).await.is_none());
    }
}
