//! Search page input.
//!
//! # Data Flow
//! ```text
//! keystrokes → SearchInputController (draft, selected context)
//!                 │        │
//!                 │        └─→ SuggestionSource (memoized per deps) → Suggestions
//!                 ▼
//!           submit() reads QueryStateStore
//!                 ▼
//!           NavigationDispatcher → NavigationReceiver → NavigationSink
//! ```

pub mod controller;
pub mod environment;
pub mod navigation;
pub mod query;
pub mod recent;
pub mod store;
pub mod suggestions;

pub use controller::{
    ExperimentalInputProps, InputWidget, SearchBoxProps, SearchInputController,
    SearchInputOptions,
};
pub use environment::{EnvironmentProbe, InputEnvironment, StaticEnvironment};
pub use navigation::{build_search_url, NavigationDispatcher, NavigationReceiver, NavigationSink};
pub use query::{
    can_submit, PatternType, ProjectedQueryState, SearchMode, SubmissionSource, SubmitOverrides,
    SubmitSearchParameters,
};
pub use recent::{InMemoryRecentSearches, NoRecentSearches, RecentSearchSource};
pub use store::{InMemoryQueryStore, QueryStateStore};
pub use suggestions::{
    FetchError, NamespaceFetcher, SearchContextDescriptor, SearchContextFetcher,
    StaticSearchContexts, Suggestion, SuggestionDeps, SuggestionKind, SuggestionSource,
    SuggestionSourceCache, Suggestions, UserNamespaces,
};
