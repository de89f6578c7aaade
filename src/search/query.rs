//! Search query parameters and the submittability check.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Query syntax dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternType {
    #[default]
    Standard,
    Literal,
    Regexp,
    Structural,
    Lucky,
    Keyword,
}

impl PatternType {
    pub const ALL: [PatternType; 6] = [
        PatternType::Standard,
        PatternType::Literal,
        PatternType::Regexp,
        PatternType::Structural,
        PatternType::Lucky,
        PatternType::Keyword,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PatternType::Standard => "standard",
            PatternType::Literal => "literal",
            PatternType::Regexp => "regexp",
            PatternType::Structural => "structural",
            PatternType::Lucky => "lucky",
            PatternType::Keyword => "keyword",
        }
    }
}

impl fmt::Display for PatternType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PatternType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PatternType::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown pattern type '{}'", s))
    }
}

/// Whether the backend may rewrite the query to find more results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    #[default]
    Precise,
    #[serde(rename = "smart")]
    SmartSearch,
}

impl SearchMode {
    /// Value of the `sm` URL parameter.
    pub fn url_value(&self) -> &'static str {
        match self {
            SearchMode::Precise => "0",
            SearchMode::SmartSearch => "1",
        }
    }
}

/// The part of the shared query state the search input reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ProjectedQueryState {
    pub pattern_type: PatternType,
    pub case_sensitive: bool,
    pub search_mode: SearchMode,
}

/// Where a submission came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SubmissionSource {
    Home,
    Nav,
    Filter,
    Type,
    Reference,
    Scope,
    Repo,
    Tree,
    ExcludedResults,
}

impl SubmissionSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionSource::Home => "home",
            SubmissionSource::Nav => "nav",
            SubmissionSource::Filter => "filter",
            SubmissionSource::Type => "type",
            SubmissionSource::Reference => "reference",
            SubmissionSource::Scope => "scope",
            SubmissionSource::Repo => "repo",
            SubmissionSource::Tree => "tree",
            SubmissionSource::ExcludedResults => "excludedResults",
        }
    }
}

/// A fully specified search request. Built once per submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmitSearchParameters {
    query: String,
    pattern_type: PatternType,
    case_sensitive: bool,
    search_mode: SearchMode,
    selected_search_context_spec: Option<String>,
    source: SubmissionSource,
}

impl SubmitSearchParameters {
    pub fn new(
        query: impl Into<String>,
        state: ProjectedQueryState,
        selected_search_context_spec: Option<String>,
        source: SubmissionSource,
    ) -> Self {
        Self {
            query: query.into(),
            pattern_type: state.pattern_type,
            case_sensitive: state.case_sensitive,
            search_mode: state.search_mode,
            selected_search_context_spec,
            source,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn pattern_type(&self) -> PatternType {
        self.pattern_type
    }

    pub fn case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    pub fn search_mode(&self) -> SearchMode {
        self.search_mode
    }

    pub fn selected_search_context_spec(&self) -> Option<&str> {
        self.selected_search_context_spec.as_deref()
    }

    pub fn source(&self) -> SubmissionSource {
        self.source
    }
}

/// Caller-supplied values that win over computed defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmitOverrides {
    pub query: Option<String>,
    pub pattern_type: Option<PatternType>,
    pub case_sensitive: Option<bool>,
    pub search_mode: Option<SearchMode>,
    /// `Some(None)` explicitly clears the context.
    pub selected_search_context_spec: Option<Option<String>>,
    pub source: Option<SubmissionSource>,
}

impl SubmitOverrides {
    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn pattern_type(mut self, pattern_type: PatternType) -> Self {
        self.pattern_type = Some(pattern_type);
        self
    }

    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = Some(case_sensitive);
        self
    }

    pub fn search_mode(mut self, search_mode: SearchMode) -> Self {
        self.search_mode = Some(search_mode);
        self
    }

    pub fn search_context(mut self, spec: Option<String>) -> Self {
        self.selected_search_context_spec = Some(spec);
        self
    }

    pub fn source(mut self, source: SubmissionSource) -> Self {
        self.source = Some(source);
        self
    }

    /// Merge onto `defaults`; every override that is set wins.
    pub fn apply(self, defaults: SubmitSearchParameters) -> SubmitSearchParameters {
        SubmitSearchParameters {
            query: self.query.unwrap_or(defaults.query),
            pattern_type: self.pattern_type.unwrap_or(defaults.pattern_type),
            case_sensitive: self.case_sensitive.unwrap_or(defaults.case_sensitive),
            search_mode: self.search_mode.unwrap_or(defaults.search_mode),
            selected_search_context_spec: self
                .selected_search_context_spec
                .unwrap_or(defaults.selected_search_context_spec),
            source: self.source.unwrap_or(defaults.source),
        }
    }
}

/// Whether `query` may be submitted.
///
/// Only the trimmed query matters; a selected context is resolved by the backend.
pub fn can_submit(query: &str, _selected_search_context_spec: Option<&str>) -> bool {
    !query.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_can_submit() {
        assert!(!can_submit("", Some("global")));
        assert!(!can_submit("  ", None));
        assert!(!can_submit("\t\n", Some("@alice")));
        assert!(can_submit("foo", None));
        assert!(can_submit(" foo ", Some("repo:foo")));
    }

    #[test]
    fn test_overrides_win() {
        let defaults = SubmitSearchParameters::new(
            "foo",
            ProjectedQueryState::default(),
            Some("global".to_string()),
            SubmissionSource::Home,
        );

        let merged = SubmitOverrides::default()
            .case_sensitive(true)
            .pattern_type(PatternType::Regexp)
            .search_context(None)
            .apply(defaults.clone());

        assert_eq!(merged.query(), "foo");
        assert!(merged.case_sensitive());
        assert_eq!(merged.pattern_type(), PatternType::Regexp);
        assert_eq!(merged.selected_search_context_spec(), None);
        assert_eq!(merged.source(), SubmissionSource::Home);

        assert_eq!(SubmitOverrides::default().apply(defaults.clone()), defaults);
    }

    #[test]
    fn test_pattern_type_parse() {
        assert_eq!("REGEXP".parse::<PatternType>(), Ok(PatternType::Regexp));
        assert!("fuzzy".parse::<PatternType>().is_err());
    }
}
