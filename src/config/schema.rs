//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the search front-end.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::search::query::{PatternType, SearchMode};

/// Root configuration for the search front-end.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct FrontendConfig {
    /// Server-provided site context (what the page would read from `window.context`).
    pub site: SiteConfig,

    /// Experimental feature toggles read through the feature-flag source.
    pub experimental_features: ExperimentalFeatures,

    /// Initial values for the shared query state.
    pub search: SearchDefaults,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Site-wide context supplied by the server.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct SiteConfig {
    /// Public URL of the instance.
    pub sourcegraph_url: String,

    /// True when running as the public sourcegraph.com instance.
    pub is_sourcegraph_dot_com: bool,

    /// Which users may add external services.
    pub external_services_user_mode: ExternalServicesUserMode,

    /// Whether the structural pattern type is offered.
    pub structural_search: Enablement,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            sourcegraph_url: "http://localhost:3080".to_string(),
            is_sourcegraph_dot_com: false,
            external_services_user_mode: ExternalServicesUserMode::Disabled,
            structural_search: Enablement::Enabled,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExternalServicesUserMode {
    #[default]
    Disabled,
    Public,
    All,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Enablement {
    #[default]
    Enabled,
    Disabled,
}

/// Which query input widget the search page renders.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum QueryInputKind {
    #[default]
    Standard,
    Experimental,
}

/// Experimental feature toggles.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ExperimentalFeatures {
    /// Selects between the standard search box and the experimental query input.
    pub search_query_input: QueryInputKind,

    /// Enables the multiline search console page.
    pub show_multiline_search_console: bool,

    /// Apply the selected suggestion when Enter is pressed.
    pub apply_search_query_suggestion_on_enter: bool,
}

impl Default for ExperimentalFeatures {
    fn default() -> Self {
        Self {
            search_query_input: QueryInputKind::Standard,
            show_multiline_search_console: false,
            apply_search_query_suggestion_on_enter: true,
        }
    }
}

/// Initial state of the shared query store.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
#[serde(default)]
pub struct SearchDefaults {
    pub pattern_type: PatternType,
    pub case_sensitive: bool,
    pub search_mode: SearchMode,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Include span events and targets in log lines.
    pub verbose: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            verbose: false,
        }
    }
}
