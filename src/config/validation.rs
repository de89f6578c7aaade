//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (log level, site URL scheme)
//! - Detect contradictory settings (structural default with structural search disabled)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: FrontendConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use thiserror::Error;

use crate::config::schema::{Enablement, FrontendConfig};
use crate::search::query::PatternType;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("site.sourcegraph_url '{0}' is not a valid http(s) URL")]
    InvalidSiteUrl(String),

    #[error("observability.log_level '{0}' is not one of trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("search.pattern_type is structural but site.structural_search is disabled")]
    StructuralDefaultDisabled,
}

/// Check a parsed configuration, collecting every problem found.
pub fn validate_config(config: &FrontendConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match url::Url::parse(&config.site.sourcegraph_url) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        _ => errors.push(ValidationError::InvalidSiteUrl(
            config.site.sourcegraph_url.clone(),
        )),
    }

    let level = config.observability.log_level.to_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::InvalidLogLevel(
            config.observability.log_level.clone(),
        ));
    }

    if config.search.pattern_type == PatternType::Structural
        && config.site.structural_search == Enablement::Disabled
    {
        errors.push(ValidationError::StructuralDefaultDisabled);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
