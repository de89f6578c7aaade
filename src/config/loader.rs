//! Configuration loading from disk.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::schema::FrontendConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<FrontendConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<FrontendConfig, ConfigError> {
    let config: FrontendConfig = toml::from_str(content)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::QueryInputKind;
    use crate::search::query::{PatternType, SearchMode};
    use std::io::Write;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = parse_config(
            r#"
            [experimental_features]
            search_query_input = "experimental"

            [search]
            pattern_type = "regexp"
            search_mode = "smart"
            "#,
        )
        .unwrap();

        assert_eq!(
            config.experimental_features.search_query_input,
            QueryInputKind::Experimental
        );
        assert!(config.experimental_features.apply_search_query_suggestion_on_enter);
        assert_eq!(config.search.pattern_type, PatternType::Regexp);
        assert_eq!(config.search.search_mode, SearchMode::SmartSearch);
        assert!(!config.site.is_sourcegraph_dot_com);
    }

    #[test]
    fn test_validation_errors_surface() {
        let err = parse_config(
            r#"
            [observability]
            log_level = "chatty"
            "#,
        )
        .unwrap_err();

        assert!(matches!(err, ConfigError::Validation(ref errors) if errors.len() == 1));
        assert!(err.to_string().contains("chatty"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[site]\nis_sourcegraph_dot_com = true").unwrap();

        let config = load_config(file.path()).unwrap();
        assert!(config.site.is_sourcegraph_dot_com);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_config(Path::new("/nonexistent/search-shell.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
