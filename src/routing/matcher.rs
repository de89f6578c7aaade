//! Path pattern matching.
//!
//! # Responsibilities
//! - Compile route patterns into segments
//! - Match exact (identical path) and prefix (path plus any sub-path) modes
//! - Capture `:name` segment parameters and a trailing `:name+` catch-all
//!
//! # Design Decisions
//! - Path matching is case-sensitive
//! - Prefix matching is segment-aligned: `/repo` matches `/repo/a/b`, never `/repository`
//! - A single trailing slash on the request path is ignored
//! - No regex, matching is linear in the number of segments

use std::collections::BTreeMap;
use thiserror::Error;

/// Parameters captured while matching a path.
pub type RouteParams = BTreeMap<String, String>;

/// Reasons a route pattern fails to compile.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("pattern must start with '/'")]
    MissingLeadingSlash,

    #[error("pattern contains an empty segment")]
    EmptySegment,

    #[error("parameter at segment {0} has no name")]
    EmptyParamName(usize),

    #[error("catch-all parameter '{0}' must be the last segment")]
    CatchAllNotLast(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
    CatchAll(String),
}

/// A compiled route pattern such as `/users/:username` or `/:repoRevAndRest+`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    raw: String,
    segments: Vec<Segment>,
}

impl PathPattern {
    /// Compile a pattern. Fails on malformed input so tables are rejected at startup.
    pub fn parse(raw: &str) -> Result<Self, PatternError> {
        let rest = raw
            .strip_prefix('/')
            .ok_or(PatternError::MissingLeadingSlash)?;

        let mut segments = Vec::new();
        if !rest.is_empty() {
            let parts: Vec<&str> = rest.split('/').collect();
            let last = parts.len() - 1;
            for (i, part) in parts.into_iter().enumerate() {
                let segment = if let Some(name) = part.strip_prefix(':') {
                    if let Some(name) = name.strip_suffix('+') {
                        if name.is_empty() {
                            return Err(PatternError::EmptyParamName(i));
                        }
                        if i != last {
                            return Err(PatternError::CatchAllNotLast(name.to_string()));
                        }
                        Segment::CatchAll(name.to_string())
                    } else {
                        if name.is_empty() {
                            return Err(PatternError::EmptyParamName(i));
                        }
                        Segment::Param(name.to_string())
                    }
                } else {
                    if part.is_empty() {
                        return Err(PatternError::EmptySegment);
                    }
                    Segment::Literal(part.to_string())
                };
                segments.push(segment);
            }
        }

        Ok(Self {
            raw: raw.to_string(),
            segments,
        })
    }

    /// The pattern as written in the route table.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Match `path` against this pattern.
    ///
    /// Returns the captured parameters on success. With `exact` the path must have
    /// exactly as many segments as the pattern; otherwise deeper sub-paths match too.
    pub fn matches(&self, path: &str, exact: bool) -> Option<RouteParams> {
        let path_segments = split_path(path);
        let mut params = RouteParams::new();

        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Literal(expected) => {
                    if path_segments.get(i) != Some(&expected.as_str()) {
                        return None;
                    }
                }
                Segment::Param(name) => {
                    let value = path_segments.get(i).filter(|v| !v.is_empty())?;
                    params.insert(name.clone(), (*value).to_string());
                }
                Segment::CatchAll(name) => {
                    let rest = path_segments.get(i..).filter(|r| !r.is_empty())?;
                    params.insert(name.clone(), rest.join("/"));
                    return Some(params);
                }
            }
        }

        let consumed = self.segments.len();
        let matched = if exact {
            path_segments.len() == consumed
        } else {
            path_segments.len() >= consumed
        };
        matched.then_some(params)
    }
}

/// Split a request path into segments, dropping any query string or fragment.
fn split_path(path: &str) -> Vec<&str> {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let path = path.strip_prefix('/').unwrap_or(path);
    let path = path.strip_suffix('/').unwrap_or(path);
    if path.is_empty() {
        Vec::new()
    } else {
        path.split('/').collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_is_segment_aligned() {
        let pattern = PathPattern::parse("/repo").unwrap();

        assert!(pattern.matches("/repo", false).is_some());
        assert!(pattern.matches("/repo/sub/path", false).is_some());
        assert!(pattern.matches("/repository", false).is_none());
        assert!(pattern.matches("/", false).is_none());
    }

    #[test]
    fn test_exact_requires_identical_path() {
        let pattern = PathPattern::parse("/search").unwrap();

        assert!(pattern.matches("/search", true).is_some());
        assert!(pattern.matches("/search/", true).is_some());
        assert!(pattern.matches("/search?q=foo", true).is_some());
        assert!(pattern.matches("/search/console", true).is_none());
        assert!(pattern.matches("/searches", true).is_none());
    }

    #[test]
    fn test_root_pattern() {
        let root = PathPattern::parse("/").unwrap();

        assert!(root.matches("/", true).is_some());
        assert!(root.matches("/anything", true).is_none());
        // Non-exact root is a wildcard
        assert!(root.matches("/anything/else", false).is_some());
    }

    #[test]
    fn test_params_are_captured() {
        let pattern = PathPattern::parse("/users/:username").unwrap();

        let params = pattern.matches("/users/alice/settings", false).unwrap();
        assert_eq!(params.get("username").map(String::as_str), Some("alice"));
        assert!(pattern.matches("/users/alice/settings", true).is_none());
        assert!(pattern.matches("/users", false).is_none());
    }

    #[test]
    fn test_catch_all_takes_remaining_segments() {
        let pattern = PathPattern::parse("/:repoRevAndRest+").unwrap();

        let params = pattern
            .matches("/github.com/foo/bar@main/-/blob/README.md", false)
            .unwrap();
        assert_eq!(
            params.get("repoRevAndRest").map(String::as_str),
            Some("github.com/foo/bar@main/-/blob/README.md")
        );
        assert!(pattern.matches("/", false).is_none());
    }

    #[test]
    fn test_malformed_patterns() {
        assert_eq!(
            PathPattern::parse("search"),
            Err(PatternError::MissingLeadingSlash)
        );
        assert_eq!(PathPattern::parse("/a//b"), Err(PatternError::EmptySegment));
        assert_eq!(PathPattern::parse("/users/:"), Err(PatternError::EmptyParamName(1)));
        assert_eq!(
            PathPattern::parse("/:rest+/tail"),
            Err(PatternError::CatchAllNotLast("rest".to_string()))
        );
    }
}
