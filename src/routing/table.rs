//! Route table construction.
//!
//! # Responsibilities
//! - Collect route entries and spread-in route groups in declaration order
//! - Drop absent entries (groups that contribute nothing) before resolution
//! - Compile and validate every pattern and redirect target once, at startup
//!
//! # Design Decisions
//! - Returns all problems found, not just the first
//! - The built table has no holes and is immutable
//! - Pattern uniqueness is not enforced; earlier entries shadow later ones

use serde::Serialize;
use std::fmt;
use thiserror::Error;

use crate::routing::matcher::{PathPattern, PatternError};
use crate::routing::route::{Condition, RouteEntry, RouteRender};

/// Stable identity of a route: its position in the built table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct RouteId(pub usize);

impl fmt::Display for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A single problem found while building a table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteIssue {
    #[error("route '{path}': {source}")]
    Pattern {
        path: String,
        #[source]
        source: PatternError,
    },

    #[error("route '{path}': redirect target '{target}' must be an absolute path")]
    InvalidRedirect { path: String, target: String },
}

/// The table failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid route table: {}", join_issues(.issues))]
pub struct RouteTableError {
    pub issues: Vec<RouteIssue>,
}

fn join_issues(issues: &[RouteIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// A validated route ready for matching.
#[derive(Clone)]
pub struct CompiledRoute {
    pub(crate) id: RouteId,
    pub(crate) pattern: PathPattern,
    pub(crate) exact: bool,
    pub(crate) condition: Option<Condition>,
    pub(crate) render: RouteRender,
}

impl CompiledRoute {
    pub fn id(&self) -> RouteId {
        self.id
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn is_exact(&self) -> bool {
        self.exact
    }

    pub fn is_conditional(&self) -> bool {
        self.condition.is_some()
    }
}

impl fmt::Debug for CompiledRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledRoute")
            .field("id", &self.id)
            .field("pattern", &self.pattern.as_str())
            .field("exact", &self.exact)
            .field("conditional", &self.condition.is_some())
            .field("render", &self.render)
            .finish()
    }
}

/// An ordered, validated route table. First match wins.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<CompiledRoute>,
}

impl RouteTable {
    pub fn builder() -> RouteTableBuilder {
        RouteTableBuilder::default()
    }

    pub fn routes(&self) -> &[CompiledRoute] {
        &self.routes
    }

    pub fn get(&self, id: RouteId) -> Option<&CompiledRoute> {
        self.routes.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// Accumulates entries, possibly absent, in declaration order.
#[derive(Debug, Default)]
pub struct RouteTableBuilder {
    entries: Vec<Option<RouteEntry>>,
}

impl RouteTableBuilder {
    pub fn route(mut self, entry: RouteEntry) -> Self {
        self.entries.push(Some(entry));
        self
    }

    /// Add an entry that may be statically absent (e.g. a disabled feature).
    pub fn optional(mut self, entry: Option<RouteEntry>) -> Self {
        self.entries.push(entry);
        self
    }

    /// Spread in a group of entries contributed by another module.
    pub fn group<I>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = Option<RouteEntry>>,
    {
        self.entries.extend(entries);
        self
    }

    /// Drop holes, compile patterns, and validate redirect targets.
    pub fn build(self) -> Result<RouteTable, RouteTableError> {
        let mut routes = Vec::new();
        let mut issues = Vec::new();
        let declared = self.entries.len();

        for entry in self.entries.into_iter().flatten() {
            if let RouteRender::Redirect(target) = &entry.render {
                if !target.starts_with('/') {
                    issues.push(RouteIssue::InvalidRedirect {
                        path: entry.path.clone(),
                        target: target.clone(),
                    });
                }
            }

            match PathPattern::parse(&entry.path) {
                Ok(pattern) => routes.push(CompiledRoute {
                    id: RouteId(routes.len()),
                    pattern,
                    exact: entry.exact,
                    condition: entry.condition,
                    render: entry.render,
                }),
                Err(source) => issues.push(RouteIssue::Pattern {
                    path: entry.path,
                    source,
                }),
            }
        }

        if !issues.is_empty() {
            return Err(RouteTableError { issues });
        }

        tracing::debug!(
            declared,
            active = routes.len(),
            "Route table built"
        );
        Ok(RouteTable { routes })
    }
}
