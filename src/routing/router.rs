//! Route lookup and dispatch.
//!
//! # Responsibilities
//! - Walk the route table in order and pick the first matching entry
//! - Skip entries whose condition is false, as if they were absent
//! - Turn the matched entry's render form into a terminal resolution
//!
//! # Design Decisions
//! - Table is immutable after construction; the lazy cache is the only shared state
//! - Explicit NotFound rather than silent default
//! - No retries: every resolution ends in a terminal state

use std::fmt;

use crate::observability::metrics;
use crate::routing::context::RequestContext;
use crate::routing::lazy::{Acquired, LazyCache, LazyKey, PendingPage};
use crate::routing::matcher::RouteParams;
use crate::routing::route::{LoadError, PageDescriptor, RouteRender};
use crate::routing::table::{CompiledRoute, RouteId, RouteTable};

/// Content of a resolved route.
#[derive(Debug)]
pub enum Page {
    Ready(PageDescriptor),
    /// The implementation is loading; show a placeholder until `PendingPage::wait` settles.
    Loading(PendingPage),
    /// The implementation failed to load for this route.
    LoadError(LoadError),
}

/// A successful match.
#[derive(Debug)]
pub struct RouteMatch {
    pub route: RouteId,
    pub pattern: String,
    pub params: RouteParams,
    pub page: Page,
}

/// Terminal outcome of resolving one path.
#[derive(Debug)]
pub enum Resolution {
    Resolved(RouteMatch),
    Redirecting(String),
    PassThrough,
    NotFound,
}

impl Resolution {
    pub fn outcome(&self) -> &'static str {
        match self {
            Resolution::Resolved(_) => "resolved",
            Resolution::Redirecting(_) => "redirect",
            Resolution::PassThrough => "pass_through",
            Resolution::NotFound => "not_found",
        }
    }
}

/// Resolves request paths against a route table.
pub struct Router {
    table: RouteTable,
    lazy: LazyCache,
}

impl Router {
    pub fn new(table: RouteTable) -> Self {
        Self {
            table,
            lazy: LazyCache::new(),
        }
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    pub fn lazy_cache(&self) -> &LazyCache {
        &self.lazy
    }

    /// Find the first entry matching `path` whose condition holds.
    ///
    /// Returns the route and the context extended with its parameters.
    pub fn match_route(
        &self,
        path: &str,
        ctx: &RequestContext,
    ) -> Option<(&CompiledRoute, RequestContext)> {
        self.table.routes().iter().find_map(|route| {
            let params = route.pattern.matches(path, route.exact)?;
            let route_ctx = ctx.with_params(params);
            match &route.condition {
                Some(condition) if !condition(&route_ctx) => {
                    tracing::trace!(pattern = route.pattern(), "Route condition false, skipping");
                    None
                }
                _ => Some((route, route_ctx)),
            }
        })
    }

    /// Resolve `path` to a terminal state.
    pub fn resolve(&self, path: &str, ctx: &RequestContext) -> Resolution {
        let resolution = match self.match_route(path, ctx) {
            None => Resolution::NotFound,
            Some((route, route_ctx)) => self.render(route, &route.render, route_ctx),
        };

        tracing::debug!(path, outcome = resolution.outcome(), "Route resolved");
        metrics::record_resolution(resolution.outcome());
        resolution
    }

    fn render(
        &self,
        route: &CompiledRoute,
        render: &RouteRender,
        ctx: RequestContext,
    ) -> Resolution {
        let page = match render {
            RouteRender::Redirect(target) => return Resolution::Redirecting(target.clone()),
            RouteRender::PassThrough => return Resolution::PassThrough,
            RouteRender::Page(render) => Page::Ready(render(&ctx)),
            RouteRender::Lazy(lazy) => {
                let key = LazyKey::new(route.id, lazy.component());
                match self.lazy.acquire(key, lazy, &ctx) {
                    Acquired::Ready(component) => Page::Ready(component.render(&ctx)),
                    Acquired::Pending(pending) => Page::Loading(pending),
                    Acquired::Failed(error) => Page::LoadError(error),
                }
            }
            RouteRender::Dynamic(choose) => match choose(&ctx) {
                RouteRender::Dynamic(_) => {
                    tracing::warn!(
                        pattern = route.pattern(),
                        "Dynamic route chose another dynamic render, treating as not found"
                    );
                    return Resolution::NotFound;
                }
                chosen => return self.render(route, &chosen, ctx),
            },
        };

        Resolution::Resolved(RouteMatch {
            route: route.id,
            pattern: route.pattern().to_string(),
            params: ctx.params().clone(),
            page,
        })
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("routes", &self.table.len())
            .field("lazy", &self.lazy)
            .finish()
    }
}
