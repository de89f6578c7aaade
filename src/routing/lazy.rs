//! Lazy page loading.
//!
//! # Responsibilities
//! - Start a page module load on the first match of its route
//! - Share one in-flight load between concurrent navigations
//! - Memoize loaded implementations and failures per route
//!
//! # Design Decisions
//! - Cache is keyed by route identity and component, never shared across routes
//! - States: NotLoaded (absent) → Loading(shared future) → Loaded | Failed
//! - Failures are sticky for that route; `reset` models a user-initiated reload
//! - Each load carries a generation; a load superseded by `reset` never writes back

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use futures_util::future::{BoxFuture, FutureExt, Shared};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::observability::metrics;
use crate::routing::context::RequestContext;
use crate::routing::route::{LazyPage, LoadError, LoadResult, PageComponent, PageDescriptor};
use crate::routing::table::RouteId;

type SharedLoad = Shared<BoxFuture<'static, LoadResult>>;

/// Cache key for a lazily loaded page.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LazyKey {
    pub route: RouteId,
    pub component: String,
}

impl LazyKey {
    pub fn new(route: RouteId, component: impl Into<String>) -> Self {
        Self {
            route,
            component: component.into(),
        }
    }
}

#[derive(Clone)]
enum LoadState {
    /// `generation` tells this load apart from one started after a `reset`.
    Loading { generation: u64, load: SharedLoad },
    Loaded(Arc<dyn PageComponent>),
    Failed(LoadError),
}

/// Observable state of a cache slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    NotLoaded,
    Loading,
    Loaded,
    Failed,
}

pub(crate) enum Acquired {
    Ready(Arc<dyn PageComponent>),
    Pending(PendingPage),
    Failed(LoadError),
}

/// Per-route cache of page implementations.
#[derive(Clone, Default)]
pub struct LazyCache {
    states: Arc<DashMap<LazyKey, LoadState>>,
    generations: Arc<AtomicU64>,
}

impl LazyCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self, key: &LazyKey) -> LoadStatus {
        match self.states.get(key).as_deref() {
            None => LoadStatus::NotLoaded,
            Some(LoadState::Loading { .. }) => LoadStatus::Loading,
            Some(LoadState::Loaded(_)) => LoadStatus::Loaded,
            Some(LoadState::Failed(_)) => LoadStatus::Failed,
        }
    }

    /// Forget a route's cached state so the next match loads again.
    pub fn reset(&self, key: &LazyKey) {
        self.states.remove(key);
    }

    /// Return the loaded page, the pending load, or the recorded failure,
    /// starting a load if none exists yet.
    pub(crate) fn acquire(&self, key: LazyKey, page: &LazyPage, ctx: &RequestContext) -> Acquired {
        match self.states.entry(key) {
            Entry::Occupied(entry) => match entry.get().clone() {
                LoadState::Loaded(component) => Acquired::Ready(component),
                LoadState::Failed(error) => Acquired::Failed(error),
                LoadState::Loading { load, .. } => Acquired::Pending(PendingPage {
                    key: entry.key().clone(),
                    load,
                    ctx: ctx.clone(),
                }),
            },
            Entry::Vacant(entry) => {
                let key = entry.key().clone();
                tracing::debug!(route = %key.route, component = %key.component, "Starting page load");

                let generation = self.generations.fetch_add(1, Ordering::Relaxed);
                let load = self.track(key.clone(), generation, page.start_load());
                entry.insert(LoadState::Loading {
                    generation,
                    load: load.clone(),
                });
                Acquired::Pending(PendingPage {
                    key,
                    load,
                    ctx: ctx.clone(),
                })
            }
        }
    }

    /// Wrap a load so its outcome is recorded in the cache when it settles.
    ///
    /// The outcome is dropped if the slot was reset or taken over by a newer load.
    fn track(
        &self,
        key: LazyKey,
        generation: u64,
        load: BoxFuture<'static, LoadResult>,
    ) -> SharedLoad {
        let states = Arc::downgrade(&self.states);
        async move {
            let result = load.await;
            let (state, outcome) = match &result {
                Ok(component) => (LoadState::Loaded(component.clone()), "ok"),
                Err(error) => {
                    tracing::warn!(route = %key.route, error = %error, "Page load failed");
                    (LoadState::Failed(error.clone()), "error")
                }
            };
            metrics::record_lazy_load(&key.component, outcome);
            if let Some(states) = states.upgrade() {
                match states.get_mut(&key) {
                    Some(mut slot)
                        if matches!(*slot, LoadState::Loading { generation: g, .. } if g == generation) =>
                    {
                        *slot = state;
                    }
                    _ => tracing::debug!(route = %key.route, "Discarding superseded page load"),
                }
            }
            result
        }
        .boxed()
        .shared()
    }
}

impl fmt::Debug for LazyCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyCache")
            .field("entries", &self.states.len())
            .finish()
    }
}

/// A page whose implementation is still loading.
///
/// Every navigation that matched the route while the load was in flight holds a
/// handle to the same underlying operation.
#[derive(Clone)]
pub struct PendingPage {
    key: LazyKey,
    load: SharedLoad,
    ctx: RequestContext,
}

impl PendingPage {
    pub fn route(&self) -> RouteId {
        self.key.route
    }

    pub fn component(&self) -> &str {
        &self.key.component
    }

    /// Wait for the load and render the page against this navigation's context.
    pub async fn wait(self) -> Result<PageDescriptor, LoadError> {
        let component = self.load.await?;
        Ok(component.render(&self.ctx))
    }
}

impl fmt::Debug for PendingPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingPage")
            .field("route", &self.key.route)
            .field("component", &self.key.component)
            .finish_non_exhaustive()
    }
}
