//! Mounting resolved routes.
//!
//! # Responsibilities
//! - Drive one navigation from path to mounted content
//! - Follow client-side redirects through the navigator
//! - Hand pass-through paths to the server with a hard reload
//! - Render the not-found page for unmatched paths
//!
//! # Design Decisions
//! - Redirect chains are bounded; a loop mounts an error page instead of spinning
//! - Pass-through never renders client content first

use std::sync::Arc;

use crate::routing::context::RequestContext;
use crate::routing::lazy::PendingPage;
use crate::routing::route::{LoadError, PageDescriptor};
use crate::routing::router::{Page, Resolution, Router};

pub const NOT_FOUND_COMPONENT: &str = "NotFoundPage";
pub const LOADING_COMPONENT: &str = "LoadingSpinner";
pub const ERROR_COMPONENT: &str = "ErrorBoundary";

const DEFAULT_MAX_REDIRECTS: usize = 8;

/// Browser-level navigation effects.
pub trait Navigator: Send + Sync {
    /// Replace the current history entry with `path` (client-side redirect).
    fn replace(&self, path: &str);

    /// Reload the document at `path` so the server handles it.
    fn hard_reload(&self, path: &str);
}

/// What the outlet shows after a navigation.
#[derive(Debug)]
pub enum Mounted {
    Page(PageDescriptor),
    Loading {
        placeholder: PageDescriptor,
        pending: PendingPage,
    },
    LoadError {
        page: PageDescriptor,
        error: LoadError,
    },
    NotFound(PageDescriptor),
    /// A hard reload was issued; nothing is rendered on the client.
    Reloading,
}

impl Mounted {
    /// The descriptor currently on screen, if any.
    pub fn descriptor(&self) -> Option<&PageDescriptor> {
        match self {
            Mounted::Page(page) | Mounted::NotFound(page) => Some(page),
            Mounted::Loading { placeholder, .. } => Some(placeholder),
            Mounted::LoadError { page, .. } => Some(page),
            Mounted::Reloading => None,
        }
    }
}

/// The main content area: resolves paths and mounts the result.
pub struct RouteOutlet {
    router: Arc<Router>,
    navigator: Arc<dyn Navigator>,
    max_redirects: usize,
}

impl RouteOutlet {
    pub fn new(router: Arc<Router>, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            router,
            navigator,
            max_redirects: DEFAULT_MAX_REDIRECTS,
        }
    }

    pub fn with_max_redirects(mut self, max_redirects: usize) -> Self {
        self.max_redirects = max_redirects;
        self
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Resolve `path` and mount the result without waiting for lazy loads.
    pub fn navigate(&self, path: &str, ctx: &RequestContext) -> Mounted {
        let mut current = path.to_string();
        let mut hops = 0;

        loop {
            match self.router.resolve(&current, ctx) {
                Resolution::Redirecting(target) => {
                    if hops == self.max_redirects {
                        tracing::error!(path, to = %target, max = self.max_redirects, "Redirect limit exceeded");
                        return Mounted::LoadError {
                            page: PageDescriptor::new(ERROR_COMPONENT)
                                .with_prop("reason", "redirect loop"),
                            error: LoadError::new(path, "redirect limit exceeded"),
                        };
                    }
                    tracing::debug!(from = %current, to = %target, "Redirecting");
                    self.navigator.replace(&target);
                    current = target;
                    hops += 1;
                }
                Resolution::PassThrough => {
                    tracing::info!(path = %current, "Passing navigation through to server");
                    self.navigator.hard_reload(&current);
                    return Mounted::Reloading;
                }
                Resolution::NotFound => {
                    return Mounted::NotFound(
                        PageDescriptor::new(NOT_FOUND_COMPONENT).with_prop("path", current),
                    );
                }
                Resolution::Resolved(matched) => {
                    return match matched.page {
                        Page::Ready(page) => Mounted::Page(page),
                        Page::Loading(pending) => Mounted::Loading {
                            placeholder: PageDescriptor::new(LOADING_COMPONENT)
                                .with_prop("component", pending.component()),
                            pending,
                        },
                        Page::LoadError(error) => load_error(error),
                    };
                }
            }
        }
    }

    /// Resolve `path`, mount it, and wait for any lazy load to settle.
    pub async fn navigate_and_load(&self, path: &str, ctx: &RequestContext) -> Mounted {
        match self.navigate(path, ctx) {
            Mounted::Loading { pending, .. } => match pending.wait().await {
                Ok(page) => Mounted::Page(page),
                Err(error) => load_error(error),
            },
            mounted => mounted,
        }
    }
}

fn load_error(error: LoadError) -> Mounted {
    Mounted::LoadError {
        page: PageDescriptor::new(ERROR_COMPONENT)
            .with_prop("component", error.component.clone())
            .with_prop("reason", error.message.clone()),
        error,
    }
}
