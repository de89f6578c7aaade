//! Route entries and page descriptors.

use futures_util::future::{BoxFuture, FutureExt};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;

use crate::routing::context::RequestContext;
use crate::routing::matcher::RouteParams;

/// What a page renderer produces: the component to mount and its inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageDescriptor {
    pub component: String,
    pub params: RouteParams,
    pub props: BTreeMap<String, String>,
}

impl PageDescriptor {
    pub fn new(component: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            params: RouteParams::new(),
            props: BTreeMap::new(),
        }
    }

    pub fn with_params(mut self, params: RouteParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_prop(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.props.insert(key.into(), value.into());
        self
    }
}

/// A loaded page implementation.
pub trait PageComponent: Send + Sync + fmt::Debug {
    fn render(&self, ctx: &RequestContext) -> PageDescriptor;
}

/// A page that renders its component name with the matched route parameters.
#[derive(Debug, Clone)]
pub struct StaticPage {
    component: String,
}

impl StaticPage {
    pub fn new(component: impl Into<String>) -> Self {
        Self {
            component: component.into(),
        }
    }
}

impl PageComponent for StaticPage {
    fn render(&self, ctx: &RequestContext) -> PageDescriptor {
        PageDescriptor::new(self.component.clone()).with_params(ctx.params().clone())
    }
}

/// Failure to load a page implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to load page '{component}': {message}")]
pub struct LoadError {
    pub component: String,
    pub message: String,
}

impl LoadError {
    pub fn new(component: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            message: message.into(),
        }
    }
}

pub type LoadResult = Result<Arc<dyn PageComponent>, LoadError>;

type LoaderFn = Arc<dyn Fn() -> BoxFuture<'static, LoadResult> + Send + Sync>;

/// A page whose implementation is fetched on first match.
#[derive(Clone)]
pub struct LazyPage {
    component: String,
    loader: LoaderFn,
}

impl LazyPage {
    pub fn new<F, Fut>(component: impl Into<String>, loader: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = LoadResult> + Send + 'static,
    {
        Self {
            component: component.into(),
            loader: Arc::new(move || loader().boxed()),
        }
    }

    pub fn component(&self) -> &str {
        &self.component
    }

    pub(crate) fn start_load(&self) -> BoxFuture<'static, LoadResult> {
        (self.loader)()
    }
}

impl fmt::Debug for LazyPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyPage")
            .field("component", &self.component)
            .finish_non_exhaustive()
    }
}

pub type Condition = Arc<dyn Fn(&RequestContext) -> bool + Send + Sync>;
pub type RenderFn = Arc<dyn Fn(&RequestContext) -> PageDescriptor + Send + Sync>;
pub type DynamicRenderFn = Arc<dyn Fn(&RequestContext) -> RouteRender + Send + Sync>;

/// How a matched route produces its content.
#[derive(Clone)]
pub enum RouteRender {
    /// Render synchronously.
    Page(RenderFn),
    /// Client-side redirect to another path.
    Redirect(String),
    /// Not handled on the client: force a full reload so the server serves the path.
    PassThrough,
    /// Load the implementation on first match.
    Lazy(LazyPage),
    /// Choose one of the other forms at render time.
    Dynamic(DynamicRenderFn),
}

impl fmt::Debug for RouteRender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteRender::Page(_) => f.write_str("Page"),
            RouteRender::Redirect(target) => f.debug_tuple("Redirect").field(target).finish(),
            RouteRender::PassThrough => f.write_str("PassThrough"),
            RouteRender::Lazy(page) => f.debug_tuple("Lazy").field(page).finish(),
            RouteRender::Dynamic(_) => f.write_str("Dynamic"),
        }
    }
}

/// One row of the route table.
#[derive(Clone)]
pub struct RouteEntry {
    pub(crate) path: String,
    pub(crate) exact: bool,
    pub(crate) condition: Option<Condition>,
    pub(crate) render: RouteRender,
}

impl RouteEntry {
    pub fn new(path: impl Into<String>, render: RouteRender) -> Self {
        Self {
            path: path.into(),
            exact: false,
            condition: None,
            render,
        }
    }

    pub fn page<F>(path: impl Into<String>, render: F) -> Self
    where
        F: Fn(&RequestContext) -> PageDescriptor + Send + Sync + 'static,
    {
        Self::new(path, RouteRender::Page(Arc::new(render)))
    }

    pub fn redirect(path: impl Into<String>, target: impl Into<String>) -> Self {
        Self::new(path, RouteRender::Redirect(target.into()))
    }

    pub fn pass_through(path: impl Into<String>) -> Self {
        Self::new(path, RouteRender::PassThrough)
    }

    pub fn lazy(path: impl Into<String>, page: LazyPage) -> Self {
        Self::new(path, RouteRender::Lazy(page))
    }

    pub fn dynamic<F>(path: impl Into<String>, choose: F) -> Self
    where
        F: Fn(&RequestContext) -> RouteRender + Send + Sync + 'static,
    {
        Self::new(path, RouteRender::Dynamic(Arc::new(choose)))
    }

    /// Require the whole path to match instead of a prefix.
    pub fn exact(mut self) -> Self {
        self.exact = true;
        self
    }

    /// Only consider this entry when `condition` holds for the request.
    pub fn when<F>(mut self, condition: F) -> Self
    where
        F: Fn(&RequestContext) -> bool + Send + Sync + 'static,
    {
        self.condition = Some(Arc::new(condition));
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn is_exact(&self) -> bool {
        self.exact
    }
}

impl fmt::Debug for RouteEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteEntry")
            .field("path", &self.path)
            .field("exact", &self.exact)
            .field("conditional", &self.condition.is_some())
            .field("render", &self.render)
            .finish()
    }
}
