//! Shared fixtures for integration tests.

#![allow(dead_code)]

use futures_util::future::{BoxFuture, FutureExt};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

use search_shell::config::{ExperimentalFeatures, SiteConfig};
use search_shell::history::History;
use search_shell::routing::app::{app_routes, ModuleLoader};
use search_shell::routing::route::LoadResult;
use search_shell::routing::{LoadError, PageComponent, RequestContext, RouteOutlet, Router, StaticPage};

/// Module loader that counts loads, can fail chosen components, and can hold
/// loads until released.
#[derive(Default)]
pub struct ScriptedModules {
    loads: Mutex<HashMap<String, usize>>,
    failing: HashSet<String>,
    gate: Option<Arc<Notify>>,
}

impl ScriptedModules {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(mut self, component: &str) -> Self {
        self.failing.insert(component.to_string());
        self
    }

    /// Hold every load until the returned `Notify` is notified.
    pub fn gated(mut self) -> (Self, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        self.gate = Some(gate.clone());
        (self, gate)
    }

    pub fn load_count(&self, component: &str) -> usize {
        self.loads.lock().unwrap().get(component).copied().unwrap_or(0)
    }
}

impl ModuleLoader for ScriptedModules {
    fn load(&self, component: &str) -> BoxFuture<'static, LoadResult> {
        *self.loads.lock().unwrap().entry(component.to_string()).or_default() += 1;

        let fail = self.failing.contains(component);
        let gate = self.gate.clone();
        let component = component.to_string();
        async move {
            if let Some(gate) = gate {
                gate.notified().await;
            }
            if fail {
                Err(LoadError::new(component, "chunk failed to load"))
            } else {
                Ok(Arc::new(StaticPage::new(component)) as Arc<dyn PageComponent>)
            }
        }
        .boxed()
    }
}

pub fn site(is_sourcegraph_dot_com: bool) -> SiteConfig {
    SiteConfig {
        is_sourcegraph_dot_com,
        ..SiteConfig::default()
    }
}

pub fn context(site: &SiteConfig, features: ExperimentalFeatures) -> RequestContext {
    RequestContext::new(Arc::new(site.clone()), Arc::new(features))
}

/// Build the application outlet over `modules`, recording navigations in the returned history.
pub fn app_outlet(site: &SiteConfig, modules: Arc<ScriptedModules>) -> (RouteOutlet, Arc<History>) {
    let table = app_routes(site, modules).unwrap();
    let history = Arc::new(History::new());
    let outlet = RouteOutlet::new(Arc::new(Router::new(table)), history.clone());
    (outlet, history)
}
