//! Per-navigation request context.

use std::sync::Arc;

use crate::config::{ExperimentalFeatures, SiteConfig};
use crate::routing::matcher::RouteParams;
use crate::session::AuthenticatedUser;

/// Everything a route condition or renderer may look at.
///
/// Built once per navigation and never mutated; matching a pattern produces a
/// copy carrying that route's parameters.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    params: RouteParams,
    authenticated_user: Option<Arc<AuthenticatedUser>>,
    features: Arc<ExperimentalFeatures>,
    site: Arc<SiteConfig>,
}

impl RequestContext {
    pub fn new(site: Arc<SiteConfig>, features: Arc<ExperimentalFeatures>) -> Self {
        Self {
            params: RouteParams::new(),
            authenticated_user: None,
            features,
            site,
        }
    }

    pub fn with_user(mut self, user: Option<Arc<AuthenticatedUser>>) -> Self {
        self.authenticated_user = user;
        self
    }

    pub(crate) fn with_params(&self, params: RouteParams) -> Self {
        Self {
            params,
            ..self.clone()
        }
    }

    pub fn params(&self) -> &RouteParams {
        &self.params
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    pub fn authenticated_user(&self) -> Option<&AuthenticatedUser> {
        self.authenticated_user.as_deref()
    }

    pub fn is_sourcegraph_dot_com(&self) -> bool {
        self.site.is_sourcegraph_dot_com
    }

    pub fn features(&self) -> &ExperimentalFeatures {
        &self.features
    }

    pub fn site(&self) -> &SiteConfig {
        &self.site
    }
}
