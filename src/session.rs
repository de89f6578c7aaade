//! Per-session identity and platform handles shared by routing and search.

use serde::Serialize;

/// The signed-in user, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthenticatedUser {
    pub id: String,
    pub username: String,
    /// Ids of organizations the user belongs to.
    pub organizations: Vec<String>,
    pub site_admin: bool,
}

impl AuthenticatedUser {
    pub fn new(id: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
            organizations: Vec::new(),
            site_admin: false,
        }
    }

    pub fn with_organization(mut self, org_id: impl Into<String>) -> Self {
        self.organizations.push(org_id.into());
        self
    }
}

/// Handles to the hosting platform that suggestion fetchers are bound to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformContext {
    /// Base URL GraphQL requests are sent to.
    pub sourcegraph_url: String,
}

impl PlatformContext {
    pub fn new(sourcegraph_url: impl Into<String>) -> Self {
        Self {
            sourcegraph_url: sourcegraph_url.into(),
        }
    }
}
