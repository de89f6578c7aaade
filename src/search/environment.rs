//! Input environment probing.
//!
//! Platform signals the search input adapts to, read through an injected probe
//! and evaluated once when the input is created.

use crate::config::{FeatureFlags, QueryInputKind, SiteConfig};

/// Read-only view of the hosting platform.
pub trait EnvironmentProbe: Send + Sync {
    /// Some input device is a fine pointer (mouse, trackpad, stylus).
    fn has_fine_pointer(&self) -> bool;

    /// Some input device can hover.
    fn supports_hover(&self) -> bool;

    /// Site context provided by the server.
    fn server_context(&self) -> SiteConfig;
}

/// A probe with fixed answers.
#[derive(Debug, Clone)]
pub struct StaticEnvironment {
    pub fine_pointer: bool,
    pub hover: bool,
    pub site: SiteConfig,
}

impl StaticEnvironment {
    /// A desktop browser: mouse plus hover.
    pub fn desktop(site: SiteConfig) -> Self {
        Self {
            fine_pointer: true,
            hover: true,
            site,
        }
    }

    /// A phone or tablet without a pointing device.
    pub fn touch(site: SiteConfig) -> Self {
        Self {
            fine_pointer: false,
            hover: false,
            site,
        }
    }
}

impl EnvironmentProbe for StaticEnvironment {
    fn has_fine_pointer(&self) -> bool {
        self.fine_pointer
    }

    fn supports_hover(&self) -> bool {
        self.hover
    }

    fn server_context(&self) -> SiteConfig {
        self.site.clone()
    }
}

/// Signals fixed for the lifetime of one search input.
#[derive(Debug, Clone, PartialEq)]
pub struct InputEnvironment {
    /// Touch is the only input method; forcing focus would hide the virtual keyboard.
    pub touch_only: bool,
    /// Render the experimental query input instead of the standard search box.
    pub experimental_input: bool,
    pub apply_suggestions_on_enter: bool,
    pub site: SiteConfig,
}

impl InputEnvironment {
    pub fn evaluate(probe: &dyn EnvironmentProbe, flags: &dyn FeatureFlags) -> Self {
        let features = flags.snapshot();
        let env = Self {
            touch_only: !probe.has_fine_pointer() && !probe.supports_hover(),
            experimental_input: features.search_query_input == QueryInputKind::Experimental,
            apply_suggestions_on_enter: features.apply_search_query_suggestion_on_enter,
            site: probe.server_context(),
        };
        tracing::debug!(
            touch_only = env.touch_only,
            experimental_input = env.experimental_input,
            "Input environment evaluated"
        );
        env
    }
}
