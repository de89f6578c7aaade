//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → FrontendConfig (validated, immutable)
//!     → site context + route table built once
//!     → features.rs (feature-flag source, atomically swappable)
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs loads new config
//!     → validation.rs validates
//!     → features.rs swaps the experimental feature snapshot
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; only feature flags change at runtime
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod features;
pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use features::{ConfigFeatureFlags, FeatureFlags, FlagValue};
pub use loader::{load_config, ConfigError};
pub use schema::{
    Enablement, ExperimentalFeatures, ExternalServicesUserMode, FrontendConfig,
    ObservabilityConfig, QueryInputKind, SearchDefaults, SiteConfig,
};
