//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Route resolution, lazy loads, submissions, suggestion fetches produce:
//!     → logging.rs (structured log events via `tracing`)
//!     → metrics.rs (counters via the `metrics` facade)
//!
//! Consumers:
//!     → stderr subscriber (CLI)
//!     → whichever metrics recorder the host installs
//! ```
//!
//! # Design Decisions
//! - Structured fields (route, outcome, source) rather than formatted strings
//! - Metrics are no-ops until the host installs a recorder

pub mod logging;
pub mod metrics;
