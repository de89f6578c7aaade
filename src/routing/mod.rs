//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Navigation (path + request context)
//!     → outlet.rs (drive the navigation, follow redirects)
//!     → router.rs (route lookup, first match wins)
//!     → matcher.rs (exact / segment-aligned prefix match, params)
//!     → lazy.rs (load page implementation on first match, memoized)
//!     → Return: Resolved(page) | Redirecting | PassThrough | NotFound
//!
//! Route Compilation (at startup):
//!     RouteEntry / Option<RouteEntry> groups
//!     → table.rs (drop absent entries, compile patterns, validate)
//!     → Freeze as immutable RouteTable
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - No regex (literal, `:param` and trailing `:param+` segments only)
//! - Deterministic: same path and context always match the same route
//! - A false condition is equivalent to the entry being absent

pub mod app;
pub mod context;
pub mod lazy;
pub mod matcher;
pub mod outlet;
pub mod route;
pub mod router;
pub mod table;

pub use context::RequestContext;
pub use lazy::{LazyCache, LazyKey, LoadStatus, PendingPage};
pub use matcher::{PathPattern, RouteParams};
pub use outlet::{Mounted, Navigator, RouteOutlet};
pub use route::{LazyPage, LoadError, PageComponent, PageDescriptor, RouteEntry, RouteRender, StaticPage};
pub use router::{Page, Resolution, RouteMatch, Router};
pub use table::{RouteId, RouteTable, RouteTableError};
