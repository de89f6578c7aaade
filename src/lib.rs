//! Search front-end shell: route resolution and the search page input.

pub mod config;
pub mod history;
pub mod observability;
pub mod routing;
pub mod search;
pub mod session;

pub use config::schema::FrontendConfig;
pub use routing::{RouteOutlet, Router};
pub use search::SearchInputController;
