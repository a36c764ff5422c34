//! HTTP surface for the dependency diagram.
//!
//! Two routes, both read-only:
//!
//! - `GET /deps/full.svg?focus=&ignoreModules=&flattenDB=` renders the
//!   filtered graph through the configured renderer and returns the image.
//! - `GET /deps` renders the selection page listing the unfocused tree.

pub mod error;
pub mod handlers;
pub mod query;
pub mod state;

use axum::Router;
use axum::routing::get;

pub use error::ApiError;
pub use query::DepsQuery;
pub use state::{AppState, ServerConfig};

/// Version reported on the selection page.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build the router serving both endpoints.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/deps", get(handlers::main_page))
        .route("/deps/full.svg", get(handlers::full_image))
        .with_state(state)
}
