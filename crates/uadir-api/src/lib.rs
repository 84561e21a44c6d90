//! JSON REST API for the uadir expert directory.
//!
//! Exposes an axum [`Router`] backed by any
//! [`uadir_core::store::DirectoryStore`]. Auth, TLS, and transport concerns
//! are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", uadir_api::api_router(store.clone()))
//! ```

pub mod cities;
pub mod error;
pub mod experts;
pub mod extract;
pub mod organizations;
pub mod search;
pub mod stats;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post, put},
};
use uadir_core::store::DirectoryStore;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: DirectoryStore + 'static,
{
  Router::new()
    // Cities
    .route("/cities", get(cities::list::<S>).post(cities::create::<S>))
    // Experts
    .route("/experts", get(experts::list::<S>).post(experts::create::<S>))
    .route(
      "/experts/{id}",
      get(experts::get_one::<S>)
        .put(experts::update::<S>)
        .delete(experts::delete::<S>),
    )
    .route("/experts/{id}/image", put(experts::set_image::<S>))
    .route("/experts/{id}/activities", post(experts::add_activity::<S>))
    .route(
      "/experts/{id}/publications",
      post(experts::add_publication::<S>),
    )
    .route("/experts/city/{city_id}", get(experts::by_city::<S>))
    .route("/experts/focus/{focus_area}", get(experts::by_focus_area::<S>))
    // Organizations
    .route("/organizations", get(organizations::list::<S>))
    .route("/diaspora/organizations", get(organizations::diaspora::<S>))
    // Search and statistics
    .route("/search", get(search::handler::<S>))
    .route("/statistics", get(stats::handler::<S>))
    .with_state(store)
}

#[cfg(test)]
mod tests;
