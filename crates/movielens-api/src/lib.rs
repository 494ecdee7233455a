//! JSON HTTP API for the MovieLens catalog.
//!
//! Exposes an axum [`Router`] backed by any
//! [`CatalogStore`](movielens_core::store::CatalogStore) and
//! [`MetadataSource`](movielens_core::metadata::MetadataSource). Each route
//! calls one store operation; the detail route also consults the metadata
//! source.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let app = movielens_api::api_router(ApiState::new(store, metadata));
//! ```

pub mod error;
pub mod genres;
pub mod movies;
pub mod ratings;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use movielens_core::{metadata::MetadataSource, store::CatalogStore};

pub use error::ApiError;

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all handlers.
pub struct ApiState<S, M> {
  pub store:    Arc<S>,
  pub metadata: Arc<M>,
}

impl<S, M> ApiState<S, M> {
  pub fn new(store: S, metadata: M) -> Self {
    Self { store: Arc::new(store), metadata: Arc::new(metadata) }
  }
}

impl<S, M> Clone for ApiState<S, M> {
  fn clone(&self) -> Self {
    Self { store: Arc::clone(&self.store), metadata: Arc::clone(&self.metadata) }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S, M>(state: ApiState<S, M>) -> Router<()>
where
  S: CatalogStore + 'static,
  M: MetadataSource + 'static,
{
  Router::new()
    .route("/genres", get(genres::list::<S, M>))
    .route("/title", get(movies::by_title::<S, M>))
    .route("/genre", get(movies::by_genre::<S, M>))
    .route("/detail/{movie_id}", get(movies::detail::<S, M>))
    .route("/rating", post(ratings::submit::<S, M>))
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────
