//! The `CatalogStore` trait.
//!
//! The trait is implemented by storage backends (e.g.
//! `movielens-store-sqlite`). The HTTP layer depends on this abstraction, not
//! on any concrete backend.

use std::future::Future;

use crate::{
  Classify,
  movie::{CatalogCounts, Movie, MovieId, MovieSummary, Rating, RatingSummary},
  source::SourceSet,
};

/// Abstraction over a catalog backend.
///
/// Movies and genre tags are reference data replaced wholesale by
/// [`initialize`](CatalogStore::initialize). Ratings are append-only; the
/// single runtime write is [`submit_rating`](CatalogStore::submit_rating).
///
/// "No results" is always an empty vector or `None`, never an error.
pub trait CatalogStore: Send + Sync {
  type Error: std::error::Error + Classify + Send + Sync + 'static;

  // ── Lifecycle ─────────────────────────────────────────────────────────

  /// Drop and recreate every table, then load `sources`.
  ///
  /// The load is all-or-nothing: on failure the previous contents remain.
  /// On success everything previously stored is discarded, including ratings
  /// added through [`submit_rating`](CatalogStore::submit_rating).
  fn initialize<'a>(
    &'a self,
    sources: &'a SourceSet,
  ) -> impl Future<Output = Result<CatalogCounts, Self::Error>> + Send + 'a;

  // ── Searches ──────────────────────────────────────────────────────────

  /// Movies whose title contains `substring`, ignoring ASCII case, ordered by
  /// title, year, then id. The empty string matches every movie.
  fn search_by_title<'a>(
    &'a self,
    substring: &'a str,
  ) -> impl Future<Output = Result<Vec<MovieSummary>, Self::Error>> + Send + 'a;

  /// Movies with at least one genre tag containing `genre`. A movie appears
  /// once per matching tag.
  fn search_by_genre<'a>(
    &'a self,
    genre: &'a str,
  ) -> impl Future<Output = Result<Vec<MovieSummary>, Self::Error>> + Send + 'a;

  // ── Per-movie reads ───────────────────────────────────────────────────

  /// Retrieve a movie by id. Returns `None` if not found.
  fn get_movie_detail(
    &self,
    movie_id: MovieId,
  ) -> impl Future<Output = Result<Option<Movie>, Self::Error>> + Send + '_;

  fn get_rating_summary(
    &self,
    movie_id: MovieId,
  ) -> impl Future<Output = Result<RatingSummary, Self::Error>> + Send + '_;

  /// Genre labels tagged on a movie, duplicates included, in no particular
  /// order.
  fn get_genres(
    &self,
    movie_id: MovieId,
  ) -> impl Future<Output = Result<Vec<String>, Self::Error>> + Send + '_;

  // ── Writes ────────────────────────────────────────────────────────────

  /// Append a rating. Fails with a
  /// [`ReferentialIntegrity`](crate::FailureKind::ReferentialIntegrity) error
  /// and writes nothing if the movie does not exist. The value is not
  /// range-checked.
  fn submit_rating(
    &self,
    movie_id: MovieId,
    rating: i64,
  ) -> impl Future<Output = Result<Rating, Self::Error>> + Send + '_;

  // ── Catalog-wide ──────────────────────────────────────────────────────

  /// Every distinct genre label, sorted ascending.
  fn list_distinct_genres(
    &self,
  ) -> impl Future<Output = Result<Vec<String>, Self::Error>> + Send + '_;

  fn catalog_counts(
    &self,
  ) -> impl Future<Output = Result<CatalogCounts, Self::Error>> + Send + '_;
}
