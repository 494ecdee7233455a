//! Handlers for movie searches and the detail view.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/title` | `?moviename=`; substring of the title |
//! | `GET`  | `/genre` | `?genre=`; substring of any genre tag |
//! | `GET`  | `/detail/{movie_id}` | 404 if not found |

use axum::{
  Json,
  extract::{Path, Query, State},
};
use movielens_core::{
  metadata::MetadataSource,
  movie::{MovieDetail, MovieId, MovieSummary},
  store::CatalogStore,
};
use serde::Deserialize;

use crate::{ApiState, error::ApiError};

// ─── Title search ─────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct TitleParams {
  #[serde(default)]
  pub moviename: String,
}

/// `GET /title?moviename=<substring>`
pub async fn by_title<S, M>(
  State(state): State<ApiState<S, M>>,
  Query(params): Query<TitleParams>,
) -> Result<Json<Vec<MovieSummary>>, ApiError>
where
  S: CatalogStore,
  M: MetadataSource,
{
  let movies = state
    .store
    .search_by_title(&params.moviename)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(movies))
}

// ─── Genre search ─────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct GenreParams {
  #[serde(default)]
  pub genre: String,
}

/// `GET /genre?genre=<label>`
pub async fn by_genre<S, M>(
  State(state): State<ApiState<S, M>>,
  Query(params): Query<GenreParams>,
) -> Result<Json<Vec<MovieSummary>>, ApiError>
where
  S: CatalogStore,
  M: MetadataSource,
{
  let movies = state
    .store
    .search_by_genre(&params.genre)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(movies))
}

// ─── Detail ───────────────────────────────────────────────────────────────────

/// `GET /detail/{movie_id}`
///
/// External metadata is best-effort: a failed lookup is logged and the view
/// is returned with `metadata: null`.
pub async fn detail<S, M>(
  State(state): State<ApiState<S, M>>,
  Path(movie_id): Path<MovieId>,
) -> Result<Json<MovieDetail>, ApiError>
where
  S: CatalogStore,
  M: MetadataSource,
{
  let movie = state
    .store
    .get_movie_detail(movie_id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("movie {movie_id} not found")))?;

  let genres = state
    .store
    .get_genres(movie_id)
    .await
    .map_err(ApiError::store)?;
  let rating = state
    .store
    .get_rating_summary(movie_id)
    .await
    .map_err(ApiError::store)?;

  let metadata = match state.metadata.fetch(movie.external_id).await {
    Ok(metadata) => metadata,
    Err(e) => {
      tracing::warn!(
        movie_id,
        external_id = movie.external_id,
        error = %e,
        "external metadata lookup failed"
      );
      None
    }
  };

  Ok(Json(MovieDetail { movie, genres, rating, metadata }))
}
