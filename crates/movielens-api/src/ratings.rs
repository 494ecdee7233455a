//! Handler for `POST /rating`.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use movielens_core::{metadata::MetadataSource, movie::MovieId, store::CatalogStore};
use serde::Deserialize;

use crate::{ApiState, error::ApiError};

/// JSON body accepted by `POST /rating`.
#[derive(Debug, Deserialize)]
pub struct RatingBody {
  pub movie_id: MovieId,
  pub rating:   i64,
}

/// `POST /rating` — returns 201 + the stored
/// [`Rating`](movielens_core::movie::Rating), or 404 if the movie does not
/// exist.
pub async fn submit<S, M>(
  State(state): State<ApiState<S, M>>,
  Json(body): Json<RatingBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: CatalogStore,
  M: MetadataSource,
{
  let rating = state
    .store
    .submit_rating(body.movie_id, body.rating)
    .await
    .map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(rating)))
}
