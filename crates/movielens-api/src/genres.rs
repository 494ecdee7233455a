//! Handler for `GET /genres`, the list that populates the genre picker.

use axum::{Json, extract::State};
use movielens_core::{metadata::MetadataSource, store::CatalogStore};

use crate::{ApiState, error::ApiError};

/// `GET /genres` — every distinct label, sorted.
pub async fn list<S, M>(
  State(state): State<ApiState<S, M>>,
) -> Result<Json<Vec<String>>, ApiError>
where
  S: CatalogStore,
  M: MetadataSource,
{
  let genres = state
    .store
    .list_distinct_genres()
    .await
    .map_err(ApiError::store)?;
  Ok(Json(genres))
}
