//! The external metadata collaborator.
//!
//! Detail views are enriched with data from a third-party movie database.
//! The catalog only needs "fetch by external id", so the service sits behind
//! [`MetadataSource`] and can be swapped for a stub in tests.

use std::future::Future;

use serde::{Deserialize, Serialize};

/// Supplemental fields for a movie. Every field is optional because the
/// upstream service fills them unevenly.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExternalMetadata {
  pub title:           Option<String>,
  pub year:            Option<String>,
  pub rated:           Option<String>,
  pub runtime:         Option<String>,
  pub director:        Option<String>,
  pub actors:          Option<String>,
  pub plot:            Option<String>,
  pub poster_url:      Option<String>,
  pub external_rating: Option<String>,
}

/// A lookup service keyed by [`Movie::external_id`](crate::movie::Movie).
pub trait MetadataSource: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Fetch metadata for `external_id`. `Ok(None)` means the service has no
  /// record for it.
  fn fetch(
    &self,
    external_id: i64,
  ) -> impl Future<Output = Result<Option<ExternalMetadata>, Self::Error>> + Send + '_;
}

/// `None` is a disabled source that never has data.
impl<M: MetadataSource> MetadataSource for Option<M> {
  type Error = M::Error;

  async fn fetch(&self, external_id: i64) -> Result<Option<ExternalMetadata>, M::Error> {
    match self {
      Some(source) => source.fetch(external_id).await,
      None => Ok(None),
    }
  }
}
