//! Open Movie Database client.
//!
//! Implements [`MetadataSource`] over OMDb's HTTP API. "No such title" is
//! `Ok(None)`; transport failures and unexpected statuses are errors that
//! callers are expected to downgrade to "no metadata".

mod response;

pub mod error;

use std::time::Duration;

use movielens_core::metadata::{ExternalMetadata, MetadataSource};
use reqwest::{Client, StatusCode};

pub use error::{Error, Result};
pub use response::OmdbResponse;

pub const DEFAULT_BASE_URL: &str = "http://www.omdbapi.com";

/// Connection settings for OMDb.
#[derive(Debug, Clone)]
pub struct OmdbConfig {
  pub base_url: String,
  pub api_key:  String,
}

/// Async HTTP client for OMDb.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct OmdbClient {
  client: Client,
  config: OmdbConfig,
}

impl OmdbClient {
  pub fn new(config: OmdbConfig) -> Result<Self> {
    let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
    Ok(Self { client, config })
  }

  fn url(&self) -> String { format!("{}/", self.config.base_url.trim_end_matches('/')) }
}

/// OMDb expects IMDb ids in their `tt`-prefixed, zero-padded form.
pub fn imdb_id(external_id: i64) -> String { format!("tt{external_id:07}") }

impl MetadataSource for OmdbClient {
  type Error = Error;

  async fn fetch(&self, external_id: i64) -> Result<Option<ExternalMetadata>> {
    let imdb_id = imdb_id(external_id);
    tracing::debug!(%imdb_id, "querying OMDb");

    let resp = self
      .client
      .get(self.url())
      .query(&[("i", imdb_id.as_str()), ("apikey", self.config.api_key.as_str())])
      .send()
      .await?;

    match resp.status() {
      StatusCode::NOT_FOUND => return Ok(None),
      status if !status.is_success() => return Err(Error::Status(status)),
      _ => {}
    }

    let body: OmdbResponse = resp.json().await?;
    if let Some(reason) = body.error.as_deref() {
      tracing::debug!(%imdb_id, reason, "OMDb has no record");
    }
    Ok(body.into_metadata())
  }
}
