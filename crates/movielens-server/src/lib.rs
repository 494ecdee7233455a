//! Wiring for the MovieLens server binary: configuration and application
//! assembly.

use std::path::{Path, PathBuf};

use axum::Router;
use movielens_api::{ApiState, api_router};
use movielens_core::{metadata::MetadataSource, store::CatalogStore};
use movielens_omdb::{DEFAULT_BASE_URL, OmdbClient, OmdbConfig};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `MOVIELENS_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:       String,
  #[serde(default = "default_port")]
  pub port:       u16,
  /// Directory holding `movies.tsv`, `genres.tsv` and `ratings.tsv`.
  #[serde(default = "default_data_dir")]
  pub data_dir:   PathBuf,
  /// SQLite file; defaults to `movielens.db` inside `data_dir`.
  #[serde(default)]
  pub store_path: Option<PathBuf>,
  #[serde(default)]
  pub omdb:       OmdbSettings,
}

/// `[omdb]` table. Without an API key detail views carry no metadata.
#[derive(Debug, Deserialize, Clone)]
pub struct OmdbSettings {
  #[serde(default)]
  pub api_key:  Option<String>,
  #[serde(default = "default_omdb_base_url")]
  pub base_url: String,
}

impl Default for OmdbSettings {
  fn default() -> Self {
    Self { api_key: None, base_url: default_omdb_base_url() }
  }
}

fn default_host() -> String { "127.0.0.1".to_owned() }

fn default_port() -> u16 { 8888 }

fn default_data_dir() -> PathBuf { PathBuf::from("assets/data") }

fn default_omdb_base_url() -> String { DEFAULT_BASE_URL.to_owned() }

impl ServerConfig {
  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }

  pub fn store_path(&self) -> PathBuf {
    self
      .store_path
      .clone()
      .unwrap_or_else(|| self.data_dir.join("movielens.db"))
  }

  /// Layer an optional TOML file under `MOVIELENS_`-prefixed environment
  /// variables. Nested keys use `__`, e.g. `MOVIELENS_OMDB__API_KEY`.
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(
        config::Environment::with_prefix("MOVIELENS")
          .prefix_separator("_")
          .separator("__"),
      )
      .build()?
      .try_deserialize()
  }
}

// ─── Metadata ─────────────────────────────────────────────────────────────────

/// The OMDb client, or `None` when no API key is configured.
pub fn metadata_source(settings: &OmdbSettings) -> movielens_omdb::Result<Option<OmdbClient>> {
  let Some(api_key) = settings.api_key.clone().filter(|k| !k.is_empty()) else {
    return Ok(None);
  };
  let client = OmdbClient::new(OmdbConfig { base_url: settings.base_url.clone(), api_key })?;
  Ok(Some(client))
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// The API router with request tracing.
pub fn router<S, M>(store: S, metadata: M) -> Router
where
  S: CatalogStore + 'static,
  M: MetadataSource + 'static,
{
  api_router(ApiState::new(store, metadata)).layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
  use super::*;

  fn from_toml(toml: &str) -> ServerConfig {
    config::Config::builder()
      .add_source(config::File::from_str(toml, config::FileFormat::Toml))
      .build()
      .unwrap()
      .try_deserialize()
      .unwrap()
  }

  #[test]
  fn empty_config_uses_defaults() {
    let cfg = from_toml("");
    assert_eq!(cfg.address(), "127.0.0.1:8888");
    assert_eq!(cfg.data_dir, PathBuf::from("assets/data"));
    assert_eq!(cfg.store_path(), PathBuf::from("assets/data/movielens.db"));
    assert_eq!(cfg.omdb.api_key, None);
    assert_eq!(cfg.omdb.base_url, DEFAULT_BASE_URL);
  }

  #[test]
  fn explicit_values_override_defaults() {
    let cfg = from_toml(
      r#"
        host       = "0.0.0.0"
        port       = 9000
        data_dir   = "/srv/movielens"
        store_path = ":memory:"

        [omdb]
        api_key = "k"
      "#,
    );
    assert_eq!(cfg.address(), "0.0.0.0:9000");
    assert_eq!(cfg.store_path(), PathBuf::from(":memory:"));
    assert_eq!(cfg.omdb.api_key.as_deref(), Some("k"));
  }

  #[test]
  fn metadata_disabled_without_key() {
    assert!(metadata_source(&OmdbSettings::default()).unwrap().is_none());

    let blank = OmdbSettings { api_key: Some(String::new()), ..Default::default() };
    assert!(metadata_source(&blank).unwrap().is_none());

    let keyed = OmdbSettings { api_key: Some("k".into()), ..Default::default() };
    assert!(metadata_source(&keyed).unwrap().is_some());
  }
}
