//! movielens server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens the
//! SQLite store, rebuilds the catalog from the TSV files in `data_dir`, and
//! serves the JSON API over HTTP until interrupted.
//!
//! Every start discards ratings submitted during the previous run: the TSV
//! files are the only durable record.

use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use movielens_core::{source::SourceSet, store::CatalogStore};
use movielens_server::{ServerConfig, metadata_source, router};
use movielens_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "MovieLens catalog server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let server_cfg = ServerConfig::load(&cli.config).context("failed to read configuration")?;

  // Open SQLite store and rebuild the catalog.
  let store_path = server_cfg.store_path();
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  let sources = SourceSet::in_dir(&server_cfg.data_dir);
  store
    .initialize(&sources)
    .await
    .with_context(|| format!("failed to load catalog from {:?}", server_cfg.data_dir))?;

  let metadata = metadata_source(&server_cfg.omdb).context("failed to build OMDb client")?;
  if metadata.is_none() {
    tracing::warn!("no OMDb API key configured; detail views will omit external metadata");
  }

  let app = router(store.clone(), metadata);
  let address = server_cfg.address();

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")?;

  store.close().await.context("failed to close store")?;
  tracing::info!("shut down");

  Ok(())
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    tracing::error!(error = %e, "failed to listen for ctrl-c");
    std::future::pending::<()>().await;
  }
}
