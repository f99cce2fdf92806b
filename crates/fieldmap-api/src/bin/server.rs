//! fieldmap API server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens the
//! SQLite-backed snapshot store, restores the entity collections, and
//! serves the JSON API over HTTP. With `seed = true` in the config, empty
//! collections are populated with the sample territory on startup.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use clap::Parser;
use fieldmap_api::{AppState, ServerConfig, api_router};
use fieldmap_core::{
  context::{FixedLocation, StaticAuth},
  geo::Coordinate,
  seed::SampleSeed,
  storage::EntityKind,
  store::EntityStore,
};
use fieldmap_store_sqlite::SqliteSnapshotStore;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "fieldmap API server")]
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

  // Load configuration.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("FIELDMAP"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  // Expand `~` in store path.
  let store_path = expand_tilde(&server_cfg.store_path);

  // Open the snapshot backend and restore the collections.
  let backend = SqliteSnapshotStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  let store = Arc::new(EntityStore::new(backend));
  store.load().await;

  if server_cfg.seed {
    for kind in EntityKind::ALL {
      let seeded = store
        .seed_if_empty(kind, &SampleSeed)
        .await
        .with_context(|| format!("failed to seed {kind:?}"))?;
      if seeded {
        tracing::info!(?kind, "seeded sample data");
      }
    }
  }

  // Build application state.
  let location = match (server_cfg.latitude, server_cfg.longitude) {
    (Some(latitude), Some(longitude)) => {
      FixedLocation(Some(Coordinate::new(latitude, longitude)))
    }
    _ => FixedLocation(None),
  };

  let state = AppState {
    store,
    auth: Arc::new(StaticAuth::new(server_cfg.user_id.clone())),
    location: Arc::new(location),
  };

  let app = api_router(state).layer(TraceLayer::new_for_http());
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
