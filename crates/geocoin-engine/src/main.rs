//! Geocoin server binary.
//!
//! Loads configuration, opens the configured byte store, restores the
//! world from it, and serves the HTTP API until `Ctrl-C`.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `geocoin-config.yaml`
//! 2. Initialize structured logging (tracing)
//! 3. Open the byte store (file or memory)
//! 4. Open the world, reporting any unreadable records
//! 5. Serve the API

mod error;

use std::path::Path;
use std::sync::Arc;

use geocoin_api::AppState;
use geocoin_core::config::{LogFormat, LoggingConfig};
use geocoin_core::{GameConfig, GameState, StorageBackend};
use geocoin_db::{FileStore, KvStore, MemoryStore};
use geocoin_world::SeedRandom;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;

/// Path of the configuration file, relative to the working directory.
const CONFIG_PATH: &str = "geocoin-config.yaml";

/// Application entry point.
///
/// # Errors
///
/// Returns an error if any initialization step or the server fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration.
    let config = load_config()?;

    // 2. Initialize structured logging.
    init_tracing(&config.logging);
    info!(
        quantum = config.grid.quantum,
        tile_width = config.grid.tile_width,
        visibility_radius = config.grid.visibility_radius,
        spawn_probability = config.generation.spawn_probability,
        "geocoin-engine starting"
    );

    // 3. Open the byte store.
    let store = open_store(&config)?;

    // 4. Open the world.
    let game = GameState::open(&config, Arc::new(SeedRandom), store).map_err(EngineError::from)?;
    for fault in game.load_faults() {
        warn!(%fault, "Record ignored at startup");
    }
    let position = game.position();
    info!(lat = position.lat, lng = position.lng, "World ready");

    // 5. Serve the API.
    let state = Arc::new(AppState::new(game));
    geocoin_api::start_server(&config.server, state)
        .await
        .map_err(EngineError::from)?;

    info!("geocoin-engine shutdown complete");
    Ok(())
}

/// Load the configuration, or defaults if the file does not exist.
fn load_config() -> Result<GameConfig, EngineError> {
    let config_path = Path::new(CONFIG_PATH);
    if config_path.exists() {
        return Ok(GameConfig::from_file(config_path)?);
    }

    let mut config = GameConfig::default();
    config.apply_overrides(|name| std::env::var(name).ok())?;
    config.validate()?;
    Ok(config)
}

/// Install the global subscriber. `RUST_LOG` wins over the configured level.
fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    match logging.format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .init(),
        LogFormat::Pretty => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init(),
    }
}

/// Open the configured byte store.
fn open_store(config: &GameConfig) -> Result<Box<dyn KvStore>, EngineError> {
    match config.storage.backend {
        StorageBackend::File => {
            let store = FileStore::open(&config.storage.data_dir)?;
            Ok(Box::new(store))
        }
        StorageBackend::Memory => {
            info!("Using in-memory store, nothing will be persisted");
            Ok(Box::new(MemoryStore::new()))
        }
    }
}
