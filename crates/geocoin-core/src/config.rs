//! Configuration loading and typed config structures for the Geocoin world.
//!
//! The canonical configuration lives in `geocoin-config.yaml` at the project
//! root. This module defines strongly-typed structs that mirror the YAML
//! structure, and provides a loader that reads and validates the file.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A value parsed but is out of range.
    #[error("invalid config value for {field}: {reason}")]
    Invalid {
        /// Dotted path of the offending field.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level game configuration.
///
/// Mirrors the structure of `geocoin-config.yaml`. Every field has a
/// default, so an empty file is a valid configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GameConfig {
    /// Grid geometry.
    #[serde(default)]
    pub grid: GridConfig,

    /// Procedural content parameters.
    #[serde(default)]
    pub generation: GenerationConfig,

    /// Player starting point.
    #[serde(default)]
    pub player: PlayerConfig,

    /// Persistence backend.
    #[serde(default)]
    pub storage: StorageConfig,

    /// HTTP API bind address.
    #[serde(default)]
    pub server: ServerConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl GameConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values:
    /// - `GEOCOIN_DATA_DIR` overrides `storage.data_dir`
    /// - `GEOCOIN_PORT` overrides `server.port`
    ///
    /// The result is validated before it is returned.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config = Self::parse(&contents)?;
        config.apply_overrides(|name| std::env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a YAML string. No overrides, no validation.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yml::from_str(yaml)?)
    }

    /// Apply environment overrides, reading variables through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if `GEOCOIN_PORT` is not a port
    /// number.
    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(dir) = lookup("GEOCOIN_DATA_DIR") {
            self.storage.data_dir = PathBuf::from(dir);
        }
        if let Some(port) = lookup("GEOCOIN_PORT") {
            self.server.port = port.trim().parse().ok().ok_or_else(|| ConfigError::Invalid {
                field: "server.port",
                reason: format!("GEOCOIN_PORT is not a port number: {port:?}"),
            })?;
        }
        Ok(())
    }

    /// Check that every value is usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |field, reason: String| Err(ConfigError::Invalid { field, reason });

        if !(self.grid.quantum.is_finite() && self.grid.quantum > 0.0) {
            return invalid("grid.quantum", format!("must be positive, got {}", self.grid.quantum));
        }
        if self.grid.tile_width < 1 {
            return invalid(
                "grid.tile_width",
                format!("must be at least 1, got {}", self.grid.tile_width),
            );
        }
        if !(1..=MAX_VISIBILITY_RADIUS).contains(&self.grid.visibility_radius) {
            return invalid(
                "grid.visibility_radius",
                format!(
                    "must be within [1, {MAX_VISIBILITY_RADIUS}], got {}",
                    self.grid.visibility_radius
                ),
            );
        }
        if !(0.0..=1.0).contains(&self.generation.spawn_probability) {
            return invalid(
                "generation.spawn_probability",
                format!("must be within [0, 1], got {}", self.generation.spawn_probability),
            );
        }
        if !(self.player.start_lat.is_finite() && self.player.start_lng.is_finite()) {
            return invalid("player", "start point must be finite".to_owned());
        }
        Ok(())
    }
}

/// Largest accepted visibility radius. Every move materializes up to
/// `(2 * radius)^2` cells.
pub const MAX_VISIBILITY_RADIUS: i64 = 64;

/// Grid geometry.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GridConfig {
    /// Degrees per grid unit.
    #[serde(default = "default_quantum")]
    pub quantum: f64,

    /// Grid units per tile.
    #[serde(default = "default_tile_width")]
    pub tile_width: i64,

    /// Tiles visible around the player in each direction.
    #[serde(default = "default_visibility_radius")]
    pub visibility_radius: i64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            quantum: default_quantum(),
            tile_width: default_tile_width(),
            visibility_radius: default_visibility_radius(),
        }
    }
}

/// Procedural content parameters.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GenerationConfig {
    /// Probability that a cell holds a cache.
    #[serde(default = "default_spawn_probability")]
    pub spawn_probability: f64,

    /// Exclusive upper bound on a new cache's coin count.
    #[serde(default = "default_max_coins_per_cache")]
    pub max_coins_per_cache: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            spawn_probability: default_spawn_probability(),
            max_coins_per_cache: default_max_coins_per_cache(),
        }
    }
}

/// Player starting point, used until the travel history has an entry.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PlayerConfig {
    /// Starting latitude.
    #[serde(default = "default_start_lat")]
    pub start_lat: f64,

    /// Starting longitude.
    #[serde(default = "default_start_lng")]
    pub start_lng: f64,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            start_lat: default_start_lat(),
            start_lng: default_start_lng(),
        }
    }
}

/// Which [`KvStore`](geocoin_db::KvStore) backend to open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// One JSON file per record under `data_dir`.
    #[default]
    File,
    /// Process memory only.
    Memory,
}

/// Persistence configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StorageConfig {
    /// Backend selection.
    #[serde(default)]
    pub backend: StorageBackend,

    /// Directory for the file backend.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            data_dir: default_data_dir(),
        }
    }
}

/// HTTP API bind address.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// TCP port.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins if set.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions
// ---------------------------------------------------------------------------

const fn default_quantum() -> f64 {
    geocoin_world::DEFAULT_QUANTUM
}

const fn default_tile_width() -> i64 {
    geocoin_world::DEFAULT_TILE_WIDTH
}

const fn default_visibility_radius() -> i64 {
    8
}

const fn default_spawn_probability() -> f64 {
    geocoin_world::DEFAULT_SPAWN_PROBABILITY
}

const fn default_max_coins_per_cache() -> u32 {
    geocoin_world::DEFAULT_MAX_COINS_PER_CACHE
}

// Merrill College classroom, UC Santa Cruz.
const fn default_start_lat() -> f64 {
    36.9995
}

const fn default_start_lng() -> f64 {
    -122.0533
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_host() -> String {
    "0.0.0.0".to_owned()
}

const fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = GameConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.grid.visibility_radius, 8);
        assert_eq!(config.generation.max_coins_per_cache, 5);
        assert_eq!(config.storage.backend, StorageBackend::File);
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r#"
grid:
  quantum: 0.001
  tile_width: 2
  visibility_radius: 4

generation:
  spawn_probability: 0.25
  max_coins_per_cache: 3

player:
  start_lat: 10.5
  start_lng: -20.25

storage:
  backend: memory
  data_dir: "/var/lib/geocoin"

server:
  host: "127.0.0.1"
  port: 9090

logging:
  level: "debug"
  format: json
"#;

        let config = GameConfig::parse(yaml);
        assert!(config.is_ok());
        let config = config.ok().unwrap_or_default();

        assert!((config.grid.quantum - 0.001).abs() < f64::EPSILON);
        assert_eq!(config.grid.tile_width, 2);
        assert_eq!(config.generation.max_coins_per_cache, 3);
        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.storage.data_dir, PathBuf::from("/var/lib/geocoin"));
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.logging.format, LogFormat::Json);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn parse_minimal_yaml() {
        let yaml = "generation:\n  spawn_probability: 0.5\n";
        let config = GameConfig::parse(yaml).ok().unwrap_or_default();

        // Probability is overridden
        assert!((config.generation.spawn_probability - 0.5).abs() < f64::EPSILON);
        // Everything else uses defaults
        assert_eq!(config.generation.max_coins_per_cache, 5);
        assert_eq!(config.grid.tile_width, 1);
    }

    #[test]
    fn parse_empty_yaml() {
        assert!(GameConfig::parse("").is_ok());
    }

    #[test]
    fn parse_rejects_unknown_backend() {
        let yaml = "storage:\n  backend: localStorage\n";
        assert!(matches!(GameConfig::parse(yaml), Err(ConfigError::Yaml { .. })));
    }

    #[test]
    fn validate_rejects_bad_values() {
        let mut config = GameConfig::default();
        config.grid.quantum = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "grid.quantum", .. })
        ));

        let mut config = GameConfig::default();
        config.grid.tile_width = 0;
        assert!(config.validate().is_err());

        let mut config = GameConfig::default();
        config.generation.spawn_probability = 1.5;
        assert!(config.validate().is_err());

        let mut config = GameConfig::default();
        config.grid.visibility_radius = 0;
        assert!(config.validate().is_err());

        let mut config = GameConfig::default();
        config.grid.visibility_radius = 1_000_000;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "grid.visibility_radius", .. })
        ));
        config.grid.visibility_radius = MAX_VISIBILITY_RADIUS;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn env_overrides_apply() {
        let mut config = GameConfig::default();
        let result = config.apply_overrides(|name| match name {
            "GEOCOIN_DATA_DIR" => Some("/tmp/geo".to_owned()),
            "GEOCOIN_PORT" => Some("3000".to_owned()),
            _ => None,
        });
        assert!(result.is_ok());
        assert_eq!(config.storage.data_dir, PathBuf::from("/tmp/geo"));
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn bad_port_override_is_rejected() {
        let mut config = GameConfig::default();
        let result = config.apply_overrides(|name| {
            (name == "GEOCOIN_PORT").then(|| "eighty".to_owned())
        });
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn load_project_config_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("geocoin-config.yaml");
        if path.exists() {
            let contents = std::fs::read_to_string(&path).unwrap_or_default();
            let config = GameConfig::parse(&contents);
            assert!(config.is_ok());
            assert!(config.is_ok_and(|c| c.validate().is_ok()));
        }
    }
}
