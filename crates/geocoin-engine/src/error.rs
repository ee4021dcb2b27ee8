//! Error types for the engine binary.
//!
//! [`EngineError`] is the top-level error type that wraps all possible
//! failure modes during startup and serving.

/// Top-level error for the engine binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: geocoin_core::ConfigError,
    },

    /// The byte store could not be opened.
    #[error("storage error: {source}")]
    Storage {
        /// The underlying storage error.
        #[from]
        source: geocoin_db::DbError,
    },

    /// The world could not be opened.
    #[error("world error: {source}")]
    World {
        /// The underlying core error.
        #[from]
        source: geocoin_core::CoreError,
    },

    /// The API server failed to start or stopped with an error.
    #[error("server error: {source}")]
    Server {
        /// The underlying server error.
        #[from]
        source: geocoin_api::ServerError,
    },
}
