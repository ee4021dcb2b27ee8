//! Game core for the Geocoin world.
//!
//! Ties the pure world model (`geocoin-world`), the coin ledger
//! (`geocoin-ledger`) and a byte store (`geocoin-db`) into one playable
//! session.
//!
//! # Architecture
//!
//! ```text
//! position --> Board::cells_near --> CacheStore::get (materialize or restore)
//!                                          |
//! collect / deposit --> Ledger ------------+--> KvStore (caches, inventory)
//! ```
//!
//! # Modules
//!
//! - [`config`] -- Typed `geocoin-config.yaml` loader
//! - [`cache_store`] -- Lazy cache materialization and the `caches` record
//! - [`game`] -- The [`GameState`] session and its reactions
//! - [`error`] -- [`CoreError`] and [`LoadFault`]

pub mod cache_store;
pub mod config;
pub mod error;
pub mod game;

// Re-export primary types at crate root.
pub use cache_store::CacheStore;
pub use config::{ConfigError, GameConfig, LogFormat, StorageBackend};
pub use error::{CoreError, LoadFault};
pub use game::GameState;
