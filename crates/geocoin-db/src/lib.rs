//! Persistence layer for the Geocoin world.
//!
//! The game treats durable storage as an opaque key-value byte store. This
//! crate defines that interface ([`KvStore`]), two backends, and the JSON
//! helpers that every typed record goes through.
//!
//! # Architecture
//!
//! ```text
//! GameState
//!     |
//!     +-- JsonRecords::get_json / set_json  (serde_json)
//!             |
//!             +-- KvStore::get / set / clear
//!                     |-- MemoryStore  (BTreeMap, tests + ephemeral play)
//!                     +-- FileStore    ({data_dir}/{key}.json)
//! ```
//!
//! # Modules
//!
//! - [`store`] -- The [`KvStore`] trait and [`JsonRecords`] extension
//! - [`memory`] -- In-memory backend
//! - [`file`] -- File-per-key backend with atomic replace
//! - [`keys`] -- Names of the persisted records
//! - [`error`] -- Shared error types

pub mod error;
pub mod file;
pub mod keys;
pub mod memory;
pub mod store;

// Re-export primary types for convenience.
pub use error::DbError;
pub use file::FileStore;
pub use memory::MemoryStore;
pub use store::{JsonRecords, KvStore};
