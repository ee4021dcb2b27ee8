//! Error types for the game core.
//!
//! [`CoreError`] wraps every failure a game reaction can hit. Ledger
//! rejections pass through unchanged so callers can tell a user mistake
//! from a storage failure.

use geocoin_db::DbError;
use geocoin_ledger::LedgerError;
use geocoin_types::Cell;
use geocoin_world::WorldError;

/// Errors returned by [`GameState`](crate::GameState) operations.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Grid or generator parameters were rejected.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: WorldError,
    },

    /// The byte store failed.
    #[error("storage error: {source}")]
    Storage {
        /// The underlying storage error.
        #[from]
        source: DbError,
    },

    /// A coin transfer was rejected. State is unchanged.
    #[error("{source}")]
    Ledger {
        /// The underlying ledger rejection.
        #[from]
        source: LedgerError,
    },

    /// The cell holds no cache.
    #[error("no cache at cell {0}")]
    NoCache(Cell),

    /// A position with a non-finite coordinate.
    #[error("invalid position ({lat}, {lng})")]
    InvalidPoint {
        /// Latitude as received.
        lat: f64,
        /// Longitude as received.
        lng: f64,
    },
}

/// A persisted record, or one entry of it, that could not be read.
///
/// The affected data is treated as absent; everything else loads normally.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct LoadFault {
    /// The record key, or `caches/{i,j}` for a single cache entry.
    pub key: String,
    /// Why it was rejected.
    pub reason: String,
}

impl LoadFault {
    /// Create a fault for `key`.
    pub fn new(key: impl Into<String>, reason: impl ToString) -> Self {
        Self {
            key: key.into(),
            reason: reason.to_string(),
        }
    }
}

impl core::fmt::Display for LoadFault {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}: {}", self.key, self.reason)
    }
}
