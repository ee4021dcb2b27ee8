//! Coin ownership for the Geocoin world.
//!
//! Every coin is minted exactly once, by the content generator, and from
//! then on sits in exactly one place: a cache or the player's inventory.
//! This crate holds the only code allowed to move a coin between the two.
//!
//! # Architecture
//!
//! - [`cache`] -- The live, mutable [`Cache`] rebuilt from a memento.
//! - [`inventory`] -- The player's carried coins and deposit selection.
//! - [`ledger`] -- The [`Ledger`]: collect, deposit, select.
//! - [`conservation`] -- Conservation law verification and anomaly detection.
//!
//! # Conservation Law
//!
//! Over all materialized caches:
//!
//! ```text
//! multiset(inventory + cache coins) == multiset(generated coins)
//! ```
//!
//! A violation produces a [`LedgerAnomaly`]. The ledger never panics; it
//! returns errors.
//!
//! # Usage
//!
//! ```
//! use geocoin_ledger::{Cache, Ledger};
//! use geocoin_types::{Cell, Coin};
//!
//! let cell = Cell::new(0, 0);
//! let mut cache = Cache::new(cell, vec![Coin::minted_in(cell, 0), Coin::minted_in(cell, 1)]);
//! let mut ledger = Ledger::new();
//!
//! ledger.collect(Coin::minted_in(cell, 1), &mut cache).ok();
//! assert_eq!(cache.len(), 1);
//! assert_eq!(ledger.inventory().len(), 1);
//! ```

pub mod cache;
pub mod conservation;
pub mod inventory;
pub mod ledger;

// Re-export primary types at crate root.
pub use cache::Cache;
pub use conservation::{ConservationResult, verify_conservation};
pub use inventory::Inventory;
pub use ledger::Ledger;

use geocoin_types::{Cell, Coin};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Reasons a coin transfer is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    /// The cache does not hold the requested coin.
    #[error("coin {coin} is not in the cache at {cell}")]
    CoinNotInCache {
        /// The requested coin.
        coin: Coin,
        /// The cache's cell.
        cell: Cell,
    },

    /// The inventory is empty or no coin is selected.
    #[error("nothing selected to deposit")]
    NothingToDeposit,

    /// The coin is not in the player's inventory.
    #[error("coin {0} is not carried")]
    CoinNotCarried(Coin),
}

// ---------------------------------------------------------------------------
// Anomaly type
// ---------------------------------------------------------------------------

/// A conservation law violation found by an audit.
///
/// Serialized as part of the audit report; the message starts with
/// `COIN_ANOMALY`.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct LedgerAnomaly {
    /// Generated coins that nothing holds.
    pub missing: Vec<Coin>,
    /// Coins held in more than one place.
    pub duplicated: Vec<Coin>,
    /// Held coins the generator never produced.
    pub unexpected: Vec<Coin>,
    /// Human-readable description of the anomaly.
    pub message: String,
}

impl core::fmt::Display for LedgerAnomaly {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.message)
    }
}
