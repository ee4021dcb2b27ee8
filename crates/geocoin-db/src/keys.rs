//! Names of the persisted records.
//!
//! | Key | Shape |
//! |-----|-------|
//! | `travelHistory` | `[{lat, lng}, ...]` |
//! | `inventory` | `[{i, j, serial}, ...]` |
//! | `caches` | `{"i,j": {i, j, coins: [...]}}` |
//!
//! The three records are independent: each is read and replaced whole.

/// Ordered list of points the player has visited.
pub const TRAVEL_HISTORY: &str = "travelHistory";

/// Coins carried by the player.
pub const INVENTORY: &str = "inventory";

/// Every materialized cache, keyed by cell.
pub const CACHES: &str = "caches";

/// Every record the game owns.
pub const ALL: [&str; 3] = [TRAVEL_HISTORY, INVENTORY, CACHES];
