//! Identity types for grid cells and coins.
//!
//! A [`Cell`] is the composite key `(i, j)` of one grid square. A [`Coin`]
//! is identified by the cell it spawned in plus a serial that is unique
//! within that spawn batch. Both identities are permanent: a coin keeps its
//! identity as it moves between caches and the player inventory.
//!
//! # String forms
//!
//! | Type | Form | Example |
//! |------|------|---------|
//! | [`Cell`] | `{i},{j}` | `369995,-1220533` |
//! | [`Coin`] | `{i}:{j}#{serial}` | `369995:-1220533#2` |
//!
//! The cell form is the key used in the persisted `caches` record; it is
//! produced by exactly one function ([`Cell::key`]) so it stays stable.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Errors produced when parsing a [`Cell`] or [`Coin`] from its string form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseIdError {
    /// The input did not have the expected `{i},{j}` shape.
    #[error("malformed cell key: {0:?}")]
    MalformedCell(String),

    /// The input did not have the expected `{i}:{j}#{serial}` shape.
    #[error("malformed coin id: {0:?}")]
    MalformedCoin(String),
}

// ---------------------------------------------------------------------------
// Cell
// ---------------------------------------------------------------------------

/// A discrete grid square, in units of the grid quantum.
///
/// Ordering is lexicographic on `(i, j)`, which keeps every map keyed by
/// cells in a stable order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export, export_to = "bindings/")]
pub struct Cell {
    /// Latitude index: `floor(lat / quantum)`.
    #[ts(type = "number")]
    pub i: i64,
    /// Longitude index: `floor(lng / quantum)`.
    #[ts(type = "number")]
    pub j: i64,
}

impl Cell {
    /// Create a cell from its grid indices.
    pub const fn new(i: i64, j: i64) -> Self {
        Self { i, j }
    }

    /// The string key for this cell in persisted records (`"{i},{j}"`).
    ///
    /// This is also the seed the content generator hashes to decide
    /// whether a cache exists here.
    pub fn key(self) -> String {
        format!("{},{}", self.i, self.j)
    }

    /// Return the cell offset by `(di, dj)`, saturating at the index range.
    #[must_use]
    pub const fn offset(self, di: i64, dj: i64) -> Self {
        Self {
            i: self.i.saturating_add(di),
            j: self.j.saturating_add(dj),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.i, self.j)
    }
}

impl FromStr for Cell {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ParseIdError::MalformedCell(s.to_owned());
        let (i, j) = s.split_once(',').ok_or_else(malformed)?;
        let i = i.trim().parse::<i64>().ok().ok_or_else(malformed)?;
        let j = j.trim().parse::<i64>().ok().ok_or_else(malformed)?;
        Ok(Self { i, j })
    }
}

// ---------------------------------------------------------------------------
// Coin
// ---------------------------------------------------------------------------

/// A uniquely identified collectible.
///
/// `(i, j)` is the cell of the cache the coin originally spawned in, which
/// is not necessarily where it is now.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export, export_to = "bindings/")]
pub struct Coin {
    /// Latitude index of the spawn cell.
    #[ts(type = "number")]
    pub i: i64,
    /// Longitude index of the spawn cell.
    #[ts(type = "number")]
    pub j: i64,
    /// Serial number within the spawn batch, starting at zero.
    pub serial: u32,
}

impl Coin {
    /// Create a coin identity.
    pub const fn new(i: i64, j: i64, serial: u32) -> Self {
        Self { i, j, serial }
    }

    /// Create the coin with the given serial spawned in `cell`.
    pub const fn minted_in(cell: Cell, serial: u32) -> Self {
        Self {
            i: cell.i,
            j: cell.j,
            serial,
        }
    }

    /// The cell this coin spawned in.
    pub const fn origin(self) -> Cell {
        Cell {
            i: self.i,
            j: self.j,
        }
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}#{}", self.i, self.j, self.serial)
    }
}

impl FromStr for Coin {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ParseIdError::MalformedCoin(s.to_owned());
        let (cell, serial) = s.split_once('#').ok_or_else(malformed)?;
        let (i, j) = cell.split_once(':').ok_or_else(malformed)?;
        Ok(Self {
            i: i.parse().ok().ok_or_else(malformed)?,
            j: j.parse().ok().ok_or_else(malformed)?,
            serial: serial.parse().ok().ok_or_else(malformed)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_key_uses_comma_form() {
        assert_eq!(Cell::new(369_995, -1_220_533).key(), "369995,-1220533");
        assert_eq!(Cell::new(0, 0).to_string(), "0,0");
    }

    #[test]
    fn cell_key_parses_back() {
        let cell = Cell::new(-4, 17);
        assert_eq!(cell.key().parse::<Cell>(), Ok(cell));
    }

    #[test]
    fn cell_parse_rejects_garbage() {
        assert!("4".parse::<Cell>().is_err());
        assert!("a,b".parse::<Cell>().is_err());
        assert!("[object Object]".parse::<Cell>().is_err());
    }

    #[test]
    fn cell_offset_saturates() {
        let edge = Cell::new(i64::MAX, i64::MIN);
        assert_eq!(edge.offset(1, -1), edge);
        assert_eq!(Cell::new(3, 3).offset(-1, 2), Cell::new(2, 5));
    }

    #[test]
    fn coin_display_form() {
        let coin = Coin::new(369_995, -1_220_533, 2);
        assert_eq!(coin.to_string(), "369995:-1220533#2");
        assert_eq!(coin.to_string().parse::<Coin>(), Ok(coin));
    }

    #[test]
    fn coin_parse_rejects_garbage() {
        assert!("1:2".parse::<Coin>().is_err());
        assert!("1#2".parse::<Coin>().is_err());
        assert!("1:2#-3".parse::<Coin>().is_err());
    }

    #[test]
    fn coin_origin_is_spawn_cell() {
        let cell = Cell::new(8, -9);
        assert_eq!(Coin::minted_in(cell, 4).origin(), cell);
    }

    #[test]
    fn coin_serializes_as_record() {
        let json = serde_json::to_value(Coin::new(1, 2, 3)).ok();
        assert_eq!(
            json,
            Some(serde_json::json!({ "i": 1, "j": 2, "serial": 3 }))
        );
    }
}
