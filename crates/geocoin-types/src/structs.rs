//! Value structs shared between the world core and its collaborators.
//!
//! These are the shapes that cross a boundary: persisted records
//! ([`CacheMemento`], [`LatLng`] in the travel history) and projections
//! handed to the map UI ([`CellBounds`], [`VisibleCache`]).

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::ids::{Cell, Coin};

// ---------------------------------------------------------------------------
// Geography
// ---------------------------------------------------------------------------

/// A geographic point in decimal degrees.
///
/// Persisted as `{lat, lng}` in the travel history record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct LatLng {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
}

impl LatLng {
    /// Create a point from latitude and longitude.
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// The geographic rectangle covered by one cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct CellBounds {
    /// Southern edge.
    pub lat_min: f64,
    /// Western edge.
    pub lng_min: f64,
    /// Northern edge.
    pub lat_max: f64,
    /// Eastern edge.
    pub lng_max: f64,
}

impl CellBounds {
    /// Whether the point lies inside the half-open rectangle
    /// `[lat_min, lat_max) x [lng_min, lng_max)`.
    pub fn contains(&self, point: LatLng) -> bool {
        point.lat >= self.lat_min
            && point.lat < self.lat_max
            && point.lng >= self.lng_min
            && point.lng < self.lng_max
    }
}

// ---------------------------------------------------------------------------
// Caches
// ---------------------------------------------------------------------------

/// Serialized snapshot of one cache: the durable source of truth.
///
/// `i` and `j` repeat the cell coordinates so a record is self-describing
/// even when read without its map key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct CacheMemento {
    /// Latitude index of the cache's cell.
    #[ts(type = "number")]
    pub i: i64,
    /// Longitude index of the cache's cell.
    #[ts(type = "number")]
    pub j: i64,
    /// Coins currently held. Order carries no meaning.
    pub coins: Vec<Coin>,
}

impl CacheMemento {
    /// Create a memento for `cell` holding `coins`.
    pub const fn new(cell: Cell, coins: Vec<Coin>) -> Self {
        Self {
            i: cell.i,
            j: cell.j,
            coins,
        }
    }

    /// The cell this memento belongs to.
    pub const fn cell(&self) -> Cell {
        Cell::new(self.i, self.j)
    }
}

/// A cache in range of the player, as drawn on the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct VisibleCache {
    /// The cell the cache occupies.
    pub cell: Cell,
    /// The cell's rectangle on the map.
    pub bounds: CellBounds,
    /// Coins currently held.
    pub coins: Vec<Coin>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memento_uses_flat_record_shape() {
        let memento = CacheMemento::new(Cell::new(4, 5), vec![Coin::new(4, 5, 0)]);
        let json = serde_json::to_value(&memento).ok();
        assert_eq!(
            json,
            Some(serde_json::json!({
                "i": 4,
                "j": 5,
                "coins": [{ "i": 4, "j": 5, "serial": 0 }],
            }))
        );
    }

    #[test]
    fn memento_cell_matches_coordinates() {
        let memento = CacheMemento::new(Cell::new(-1, 9), Vec::new());
        assert_eq!(memento.cell(), Cell::new(-1, 9));
    }

    #[test]
    fn latlng_record_shape() {
        let json = serde_json::to_string(&LatLng::new(1.5, -2.25)).unwrap_or_default();
        assert_eq!(json, r#"{"lat":1.5,"lng":-2.25}"#);
    }

    #[test]
    fn bounds_are_half_open() {
        let bounds = CellBounds {
            lat_min: 0.0,
            lng_min: 0.0,
            lat_max: 1.0,
            lng_max: 1.0,
        };
        assert!(bounds.contains(LatLng::new(0.0, 0.5)));
        assert!(!bounds.contains(LatLng::new(1.0, 0.5)));
        assert!(!bounds.contains(LatLng::new(0.5, -0.1)));
    }
}
