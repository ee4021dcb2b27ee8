//! The quantized geographic grid.
//!
//! A [`Board`] converts continuous coordinates into discrete cells and back
//! into rectangles on the map. The grid unit is the *quantum* (1e-4 degrees
//! by default); a *tile* spans `tile_width` quanta along each axis.
//!
//! ```text
//! i = floor(lat / quantum)        lat_min = i * quantum
//! j = floor(lng / quantum)        lat_max = (i + tile_width) * quantum
//! ```
//!
//! Every cell the board hands out is canonical: it comes from the board's
//! own [`CellRegistry`]. No geographic wraparound is performed; latitudes
//! beyond the poles or longitudes past the antimeridian simply produce
//! indices outside the usual range.

use std::collections::BTreeSet;

use geocoin_types::{Cell, CellBounds, LatLng};
use tracing::trace;

use crate::error::WorldError;
use crate::registry::{CanonicalCell, CellRegistry};

/// Default grid quantum, in degrees.
pub const DEFAULT_QUANTUM: f64 = 1e-4;

/// Default tile width, in quanta.
pub const DEFAULT_TILE_WIDTH: i64 = 1;

/// The grid and its cell registry.
#[derive(Debug)]
pub struct Board {
    /// Degrees per grid unit.
    quantum: f64,
    /// Grid units per tile.
    tile_width: i64,
    /// Canonical cell instances.
    registry: CellRegistry,
}

impl Board {
    /// Create a board.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidQuantum`] unless `quantum` is finite and
    /// positive, and [`WorldError::InvalidTileWidth`] unless `tile_width`
    /// is at least one.
    pub fn new(quantum: f64, tile_width: i64) -> Result<Self, WorldError> {
        if !(quantum.is_finite() && quantum > 0.0) {
            return Err(WorldError::InvalidQuantum(quantum));
        }
        if tile_width < 1 {
            return Err(WorldError::InvalidTileWidth(tile_width));
        }
        Ok(Self {
            quantum,
            tile_width,
            registry: CellRegistry::new(),
        })
    }

    /// Degrees per grid unit.
    pub const fn quantum(&self) -> f64 {
        self.quantum
    }

    /// Grid units per tile.
    pub const fn tile_width(&self) -> i64 {
        self.tile_width
    }

    /// Read-only view of the interned cells.
    pub const fn registry(&self) -> &CellRegistry {
        &self.registry
    }

    /// Return the canonical cell containing `point`.
    pub fn cell_for_point(&mut self, point: LatLng) -> CanonicalCell {
        let cell = Cell::new(self.quantize(point.lat), self.quantize(point.lng));
        self.registry.get_or_create(cell)
    }

    /// Return the rectangle covered by `cell`.
    ///
    /// Pure: does not intern the cell.
    pub fn bounds_for_cell(&self, cell: Cell) -> CellBounds {
        let far = cell.offset(self.tile_width, self.tile_width);
        CellBounds {
            lat_min: self.degrees(cell.i),
            lng_min: self.degrees(cell.j),
            lat_max: self.degrees(far.i),
            lng_max: self.degrees(far.j),
        }
    }

    /// Return the canonical cells around `point`.
    ///
    /// Offsets run over `[-radius, radius)` on both axes in steps of the
    /// tile width, row by row, starting from the south-west corner. A
    /// non-positive radius yields no cells. Each cell appears once, even
    /// where offsets saturate at the edge of the index range.
    pub fn cells_near(&mut self, point: LatLng, radius: i64) -> Vec<CanonicalCell> {
        let origin = *self.cell_for_point(point);
        let mut cells = Vec::new();
        let mut seen = BTreeSet::new();

        let mut di = radius.saturating_neg();
        while di < radius {
            let mut dj = radius.saturating_neg();
            while dj < radius {
                let cell = origin.offset(di, dj);
                if seen.insert(cell) {
                    cells.push(self.registry.get_or_create(cell));
                }
                dj = dj.saturating_add(self.tile_width);
            }
            di = di.saturating_add(self.tile_width);
        }

        trace!(
            origin = %origin,
            radius,
            cells = cells.len(),
            "Computed cells near point"
        );
        cells
    }

    /// Quantize one coordinate. `as` saturates out-of-range values and maps
    /// NaN to zero.
    #[allow(clippy::cast_possible_truncation)]
    fn quantize(&self, degrees: f64) -> i64 {
        (degrees / self.quantum).floor() as i64
    }

    #[allow(clippy::cast_precision_loss)]
    fn degrees(&self, index: i64) -> f64 {
        index as f64 * self.quantum
    }
}

impl Default for Board {
    fn default() -> Self {
        Self {
            quantum: DEFAULT_QUANTUM,
            tile_width: DEFAULT_TILE_WIDTH,
            registry: CellRegistry::new(),
        }
    }
}
