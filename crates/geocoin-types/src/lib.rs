//! Shared type definitions for the Geocoin world.
//!
//! This crate is the single source of truth for the value types used
//! across the workspace. Types defined here flow downstream to `TypeScript`
//! via `ts-rs` for the map client.
//!
//! # Modules
//!
//! - [`ids`] -- Cell and coin identities with their string forms
//! - [`structs`] -- Geographic points, cell bounds, cache mementos

pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use ids::{Cell, Coin, ParseIdError};
pub use structs::{CacheMemento, CellBounds, LatLng, VisibleCache};

#[cfg(test)]
mod tests {
    //! `TypeScript` binding generation.

    #[test]
    fn export_bindings() {
        // The files are written to the `bindings/` directory relative to
        // the crate root.
        use ts_rs::TS;

        let _ = crate::ids::Cell::export_all();
        let _ = crate::ids::Coin::export_all();
        let _ = crate::structs::LatLng::export_all();
        let _ = crate::structs::CellBounds::export_all();
        let _ = crate::structs::CacheMemento::export_all();
        let _ = crate::structs::VisibleCache::export_all();
    }
}
