//! Grid geometry and procedural content for the Geocoin world.
//!
//! This crate models the world that exists before any player touches it:
//! a quantized grid of cells, and the deterministic rules that decide which
//! cells hold a cache and what each cache starts with. Nothing here is
//! persisted; everything is recomputed from cell coordinates.
//!
//! # Modules
//!
//! - [`luck`] -- The deterministic hash oracle ([`SeedRandom`]) behind all
//!   procedural decisions.
//! - [`registry`] -- Cell interning ([`CellRegistry`]).
//! - [`board`] -- Point-to-cell quantization, cell bounds, and visibility
//!   neighborhoods ([`Board`]).
//! - [`generator`] -- Cache existence and initial coins ([`Generator`]).
//! - [`error`] -- Construction errors.

pub mod board;
pub mod error;
pub mod generator;
pub mod luck;
pub mod registry;

// Re-export primary types at crate root.
pub use board::{Board, DEFAULT_QUANTUM, DEFAULT_TILE_WIDTH};
pub use error::WorldError;
pub use generator::{DEFAULT_MAX_COINS_PER_CACHE, DEFAULT_SPAWN_PROBABILITY, Generator};
pub use luck::{FixedLuck, Luck, SeedRandom};
pub use registry::{CanonicalCell, CellRegistry};
