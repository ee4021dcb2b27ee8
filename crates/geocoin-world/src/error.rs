//! Error types for the `geocoin-world` crate.
//!
//! Grid and generator parameters are validated once, at construction.
//! Every query on a constructed [`Board`](crate::Board) or
//! [`Generator`](crate::Generator) is infallible.

/// Errors raised when building the grid or the content generator.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WorldError {
    /// The grid quantum must be finite and positive.
    #[error("grid quantum must be finite and positive, got {0}")]
    InvalidQuantum(f64),

    /// The tile width must cover at least one grid unit.
    #[error("tile width must be at least 1, got {0}")]
    InvalidTileWidth(i64),

    /// The spawn probability must lie in `[0, 1]`.
    #[error("spawn probability must be within [0, 1], got {0}")]
    InvalidSpawnProbability(f64),
}
