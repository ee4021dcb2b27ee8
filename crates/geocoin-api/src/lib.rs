//! HTTP API for the Geocoin world.
//!
//! This crate provides an Axum HTTP server that exposes the game core to
//! the map client, which owns rendering and position sensing:
//!
//! - **Player endpoints** for position, movement and travel history
//! - **Cache endpoints** for reading a cell and collecting or depositing
//!   coins
//! - **Inventory endpoints** for staging a deposit
//! - **World endpoints** for reset and the conservation audit
//!
//! # Architecture
//!
//! Every request locks the single [`GameState`](geocoin_core::GameState)
//! held in [`AppState`], so requests are applied one at a time, each to
//! completion.

pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod state;

// Re-export primary types for convenience.
pub use error::ApiError;
pub use router::build_router;
pub use server::{ServerError, start_server};
pub use state::AppState;
