//! Shared application state for the API server.

use chrono::{DateTime, Utc};
use geocoin_core::GameState;
use tokio::sync::Mutex;

/// State shared by every handler.
///
/// The game sits behind a single async mutex: each request is one
/// reaction, and reactions never overlap.
#[derive(Debug)]
pub struct AppState {
    /// The player's world.
    pub game: Mutex<GameState>,
    /// When the server state was created.
    pub started_at: DateTime<Utc>,
}

impl AppState {
    /// Wrap a game session for serving.
    pub fn new(game: GameState) -> Self {
        Self {
            game: Mutex::new(game),
            started_at: Utc::now(),
        }
    }
}
