//! Axum router construction for the API.
//!
//! Assembles all routes into a single [`Router`] with CORS enabled for the
//! browser map client and request tracing.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the complete Axum router.
///
/// The router includes:
/// - `GET /api/health` -- liveness and server time
/// - `GET /api/player` -- position, inventory, selection
/// - `POST /api/player/move` -- move and list caches in range
/// - `GET /api/player/history` -- travel history
/// - `GET /api/cells/near` -- caches in range of any point
/// - `GET /api/caches/{i}/{j}` -- one cache
/// - `POST /api/caches/{i}/{j}/collect` -- take a coin
/// - `POST /api/caches/{i}/{j}/deposit` -- drop the selected coins
/// - `POST /api/inventory/select` and `/deselect` -- stage coins
/// - `POST /api/world/reset` -- wipe the world
/// - `GET /api/world/audit` -- conservation audit
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(handlers::health))
        // Player
        .route("/api/player", get(handlers::get_player))
        .route("/api/player/move", post(handlers::move_player))
        .route("/api/player/history", get(handlers::get_history))
        // Grid and caches
        .route("/api/cells/near", get(handlers::cells_near))
        .route("/api/caches/{i}/{j}", get(handlers::get_cache))
        .route("/api/caches/{i}/{j}/collect", post(handlers::collect))
        .route("/api/caches/{i}/{j}/deposit", post(handlers::deposit))
        // Inventory
        .route("/api/inventory/select", post(handlers::select))
        .route("/api/inventory/deselect", post(handlers::deselect))
        // World
        .route("/api/world/reset", post(handlers::reset))
        .route("/api/world/audit", get(handlers::audit))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
