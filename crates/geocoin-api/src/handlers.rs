//! REST API endpoint handlers.
//!
//! Every handler that touches the world locks the shared
//! [`GameState`](geocoin_core::GameState) for the whole request.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/api/health` | Liveness and server time |
//! | `GET` | `/api/player` | Position, inventory, selection |
//! | `POST` | `/api/player/move` | Move to `{lat, lng}` |
//! | `GET` | `/api/player/history` | Travel history |
//! | `GET` | `/api/cells/near` | Caches in range of `?lat=&lng=` |
//! | `GET` | `/api/caches/:i/:j` | One cache |
//! | `POST` | `/api/caches/:i/:j/collect` | Take `{coin}` from the cache |
//! | `POST` | `/api/caches/:i/:j/deposit` | Drop the selected coins |
//! | `POST` | `/api/inventory/select` | Stage `{coin}` |
//! | `POST` | `/api/inventory/deselect` | Unstage `{coin}` |
//! | `POST` | `/api/world/reset` | Wipe the world |
//! | `GET` | `/api/world/audit` | Conservation audit |
//!
//! Coins in request bodies use their display form, `{i}:{j}#{serial}`.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use chrono::Utc;
use geocoin_core::GameState;
use geocoin_types::{Cell, Coin, LatLng};

use crate::error::ApiError;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request structs
// ---------------------------------------------------------------------------

/// Query parameters for the `GET /api/cells/near` endpoint.
#[derive(Debug, serde::Deserialize)]
pub struct NearQuery {
    /// Latitude of the centre point.
    pub lat: f64,
    /// Longitude of the centre point.
    pub lng: f64,
}

/// Body naming one coin.
#[derive(Debug, serde::Deserialize)]
pub struct CoinRequest {
    /// The coin's display form, e.g. `369995:-1220533#0`.
    pub coin: String,
}

impl CoinRequest {
    fn parse(&self) -> Result<Coin, ApiError> {
        Ok(self.coin.parse()?)
    }
}

/// JSON projection of the inventory.
fn inventory_json(game: &GameState) -> serde_json::Value {
    let inventory = game.inventory();
    serde_json::json!({
        "coins": inventory.coins(),
        "selected": inventory.selected().collect::<Vec<_>>(),
    })
}

// ---------------------------------------------------------------------------
// GET /api/health
// ---------------------------------------------------------------------------

/// Liveness probe.
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let now = Utc::now();
    let uptime = now.signed_duration_since(state.started_at).num_seconds();
    Json(serde_json::json!({
        "status": "ok",
        "time": now,
        "uptime_seconds": uptime,
    }))
}

// ---------------------------------------------------------------------------
// Player
// ---------------------------------------------------------------------------

/// Current position, cell, inventory and selection.
pub async fn get_player(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let mut game = state.game.lock().await;
    let position = game.position();
    let cell = *game.cell_for_point(position);

    Json(serde_json::json!({
        "position": position,
        "cell": cell,
        "bounds": game.bounds_for_cell(cell),
        "inventory": inventory_json(&game),
        "visibility_radius": game.visibility_radius(),
    }))
}

/// Move the player and return the caches now in range.
pub async fn move_player(
    State(state): State<Arc<AppState>>,
    Json(point): Json<LatLng>,
) -> Result<impl IntoResponse, ApiError> {
    let mut game = state.game.lock().await;
    let caches = game.move_to(point)?;
    let cell = *game.cell_for_point(point);

    Ok(Json(serde_json::json!({
        "position": point,
        "cell": cell,
        "count": caches.len(),
        "caches": caches,
    })))
}

/// The travel history, oldest first.
pub async fn get_history(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let game = state.game.lock().await;
    Json(serde_json::json!({
        "count": game.history().len(),
        "points": game.history(),
    }))
}

// ---------------------------------------------------------------------------
// Grid and caches
// ---------------------------------------------------------------------------

/// Caches within the visibility radius of a point. The player stays put.
pub async fn cells_near(
    State(state): State<Arc<AppState>>,
    Query(query): Query<NearQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let point = LatLng::new(query.lat, query.lng);
    let mut game = state.game.lock().await;
    let caches = game.caches_near(point)?;
    let origin = *game.cell_for_point(point);

    Ok(Json(serde_json::json!({
        "origin": origin,
        "radius": game.visibility_radius(),
        "count": caches.len(),
        "caches": caches,
    })))
}

/// One cache, materialized on first access.
pub async fn get_cache(
    State(state): State<Arc<AppState>>,
    Path((i, j)): Path<(i64, i64)>,
) -> Result<impl IntoResponse, ApiError> {
    let cell = Cell::new(i, j);
    let mut game = state.game.lock().await;
    let cache = game
        .cache_at(cell)?
        .ok_or_else(|| ApiError::NotFound(format!("no cache at cell {cell}")))?;

    Ok(Json(serde_json::json!({
        "cell": cell,
        "bounds": game.bounds_for_cell(cell),
        "coins": cache.coins(),
    })))
}

/// Move one coin from the cache into the inventory.
pub async fn collect(
    State(state): State<Arc<AppState>>,
    Path((i, j)): Path<(i64, i64)>,
    Json(request): Json<CoinRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let cell = Cell::new(i, j);
    let coin = request.parse()?;
    let mut game = state.game.lock().await;
    let cache = game.collect(cell, coin)?;

    Ok(Json(serde_json::json!({
        "collected": coin,
        "cell": cell,
        "coins": cache.coins(),
        "inventory": inventory_json(&game),
    })))
}

/// Move every selected coin into the cache.
pub async fn deposit(
    State(state): State<Arc<AppState>>,
    Path((i, j)): Path<(i64, i64)>,
) -> Result<impl IntoResponse, ApiError> {
    let cell = Cell::new(i, j);
    let mut game = state.game.lock().await;
    let (deposited, cache) = game.deposit(cell)?;

    Ok(Json(serde_json::json!({
        "deposited": deposited,
        "cell": cell,
        "coins": cache.coins(),
        "inventory": inventory_json(&game),
    })))
}

// ---------------------------------------------------------------------------
// Inventory
// ---------------------------------------------------------------------------

/// Stage a carried coin for the next deposit.
pub async fn select(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CoinRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let coin = request.parse()?;
    let mut game = state.game.lock().await;
    let changed = game.select(coin)?;

    Ok(Json(serde_json::json!({
        "coin": coin,
        "changed": changed,
        "inventory": inventory_json(&game),
    })))
}

/// Unstage a coin.
pub async fn deselect(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CoinRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let coin = request.parse()?;
    let mut game = state.game.lock().await;
    let changed = game.deselect(coin);

    Ok(Json(serde_json::json!({
        "coin": coin,
        "changed": changed,
        "inventory": inventory_json(&game),
    })))
}

// ---------------------------------------------------------------------------
// World
// ---------------------------------------------------------------------------

/// Wipe every cache, the inventory and the travel history.
pub async fn reset(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    let mut game = state.game.lock().await;
    game.reset()?;
    Ok(Json(serde_json::json!({
        "status": "reset",
        "position": game.position(),
    })))
}

/// Check coin conservation over every materialized cache.
pub async fn audit(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let game = state.game.lock().await;
    Json(serde_json::json!({
        "result": game.audit(),
        "materialized": game.materialized(),
        "load_faults": game.load_faults(),
    }))
}
