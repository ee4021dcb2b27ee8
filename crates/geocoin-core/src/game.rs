//! The game session.
//!
//! [`GameState`] wires the grid, the cache state store, the coin ledger and
//! the travel history to one byte store. Each public method is one discrete
//! reaction: it runs to completion, persisting what it changed, before the
//! next one starts.
//!
//! # Persisted records
//!
//! | Key | Written by |
//! |-----|------------|
//! | `travelHistory` | [`move_to`](GameState::move_to) |
//! | `inventory` | [`collect`](GameState::collect), [`deposit`](GameState::deposit) |
//! | `caches` | materialization, [`collect`](GameState::collect), [`deposit`](GameState::deposit) |
//!
//! [`reset`](GameState::reset) clears all three.

use std::sync::Arc;

use geocoin_db::{DbError, JsonRecords, KvStore, keys};
use geocoin_ledger::{Cache, ConservationResult, Inventory, Ledger, verify_conservation};
use geocoin_types::{Cell, CellBounds, Coin, LatLng, VisibleCache};
use geocoin_world::{Board, CanonicalCell, Generator, Luck};
use serde::de::DeserializeOwned;
use tracing::{info, warn};

use crate::cache_store::CacheStore;
use crate::config::GameConfig;
use crate::error::{CoreError, LoadFault};

/// One player's world, backed by a byte store.
pub struct GameState {
    board: Board,
    caches: CacheStore,
    ledger: Ledger,
    history: Vec<LatLng>,
    start: LatLng,
    visibility_radius: i64,
    faults: Vec<LoadFault>,
    store: Box<dyn KvStore>,
}

impl GameState {
    /// Open the world persisted in `store`.
    ///
    /// Unreadable records are reported through
    /// [`load_faults`](Self::load_faults) and treated as absent.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::World`] if the grid or generator parameters are
    /// invalid, or [`CoreError::Storage`] if the store cannot be read.
    pub fn open(
        config: &GameConfig,
        luck: Arc<dyn Luck + Send + Sync>,
        store: Box<dyn KvStore>,
    ) -> Result<Self, CoreError> {
        let board = Board::new(config.grid.quantum, config.grid.tile_width)?;
        let generator = Generator::new(
            luck,
            config.generation.spawn_probability,
            config.generation.max_coins_per_cache,
        )?;

        let (caches, mut faults) = CacheStore::load(generator, store.as_ref())?;
        let inventory: Vec<Coin> = read_record(store.as_ref(), keys::INVENTORY, &mut faults)?;
        let history: Vec<LatLng> = read_record(store.as_ref(), keys::TRAVEL_HISTORY, &mut faults)?;

        info!(
            caches = caches.len(),
            inventory = inventory.len(),
            history = history.len(),
            faults = faults.len(),
            "World opened"
        );

        Ok(Self {
            board,
            caches,
            ledger: Ledger::with_inventory(Inventory::from_coins(inventory)),
            history,
            start: LatLng::new(config.player.start_lat, config.player.start_lng),
            visibility_radius: config.grid.visibility_radius,
            faults,
            store,
        })
    }

    // =========================================================================
    // Grid
    // =========================================================================

    /// The canonical cell containing `point`.
    pub fn cell_for_point(&mut self, point: LatLng) -> CanonicalCell {
        self.board.cell_for_point(point)
    }

    /// The rectangle covered by `cell`.
    pub fn bounds_for_cell(&self, cell: Cell) -> CellBounds {
        self.board.bounds_for_cell(cell)
    }

    /// The grid.
    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// Tiles visible around the player in each direction.
    pub const fn visibility_radius(&self) -> i64 {
        self.visibility_radius
    }

    // =========================================================================
    // Movement
    // =========================================================================

    /// The player's position: the last visited point, or the start point.
    pub fn position(&self) -> LatLng {
        self.history.last().copied().unwrap_or(self.start)
    }

    /// Every visited point, oldest first.
    pub fn history(&self) -> &[LatLng] {
        &self.history
    }

    /// Move the player to `point` and return the caches now in range.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidPoint`] for a non-finite coordinate, or
    /// [`CoreError::Storage`] if the history or a new cache cannot be
    /// persisted. A failed history write leaves the player where it was.
    pub fn move_to(&mut self, point: LatLng) -> Result<Vec<VisibleCache>, CoreError> {
        if !(point.lat.is_finite() && point.lng.is_finite()) {
            return Err(CoreError::InvalidPoint {
                lat: point.lat,
                lng: point.lng,
            });
        }

        self.history.push(point);
        if let Err(e) = self.store.set_json(keys::TRAVEL_HISTORY, &self.history) {
            self.history.pop();
            return Err(e.into());
        }

        let cell = self.board.cell_for_point(point);
        info!(lat = point.lat, lng = point.lng, cell = %cell, "Player moved");
        self.visible_caches()
    }

    /// The caches in range of the player.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Storage`] if a newly materialized cache cannot
    /// be persisted.
    pub fn visible_caches(&mut self) -> Result<Vec<VisibleCache>, CoreError> {
        self.caches_near(self.position())
    }

    /// The caches within the visibility radius of `point`, materializing
    /// any cell seen for the first time. The player does not move.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidPoint`] for a non-finite coordinate, or
    /// [`CoreError::Storage`] if a newly materialized cache cannot be
    /// persisted.
    pub fn caches_near(&mut self, point: LatLng) -> Result<Vec<VisibleCache>, CoreError> {
        if !(point.lat.is_finite() && point.lng.is_finite()) {
            return Err(CoreError::InvalidPoint {
                lat: point.lat,
                lng: point.lng,
            });
        }

        let cells = self.board.cells_near(point, self.visibility_radius);
        let mut visible = Vec::new();
        for cell in cells {
            if let Some(cache) = self.caches.get(*cell, self.store.as_mut())? {
                visible.push(VisibleCache {
                    cell: *cell,
                    bounds: self.board.bounds_for_cell(*cell),
                    coins: cache.coins().to_vec(),
                });
            }
        }
        Ok(visible)
    }

    // =========================================================================
    // Caches and coins
    // =========================================================================

    /// The live cache at `cell`, materializing it on first access.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Storage`] if a newly materialized cache cannot
    /// be persisted.
    pub fn cache_at(&mut self, cell: Cell) -> Result<Option<Cache>, CoreError> {
        self.caches.get(cell, self.store.as_mut())
    }

    /// Save a cache over its cell's entry.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Storage`] if the write fails.
    pub fn put_cache(&mut self, cache: &Cache) -> Result<(), CoreError> {
        self.caches.put(cache, self.store.as_mut())
    }

    /// Move `coin` from the cache at `cell` into the inventory.
    ///
    /// Returns the cache after the transfer.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NoCache`] if `cell` holds no cache,
    /// [`CoreError::Ledger`] if the cache does not hold `coin`, or
    /// [`CoreError::Storage`] if the result cannot be persisted.
    pub fn collect(&mut self, cell: Cell, coin: Coin) -> Result<Cache, CoreError> {
        let mut cache = self.cache_at(cell)?.ok_or(CoreError::NoCache(cell))?;
        let before = self.ledger.clone();
        if let Err(e) = self.ledger.collect(coin, &mut cache) {
            warn!(cell = %cell, coin = %coin, error = %e, "Collect rejected");
            return Err(e.into());
        }
        self.commit(&cache, before)?;
        Ok(cache)
    }

    /// Move every selected coin into the cache at `cell`.
    ///
    /// Returns the deposited coins and the cache after the transfer.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NoCache`] if `cell` holds no cache,
    /// [`CoreError::Ledger`] if nothing is selected, or
    /// [`CoreError::Storage`] if the result cannot be persisted.
    pub fn deposit(&mut self, cell: Cell) -> Result<(Vec<Coin>, Cache), CoreError> {
        let mut cache = self.cache_at(cell)?.ok_or(CoreError::NoCache(cell))?;
        let before = self.ledger.clone();
        let deposited = match self.ledger.deposit(&mut cache) {
            Ok(deposited) => deposited,
            Err(e) => {
                warn!(cell = %cell, error = %e, "Deposit rejected");
                return Err(e.into());
            }
        };
        self.commit(&cache, before)?;
        Ok((deposited, cache))
    }

    /// Stage a carried coin for the next deposit.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Ledger`] if the coin is not carried.
    pub fn select(&mut self, coin: Coin) -> Result<bool, CoreError> {
        Ok(self.ledger.select(coin)?)
    }

    /// Unstage a coin. Returns `true` if it was staged.
    pub fn deselect(&mut self, coin: Coin) -> bool {
        self.ledger.deselect(coin)
    }

    /// Read-only view of the inventory.
    pub const fn inventory(&self) -> &Inventory {
        self.ledger.inventory()
    }

    /// Persist a transfer: the cache, then the inventory.
    ///
    /// On failure the ledger is rolled back to `before` and the cache to its
    /// prior memento, so no coin changes hands.
    fn commit(&mut self, cache: &Cache, before: Ledger) -> Result<(), CoreError> {
        let previous = self.caches.peek(cache.cell()).cloned();
        if let Err(e) = self.caches.put(cache, self.store.as_mut()) {
            self.ledger = before;
            return Err(e);
        }

        let Err(e) = self
            .store
            .set_json(keys::INVENTORY, self.ledger.inventory().coins())
        else {
            return Ok(());
        };

        self.ledger = before;
        if let Some(memento) = previous
            && let Err(undo) = self.caches.revert(memento, self.store.as_mut())
        {
            warn!(cell = %cache.cell(), error = %undo, "Cache rollback not persisted");
        }
        Err(e.into())
    }

    // =========================================================================
    // World
    // =========================================================================

    /// Wipe the world: every cache, the inventory and the travel history.
    ///
    /// Afterwards every cell is undecided again and regenerates from the
    /// generator on next access.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Storage`] if the store cannot be cleared. The
    /// in-memory world is untouched in that case.
    pub fn reset(&mut self) -> Result<(), CoreError> {
        self.store.clear()?;
        self.caches.clear();
        self.ledger.reset();
        self.history.clear();
        self.faults.clear();
        info!("World reset");
        Ok(())
    }

    /// Check coin conservation over every materialized cache.
    pub fn audit(&self) -> ConservationResult {
        let generator = self.caches.generator();
        let generated = self
            .caches
            .mementos()
            .flat_map(|memento| generator.initial_coins(memento.cell()));
        let held = self
            .ledger
            .inventory()
            .coins()
            .iter()
            .chain(self.caches.mementos().flat_map(|memento| memento.coins.iter()));

        let result = verify_conservation(generated, held);
        if let ConservationResult::Anomaly(anomaly) = &result {
            warn!(%anomaly, "Conservation audit failed");
        }
        result
    }

    /// Faults found while loading, until the next reset.
    pub fn load_faults(&self) -> &[LoadFault] {
        &self.faults
    }

    /// Number of materialized caches.
    pub fn materialized(&self) -> usize {
        self.caches.len()
    }
}

impl core::fmt::Debug for GameState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("GameState")
            .field("position", &self.position())
            .field("caches", &self.caches.len())
            .field("inventory", &self.ledger.inventory().len())
            .field("history", &self.history.len())
            .finish_non_exhaustive()
    }
}

/// Read a list record, turning an unreadable one into a fault and an empty
/// list.
fn read_record<T: DeserializeOwned>(
    store: &dyn KvStore,
    key: &'static str,
    faults: &mut Vec<LoadFault>,
) -> Result<Vec<T>, CoreError> {
    match store.get_json::<Vec<T>>(key) {
        Ok(value) => Ok(value.unwrap_or_default()),
        Err(DbError::Serialization(e)) => {
            warn!(key, error = %e, "Skipping unreadable record");
            faults.push(LoadFault::new(key, e));
            Ok(Vec::new())
        }
        Err(e) => Err(e.into()),
    }
}
