//! The cache state store.
//!
//! Maps cells to cache mementos and decides, once per cell, whether a cell
//! is materialized as a cache or confirmed empty:
//!
//! ```text
//! get(cell)
//!     |-- memento exists ---------> rebuild Cache from memento
//!     |-- confirmed empty --------> None
//!     +-- undecided --> Generator::exists_at
//!             |-- false --> remember as empty, None
//!             +-- true  --> initial_coins, persist, Cache
//! ```
//!
//! All mementos are persisted together as the `caches` record, a map from
//! `"{i},{j}"` to `{i, j, coins}`. Every write replaces the whole record.
//! The empty decision is kept in memory only: it is a pure function of the
//! cell, so recomputing it after a restart gives the same answer.

use std::collections::{BTreeMap, BTreeSet};

use geocoin_db::{DbError, JsonRecords, KvStore, keys};
use geocoin_ledger::Cache;
use geocoin_types::{CacheMemento, Cell};
use geocoin_world::Generator;
use tracing::{debug, info, warn};

use crate::error::{CoreError, LoadFault};

/// Materialized caches and the generator that fills new ones.
#[derive(Debug)]
pub struct CacheStore {
    generator: Generator,
    mementos: BTreeMap<Cell, CacheMemento>,
    confirmed_empty: BTreeSet<Cell>,
}

impl CacheStore {
    /// Create an empty store.
    pub const fn new(generator: Generator) -> Self {
        Self {
            generator,
            mementos: BTreeMap::new(),
            confirmed_empty: BTreeSet::new(),
        }
    }

    /// Restore the store from the `caches` record.
    ///
    /// Entries that cannot be read are skipped and returned as faults; their
    /// cells regenerate on next access. A record that is not a map at all
    /// is one fault and an empty store.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Storage`] if the byte store itself fails.
    pub fn load(
        generator: Generator,
        kv: &dyn KvStore,
    ) -> Result<(Self, Vec<LoadFault>), CoreError> {
        let mut store = Self::new(generator);
        let mut faults = Vec::new();

        let record = match kv.get_json::<BTreeMap<String, serde_json::Value>>(keys::CACHES) {
            Ok(record) => record.unwrap_or_default(),
            Err(DbError::Serialization(e)) => {
                faults.push(LoadFault::new(keys::CACHES, e));
                BTreeMap::new()
            }
            Err(e) => return Err(e.into()),
        };

        for (key, value) in record {
            match decode_entry(&key, value) {
                Ok(memento) => {
                    store.mementos.insert(memento.cell(), memento);
                }
                Err(reason) => {
                    faults.push(LoadFault::new(format!("{}/{key}", keys::CACHES), reason));
                }
            }
        }

        for fault in &faults {
            warn!(key = %fault.key, reason = %fault.reason, "Skipping unreadable cache record");
        }
        info!(
            caches = store.mementos.len(),
            faults = faults.len(),
            "Cache store loaded"
        );
        Ok((store, faults))
    }

    /// Return the live cache at `cell`, materializing it on first access.
    ///
    /// `Ok(None)` means the cell holds no cache.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Storage`] if a newly materialized cache cannot
    /// be persisted. The cell stays undecided in that case.
    pub fn get(&mut self, cell: Cell, kv: &mut dyn KvStore) -> Result<Option<Cache>, CoreError> {
        if let Some(memento) = self.mementos.get(&cell) {
            return Ok(Some(Cache::from_memento(memento.clone())));
        }
        if self.confirmed_empty.contains(&cell) {
            return Ok(None);
        }
        if !self.generator.exists_at(cell) {
            self.confirmed_empty.insert(cell);
            return Ok(None);
        }

        let memento = CacheMemento::new(cell, self.generator.initial_coins(cell));
        self.mementos.insert(cell, memento.clone());
        if let Err(e) = self.persist(kv) {
            self.mementos.remove(&cell);
            return Err(e);
        }

        debug!(cell = %cell, coins = memento.coins.len(), "Cache materialized");
        Ok(Some(Cache::from_memento(memento)))
    }

    /// Save `cache` over any prior entry for its cell.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Storage`] if the write fails. The previous
    /// memento is kept in that case.
    pub fn put(&mut self, cache: &Cache, kv: &mut dyn KvStore) -> Result<(), CoreError> {
        let cell = cache.cell();
        let previous = self.mementos.insert(cell, cache.to_memento());
        if let Err(e) = self.persist(kv) {
            match previous {
                Some(memento) => self.mementos.insert(cell, memento),
                None => self.mementos.remove(&cell),
            };
            return Err(e);
        }
        self.confirmed_empty.remove(&cell);
        debug!(cell = %cell, coins = cache.len(), "Cache saved");
        Ok(())
    }

    /// Put `memento` back in memory, then try to persist it.
    ///
    /// Unlike [`put`](Self::put), the in-memory entry is replaced even when
    /// the write fails. The next successful write rewrites the whole record.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Storage`] if the write fails.
    pub fn revert(&mut self, memento: CacheMemento, kv: &mut dyn KvStore) -> Result<(), CoreError> {
        let cell = memento.cell();
        self.mementos.insert(cell, memento);
        self.persist(kv)?;
        debug!(cell = %cell, "Cache reverted");
        Ok(())
    }

    /// Forget every cache and every empty decision.
    ///
    /// The persisted record is removed by the caller's byte-store clear.
    pub fn clear(&mut self) {
        self.mementos.clear();
        self.confirmed_empty.clear();
    }

    /// The memento for `cell`, without materializing anything.
    pub fn peek(&self, cell: Cell) -> Option<&CacheMemento> {
        self.mementos.get(&cell)
    }

    /// Every materialized cache, in cell order.
    pub fn mementos(&self) -> impl Iterator<Item = &CacheMemento> {
        self.mementos.values()
    }

    /// Number of materialized caches.
    pub fn len(&self) -> usize {
        self.mementos.len()
    }

    /// Whether no cache is materialized.
    pub fn is_empty(&self) -> bool {
        self.mementos.is_empty()
    }

    /// The content generator.
    pub const fn generator(&self) -> &Generator {
        &self.generator
    }

    fn persist(&self, kv: &mut dyn KvStore) -> Result<(), CoreError> {
        let record: BTreeMap<String, &CacheMemento> = self
            .mementos
            .iter()
            .map(|(cell, memento)| (cell.key(), memento))
            .collect();
        kv.set_json(keys::CACHES, &record)?;
        Ok(())
    }
}

/// Decode one `caches` entry, checking that the key and body agree.
fn decode_entry(key: &str, value: serde_json::Value) -> Result<CacheMemento, String> {
    let cell: Cell = key.parse().map_err(|e: geocoin_types::ParseIdError| e.to_string())?;
    let memento: CacheMemento = serde_json::from_value(value).map_err(|e| e.to_string())?;
    if memento.cell() != cell {
        return Err(format!("entry describes cell {}", memento.cell()));
    }
    Ok(memento)
}
