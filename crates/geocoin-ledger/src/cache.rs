//! Live cache objects.
//!
//! A [`Cache`] is the in-memory, mutable form of a [`CacheMemento`]. It is
//! disposable: the memento is the source of truth, and a fresh `Cache` is
//! rebuilt from it whenever the cell is looked at again. Coins only enter
//! or leave a cache through the [`Ledger`](crate::Ledger).

use geocoin_types::{CacheMemento, Cell, Coin};

/// The coins held at one cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cache {
    /// The cell the cache occupies.
    cell: Cell,
    /// Coins currently held. Order carries no meaning.
    coins: Vec<Coin>,
}

impl Cache {
    /// Create a cache in `cell` holding `coins`.
    pub const fn new(cell: Cell, coins: Vec<Coin>) -> Self {
        Self { cell, coins }
    }

    /// Rebuild a live cache from its memento.
    pub fn from_memento(memento: CacheMemento) -> Self {
        Self {
            cell: memento.cell(),
            coins: memento.coins,
        }
    }

    /// Snapshot the cache for persistence.
    pub fn to_memento(&self) -> CacheMemento {
        CacheMemento::new(self.cell, self.coins.clone())
    }

    /// The cell the cache occupies.
    pub const fn cell(&self) -> Cell {
        self.cell
    }

    /// Coins currently held.
    pub fn coins(&self) -> &[Coin] {
        &self.coins
    }

    /// Number of coins held.
    pub fn len(&self) -> usize {
        self.coins.len()
    }

    /// Whether the cache holds no coins.
    pub fn is_empty(&self) -> bool {
        self.coins.is_empty()
    }

    /// Whether `coin` is in this cache.
    pub fn contains(&self, coin: Coin) -> bool {
        self.coins.contains(&coin)
    }

    /// Remove `coin`, returning it if it was present.
    pub(crate) fn take(&mut self, coin: Coin) -> Option<Coin> {
        let position = self.coins.iter().position(|c| *c == coin)?;
        Some(self.coins.remove(position))
    }

    pub(crate) fn push(&mut self, coin: Coin) {
        self.coins.push(coin);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memento_round_trip_keeps_coins() {
        let cell = Cell::new(2, -3);
        let cache = Cache::new(cell, vec![Coin::new(2, -3, 1), Coin::new(9, 9, 0)]);
        let restored = Cache::from_memento(cache.to_memento());
        assert_eq!(restored, cache);
    }

    #[test]
    fn take_removes_exactly_one() {
        let cell = Cell::new(0, 0);
        let mut cache = Cache::new(cell, vec![Coin::new(0, 0, 0), Coin::new(0, 0, 1)]);
        assert_eq!(cache.take(Coin::new(0, 0, 0)), Some(Coin::new(0, 0, 0)));
        assert_eq!(cache.take(Coin::new(0, 0, 0)), None);
        assert_eq!(cache.coins(), &[Coin::new(0, 0, 1)]);
    }
}
