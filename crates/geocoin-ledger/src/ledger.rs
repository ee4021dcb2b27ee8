//! Coin ownership transfers.
//!
//! The [`Ledger`] owns the player's [`Inventory`] and is the only code path
//! that moves coins between the inventory and a [`Cache`]. Each operation
//! either moves coins and succeeds, or rejects with a [`LedgerError`] and
//! leaves both sides untouched.
//!
//! | Operation | From | To |
//! |-----------|------|----|
//! | [`collect`](Ledger::collect) | cache | inventory |
//! | [`deposit`](Ledger::deposit) | inventory (selected coins) | cache |
//!
//! Persisting the mutated cache is the caller's job; the ledger knows
//! nothing about storage.

use geocoin_types::Coin;
use tracing::debug;

use crate::LedgerError;
use crate::cache::Cache;
use crate::inventory::Inventory;

/// The player's inventory and the operations that move coins in and out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ledger {
    inventory: Inventory,
}

impl Ledger {
    /// Create a ledger with an empty inventory.
    pub const fn new() -> Self {
        Self {
            inventory: Inventory::new(),
        }
    }

    /// Create a ledger around a restored inventory.
    pub const fn with_inventory(inventory: Inventory) -> Self {
        Self { inventory }
    }

    /// Read-only view of the inventory.
    pub const fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    /// Move `coin` from `cache` into the inventory.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::CoinNotInCache`] if the cache does not hold
    /// `coin`. Nothing changes in that case.
    pub fn collect(&mut self, coin: Coin, cache: &mut Cache) -> Result<(), LedgerError> {
        let taken = cache.take(coin).ok_or(LedgerError::CoinNotInCache {
            coin,
            cell: cache.cell(),
        })?;
        self.inventory.push(taken);
        debug!(coin = %coin, cell = %cache.cell(), "Coin collected");
        Ok(())
    }

    /// Move every selected coin from the inventory into `cache`.
    ///
    /// Returns the deposited coins in identity order. The selection is
    /// empty afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::NothingToDeposit`] if nothing is carried or
    /// nothing is selected. Nothing changes in that case.
    pub fn deposit(&mut self, cache: &mut Cache) -> Result<Vec<Coin>, LedgerError> {
        if self.inventory.is_empty() || self.inventory.selected_len() == 0 {
            return Err(LedgerError::NothingToDeposit);
        }

        let staged: Vec<Coin> = self.inventory.selected().copied().collect();
        let mut deposited = Vec::with_capacity(staged.len());
        for coin in staged {
            // The selection is kept a subset of the carried coins, so every
            // staged coin is found here.
            if let Some(taken) = self.inventory.take(coin) {
                cache.push(taken);
                deposited.push(taken);
            }
        }

        debug!(
            cell = %cache.cell(),
            deposited = deposited.len(),
            "Coins deposited"
        );
        Ok(deposited)
    }

    /// Stage a carried coin for the next deposit.
    ///
    /// Returns `true` if the coin was not already staged.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::CoinNotCarried`] if the coin is not in the
    /// inventory.
    pub fn select(&mut self, coin: Coin) -> Result<bool, LedgerError> {
        if !self.inventory.contains(coin) {
            return Err(LedgerError::CoinNotCarried(coin));
        }
        Ok(self.inventory.select(coin))
    }

    /// Remove a coin from the deposit staging set.
    ///
    /// Returns `true` if the coin was staged.
    pub fn deselect(&mut self, coin: Coin) -> bool {
        self.inventory.deselect(coin)
    }

    /// Empty the inventory and its selection. Part of a world reset.
    pub fn reset(&mut self) {
        self.inventory.clear();
    }
}

#[cfg(test)]
mod tests {
    use geocoin_types::Cell;

    use super::*;

    fn origin_cache() -> Cache {
        Cache::new(
            Cell::new(0, 0),
            vec![Coin::new(0, 0, 0), Coin::new(0, 0, 1)],
        )
    }

    #[test]
    fn collect_moves_coin_to_inventory() {
        let mut ledger = Ledger::new();
        let mut cache = origin_cache();

        assert!(ledger.collect(Coin::new(0, 0, 0), &mut cache).is_ok());

        assert_eq!(cache.coins(), &[Coin::new(0, 0, 1)]);
        assert_eq!(ledger.inventory().coins(), &[Coin::new(0, 0, 0)]);
    }

    #[test]
    fn collect_missing_coin_is_rejected_without_change() {
        let mut ledger = Ledger::new();
        let mut cache = origin_cache();
        let before = cache.clone();

        let result = ledger.collect(Coin::new(0, 0, 7), &mut cache);
        assert_eq!(
            result,
            Err(LedgerError::CoinNotInCache {
                coin: Coin::new(0, 0, 7),
                cell: Cell::new(0, 0),
            })
        );
        assert_eq!(cache, before);
        assert!(ledger.inventory().is_empty());
    }

    #[test]
    fn collect_then_deposit_restores_both_sides() {
        let mut ledger = Ledger::new();
        let mut cache = origin_cache();
        let coin = Coin::new(0, 0, 0);

        assert!(ledger.collect(coin, &mut cache).is_ok());
        assert_eq!(ledger.select(coin), Ok(true));
        assert_eq!(ledger.deposit(&mut cache), Ok(vec![coin]));

        let mut coins = cache.coins().to_vec();
        coins.sort();
        assert_eq!(coins, origin_cache().coins());
        assert!(ledger.inventory().is_empty());
        assert_eq!(ledger.inventory().selected_len(), 0);
    }

    #[test]
    fn deposit_with_empty_inventory_is_rejected() {
        let mut ledger = Ledger::new();
        let mut cache = origin_cache();
        assert_eq!(ledger.deposit(&mut cache), Err(LedgerError::NothingToDeposit));
        assert_eq!(cache, origin_cache());
    }

    #[test]
    fn deposit_with_empty_selection_is_rejected() {
        let mut ledger = Ledger::new();
        let mut source = origin_cache();
        let mut target = Cache::new(Cell::new(5, 5), Vec::new());
        assert!(ledger.collect(Coin::new(0, 0, 1), &mut source).is_ok());

        assert_eq!(ledger.deposit(&mut target), Err(LedgerError::NothingToDeposit));
        assert!(target.is_empty());
        assert_eq!(ledger.inventory().len(), 1);
    }

    #[test]
    fn deposit_moves_only_selected_coins() {
        let mut ledger = Ledger::new();
        let mut source = origin_cache();
        let mut target = Cache::new(Cell::new(5, 5), Vec::new());
        assert!(ledger.collect(Coin::new(0, 0, 0), &mut source).is_ok());
        assert!(ledger.collect(Coin::new(0, 0, 1), &mut source).is_ok());
        assert_eq!(ledger.select(Coin::new(0, 0, 1)), Ok(true));

        assert_eq!(ledger.deposit(&mut target), Ok(vec![Coin::new(0, 0, 1)]));
        assert_eq!(target.coins(), &[Coin::new(0, 0, 1)]);
        assert_eq!(ledger.inventory().coins(), &[Coin::new(0, 0, 0)]);
    }

    #[test]
    fn select_requires_a_carried_coin() {
        let mut ledger = Ledger::new();
        assert_eq!(
            ledger.select(Coin::new(3, 3, 3)),
            Err(LedgerError::CoinNotCarried(Coin::new(3, 3, 3)))
        );
        assert!(!ledger.deselect(Coin::new(3, 3, 3)));
    }

    #[test]
    fn reset_empties_everything() {
        let mut ledger = Ledger::new();
        let mut cache = origin_cache();
        assert!(ledger.collect(Coin::new(0, 0, 0), &mut cache).is_ok());
        assert_eq!(ledger.select(Coin::new(0, 0, 0)), Ok(true));
        ledger.reset();
        assert!(ledger.inventory().is_empty());
        assert_eq!(ledger.inventory().selected_len(), 0);
    }
}
