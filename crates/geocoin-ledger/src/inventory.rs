//! The player's carried coins.
//!
//! The [`Inventory`] holds the coins the player carries plus a transient
//! selection that stages a multi-coin deposit. Only the carried coins are
//! persisted; the selection starts empty on every load.

use std::collections::BTreeSet;

use geocoin_types::Coin;

/// Coins carried by the player.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inventory {
    /// Carried coins, in pickup order.
    coins: Vec<Coin>,
    /// Coins staged for the next deposit. Always a subset of `coins`.
    selected: BTreeSet<Coin>,
}

impl Inventory {
    /// Create an empty inventory.
    pub const fn new() -> Self {
        Self {
            coins: Vec::new(),
            selected: BTreeSet::new(),
        }
    }

    /// Restore carried coins from a persisted record.
    pub const fn from_coins(coins: Vec<Coin>) -> Self {
        Self {
            coins,
            selected: BTreeSet::new(),
        }
    }

    /// Carried coins, in pickup order.
    pub fn coins(&self) -> &[Coin] {
        &self.coins
    }

    /// Number of carried coins.
    pub fn len(&self) -> usize {
        self.coins.len()
    }

    /// Whether nothing is carried.
    pub fn is_empty(&self) -> bool {
        self.coins.is_empty()
    }

    /// Whether `coin` is carried.
    pub fn contains(&self, coin: Coin) -> bool {
        self.coins.contains(&coin)
    }

    /// Coins staged for deposit, in identity order.
    pub fn selected(&self) -> impl Iterator<Item = &Coin> {
        self.selected.iter()
    }

    /// Number of staged coins.
    pub fn selected_len(&self) -> usize {
        self.selected.len()
    }

    /// Whether `coin` is staged for deposit.
    pub fn is_selected(&self, coin: Coin) -> bool {
        self.selected.contains(&coin)
    }

    pub(crate) fn push(&mut self, coin: Coin) {
        self.coins.push(coin);
    }

    /// Remove `coin` from the carried set and the selection.
    pub(crate) fn take(&mut self, coin: Coin) -> Option<Coin> {
        let position = self.coins.iter().position(|c| *c == coin)?;
        self.selected.remove(&coin);
        Some(self.coins.remove(position))
    }

    pub(crate) fn select(&mut self, coin: Coin) -> bool {
        self.selected.insert(coin)
    }

    pub(crate) fn deselect(&mut self, coin: Coin) -> bool {
        self.selected.remove(&coin)
    }

    pub(crate) fn clear(&mut self) {
        self.coins.clear();
        self.selected.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn restored_inventory_has_no_selection() {
        let inventory = Inventory::from_coins(vec![Coin::new(1, 1, 0)]);
        assert_eq!(inventory.len(), 1);
        assert_eq!(inventory.selected_len(), 0);
    }

    #[test]
    fn take_drops_selection_too() {
        let coin = Coin::new(1, 1, 0);
        let mut inventory = Inventory::from_coins(vec![coin]);
        assert!(inventory.select(coin));
        assert_eq!(inventory.take(coin), Some(coin));
        assert!(!inventory.is_selected(coin));
        assert!(inventory.is_empty());
    }

    #[test]
    fn select_is_idempotent() {
        let coin = Coin::new(1, 1, 0);
        let mut inventory = Inventory::from_coins(vec![coin]);
        assert!(inventory.select(coin));
        assert!(!inventory.select(coin));
        assert_eq!(inventory.selected_len(), 1);
        assert!(inventory.deselect(coin));
        assert!(!inventory.deselect(coin));
    }
}
