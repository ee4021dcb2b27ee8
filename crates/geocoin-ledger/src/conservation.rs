//! Conservation law verification for coins.
//!
//! Collect and deposit only move coins; they never create or destroy one.
//! So for the set of materialized caches:
//!
//! ```text
//! multiset(inventory + every cache's coins) == multiset(every coin ever generated)
//! ```
//!
//! The generated side is recomputed from the content generator, since the
//! initial coins of a cell are a pure function of its coordinates. A
//! violation produces a [`LedgerAnomaly`].

use std::collections::BTreeMap;

use geocoin_types::Coin;

use crate::LedgerAnomaly;

/// The result of a conservation audit.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ConservationResult {
    /// Every generated coin is held exactly once.
    Balanced {
        /// Number of coins checked.
        coins: usize,
    },
    /// At least one coin is missing, duplicated, or unknown.
    Anomaly(LedgerAnomaly),
}

impl ConservationResult {
    /// Whether the audit found no violation.
    pub const fn is_balanced(&self) -> bool {
        matches!(self, Self::Balanced { .. })
    }
}

/// Compare the coins that were generated against the coins currently held.
///
/// `held` must yield every coin in the inventory and in every materialized
/// cache. Order does not matter on either side.
pub fn verify_conservation<'a>(
    generated: impl IntoIterator<Item = Coin>,
    held: impl IntoIterator<Item = &'a Coin>,
) -> ConservationResult {
    let mut expected: BTreeMap<Coin, u32> = BTreeMap::new();
    for coin in generated {
        let count = expected.entry(coin).or_insert(0);
        *count = count.saturating_add(1);
    }

    let mut actual: BTreeMap<Coin, u32> = BTreeMap::new();
    let mut held_total: usize = 0;
    for coin in held {
        let count = actual.entry(*coin).or_insert(0);
        *count = count.saturating_add(1);
        held_total = held_total.saturating_add(1);
    }

    let missing: Vec<Coin> = expected
        .keys()
        .filter(|coin| !actual.contains_key(coin))
        .copied()
        .collect();
    let duplicated: Vec<Coin> = actual
        .iter()
        .filter(|(coin, held_count)| expected.get(coin).is_some_and(|e| *held_count > e))
        .map(|(coin, _)| *coin)
        .collect();
    let unexpected: Vec<Coin> = actual
        .keys()
        .filter(|coin| !expected.contains_key(coin))
        .copied()
        .collect();

    if missing.is_empty() && duplicated.is_empty() && unexpected.is_empty() {
        return ConservationResult::Balanced { coins: held_total };
    }

    let message = format!(
        "COIN_ANOMALY: {} missing, {} duplicated, {} unexpected",
        missing.len(),
        duplicated.len(),
        unexpected.len(),
    );
    ConservationResult::Anomaly(LedgerAnomaly {
        missing,
        duplicated,
        unexpected,
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batch(i: i64, j: i64, count: u32) -> Vec<Coin> {
        (0..count).map(|serial| Coin::new(i, j, serial)).collect()
    }

    fn anomaly(result: ConservationResult) -> LedgerAnomaly {
        match result {
            ConservationResult::Anomaly(anomaly) => anomaly,
            ConservationResult::Balanced { .. } => LedgerAnomaly::default(),
        }
    }

    #[test]
    fn balanced_when_every_coin_is_held_once() {
        let generated = [batch(0, 0, 2), batch(4, 4, 3)].concat();
        let mut held = generated.clone();
        held.reverse();
        assert_eq!(
            verify_conservation(generated, &held),
            ConservationResult::Balanced { coins: 5 }
        );
    }

    #[test]
    fn detects_missing_coin() {
        let generated = batch(0, 0, 2);
        let held = vec![Coin::new(0, 0, 0)];
        let anomaly = anomaly(verify_conservation(generated, &held));
        assert_eq!(anomaly.missing, vec![Coin::new(0, 0, 1)]);
        assert!(anomaly.duplicated.is_empty());
    }

    #[test]
    fn detects_duplicated_coin() {
        let generated = batch(0, 0, 1);
        let held = vec![Coin::new(0, 0, 0), Coin::new(0, 0, 0)];
        let anomaly = anomaly(verify_conservation(generated, &held));
        assert_eq!(anomaly.duplicated, vec![Coin::new(0, 0, 0)]);
        assert!(anomaly.missing.is_empty());
    }

    #[test]
    fn detects_unknown_coin() {
        let held = vec![Coin::new(9, 9, 9)];
        let anomaly = anomaly(verify_conservation(Vec::new(), &held));
        assert_eq!(anomaly.unexpected, vec![Coin::new(9, 9, 9)]);
        assert!(anomaly.message.contains("1 unexpected"));
    }

    #[test]
    fn empty_world_is_balanced() {
        assert!(verify_conservation(Vec::new(), &[]).is_balanced());
    }
}
