//! Procedural cache content.
//!
//! The [`Generator`] decides, from a cell's coordinates alone, whether a
//! cache exists there and which coins it starts with:
//!
//! | Decision | Seed | Rule |
//! |----------|------|------|
//! | Existence | `"{i},{j}"` | `luck < spawn_probability` |
//! | Coin count | `"{i},{j},initialValue"` | `floor(luck * max_coins_per_cache)` |
//!
//! Both are pure. The caller (the cache state store) is responsible for
//! asking only once per cell and remembering the answer.

use std::sync::Arc;

use geocoin_types::{Cell, Coin};

use crate::error::WorldError;
use crate::luck::{Luck, SeedRandom};

/// Default probability that a cell holds a cache.
pub const DEFAULT_SPAWN_PROBABILITY: f64 = 0.1;

/// Default upper bound (exclusive) on the initial coin count of a cache.
pub const DEFAULT_MAX_COINS_PER_CACHE: u32 = 5;

/// Seed suffix for the initial coin count.
const INITIAL_VALUE_SUFFIX: &str = "initialValue";

/// Deterministic cache content generator.
#[derive(Clone)]
pub struct Generator {
    luck: Arc<dyn Luck + Send + Sync>,
    spawn_probability: f64,
    max_coins_per_cache: u32,
}

impl Generator {
    /// Create a generator over the given oracle.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidSpawnProbability`] unless
    /// `spawn_probability` lies in `[0, 1]`.
    pub fn new(
        luck: Arc<dyn Luck + Send + Sync>,
        spawn_probability: f64,
        max_coins_per_cache: u32,
    ) -> Result<Self, WorldError> {
        if !(0.0..=1.0).contains(&spawn_probability) {
            return Err(WorldError::InvalidSpawnProbability(spawn_probability));
        }
        Ok(Self {
            luck,
            spawn_probability,
            max_coins_per_cache,
        })
    }

    /// Whether a cache exists in `cell`.
    pub fn exists_at(&self, cell: Cell) -> bool {
        self.luck.luck(&cell.key()) < self.spawn_probability
    }

    /// The coins a cache in `cell` starts with, serials `0..count`.
    pub fn initial_coins(&self, cell: Cell) -> Vec<Coin> {
        let seed = format!("{},{INITIAL_VALUE_SUFFIX}", cell.key());
        let count = scaled_count(self.luck.luck(&seed), self.max_coins_per_cache);
        (0..count).map(|serial| Coin::minted_in(cell, serial)).collect()
    }

    /// The configured spawn probability.
    pub const fn spawn_probability(&self) -> f64 {
        self.spawn_probability
    }

    /// The configured coin bound.
    pub const fn max_coins_per_cache(&self) -> u32 {
        self.max_coins_per_cache
    }
}

impl Default for Generator {
    fn default() -> Self {
        Self {
            luck: Arc::new(SeedRandom),
            spawn_probability: DEFAULT_SPAWN_PROBABILITY,
            max_coins_per_cache: DEFAULT_MAX_COINS_PER_CACHE,
        }
    }
}

impl core::fmt::Debug for Generator {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Generator")
            .field("spawn_probability", &self.spawn_probability)
            .field("max_coins_per_cache", &self.max_coins_per_cache)
            .finish_non_exhaustive()
    }
}

/// `floor(luck * max)`, clamped to `[0, max]` for out-of-contract oracles.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn scaled_count(luck: f64, max: u32) -> u32 {
    let scaled = (luck * f64::from(max)).floor();
    if scaled.is_nan() || scaled <= 0.0 {
        0
    } else {
        (scaled as u32).min(max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::luck::FixedLuck;

    fn scripted(luck: FixedLuck) -> Generator {
        Generator::new(Arc::new(luck), 0.1, 5).unwrap_or_default()
    }

    #[test]
    fn rejects_out_of_range_probability() {
        assert!(Generator::new(Arc::new(SeedRandom), 1.5, 5).is_err());
        assert!(Generator::new(Arc::new(SeedRandom), -0.1, 5).is_err());
        assert!(Generator::new(Arc::new(SeedRandom), f64::NAN, 5).is_err());
    }

    #[test]
    fn scripted_cache_at_origin() {
        let generator = scripted(
            FixedLuck::new(0.9)
                .with("0,0", 0.05)
                .with("0,0,initialValue", 0.44),
        );
        let origin = Cell::new(0, 0);
        assert!(generator.exists_at(origin));
        assert_eq!(
            generator.initial_coins(origin),
            vec![Coin::new(0, 0, 0), Coin::new(0, 0, 1)]
        );
        assert!(!generator.exists_at(Cell::new(0, 1)));
    }

    #[test]
    fn probability_threshold_is_strict() {
        let generator = scripted(FixedLuck::new(0.1));
        assert!(!generator.exists_at(Cell::new(0, 0)));
    }

    #[test]
    fn real_oracle_origin_cache() {
        let generator = Generator::default();
        let origin = Cell::new(0, 0);
        assert!(generator.exists_at(origin));
        assert_eq!(generator.initial_coins(origin).len(), 2);
        assert!(!generator.exists_at(Cell::new(1, 0)));
    }

    #[test]
    fn real_oracle_neighborhood_counts() {
        let generator = Generator::default();
        let mut caches = 0;
        let mut coins = 0;
        for i in -8..8 {
            for j in -8..8 {
                let cell = Cell::new(i, j);
                if generator.exists_at(cell) {
                    caches += 1;
                    coins += generator.initial_coins(cell).len();
                }
            }
        }
        assert_eq!(caches, 26);
        assert_eq!(coins, 49);
    }

    #[test]
    fn coins_are_stamped_with_their_cell() {
        let generator = scripted(FixedLuck::new(0.99));
        let cell = Cell::new(-7, 12);
        let coins = generator.initial_coins(cell);
        assert_eq!(coins.len(), 4);
        for (serial, coin) in (0_u32..).zip(&coins) {
            assert_eq!(coin.origin(), cell);
            assert_eq!(coin.serial, serial);
        }
    }

    #[test]
    fn is_deterministic() {
        let generator = Generator::default();
        for i in -3..3 {
            let cell = Cell::new(i, 2 * i);
            assert_eq!(generator.exists_at(cell), generator.exists_at(cell));
            assert_eq!(generator.initial_coins(cell), generator.initial_coins(cell));
        }
    }

    #[test]
    fn count_is_clamped() {
        assert_eq!(scaled_count(0.0, 5), 0);
        assert_eq!(scaled_count(0.999, 5), 4);
        assert_eq!(scaled_count(1.0, 5), 5);
        assert_eq!(scaled_count(7.0, 5), 5);
        assert_eq!(scaled_count(-1.0, 5), 0);
        assert_eq!(scaled_count(f64::NAN, 5), 0);
    }
}
