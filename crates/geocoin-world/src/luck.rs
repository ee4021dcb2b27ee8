//! The deterministic hash oracle.
//!
//! Every piece of procedural content is derived from a [`Luck`] value: a
//! pure function from a seed string to a number in `[0, 1)`. The world is
//! never stored in full; it is recomputed from these values whenever a cell
//! is first reached.
//!
//! # Algorithm
//!
//! [`SeedRandom`] is the ARC4-based generator popularised by the
//! `seedrandom` JavaScript library, evaluated for its first output only:
//!
//! 1. The seed's UTF-16 code units are mixed into a key of at most 256
//!    bytes (`key[k & 255] = (smear ^= key[k & 255] * 19) + unit`).
//! 2. The key schedules a standard RC4 state and the first 256 keystream
//!    bytes are discarded.
//! 3. Six keystream bytes form a 48-bit numerator over `2^48`; further bytes
//!    are shifted in until 52 significant bits are present, then the value
//!    is shifted back so it never rounds up to 1.
//!
//! The algorithm is part of the save format: cells that were never
//! materialized are regenerated from it, so it must not change for the
//! lifetime of a persisted world.

/// A deterministic source of pseudo-random values keyed by seed strings.
pub trait Luck {
    /// Map `seed` to a reproducible value in `[0, 1)`.
    fn luck(&self, seed: &str) -> f64;
}

// ---------------------------------------------------------------------------
// SeedRandom
// ---------------------------------------------------------------------------

/// Numerator width of the first output chunk, in bytes.
const CHUNKS: u32 = 6;

/// Denominator exponent matching [`CHUNKS`] (`2^48`).
const START_EXPONENT: i32 = 48;

/// Significant bits required before the output is formed.
const SIGNIFICANCE: u64 = 1 << 52;

/// One past the largest numerator that cannot round up.
const OVERFLOW: u64 = 1 << 53;

/// The production oracle: `seedrandom(seed)()` computed natively.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedRandom;

impl Luck for SeedRandom {
    fn luck(&self, seed: &str) -> f64 {
        let key = mix_key(seed);
        let mut arc4 = Arc4::new(&key);

        let mut n = arc4.next_bytes(CHUNKS);
        let mut exponent = START_EXPONENT;
        let mut x: u64 = 0;

        // n starts below 2^48, so this always runs at least once and every
        // value of n from here on is a multiple of 256.
        while n < SIGNIFICANCE {
            n = n.saturating_add(x).saturating_mul(256);
            exponent = exponent.saturating_add(8);
            x = arc4.next_bytes(1);
        }
        while n >= OVERFLOW {
            n /= 2;
            exponent = exponent.saturating_sub(1);
            x >>= 1;
        }

        // n + x < 2^53, so the conversion is exact.
        #[allow(clippy::cast_precision_loss)]
        let numerator = n.saturating_add(x) as f64;
        numerator * 2.0_f64.powi(exponent.saturating_neg())
    }
}

/// Fold the seed's UTF-16 code units into an RC4 key.
fn mix_key(seed: &str) -> Vec<u8> {
    let mut key: Vec<u8> = Vec::new();
    let mut smear: u32 = 0;
    for (position, unit) in seed.encode_utf16().enumerate() {
        let slot = position % 256;
        let existing = key.get(slot).copied().map_or(0, u32::from);
        smear ^= existing.saturating_mul(19);
        let [low, ..] = smear.wrapping_add(u32::from(unit)).to_le_bytes();
        if let Some(entry) = key.get_mut(slot) {
            *entry = low;
        } else {
            key.push(low);
        }
    }
    if key.is_empty() {
        key.push(0);
    }
    key
}

/// RC4 keystream state.
struct Arc4 {
    i: u8,
    j: u8,
    s: [u8; 256],
}

// Indices are u8 and the state has 256 entries.
#[allow(clippy::indexing_slicing)]
impl Arc4 {
    /// Schedule the key and discard the first 256 keystream bytes.
    fn new(key: &[u8]) -> Self {
        let mut s = [0_u8; 256];
        let mut value: u8 = 0;
        for slot in &mut s {
            *slot = value;
            value = value.wrapping_add(1);
        }

        let mut j: u8 = 0;
        for (i, k) in (0..=u8::MAX).zip(key.iter().cycle()) {
            let t = s[usize::from(i)];
            j = j.wrapping_add(*k).wrapping_add(t);
            s[usize::from(i)] = s[usize::from(j)];
            s[usize::from(j)] = t;
        }

        let mut arc4 = Self { i: 0, j: 0, s };
        for _ in 0..256 {
            arc4.next_byte();
        }
        arc4
    }

    fn next_byte(&mut self) -> u8 {
        self.i = self.i.wrapping_add(1);
        let t = self.s[usize::from(self.i)];
        self.j = self.j.wrapping_add(t);
        self.s[usize::from(self.i)] = self.s[usize::from(self.j)];
        self.s[usize::from(self.j)] = t;
        let index = self.s[usize::from(self.i)].wrapping_add(t);
        self.s[usize::from(index)]
    }

    /// Read `count` bytes as a big-endian integer.
    fn next_bytes(&mut self, count: u32) -> u64 {
        let mut r: u64 = 0;
        for _ in 0..count {
            r = (r << 8) | u64::from(self.next_byte());
        }
        r
    }
}

// ---------------------------------------------------------------------------
// FixedLuck
// ---------------------------------------------------------------------------

/// A scripted oracle returning preset values per seed.
///
/// Seeds without a preset value return the fallback. Used to pin down
/// exact worlds in tests and demos.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedLuck {
    values: std::collections::BTreeMap<String, f64>,
    fallback: f64,
}

impl FixedLuck {
    /// Create an oracle that returns `fallback` for every seed.
    pub const fn new(fallback: f64) -> Self {
        Self {
            values: std::collections::BTreeMap::new(),
            fallback,
        }
    }

    /// Preset the value returned for `seed`.
    #[must_use]
    pub fn with(mut self, seed: impl Into<String>, value: f64) -> Self {
        self.values.insert(seed.into(), value);
        self
    }
}

impl Luck for FixedLuck {
    fn luck(&self, seed: &str) -> f64 {
        self.values.get(seed).copied().unwrap_or(self.fallback)
    }
}
