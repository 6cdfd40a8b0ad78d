// Copyright (c) 2024 Mike Tsao

//! Provides the random-number generator behind every generative decision.

use byteorder::{BigEndian, ByteOrder};
use core::ops::RangeInclusive;
use delegate::delegate;

/// A pseudorandom number generator (PRNG) for choosing motifs, operators, and
/// generated values. It doesn't need to be cryptographically secure, but it
/// does need to be reproducible, so every random decision in the crate goes
/// through one of these.
#[derive(Debug)]
pub struct Rng(oorandom::Rand64);
impl Default for Rng {
    fn default() -> Self {
        Self::new_with_seed(Self::seed_or_fallback(Self::generate_seed()))
    }
}
#[allow(missing_docs)]
impl Rng {
    /// Pass the same number to [Rng::new_with_seed()] to get the same stream
    /// back again. Good for reproducing a performance or a test failure.
    pub fn new_with_seed(seed: u128) -> Self {
        Self(oorandom::Rand64::new(seed))
    }

    /// Create a sufficiently high-quality random number that's suitable for
    /// [Rng].
    pub fn generate_seed() -> anyhow::Result<u128> {
        let mut bytes = [0u8; 16];

        getrandom::getrandom(&mut bytes)?;
        Ok(BigEndian::read_u128(&bytes))
    }

    /// The seed that stands in when the OS can't supply one.
    pub const FALLBACK_SEED: u128 = 0x5eed_cafe_f00d_d00d;

    // Without OS entropy, every default-seeded run plays the same thing.
    fn seed_or_fallback(seed: anyhow::Result<u128>) -> u128 {
        seed.unwrap_or_else(|e| {
            log::warn!(
                "couldn't get a random seed ({e}); using {:#x}, so this run will repeat earlier ones",
                Self::FALLBACK_SEED
            );
            Self::FALLBACK_SEED
        })
    }

    delegate! {
        to self.0 {
            pub fn rand_u64(&mut self) -> u64;
            pub fn rand_float(&mut self) -> f64;
            pub fn rand_range(&mut self, range: core::ops::Range<u64>) -> u64;
        }
    }

    /// A uniformly distributed integer from an inclusive range. An inverted
    /// range yields its start.
    pub fn rand_inclusive(&mut self, range: RangeInclusive<i64>) -> i64 {
        let (start, end) = (*range.start(), *range.end());
        if end <= start {
            return start;
        }
        let span = (end - start) as u64 + 1;
        start + self.0.rand_range(0..span) as i64
    }

    /// A uniformly distributed float in `[low, high]`.
    pub fn rand_between(&mut self, low: f64, high: f64) -> f64 {
        low + (high - low) * self.0.rand_float()
    }

    /// An exponentially distributed value with rate `lambda` (mean
    /// `1/lambda`).
    pub fn rand_exponential(&mut self, lambda: f64) -> f64 {
        // rand_float() is in [0, 1), so 1 - u is in (0, 1] and ln() is finite.
        -(1.0 - self.0.rand_float()).ln() / lambda
    }

    /// Picks one element of the slice, or None if it's empty.
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            None
        } else {
            items.get(self.0.rand_range(0..items.len() as u64) as usize)
        }
    }

    /// A coin flip.
    pub fn rand_bool(&mut self) -> bool {
        self.0.rand_u64() & 1 == 1
    }
}
