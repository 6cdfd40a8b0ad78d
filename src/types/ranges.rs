// Copyright (c) 2024 Mike Tsao

use core::{fmt::Display, ops::RangeInclusive};
use serde::{Deserialize, Serialize};

/// A [Normal] is an f64 that stays within [0.0, 1.0]. It clamps silently at
/// creation and when converting from an f64, which makes it good for
/// gatekeeping values that arrive from outside, like a performer's amplitude.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Normal(f64);
#[allow(missing_docs)]
impl Normal {
    pub const MAX: f64 = 1.0;
    pub const MIN: f64 = 0.0;

    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            Self(Self::MIN)
        } else {
            Self(value.clamp(Self::MIN, Self::MAX))
        }
    }
    pub const fn maximum() -> Self {
        Self(Self::MAX)
    }
    pub const fn minimum() -> Self {
        Self(Self::MIN)
    }
    pub fn value(&self) -> f64 {
        self.0
    }
}
impl Display for Normal {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_fmt(format_args!("{:.2}", self.0))
    }
}
impl From<f64> for Normal {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}
impl From<Normal> for f64 {
    fn from(value: Normal) -> Self {
        value.0
    }
}

/// The inclusive band of MIDI keys the improviser is allowed to play.
/// Everything that produces a pitch clamps into it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PlayableRange {
    /// The lowest playable key.
    pub lowest: u8,
    /// The highest playable key.
    pub highest: u8,
}
impl Default for PlayableRange {
    // A baritone-ish voice.
    fn default() -> Self {
        Self {
            lowest: 45,
            highest: 70,
        }
    }
}
impl PlayableRange {
    #[allow(missing_docs)]
    pub const fn new(lowest: u8, highest: u8) -> Self {
        Self { lowest, highest }
    }

    /// Whether the range holds at least one key.
    pub fn is_valid(&self) -> bool {
        self.lowest <= self.highest
    }

    /// The number of distinct keys in the range.
    pub fn width(&self) -> usize {
        if self.is_valid() {
            (self.highest - self.lowest) as usize + 1
        } else {
            0
        }
    }

    /// Whether the given key is playable.
    pub fn contains(&self, key: i32) -> bool {
        key >= self.lowest as i32 && key <= self.highest as i32
    }

    /// Forces a (possibly wildly out-of-range) key into the range.
    pub fn clamp(&self, key: i32) -> u8 {
        key.clamp(self.lowest as i32, self.highest as i32) as u8
    }

    /// The key halfway between the extremes, rounded down. Used as the
    /// neutral pitch for rhythmic motifs.
    pub fn midpoint(&self) -> u8 {
        self.lowest + (self.highest.saturating_sub(self.lowest)) / 2
    }

    #[allow(missing_docs)]
    pub fn as_range(&self) -> RangeInclusive<u8> {
        self.lowest..=self.highest
    }
}
