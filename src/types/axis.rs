// Copyright (c) 2024 Mike Tsao

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumCount, EnumIter};

/// The feature along which a motif varies meaningfully. The other feature is
/// held at a neutral default within that motif's notes.
#[derive(
    Clone,
    Copy,
    Debug,
    Display,
    EnumCount,
    EnumIter,
    Eq,
    Hash,
    PartialEq,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "lowercase")]
pub enum Axis {
    /// Melodic motifs: only the pitches matter.
    Pitch,
    /// Rhythmic motifs: only the durations matter.
    Duration,
}
impl Axis {
    /// A stable small index, handy for per-axis arrays.
    pub const fn index(&self) -> usize {
        match self {
            Axis::Pitch => 0,
            Axis::Duration => 1,
        }
    }
}
