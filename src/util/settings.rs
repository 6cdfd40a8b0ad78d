// Copyright (c) 2024 Mike Tsao

//! Structs that hold configuration information about the improviser.
//! Intended to be serialized.

use crate::{
    composition::{Quantizer, TransformSettings},
    error::{ImprovError, Result},
    types::PlayableRange,
};
use anyhow::Context;
use derivative::Derivative;
use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// An inclusive `min..=max` count, spelled out so that it reads well in a
/// settings file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CountRange {
    #[allow(missing_docs)]
    pub min: usize,
    #[allow(missing_docs)]
    pub max: usize,
}
impl CountRange {
    #[allow(missing_docs)]
    pub const fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    fn check(&self, what: &str, floor: usize) -> Result<()> {
        if self.min < floor || self.min > self.max {
            Err(ImprovError::InvalidSettings(format!(
                "{what} must satisfy {floor} <= min <= max, got {}..={}",
                self.min, self.max
            )))
        } else {
            Ok(())
        }
    }
}

/// Everything tunable about the improviser. Defaults come from the values that
/// worked in live performance.
#[derive(Clone, Debug, Derivative, Builder, PartialEq, Serialize, Deserialize)]
#[derivative(Default)]
#[builder(default)]
#[serde(rename_all = "kebab-case", default)]
pub struct ImproviserSettings {
    /// The keys the improviser may play.
    pub playable_range: PlayableRange,

    /// How raw durations snap to canonical buckets.
    pub quantizer: Quantizer,

    /// How many timbre descriptors each note carries.
    #[derivative(Default(value = "5"))]
    pub timbre_arity: usize,

    /// The timbre given to generated notes. These are the lower formant
    /// bounds of the voice the synthesizer was tuned for.
    #[derivative(Default(value = "vec![250.0, 550.0, 2550.0, 2750.0, 3000.0]"))]
    pub neutral_timbre: Vec<f64>,

    /// The amplitude given to generated notes.
    #[derivative(Default(value = "1.0"))]
    pub neutral_amplitude: f64,

    /// The duration given to the notes of pitch motifs.
    #[derivative(Default(value = "500"))]
    pub neutral_duration_ms: u32,

    /// How many of the performer's most recent notes are remembered.
    #[derivative(Default(value = "256"))]
    pub history_capacity: usize,

    /// How many of the most recent notes the pattern detector examines.
    #[derivative(Default(value = "20"))]
    pub detection_window: usize,

    /// Run detection on both axes after this many notes arrive. None leaves
    /// detection to explicit triggers.
    #[derivative(Default(value = "Some(5)"))]
    pub detect_every: Option<usize>,

    /// The most motifs a pool keeps before it forgets the oldest.
    #[derivative(Default(value = "128"))]
    pub pool_capacity: usize,

    /// The rate of the exponential recency preference used by selection.
    #[derivative(Default(value = "3.0"))]
    pub selection_lambda: f64,

    /// The length of randomly generated motifs.
    #[derivative(Default(value = "CountRange::new(2, 5)"))]
    pub motif_length: CountRange,

    /// The durations that randomly generated rhythmic motifs draw from.
    #[derivative(Default(value = "vec![500, 1000, 1500]"))]
    pub duration_choices: Vec<u32>,

    /// How many times mutation tries to find a novel motif before giving up.
    #[derivative(Default(value = "20"))]
    pub mutation_attempts: usize,

    /// Refill a playback lane when it holds fewer notes than this.
    #[derivative(Default(value = "10"))]
    pub low_water_mark: usize,

    /// How many times a selected motif is repeated when it's queued.
    #[derivative(Default(value = "CountRange::new(1, 6)"))]
    pub repetitions: CountRange,

    /// The most notes a playback lane can hold.
    #[derivative(Default(value = "512"))]
    pub lane_capacity: usize,

    /// The gate before the very first emission.
    #[derivative(Default(value = "100"))]
    pub initial_gate_ms: u64,

    /// How many random motifs each pool starts with.
    #[derivative(Default(value = "CountRange::new(1, 3)"))]
    pub seed_motifs: CountRange,

    /// Parameters for the transform operators.
    pub transforms: TransformSettings,

    /// A fixed seed makes a run reproducible.
    pub rng_seed: Option<u64>,
}
impl ImproviserSettings {
    /// Reads settings from a JSON file and validates them.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("reading settings from {}", path.display()))?;
        let settings: Self = serde_json::from_str(&json)
            .with_context(|| format!("parsing settings from {}", path.display()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Serializes to pretty-printed JSON.
    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Confirms that an engine built from these settings can run.
    pub fn validate(&self) -> Result<()> {
        if !self.playable_range.is_valid() {
            return Err(ImprovError::InvalidSettings(format!(
                "playable range {}..={} is empty",
                self.playable_range.lowest, self.playable_range.highest
            )));
        }
        self.quantizer.validate()?;
        if self.timbre_arity == 0 {
            return Err(ImprovError::InvalidSettings(
                "timbre arity must be at least 1".to_string(),
            ));
        }
        if self.neutral_duration_ms == 0 {
            return Err(ImprovError::InvalidSettings(
                "neutral duration must be positive".to_string(),
            ));
        }
        if self.history_capacity == 0 || self.detection_window < 2 {
            return Err(ImprovError::InvalidSettings(format!(
                "history capacity {} and detection window {} are too small",
                self.history_capacity, self.detection_window
            )));
        }
        if self.detect_every == Some(0) {
            return Err(ImprovError::InvalidSettings(
                "detect-every must be positive when set".to_string(),
            ));
        }
        if self.pool_capacity == 0 {
            return Err(ImprovError::InvalidSettings(
                "pool capacity must be at least 1".to_string(),
            ));
        }
        if !(self.selection_lambda.is_finite() && self.selection_lambda > 0.0) {
            return Err(ImprovError::InvalidSettings(format!(
                "selection lambda must be positive, got {}",
                self.selection_lambda
            )));
        }
        self.motif_length.check("motif length", 1)?;
        if self.duration_choices.is_empty() || self.duration_choices.contains(&0) {
            return Err(ImprovError::InvalidSettings(
                "duration choices must be non-empty and positive".to_string(),
            ));
        }
        if self.mutation_attempts == 0 {
            return Err(ImprovError::InvalidSettings(
                "mutation attempts must be at least 1".to_string(),
            ));
        }
        if self.lane_capacity == 0 || self.low_water_mark > self.lane_capacity {
            return Err(ImprovError::InvalidSettings(format!(
                "low-water mark {} must fit in lane capacity {}",
                self.low_water_mark, self.lane_capacity
            )));
        }
        self.repetitions.check("repetitions", 1)?;
        self.seed_motifs.check("seed motifs", 1)?;
        self.transforms.validate()
    }

    /// The pitch given to the notes of rhythmic motifs.
    pub fn neutral_pitch(&self) -> u8 {
        self.playable_range.midpoint()
    }
}
