// Copyright (c) 2024 Mike Tsao

use super::{Axis, Normal};
use core::fmt::Display;
use serde::{Deserialize, Serialize};

/// A fixed-arity list of timbre descriptors (formants or cepstral
/// coefficients, depending on what the upstream analyzer sends).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Timbre(Vec<f64>);
impl Timbre {
    /// Builds a [Timbre] of exactly `arity` coefficients, padding with zeros or
    /// dropping extras as needed.
    pub fn fitted(values: &[f64], arity: usize) -> Self {
        let mut v: Vec<f64> = values.iter().take(arity).copied().collect();
        v.resize(arity, 0.0);
        Self(v)
    }

    /// The coefficients.
    pub fn coefficients(&self) -> &[f64] {
        &self.0
    }

    #[allow(missing_docs)]
    pub fn arity(&self) -> usize {
        self.0.len()
    }
}
impl From<Vec<f64>> for Timbre {
    fn from(value: Vec<f64>) -> Self {
        Self(value)
    }
}

/// A [Note] is one musical event: a pitch, held for a duration, at an
/// amplitude, with a timbre.
///
/// Notes are immutable. The `with_*()` methods return a modified copy, which
/// is what lets motifs already in a pool stay untouched while transforms
/// explore variants of them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Note {
    pitch: u8,
    #[serde(default)]
    detune_cents: i8,
    duration_ms: u32,
    amplitude: Normal,
    timbre: Timbre,
}
impl Note {
    #[allow(missing_docs)]
    pub fn new_with(pitch: u8, duration_ms: u32, amplitude: Normal, timbre: Timbre) -> Self {
        Self {
            pitch,
            detune_cents: 0,
            duration_ms,
            amplitude,
            timbre,
        }
    }

    /// The MIDI key. 69 is (usually) A4.
    pub fn pitch(&self) -> u8 {
        self.pitch
    }

    /// How far off the key this note sounds, in cents. Zero for anything that
    /// came from the performer.
    pub fn detune_cents(&self) -> i8 {
        self.detune_cents
    }

    #[allow(missing_docs)]
    pub fn duration_ms(&self) -> u32 {
        self.duration_ms
    }

    #[allow(missing_docs)]
    pub fn amplitude(&self) -> Normal {
        self.amplitude
    }

    #[allow(missing_docs)]
    pub fn timbre(&self) -> &Timbre {
        &self.timbre
    }

    /// The scalar this note contributes along the given axis. Pitch is
    /// expressed in cents so that detuned notes are distinguishable.
    pub fn axis_value(&self, axis: Axis) -> i64 {
        match axis {
            Axis::Pitch => self.pitch as i64 * 100 + self.detune_cents as i64,
            Axis::Duration => self.duration_ms as i64,
        }
    }

    #[allow(missing_docs)]
    pub fn with_pitch(&self, pitch: u8) -> Self {
        Self {
            pitch,
            ..self.clone()
        }
    }

    #[allow(missing_docs)]
    pub fn with_detune_cents(&self, detune_cents: i8) -> Self {
        Self {
            detune_cents,
            ..self.clone()
        }
    }

    #[allow(missing_docs)]
    pub fn with_duration_ms(&self, duration_ms: u32) -> Self {
        Self {
            duration_ms,
            ..self.clone()
        }
    }

    #[allow(missing_docs)]
    pub fn with_amplitude(&self, amplitude: Normal) -> Self {
        Self {
            amplitude,
            ..self.clone()
        }
    }

    #[allow(missing_docs)]
    pub fn with_timbre(&self, timbre: Timbre) -> Self {
        Self {
            timbre,
            ..self.clone()
        }
    }
}
impl Display for Note {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        if self.detune_cents == 0 {
            write!(f, "{},{}", self.pitch, self.duration_ms)
        } else {
            write!(
                f,
                "{}{:+}c,{}",
                self.pitch, self.detune_cents, self.duration_ms
            )
        }
    }
}
