// Copyright (c) 2024 Mike Tsao

//! Operators that derive a new [Motif] from an existing one. None of them
//! touch their input.

use super::PitchPalette;
use crate::{
    error::{ImprovError, Result},
    types::{Axis, Motif, Normal, Note, PlayableRange, Timbre},
    util::Rng,
};
use derivative::Derivative;
use serde::{Deserialize, Serialize};
use strum_macros::Display;

/// Parameters for the transform operators.
#[derive(Clone, Debug, Derivative, PartialEq, Serialize, Deserialize)]
#[derivative(Default)]
#[serde(rename_all = "kebab-case", default)]
pub struct TransformSettings {
    /// Transposition picks a non-zero interval within ± this many semitones.
    #[derivative(Default(value = "3"))]
    pub transpose_span: u8,

    /// The factors time-scaling picks from.
    #[derivative(Default(value = "vec![0.25, 0.5, 1.5, 2.0]"))]
    pub stretch_factors: Vec<f64>,

    /// A motif holding a note longer than this is never stretched further.
    #[derivative(Default(value = "2000"))]
    pub long_note_ceiling_ms: u32,

    /// A motif holding a note shorter than this is never shrunk further.
    #[derivative(Default(value = "500"))]
    pub short_note_floor_ms: u32,

    /// What a stretch of a too-long motif becomes instead.
    #[derivative(Default(value = "vec![0.25, 0.5]"))]
    pub shrink_overrides: Vec<f64>,

    /// What a shrink of a too-short motif becomes instead.
    #[derivative(Default(value = "2.0"))]
    pub grow_override: f64,

    /// Flourish notes are whole multiples of this, taken from the preceding
    /// note.
    #[derivative(Default(value = "250"))]
    pub flourish_step_ms: u32,
}
impl TransformSettings {
    pub(crate) fn validate(&self) -> Result<()> {
        let positive = |v: &f64| v.is_finite() && *v > 0.0;
        if self.transpose_span == 0
            || self.stretch_factors.is_empty()
            || !self.stretch_factors.iter().all(positive)
            || self.shrink_overrides.is_empty()
            || !self.shrink_overrides.iter().all(|v| positive(v) && *v < 1.0)
            || !(self.grow_override.is_finite() && self.grow_override > 1.0)
            || self.flourish_step_ms == 0
        {
            Err(ImprovError::InvalidSettings(format!(
                "transform settings are unusable: {self:?}"
            )))
        } else {
            Ok(())
        }
    }
}

/// What the operators need to know about the world.
#[derive(Clone, Copy, Debug)]
pub struct TransformContext<'a> {
    #[allow(missing_docs)]
    pub range: PlayableRange,
    #[allow(missing_docs)]
    pub settings: &'a TransformSettings,
    #[allow(missing_docs)]
    pub palette: &'a dyn PitchPalette,
}

/// One motif-to-motif operator, with its parameters already chosen.
#[derive(Clone, Copy, Debug, Display, PartialEq)]
pub enum Transform {
    /// Play the notes backwards.
    Reverse,
    /// Move every pitch by this many semitones.
    Transpose(i8),
    /// Multiply every duration by this factor.
    TimeScale(f64),
    /// Give one note a different pitch.
    PitchReplace,
    /// Insert an ornamental note between two existing ones.
    Flourish,
    /// Push some notes off their keys.
    Detune,
    /// Snap every note back onto the nearest key.
    RetuneToScale,
}
impl Transform {
    /// Picks an operator that makes sense for motifs along `axis`, along with
    /// its parameters.
    pub fn choose_for(axis: Axis, settings: &TransformSettings, rng: &mut Rng) -> Self {
        match axis {
            Axis::Pitch => match rng.rand_range(0..6) {
                0 => Transform::Reverse,
                1 => {
                    let span = settings.transpose_span.min(i8::MAX as u8) as i64;
                    let k = rng.rand_inclusive(1..=span) as i8;
                    Transform::Transpose(if rng.rand_bool() { k } else { -k })
                }
                2 => Transform::PitchReplace,
                3 => Transform::Flourish,
                4 => Transform::Detune,
                _ => Transform::RetuneToScale,
            },
            Axis::Duration => {
                if rng.rand_bool() {
                    Transform::Reverse
                } else {
                    Transform::TimeScale(
                        rng.choose(&settings.stretch_factors)
                            .copied()
                            .unwrap_or(1.0),
                    )
                }
            }
        }
    }

    /// Applies this operator to `motif`, producing a new one.
    pub fn apply(&self, motif: &Motif, ctx: &TransformContext, rng: &mut Rng) -> Result<Motif> {
        match self {
            Transform::Reverse => reverse(motif),
            Transform::Transpose(interval) => transpose(motif, *interval, ctx.range),
            Transform::TimeScale(factor) => time_scale(motif, *factor, ctx.settings, rng),
            Transform::PitchReplace => pitch_replace(motif, ctx.range, rng),
            Transform::Flourish => flourish(motif, ctx, rng),
            Transform::Detune => detune(motif, rng),
            Transform::RetuneToScale => retune_to_scale(motif, ctx.range),
        }
    }
}

fn rebuild(motif: &Motif, notes: Vec<Note>) -> Result<Motif> {
    Motif::new_with(motif.axis(), notes)
}

/// The same notes in the opposite order.
pub fn reverse(motif: &Motif) -> Result<Motif> {
    rebuild(motif, motif.notes().iter().rev().cloned().collect())
}

/// Every pitch moved by `interval` semitones, clamped into `range`.
pub fn transpose(motif: &Motif, interval: i8, range: PlayableRange) -> Result<Motif> {
    rebuild(
        motif,
        motif
            .notes()
            .iter()
            .map(|n| n.with_pitch(range.clamp(n.pitch() as i32 + interval as i32)))
            .collect(),
    )
}

/// Every duration multiplied by `factor` and rounded.
///
/// A motif that already holds a very long note isn't allowed to grow, and one
/// that holds a very short note isn't allowed to shrink; the factor is
/// replaced so that the motif moves back toward the middle instead.
pub fn time_scale(
    motif: &Motif,
    factor: f64,
    settings: &TransformSettings,
    rng: &mut Rng,
) -> Result<Motif> {
    if !(factor.is_finite() && factor > 0.0) {
        return Err(ImprovError::InvalidRange {
            what: "time-scale factor",
            detail: format!("{factor}"),
        });
    }
    let durations = motif.notes().iter().map(|n| n.duration_ms());
    let has_long = durations.clone().any(|d| d > settings.long_note_ceiling_ms);
    let has_short = durations.clone().any(|d| d < settings.short_note_floor_ms);
    let factor = if has_long && factor >= 1.0 {
        rng.choose(&settings.shrink_overrides)
            .copied()
            .unwrap_or(0.5)
    } else if has_short && factor <= 1.0 {
        settings.grow_override
    } else {
        factor
    };
    rebuild(
        motif,
        motif
            .notes()
            .iter()
            .map(|n| {
                let scaled = (n.duration_ms() as f64 * factor).round();
                n.with_duration_ms(scaled.clamp(1.0, u32::MAX as f64) as u32)
            })
            .collect(),
    )
}

/// One randomly chosen note gets a different pitch from `range`.
pub fn pitch_replace(motif: &Motif, range: PlayableRange, rng: &mut Rng) -> Result<Motif> {
    if range.width() < 2 {
        return Err(ImprovError::InvalidRange {
            what: "playable range",
            detail: format!(
                "{}..={} leaves no alternative pitch",
                range.lowest, range.highest
            ),
        });
    }
    let index = rng.rand_range(0..motif.len() as u64) as usize;
    let old = motif.notes()[index].pitch();
    let new = if range.contains(old as i32) {
        // Draw from the range minus the old pitch.
        let draw = range.lowest as i64 + rng.rand_range(0..range.width() as u64 - 1) as i64;
        if draw >= old as i64 {
            draw + 1
        } else {
            draw
        }
    } else {
        range.lowest as i64 + rng.rand_range(0..range.width() as u64) as i64
    };
    let mut notes = motif.notes().to_vec();
    notes[index] = notes[index].with_pitch(new as u8).with_detune_cents(0);
    rebuild(motif, notes)
}

/// Inserts one ornamental note.
///
/// The new note's time is borrowed from the note before it, its amplitude lies
/// between its neighbors', each timbre coefficient comes from one neighbor or
/// the other, and its pitch is whatever the palette offers between the motif's
/// lowest and highest notes.
pub fn flourish(motif: &Motif, ctx: &TransformContext, rng: &mut Rng) -> Result<Motif> {
    motif.require_len(2)?;
    let step = ctx.settings.flourish_step_ms.max(1);
    let candidates: Vec<usize> = (1..motif.len())
        .filter(|i| u64::from(motif.notes()[i - 1].duration_ms()) >= 2 * u64::from(step))
        .collect();
    let Some(&insert_at) = rng.choose(&candidates) else {
        return Err(ImprovError::InvalidRange {
            what: "flourish",
            detail: format!("no note is long enough to lend {step}ms"),
        });
    };

    let notes = motif.notes();
    let previous = &notes[insert_at - 1];
    let following = &notes[insert_at];

    let max_steps = (previous.duration_ms() / 2 / step) as i64;
    let borrowed = step * rng.rand_inclusive(1..=max_steps) as u32;

    let (low_amp, high_amp) = {
        let (a, b) = (previous.amplitude().value(), following.amplitude().value());
        (a.min(b), a.max(b))
    };
    let amplitude = Normal::new(rng.rand_between(low_amp, high_amp));

    let timbre: Vec<f64> = previous
        .timbre()
        .coefficients()
        .iter()
        .zip(following.timbre().coefficients())
        .map(|(a, b)| if rng.rand_bool() { *a } else { *b })
        .collect();

    let lowest = notes.iter().map(|n| n.pitch()).min().unwrap_or(ctx.range.lowest);
    let highest = notes.iter().map(|n| n.pitch()).max().unwrap_or(ctx.range.highest);
    let offered = ctx.palette.pitches_between(lowest, highest, notes);
    let pitch = rng.choose(&offered).copied().unwrap_or(previous.pitch());

    let ornament = Note::new_with(
        ctx.range.clamp(pitch as i32),
        borrowed,
        amplitude,
        Timbre::from(timbre),
    );

    let mut new_notes = Vec::with_capacity(notes.len() + 1);
    new_notes.extend_from_slice(&notes[..insert_at - 1]);
    new_notes.push(previous.with_duration_ms(previous.duration_ms() - borrowed));
    new_notes.push(ornament);
    new_notes.extend_from_slice(&notes[insert_at..]);
    rebuild(motif, new_notes)
}

/// Pushes a random, non-empty subset of notes off their keys by up to 99
/// cents either way.
pub fn detune(motif: &Motif, rng: &mut Rng) -> Result<Motif> {
    let mut notes = motif.notes().to_vec();
    let mut indexes: Vec<usize> = (0..notes.len()).collect();
    let how_many = rng.rand_inclusive(1..=notes.len() as i64) as usize;
    for _ in 0..how_many {
        let pick = rng.rand_range(0..indexes.len() as u64) as usize;
        let index = indexes.swap_remove(pick);
        let cents = rng.rand_inclusive(1..=99) as i8;
        notes[index] = notes[index].with_detune_cents(if rng.rand_bool() { cents } else { -cents });
    }
    rebuild(motif, notes)
}

/// Snaps every note onto a key. Half a semitone or more rounds away from the
/// written key; less rounds back to it.
pub fn retune_to_scale(motif: &Motif, range: PlayableRange) -> Result<Motif> {
    rebuild(
        motif,
        motif
            .notes()
            .iter()
            .map(|n| {
                let shift = match n.detune_cents() {
                    c if c >= 50 => 1,
                    c if c <= -50 => -1,
                    _ => 0,
                };
                n.with_pitch(range.clamp(n.pitch() as i32 + shift))
                    .with_detune_cents(0)
            })
            .collect(),
    )
}
