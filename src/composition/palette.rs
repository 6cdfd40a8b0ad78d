// Copyright (c) 2024 Mike Tsao

//! The narrow music-theory seam. The flourish operator asks a [PitchPalette]
//! which pitches would sound at home in a motif; a real key analyzer can stand
//! behind it, but the crate only ships simple ones.

use crate::types::Note;
use core::fmt::Debug;

/// Answers "which pitches fit here?"
pub trait PitchPalette: Debug + Send + Sync {
    /// The candidate keys in `low..=high` that suit the given notes.
    fn pitches_between(&self, low: u8, high: u8, context: &[Note]) -> Vec<u8>;
}

/// Every semitone fits.
#[derive(Debug, Default)]
pub struct Chromatic;
impl PitchPalette for Chromatic {
    fn pitches_between(&self, low: u8, high: u8, _context: &[Note]) -> Vec<u8> {
        (low.min(high)..=high.max(low)).collect()
    }
}

/// Only the notes of a major scale on a fixed tonic fit. Minor keys are
/// covered by picking the relative major's tonic.
#[derive(Debug)]
pub struct Diatonic {
    tonic: u8,
}
impl Diatonic {
    const MAJOR_STEPS: [u8; 7] = [0, 2, 4, 5, 7, 9, 11];

    /// `tonic` is any MIDI key; only its pitch class matters.
    pub fn new_with(tonic: u8) -> Self {
        Self { tonic: tonic % 12 }
    }

    #[allow(missing_docs)]
    pub fn contains(&self, key: u8) -> bool {
        let step = (key as u16 + 12 - self.tonic as u16) % 12;
        Self::MAJOR_STEPS.contains(&(step as u8))
    }
}
impl PitchPalette for Diatonic {
    fn pitches_between(&self, low: u8, high: u8, _context: &[Note]) -> Vec<u8> {
        (low.min(high)..=high.max(low))
            .filter(|k| self.contains(*k))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chromatic_is_everything() {
        assert_eq!(Chromatic.pitches_between(60, 63, &[]), vec![60, 61, 62, 63]);
        assert_eq!(Chromatic.pitches_between(63, 60, &[]), vec![60, 61, 62, 63]);
    }

    #[test]
    fn c_major() {
        let c = Diatonic::new_with(60);
        assert_eq!(c.pitches_between(60, 72, &[]), vec![60, 62, 64, 65, 67, 69, 71, 72]);
        assert!(c.pitches_between(61, 61, &[]).is_empty());
    }

    #[test]
    fn d_major_has_two_sharps() {
        let d = Diatonic::new_with(62);
        assert!(d.contains(66));
        assert!(d.contains(73));
        assert!(!d.contains(65));
        assert!(!d.contains(72));
    }
}
