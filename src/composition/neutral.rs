// Copyright (c) 2024 Mike Tsao

use crate::{
    types::{Axis, Normal, Note, Timbre},
    util::ImproviserSettings,
};

/// The values a motif's notes carry for everything except the axis the motif
/// is about.
#[derive(Clone, Debug, PartialEq)]
pub struct Neutrals {
    #[allow(missing_docs)]
    pub pitch: u8,
    #[allow(missing_docs)]
    pub duration_ms: u32,
    #[allow(missing_docs)]
    pub amplitude: Normal,
    #[allow(missing_docs)]
    pub timbre: Timbre,
}
impl Neutrals {
    #[allow(missing_docs)]
    pub fn new_with(settings: &ImproviserSettings) -> Self {
        Self {
            pitch: settings.neutral_pitch(),
            duration_ms: settings.neutral_duration_ms,
            amplitude: Normal::new(settings.neutral_amplitude),
            timbre: Timbre::fitted(&settings.neutral_timbre, settings.timbre_arity),
        }
    }

    /// A brand-new note whose only meaningful value is `value` along `axis`.
    pub fn note(&self, axis: Axis, value: u32) -> Note {
        match axis {
            Axis::Pitch => Note::new_with(
                value.min(u8::MAX as u32) as u8,
                self.duration_ms,
                self.amplitude,
                self.timbre.clone(),
            ),
            Axis::Duration => {
                Note::new_with(self.pitch, value, self.amplitude, self.timbre.clone())
            }
        }
    }

    /// Keeps what `note` says about `axis` (and its amplitude and timbre), and
    /// neutralizes the other axis.
    pub fn neutralize(&self, note: &Note, axis: Axis) -> Note {
        match axis {
            Axis::Pitch => note.with_duration_ms(self.duration_ms),
            Axis::Duration => note.with_pitch(self.pitch).with_detune_cents(0),
        }
    }
}
impl Default for Neutrals {
    fn default() -> Self {
        Self::new_with(&ImproviserSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neutralize_keeps_only_the_axis() {
        let n = Neutrals::default();
        let played = Note::new_with(62, 1500, Normal::new(0.3), Timbre::from(vec![1.0; 5]))
            .with_detune_cents(12);

        let p = n.neutralize(&played, Axis::Pitch);
        assert_eq!((p.pitch(), p.detune_cents(), p.duration_ms()), (62, 12, 500));
        assert_eq!(p.amplitude(), Normal::new(0.3));

        let d = n.neutralize(&played, Axis::Duration);
        assert_eq!((d.pitch(), d.detune_cents(), d.duration_ms()), (57, 0, 1500));
    }

    #[test]
    fn fresh_notes() {
        let n = Neutrals::default();
        assert_eq!(n.note(Axis::Pitch, 50).pitch(), 50);
        assert_eq!(n.note(Axis::Pitch, 50).duration_ms(), 500);
        assert_eq!(n.note(Axis::Duration, 1000).pitch(), 57);
        assert_eq!(n.note(Axis::Duration, 1000).timbre().arity(), 5);
    }
}
