// Copyright (c) 2024 Mike Tsao

use crate::{
    composition::MotifPool,
    error::Result,
    types::{Axis, Note},
    util::{CountRange, Rng},
};
use crossbeam::queue::ArrayQueue;
use strum::EnumCount;

/// Something the scheduler can pull its next note from.
pub trait NoteSource {
    /// Removes and returns the next note, or None if nothing's ready.
    fn pop_next(&self) -> Option<Note>;

    /// Whether [NoteSource::pop_next()] would return a note right now.
    fn has_next(&self) -> bool;
}

/// A bounded FIFO of notes awaiting emission. One thread refills it while
/// another drains it; neither ever blocks.
#[derive(Debug)]
pub struct PlaybackQueue {
    notes: ArrayQueue<Note>,
}
impl PlaybackQueue {
    #[allow(missing_docs)]
    pub fn new_with(capacity: usize) -> Self {
        Self {
            notes: ArrayQueue::new(capacity.max(1)),
        }
    }

    /// Adds a note at the tail. A full queue hands the note back.
    pub fn push(&self, note: Note) -> core::result::Result<(), Note> {
        self.notes.push(note)
    }

    #[allow(missing_docs)]
    pub fn pop(&self) -> Option<Note> {
        self.notes.pop()
    }

    #[allow(missing_docs)]
    pub fn len(&self) -> usize {
        self.notes.len()
    }

    #[allow(missing_docs)]
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    #[allow(missing_docs)]
    pub fn capacity(&self) -> usize {
        self.notes.capacity()
    }

    /// If the queue holds fewer than `low_water_mark` notes, picks a motif
    /// from `pool` and queues its notes `repetitions` times in a row.
    /// Returns how many notes were queued. Notes that don't fit are dropped
    /// with a warning; the motif's remaining repetitions are abandoned.
    pub fn refill_from(
        &self,
        pool: &MotifPool,
        rng: &mut Rng,
        lambda: f64,
        low_water_mark: usize,
        repetitions: CountRange,
    ) -> Result<usize> {
        if self.len() >= low_water_mark {
            return Ok(0);
        }
        let motif = pool.select_weighted(rng, lambda)?;
        let times = rng.rand_inclusive(repetitions.min as i64..=repetitions.max as i64);
        let mut queued = 0;
        'outer: for _ in 0..times {
            for note in motif.notes() {
                if self.push(note.clone()).is_err() {
                    log::warn!(
                        "{} playback lane is full at {} notes",
                        pool.axis(),
                        self.capacity()
                    );
                    break 'outer;
                }
                queued += 1;
            }
        }
        log::debug!("queued {motif} x{times} ({queued} notes)");
        Ok(queued)
    }
}
impl NoteSource for PlaybackQueue {
    fn pop_next(&self) -> Option<Note> {
        self.pop()
    }

    fn has_next(&self) -> bool {
        !self.is_empty()
    }
}

/// One playback queue per [Axis]. The note that comes out takes its pitch,
/// detune, amplitude, and timbre from the pitch lane and its duration from
/// the duration lane.
#[derive(Debug)]
pub struct Lanes {
    lanes: [PlaybackQueue; Axis::COUNT],
}
impl Lanes {
    /// Both lanes get the same capacity.
    pub fn new_with(capacity: usize) -> Self {
        Self {
            lanes: [
                PlaybackQueue::new_with(capacity),
                PlaybackQueue::new_with(capacity),
            ],
        }
    }

    #[allow(missing_docs)]
    pub fn lane(&self, axis: Axis) -> &PlaybackQueue {
        &self.lanes[axis.index()]
    }
}
impl NoteSource for Lanes {
    fn pop_next(&self) -> Option<Note> {
        // Only the scheduler pops, so a lane that's non-empty here stays
        // non-empty until the pop below.
        if !self.has_next() {
            return None;
        }
        let pitch = self.lane(Axis::Pitch).pop()?;
        match self.lane(Axis::Duration).pop() {
            Some(rhythm) => Some(pitch.with_duration_ms(rhythm.duration_ms())),
            None => {
                log::warn!("duration lane emptied unexpectedly; dropped {pitch}");
                None
            }
        }
    }

    fn has_next(&self) -> bool {
        self.lanes.iter().all(|lane| !lane.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Motif, Normal, Timbre};

    fn note(pitch: u8, duration_ms: u32) -> Note {
        Note::new_with(pitch, duration_ms, Normal::maximum(), Timbre::default())
    }

    #[test]
    fn queue_is_fifo_and_bounded() {
        let q = PlaybackQueue::new_with(2);
        assert!(q.push(note(60, 500)).is_ok());
        assert!(q.push(note(61, 500)).is_ok());
        assert_eq!(q.push(note(62, 500)), Err(note(62, 500)));
        assert_eq!(q.pop_next().map(|n| n.pitch()), Some(60));
        assert_eq!(q.pop_next().map(|n| n.pitch()), Some(61));
        assert!(q.pop_next().is_none());
        assert!(!q.has_next());
    }

    #[test]
    fn refill_repeats_in_order() {
        let q = PlaybackQueue::new_with(64);
        let mut pool = MotifPool::new_with(Axis::Pitch, 4);
        pool.insert(Motif::new_with(Axis::Pitch, vec![note(60, 500), note(64, 500), note(67, 500)]).unwrap());
        let mut rng = Rng::new_with_seed(1);

        let queued = q
            .refill_from(&pool, &mut rng, 3.0, 5, CountRange::new(3, 3))
            .unwrap();
        assert_eq!(queued, 9);
        let keys: Vec<u8> = std::iter::from_fn(|| q.pop()).map(|n| n.pitch()).collect();
        assert_eq!(keys, vec![60, 64, 67, 60, 64, 67, 60, 64, 67]);
    }

    #[test]
    fn refill_waits_for_the_low_water_mark() {
        let q = PlaybackQueue::new_with(64);
        let mut pool = MotifPool::new_with(Axis::Pitch, 4);
        pool.insert(Motif::new_with(Axis::Pitch, vec![note(60, 500), note(62, 500)]).unwrap());
        let mut rng = Rng::new_with_seed(2);
        for _ in 0..3 {
            q.push(note(50, 500)).unwrap();
        }
        assert_eq!(
            q.refill_from(&pool, &mut rng, 3.0, 3, CountRange::new(1, 1)).unwrap(),
            0
        );
        assert_eq!(
            q.refill_from(&pool, &mut rng, 3.0, 4, CountRange::new(1, 1)).unwrap(),
            2
        );
        assert_eq!(q.len(), 5);
    }

    #[test]
    fn refill_from_an_empty_pool_fails() {
        let q = PlaybackQueue::new_with(8);
        let pool = MotifPool::new_with(Axis::Duration, 4);
        assert!(q
            .refill_from(&pool, &mut Rng::new_with_seed(3), 3.0, 5, CountRange::new(1, 6))
            .is_err());
    }

    #[test]
    fn refill_stops_at_capacity() {
        let q = PlaybackQueue::new_with(5);
        let mut pool = MotifPool::new_with(Axis::Pitch, 4);
        pool.insert(Motif::new_with(Axis::Pitch, vec![note(60, 500), note(62, 500)]).unwrap());
        let queued = q
            .refill_from(&pool, &mut Rng::new_with_seed(4), 3.0, 5, CountRange::new(6, 6))
            .unwrap();
        assert_eq!(queued, 5);
        assert_eq!(q.len(), 5);
    }

    #[test]
    fn lanes_merge_pitch_and_duration() {
        let lanes = Lanes::new_with(8);
        lanes
            .lane(Axis::Pitch)
            .push(note(64, 500).with_detune_cents(-20).with_amplitude(Normal::new(0.5)))
            .unwrap();
        assert!(!lanes.has_next());
        assert!(lanes.pop_next().is_none());
        assert_eq!(lanes.lane(Axis::Pitch).len(), 1);

        lanes.lane(Axis::Duration).push(note(57, 1500)).unwrap();
        let merged = lanes.pop_next().unwrap();
        assert_eq!(merged.pitch(), 64);
        assert_eq!(merged.detune_cents(), -20);
        assert_eq!(merged.duration_ms(), 1500);
        assert_eq!(merged.amplitude(), Normal::new(0.5));
        assert!(!lanes.has_next());
    }
}
