// Copyright (c) 2024 Mike Tsao

use super::NoteSource;
use crate::{
    error::{ImprovError, Result},
    types::Note,
};
use strum_macros::Display;

/// Where the output gate stands.
#[derive(Clone, Copy, Debug, Default, Display, PartialEq, Eq)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum GateState {
    /// The previous note is still sounding.
    #[default]
    Waiting,
    /// The gate opened and a note just went out. The next tick that finds the
    /// gate closed again turns this back into [GateState::Waiting].
    Ready,
    /// The gate is open but there's nothing to play.
    Starved,
}

/// What a single tick did.
#[derive(Clone, Debug, PartialEq)]
pub enum TickOutcome {
    /// The gate opened and this note came out.
    Emitted(Note),
    /// The gate is still closed.
    Waiting,
    /// The gate is open, but the source had nothing. `newly` is true only on
    /// the first such tick after the gate was last [GateState::Waiting] or
    /// [GateState::Ready].
    Starved {
        #[allow(missing_docs)]
        newly: bool,
    },
}

/// Releases one note at a time, each only after the previous one's duration
/// has elapsed.
///
/// Time is whatever monotonic millisecond count the caller supplies, which
/// keeps the scheduler deterministic under test. Ticking more often than
/// necessary is harmless.
#[derive(Debug)]
pub struct Scheduler {
    initial_gate_ms: u64,
    last_emit_ms: u64,
    pending_gate_ms: u64,
    state: GateState,
    is_armed: bool,
}
impl Scheduler {
    /// `initial_gate_ms` is how long after arming the first note may go out.
    pub fn new_with(initial_gate_ms: u64) -> Self {
        Self {
            initial_gate_ms,
            last_emit_ms: 0,
            pending_gate_ms: initial_gate_ms,
            state: GateState::default(),
            is_armed: false,
        }
    }

    /// Starts the clock at `now_ms`.
    pub fn arm(&mut self, now_ms: u64) {
        self.last_emit_ms = now_ms;
        self.pending_gate_ms = self.initial_gate_ms;
        self.state = GateState::Waiting;
        self.is_armed = true;
    }

    #[allow(missing_docs)]
    pub fn is_armed(&self) -> bool {
        self.is_armed
    }

    #[allow(missing_docs)]
    pub fn state(&self) -> GateState {
        self.state
    }

    /// How long the gate stays closed after the most recent emission.
    pub fn pending_gate_ms(&self) -> u64 {
        self.pending_gate_ms
    }

    /// Emits the next note from `source` if the gate has opened.
    pub fn tick(&mut self, now_ms: u64, source: &impl NoteSource) -> Result<TickOutcome> {
        if !self.is_armed {
            return Err(ImprovError::NotArmed);
        }
        if now_ms.saturating_sub(self.last_emit_ms) < self.pending_gate_ms {
            self.state = GateState::Waiting;
            return Ok(TickOutcome::Waiting);
        }
        match source.pop_next() {
            Some(note) => {
                self.last_emit_ms = now_ms;
                self.pending_gate_ms = note.duration_ms() as u64;
                self.state = GateState::Ready;
                Ok(TickOutcome::Emitted(note))
            }
            None => {
                let newly = self.state != GateState::Starved;
                self.state = GateState::Starved;
                Ok(TickOutcome::Starved { newly })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        orchestration::PlaybackQueue,
        types::{Normal, Timbre},
    };

    fn note(pitch: u8, duration_ms: u32) -> Note {
        Note::new_with(pitch, duration_ms, Normal::maximum(), Timbre::default())
    }

    fn emitted_pitch(outcome: TickOutcome) -> Option<u8> {
        match outcome {
            TickOutcome::Emitted(n) => Some(n.pitch()),
            _ => None,
        }
    }

    #[test]
    fn unarmed_scheduler_refuses_to_tick() {
        let mut s = Scheduler::new_with(0);
        let q = PlaybackQueue::new_with(4);
        assert_eq!(s.tick(0, &q), Err(ImprovError::NotArmed));
    }

    #[test]
    fn gate_follows_the_emitted_duration() {
        let mut s = Scheduler::new_with(0);
        let q = PlaybackQueue::new_with(4);
        q.push(note(60, 500)).unwrap();
        q.push(note(62, 1000)).unwrap();
        s.arm(0);

        assert_eq!(emitted_pitch(s.tick(0, &q).unwrap()), Some(60));
        assert_eq!(s.pending_gate_ms(), 500);
        assert_eq!(s.tick(0, &q).unwrap(), TickOutcome::Waiting);
        assert_eq!(s.tick(499, &q).unwrap(), TickOutcome::Waiting);
        assert_eq!(s.state(), GateState::Waiting);
        assert_eq!(emitted_pitch(s.tick(500, &q).unwrap()), Some(62));
        assert_eq!(s.tick(1499, &q).unwrap(), TickOutcome::Waiting);
        assert_eq!(s.tick(1500, &q).unwrap(), TickOutcome::Starved { newly: true });
        assert_eq!(s.state(), GateState::Starved);
    }

    #[test]
    fn initial_gate_delays_the_first_note() {
        let mut s = Scheduler::new_with(100);
        let q = PlaybackQueue::new_with(4);
        q.push(note(60, 500)).unwrap();
        s.arm(1000);
        assert_eq!(s.tick(1099, &q).unwrap(), TickOutcome::Waiting);
        assert_eq!(emitted_pitch(s.tick(1100, &q).unwrap()), Some(60));
    }

    #[test]
    fn starved_gate_stays_open_for_the_next_note() {
        let mut s = Scheduler::new_with(0);
        let q = PlaybackQueue::new_with(4);
        s.arm(0);
        assert_eq!(s.tick(10, &q).unwrap(), TickOutcome::Starved { newly: true });
        assert_eq!(s.tick(5000, &q).unwrap(), TickOutcome::Starved { newly: false });

        q.push(note(65, 1500)).unwrap();
        assert_eq!(emitted_pitch(s.tick(5001, &q).unwrap()), Some(65));
        assert_eq!(s.pending_gate_ms(), 1500);
        assert_eq!(s.tick(6000, &q).unwrap(), TickOutcome::Waiting);
        assert_eq!(s.tick(6501, &q).unwrap(), TickOutcome::Starved { newly: true });
    }

    #[test]
    fn gate_reads_ready_until_the_next_tick() {
        let mut s = Scheduler::new_with(0);
        let q = PlaybackQueue::new_with(4);
        q.push(note(60, 500)).unwrap();
        q.push(note(62, 500)).unwrap();
        s.arm(0);
        assert_eq!(s.state(), GateState::Waiting);

        assert_eq!(emitted_pitch(s.tick(0, &q).unwrap()), Some(60));
        assert_eq!(s.state(), GateState::Ready);
        assert_eq!(s.tick(1, &q).unwrap(), TickOutcome::Waiting);
        assert_eq!(s.state(), GateState::Waiting);

        // A tick that lands after the whole gate goes straight from Ready to
        // the next emission.
        assert_eq!(emitted_pitch(s.tick(500, &q).unwrap()), Some(62));
        assert_eq!(s.tick(1000, &q).unwrap(), TickOutcome::Starved { newly: true });
    }

    #[test]
    fn redundant_ticks_are_harmless() {
        let mut s = Scheduler::new_with(0);
        let q = PlaybackQueue::new_with(8);
        for k in 60..64 {
            q.push(note(k, 500)).unwrap();
        }
        s.arm(0);
        let mut emitted = Vec::new();
        for now in 0..=1600 {
            if let Some(k) = emitted_pitch(s.tick(now, &q).unwrap()) {
                emitted.push((now, k));
            }
        }
        assert_eq!(emitted, vec![(0, 60), (500, 61), (1000, 62), (1500, 63)]);
    }
}
