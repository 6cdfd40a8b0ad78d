// Copyright (c) 2024 Mike Tsao

use crate::types::Note;
use crossbeam::channel::Sender;

/// Carries emitted notes out of the engine, typically toward a synthesizer.
pub trait EmitsNotes {
    /// Called once for each note the scheduler releases, in order.
    fn emit(&mut self, note: Note);
}

/// Collects notes, which is mostly useful in tests.
impl EmitsNotes for Vec<Note> {
    fn emit(&mut self, note: Note) {
        self.push(note);
    }
}

impl EmitsNotes for Sender<Note> {
    fn emit(&mut self, note: Note) {
        if let Err(e) = self.try_send(note) {
            log::warn!("While emitting: {e:?}");
        }
    }
}
