// Copyright (c) 2024 Mike Tsao

use crate::types::Note;
use bounded_vec_deque::BoundedVecDeque;

/// The performer's most recent notes, oldest first. When it's full, the oldest
/// note falls off the front.
#[derive(Debug)]
pub struct HistoryBuffer {
    notes: BoundedVecDeque<Note>,
}
impl HistoryBuffer {
    #[allow(missing_docs)]
    pub fn new_with(capacity: usize) -> Self {
        Self {
            notes: BoundedVecDeque::new(capacity.max(1)),
        }
    }

    #[allow(missing_docs)]
    pub fn push(&mut self, note: Note) {
        let _ = self.notes.push_back(note);
    }

    #[allow(missing_docs)]
    pub fn len(&self) -> usize {
        self.notes.len()
    }

    #[allow(missing_docs)]
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// A copy of the last `count` notes (or all of them, if there are fewer),
    /// so that detection can work on a stable view while ingestion carries on.
    pub fn snapshot_recent(&self, count: usize) -> Vec<Note> {
        let skip = self.notes.len().saturating_sub(count);
        self.notes.iter().skip(skip).cloned().collect()
    }
}
