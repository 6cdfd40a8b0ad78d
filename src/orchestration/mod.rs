// Copyright (c) 2024 Mike Tsao

//! Ingestion, queueing, and timed emission: the parts that run while the
//! performer plays.

/// The most commonly used imports.
pub mod prelude {
    pub use super::{EmitsNotes, GateState, Improviser, MotifOrigin, TickOutcome};
}

pub use {
    engine::{Improviser, MotifOrigin},
    history::HistoryBuffer,
    queue::{Lanes, NoteSource, PlaybackQueue},
    scheduler::{GateState, Scheduler, TickOutcome},
    traits::EmitsNotes,
};

mod engine;
mod history;
mod queue;
mod scheduler;
mod traits;
