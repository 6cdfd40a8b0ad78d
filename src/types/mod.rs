// Copyright (c) 2024 Mike Tsao

//! Common data types used throughout the system.

/// The most commonly used imports.
pub mod prelude {
    pub use super::{Axis, Motif, Normal, Note, PlayableRange, Timbre};
}

pub use {
    axis::Axis,
    motif::Motif,
    note::{Note, Timbre},
    ranges::{Normal, PlayableRange},
};

mod axis;
mod motif;
mod note;
mod ranges;
