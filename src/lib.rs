// Copyright (c) 2024 Mike Tsao

#![deny(missing_docs, unused_imports, unused_variables)]
#![allow(rustdoc::private_intra_doc_links)]

//! Improvisor listens to a performer, remembers the motifs they repeat, and
//! plays variations of them back in time.
//!
//! The pieces, from the bottom up:
//!
//! * [types] holds the values that flow through the system: a [Note](types::Note),
//! and a [Motif](types::Motif), which is a short run of notes that matters
//! along one [Axis](types::Axis).
//! * [composition] finds motifs in what the performer played, keeps them in a
//! [MotifPool](composition::MotifPool) per axis, and invents new ones.
//! * [orchestration] ties everything to the clock. The [Improviser] takes in
//! notes, refills its playback lanes from the pools, and releases one note at
//! a time, each after the previous one has finished sounding.
//!
//! A typical session builds an [Improviser] from [ImproviserSettings], calls
//! [Improviser::seed()] and [Improviser::arm()], and then drives
//! [Improviser::on_note_received()] from one thread while another calls
//! [Improviser::trigger_refill()] and [Improviser::trigger_tick()] on a timer.

/// A collection of imports that are useful to users of this crate. `use
/// improvisor::prelude::*;` for easier onboarding.
pub mod prelude {
    pub use super::{
        composition::prelude::*, error::ImprovError, orchestration::prelude::*,
        types::prelude::*, util::prelude::*,
    };
}

pub use {orchestration::Improviser, util::ImproviserSettings};

pub mod composition;
pub mod error;
pub mod orchestration;
pub mod types;
pub mod util;
