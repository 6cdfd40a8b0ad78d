// Copyright (c) 2024 Mike Tsao

//! Threads and crossbeam channels that drive an improvisor engine in real
//! time.

#![deny(missing_docs)]

/// The most commonly used imports.
pub mod prelude {
    pub use super::{
        ImproviserService, ImproviserServiceEvent, ImproviserServiceInput, ProvidesService,
    };
}

pub use improviser::{
    ImproviserService, ImproviserServiceEvent, ImproviserServiceInput, DEFAULT_TICK_INTERVAL,
};
pub use traits::ProvidesService;
pub use types::CrossbeamChannel;

mod improviser;
mod traits;
mod types;
