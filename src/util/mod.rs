// Copyright (c) 2024 Mike Tsao

//! System utilities.

/// Commonly used imports.
pub mod prelude {
    pub use super::{
        rng::Rng,
        settings::{CountRange, ImproviserSettings, ImproviserSettingsBuilder},
    };
}

pub use rng::Rng;
pub use settings::{CountRange, ImproviserSettings, ImproviserSettingsBuilder};

mod rng;
mod settings;
