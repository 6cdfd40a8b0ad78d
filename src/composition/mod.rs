// Copyright (c) 2024 Mike Tsao

//! Finding, storing, and inventing motifs.

/// The most commonly used imports.
pub mod prelude {
    pub use super::{
        detect, GenerativeContext, MotifPool, Neutrals, Offered, PitchPalette, Quantizer,
        Transform,
    };
}

pub use detector::{detect, find_longest_repeat, Repeat};
pub use neutral::Neutrals;
pub use palette::{Chromatic, Diatonic, PitchPalette};
pub use pool::{GenerativeContext, MotifPool, Offered};
pub use quantize::Quantizer;
pub use transforms::{
    detune, flourish, pitch_replace, retune_to_scale, reverse, time_scale, transpose, Transform,
    TransformContext, TransformSettings,
};

mod detector;
mod neutral;
mod palette;
mod pool;
mod quantize;
mod transforms;
