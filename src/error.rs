// Copyright (c) 2024 Mike Tsao

//! The errors that the improviser core can report.

use crate::types::Axis;
use thiserror::Error;

/// Everything that can go wrong inside the core. None of these are fatal in
/// steady state; callers are expected to recover locally (skip the operation,
/// pick another operator, report `STARVED`) rather than crash.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ImprovError {
    /// A selection was attempted on an axis whose pool has no motifs. The
    /// engine seeds every pool before it arms, so seeing this mid-performance
    /// means someone skipped [crate::orchestration::Improviser::seed()].
    #[error("the {0} motif pool is empty")]
    EmptyPool(Axis),

    /// Operator parameters would produce an unplayable pitch or a
    /// non-positive duration.
    #[error("{what} is out of range: {detail}")]
    InvalidRange {
        /// The quantity that went out of range.
        what: &'static str,
        /// A human-readable description of the offending value.
        detail: String,
    },

    /// An operator received a motif that is too short for it to work on.
    #[error("motif has {actual} note(s), but at least {required} are required")]
    DegenerateMotif {
        /// The minimum length the operator needs.
        required: usize,
        /// The length it actually got.
        actual: usize,
    },

    /// The settings can't produce a working engine.
    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    /// The scheduler was asked to run before the engine was armed.
    #[error("the scheduler hasn't been armed")]
    NotArmed,
}

/// A [Result] whose error type is [ImprovError].
pub type Result<T> = core::result::Result<T, ImprovError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_problem() {
        assert_eq!(
            ImprovError::EmptyPool(Axis::Duration).to_string(),
            "the duration motif pool is empty"
        );
        assert_eq!(
            ImprovError::DegenerateMotif {
                required: 2,
                actual: 1
            }
            .to_string(),
            "motif has 1 note(s), but at least 2 are required"
        );
    }
}
