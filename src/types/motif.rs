// Copyright (c) 2024 Mike Tsao

use super::{Axis, Note};
use crate::error::{ImprovError, Result};
use core::fmt::Display;
use serde::{Deserialize, Serialize};

/// A [Motif] is a short, non-empty, ordered run of [Note]s that's treated as a
/// reusable musical idea along one [Axis].
///
/// A motif is never changed once built. Transforms produce a new one.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Motif {
    axis: Axis,
    notes: Vec<Note>,
}
impl Motif {
    /// Creates a [Motif], refusing an empty note list.
    pub fn new_with(axis: Axis, notes: Vec<Note>) -> Result<Self> {
        if notes.is_empty() {
            return Err(ImprovError::DegenerateMotif {
                required: 1,
                actual: 0,
            });
        }
        Ok(Self { axis, notes })
    }

    #[allow(missing_docs)]
    pub fn axis(&self) -> Axis {
        self.axis
    }

    #[allow(missing_docs)]
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    #[allow(missing_docs)]
    pub fn len(&self) -> usize {
        self.notes.len()
    }

    /// Always false; an empty motif can't be built. Here to keep clippy happy.
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// The motif projected onto its own axis. Two motifs with the same key are
    /// the same musical idea as far as the pool is concerned.
    pub fn key(&self) -> Vec<i64> {
        self.notes
            .iter()
            .map(|n| n.axis_value(self.axis))
            .collect()
    }

    /// Value equality along this motif's axis.
    pub fn is_same_idea(&self, other: &Motif) -> bool {
        self.axis == other.axis
            && self.notes.len() == other.notes.len()
            && self
                .notes
                .iter()
                .zip(other.notes.iter())
                .all(|(a, b)| a.axis_value(self.axis) == b.axis_value(self.axis))
    }

    /// Returns an error unless the motif has at least `required` notes.
    pub fn require_len(&self, required: usize) -> Result<()> {
        if self.notes.len() < required {
            Err(ImprovError::DegenerateMotif {
                required,
                actual: self.notes.len(),
            })
        } else {
            Ok(())
        }
    }
}
impl Display for Motif {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}[", self.axis)?;
        for (i, v) in self.key().iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            match self.axis {
                Axis::Pitch if v % 100 != 0 => write!(f, "{:.2}", *v as f64 / 100.0)?,
                Axis::Pitch => write!(f, "{}", v / 100)?,
                Axis::Duration => write!(f, "{v}")?,
            }
        }
        write!(f, "]")
    }
}
