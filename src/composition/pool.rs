// Copyright (c) 2024 Mike Tsao

use super::{Neutrals, PitchPalette, Transform, TransformContext};
use crate::{
    error::{ImprovError, Result},
    types::{Axis, Motif},
    util::{ImproviserSettings, Rng},
};
use bounded_vec_deque::BoundedVecDeque;

/// Everything the generative operators borrow from the engine.
#[derive(Clone, Copy, Debug)]
pub struct GenerativeContext<'a> {
    #[allow(missing_docs)]
    pub settings: &'a ImproviserSettings,
    #[allow(missing_docs)]
    pub neutrals: &'a Neutrals,
    #[allow(missing_docs)]
    pub palette: &'a dyn PitchPalette,
}
impl<'a> GenerativeContext<'a> {
    fn transform_context(&self) -> TransformContext<'a> {
        TransformContext {
            range: self.settings.playable_range,
            settings: &self.settings.transforms,
            palette: self.palette,
        }
    }
}

/// What a [MotifPool] did with a motif it made.
#[derive(Clone, Debug, PartialEq)]
pub enum Offered {
    /// The pool took it as its newest idea.
    Added(Motif),
    /// The pool already had the same idea and didn't change.
    AlreadyKnown(Motif),
}
impl Offered {
    #[allow(missing_docs)]
    pub fn motif(&self) -> &Motif {
        match self {
            Offered::Added(motif) | Offered::AlreadyKnown(motif) => motif,
        }
    }

    #[allow(missing_docs)]
    pub fn is_added(&self) -> bool {
        matches!(self, Offered::Added(_))
    }

    /// The motif, but only if the pool took it.
    pub fn added(self) -> Option<Motif> {
        match self {
            Offered::Added(motif) => Some(motif),
            Offered::AlreadyKnown(_) => None,
        }
    }
}

/// The motifs known along one [Axis], oldest first.
///
/// A motif's position is its recency, which is what [MotifPool::select_weighted()]
/// leans on. The pool never holds two motifs that are the same idea, and when
/// it's full, the oldest motif is forgotten to make room.
#[derive(Debug)]
pub struct MotifPool {
    axis: Axis,
    motifs: BoundedVecDeque<Motif>,
}
impl MotifPool {
    /// Creates an empty pool that holds at most `capacity` motifs.
    pub fn new_with(axis: Axis, capacity: usize) -> Self {
        Self {
            axis,
            motifs: BoundedVecDeque::new(capacity.max(1)),
        }
    }

    #[allow(missing_docs)]
    pub fn axis(&self) -> Axis {
        self.axis
    }

    #[allow(missing_docs)]
    pub fn len(&self) -> usize {
        self.motifs.len()
    }

    #[allow(missing_docs)]
    pub fn is_empty(&self) -> bool {
        self.motifs.is_empty()
    }

    /// Oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &Motif> {
        self.motifs.iter()
    }

    /// Whether the pool already holds the same idea as `motif`.
    pub fn contains(&self, motif: &Motif) -> bool {
        self.motifs.iter().any(|m| m.is_same_idea(motif))
    }

    /// Appends `motif` as the most recent idea. Returns false, leaving the
    /// pool untouched, if the pool already has it or if it belongs to the
    /// other axis.
    pub fn insert(&mut self, motif: Motif) -> bool {
        if motif.axis() != self.axis {
            log::warn!("refusing {motif} in the {} pool", self.axis);
            return false;
        }
        if self.contains(&motif) {
            return false;
        }
        if let Some(evicted) = self.motifs.push_back(motif) {
            log::debug!("{} pool is full; forgot {evicted}", self.axis);
        }
        true
    }

    /// Draws a motif with a strong preference for recent ones.
    ///
    /// The draw counts back from the newest motif by `floor(len * Exp(lambda))`
    /// positions, stopping at the oldest. With lambda at 3, about two thirds of
    /// draws land in the newest third of the pool, but nothing is unreachable.
    pub fn select_weighted(&self, rng: &mut Rng, lambda: f64) -> Result<&Motif> {
        if self.motifs.is_empty() {
            return Err(ImprovError::EmptyPool(self.axis));
        }
        let last = self.motifs.len() - 1;
        let back = (self.motifs.len() as f64 * rng.rand_exponential(lambda)).floor();
        let index = if back.is_finite() && back < last as f64 {
            last - back as usize
        } else {
            0
        };
        self.motifs
            .get(index)
            .ok_or(ImprovError::EmptyPool(self.axis))
    }

    /// Makes up a motif from scratch and offers it to the pool.
    ///
    /// Pitch motifs draw each key uniformly from the playable range. Rhythmic
    /// motifs draw each duration from the configured choices. Everything else
    /// is neutral.
    pub fn generate_random(&mut self, ctx: &GenerativeContext, rng: &mut Rng) -> Result<Offered> {
        let settings = ctx.settings;
        let len = rng.rand_inclusive(
            settings.motif_length.min as i64..=settings.motif_length.max as i64,
        ) as usize;
        let notes = (0..len.max(1))
            .map(|_| {
                let value = match self.axis {
                    Axis::Pitch => rng.rand_inclusive(
                        settings.playable_range.lowest as i64
                            ..=settings.playable_range.highest as i64,
                    ) as u32,
                    Axis::Duration => rng
                        .choose(&settings.duration_choices)
                        .copied()
                        .unwrap_or(ctx.neutrals.duration_ms),
                };
                ctx.neutrals.note(self.axis, value)
            })
            .collect();
        let motif = Motif::new_with(self.axis, notes)?;
        if self.insert(motif.clone()) {
            log::debug!("generated {motif}");
            Ok(Offered::Added(motif))
        } else {
            log::debug!("generated {motif}, which the pool already had");
            Ok(Offered::AlreadyKnown(motif))
        }
    }

    /// Derives a new motif from a recent one and adds it to the pool.
    ///
    /// Each attempt picks a source with [MotifPool::select_weighted()] and an
    /// operator suited to the axis. An operator that can't handle its source
    /// just costs an attempt. If every attempt produces something the pool
    /// already has, the last candidate comes back as [Offered::AlreadyKnown].
    pub fn mutate(&mut self, ctx: &GenerativeContext, rng: &mut Rng) -> Result<Offered> {
        let transform_ctx = ctx.transform_context();
        let mut last_candidate = None;
        for _ in 0..ctx.settings.mutation_attempts.max(1) {
            let source = self
                .select_weighted(rng, ctx.settings.selection_lambda)?
                .clone();
            let transform = Transform::choose_for(self.axis, &ctx.settings.transforms, rng);
            match transform.apply(&source, &transform_ctx, rng) {
                Ok(candidate) => {
                    if !self.contains(&candidate) {
                        log::debug!("mutated {source} by {transform} into {candidate}");
                        self.insert(candidate.clone());
                        return Ok(Offered::Added(candidate));
                    }
                    last_candidate = Some(candidate);
                }
                Err(e) => {
                    log::trace!("{transform} couldn't handle {source}: {e}");
                    last_candidate.get_or_insert(source);
                }
            }
        }
        log::warn!(
            "{} mutation found nothing new in {} attempts",
            self.axis,
            ctx.settings.mutation_attempts
        );
        last_candidate
            .map(Offered::AlreadyKnown)
            .ok_or(ImprovError::EmptyPool(self.axis))
    }
}
