// Copyright (c) 2024 Mike Tsao

use super::{EmitsNotes, GateState, HistoryBuffer, Lanes, NoteSource, Scheduler, TickOutcome};
use crate::{
    composition::{
        detect, Chromatic, GenerativeContext, MotifPool, Neutrals, Offered, PitchPalette,
    },
    error::{ImprovError, Result},
    types::{Axis, Motif, Normal, Note, Timbre},
    util::{ImproviserSettings, Rng},
};
use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard,
    },
    time::Instant,
};
use strum::{EnumCount, IntoEnumIterator};

/// Where a motif in a pool came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum MotifOrigin {
    /// Heard in the performer's playing.
    Detected,
    /// Made up from scratch.
    Generated,
    /// Derived from another motif.
    Mutated,
}

/// The whole improviser: what it has heard, the motifs it knows, what it's
/// about to play, and when.
///
/// Every method takes `&self`, so one [Improviser] can be shared through an
/// [Arc](std::sync::Arc) between an ingestion thread and a clock thread. The
/// history and each pool have their own lock; a pool is always locked before
/// the random-number generator.
#[derive(Debug)]
pub struct Improviser {
    settings: ImproviserSettings,
    neutrals: Neutrals,
    palette: Box<dyn PitchPalette>,

    history: Mutex<HistoryBuffer>,
    pools: [RwLock<MotifPool>; Axis::COUNT],
    lanes: Lanes,
    scheduler: Mutex<Scheduler>,
    rng: Mutex<Rng>,

    origin: Instant,
    notes_received: AtomicUsize,
}
impl Improviser {
    /// Builds an engine with a chromatic palette. The pools start out empty;
    /// call [Improviser::seed()] and then [Improviser::arm()] before ticking.
    pub fn new_with(settings: ImproviserSettings) -> Result<Self> {
        Self::new_with_palette(settings, Box::new(Chromatic))
    }

    /// Like [Improviser::new_with()], but flourishes draw pitches from
    /// `palette`.
    pub fn new_with_palette(
        settings: ImproviserSettings,
        palette: Box<dyn PitchPalette>,
    ) -> Result<Self> {
        settings.validate()?;
        let rng = match settings.rng_seed {
            Some(seed) => Rng::new_with_seed(seed as u128),
            None => Rng::default(),
        };
        Ok(Self {
            neutrals: Neutrals::new_with(&settings),
            palette,
            history: Mutex::new(HistoryBuffer::new_with(settings.history_capacity)),
            pools: [
                RwLock::new(MotifPool::new_with(Axis::Pitch, settings.pool_capacity)),
                RwLock::new(MotifPool::new_with(Axis::Duration, settings.pool_capacity)),
            ],
            lanes: Lanes::new_with(settings.lane_capacity),
            scheduler: Mutex::new(Scheduler::new_with(settings.initial_gate_ms)),
            rng: Mutex::new(rng),
            origin: Instant::now(),
            notes_received: Default::default(),
            settings,
        })
    }

    #[allow(missing_docs)]
    pub fn settings(&self) -> &ImproviserSettings {
        &self.settings
    }

    /// Milliseconds since the engine was built.
    pub fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }

    /// Takes in one note from the performer.
    ///
    /// The duration is quantized, the pitch is clamped into the playable
    /// range, and the timbre is fitted to the configured arity. Every
    /// `detect_every` notes, detection runs on both axes; whatever it finds is
    /// returned.
    pub fn on_note_received(
        &self,
        pitch: i32,
        duration_ms: u32,
        amplitude: f64,
        timbre: &[f64],
    ) -> Vec<Motif> {
        if timbre.len() != self.settings.timbre_arity {
            log::warn!(
                "expected {} timbre coefficients but got {}",
                self.settings.timbre_arity,
                timbre.len()
            );
        }
        let note = Note::new_with(
            self.settings.playable_range.clamp(pitch),
            self.settings.quantizer.quantize(duration_ms),
            Normal::new(amplitude),
            Timbre::fitted(timbre, self.settings.timbre_arity),
        );
        log::trace!("heard {note}");
        lock(&self.history).push(note);

        let received = self.notes_received.fetch_add(1, Ordering::Relaxed) + 1;
        match self.settings.detect_every {
            Some(every) if every > 0 && received % every == 0 => {
                Axis::iter().filter_map(|axis| self.trigger_detect(axis)).collect()
            }
            _ => Vec::new(),
        }
    }

    /// Looks for a new motif along `axis` in the recent history, and adds it
    /// to the pool if there is one.
    pub fn trigger_detect(&self, axis: Axis) -> Option<Motif> {
        let snapshot = lock(&self.history).snapshot_recent(self.settings.detection_window);
        let found = detect(&snapshot, axis, &read(self.pool(axis)), &self.neutrals)?;
        if write(self.pool(axis)).insert(found.clone()) {
            log::debug!("detected {found}");
            Some(found)
        } else {
            None
        }
    }

    /// Tops up each playback lane that's below the low-water mark. Returns
    /// the number of notes queued across both lanes.
    pub fn trigger_refill(&self) -> Result<usize> {
        let mut queued = 0;
        for axis in Axis::iter() {
            let pool = read(self.pool(axis));
            queued += self.lanes.lane(axis).refill_from(
                &pool,
                &mut lock(&self.rng),
                self.settings.selection_lambda,
                self.settings.low_water_mark,
                self.settings.repetitions,
            )?;
        }
        Ok(queued)
    }

    /// Emits the next note through `egress` if it's time.
    pub fn trigger_tick(&self, egress: &mut dyn EmitsNotes) -> Result<TickOutcome> {
        self.tick_at(self.now_ms(), egress)
    }

    /// [Improviser::trigger_tick()] with an explicit clock reading.
    pub fn tick_at(&self, now_ms: u64, egress: &mut dyn EmitsNotes) -> Result<TickOutcome> {
        let outcome = lock(&self.scheduler).tick(now_ms, &self.lanes)?;
        match &outcome {
            TickOutcome::Emitted(note) => {
                log::debug!("emitting {note} at {now_ms}ms");
                egress.emit(note.clone());
            }
            TickOutcome::Starved { newly: true } => {
                log::warn!(
                    "nothing to play at {now_ms}ms (pitch lane {}, duration lane {})",
                    self.lanes.lane(Axis::Pitch).len(),
                    self.lanes.lane(Axis::Duration).len()
                );
            }
            _ => {}
        }
        Ok(outcome)
    }

    /// Makes up a new motif along `axis` and adds it to the pool unless the
    /// pool already has it.
    pub fn trigger_generate(&self, axis: Axis) -> Result<Offered> {
        let mut pool = write(self.pool(axis));
        pool.generate_random(&self.generative_context(), &mut lock(&self.rng))
    }

    /// Derives a new motif along `axis` from a recent one and adds it to the
    /// pool. When the attempts run out, the pool stays as it was and the
    /// result is [Offered::AlreadyKnown].
    pub fn trigger_mutate(&self, axis: Axis) -> Result<Offered> {
        let mut pool = write(self.pool(axis));
        pool.mutate(&self.generative_context(), &mut lock(&self.rng))
    }

    /// Gives every pool a few random motifs to start from. Returns the ones
    /// the pools took; a draw that repeats an earlier one is left out.
    pub fn seed(&self) -> Result<Vec<Motif>> {
        let range = self.settings.seed_motifs;
        let mut seeded = Vec::new();
        for axis in Axis::iter() {
            let count = lock(&self.rng).rand_inclusive(range.min as i64..=range.max as i64);
            for _ in 0..count {
                seeded.extend(self.trigger_generate(axis)?.added());
            }
        }
        Ok(seeded)
    }

    /// Starts the scheduler's clock. Refuses if any pool is empty, because
    /// refills would have nothing to draw from.
    pub fn arm(&self) -> Result<()> {
        self.arm_at(self.now_ms())
    }

    /// [Improviser::arm()] with an explicit clock reading.
    pub fn arm_at(&self, now_ms: u64) -> Result<()> {
        for axis in Axis::iter() {
            if read(self.pool(axis)).is_empty() {
                return Err(ImprovError::EmptyPool(axis));
            }
        }
        lock(&self.scheduler).arm(now_ms);
        log::info!(
            "armed with {} pitch and {} duration motifs",
            self.pool_len(Axis::Pitch),
            self.pool_len(Axis::Duration)
        );
        Ok(())
    }

    #[allow(missing_docs)]
    pub fn is_armed(&self) -> bool {
        lock(&self.scheduler).is_armed()
    }

    #[allow(missing_docs)]
    pub fn gate_state(&self) -> GateState {
        lock(&self.scheduler).state()
    }

    #[allow(missing_docs)]
    pub fn pool_len(&self, axis: Axis) -> usize {
        read(self.pool(axis)).len()
    }

    /// A copy of the pool's motifs, oldest first.
    pub fn pool_snapshot(&self, axis: Axis) -> Vec<Motif> {
        read(self.pool(axis)).iter().cloned().collect()
    }

    #[allow(missing_docs)]
    pub fn history_len(&self) -> usize {
        lock(&self.history).len()
    }

    /// How many notes are waiting in the lane for `axis`.
    pub fn lane_len(&self, axis: Axis) -> usize {
        self.lanes.lane(axis).len()
    }

    /// Whether the next tick with an open gate would emit.
    pub fn has_next(&self) -> bool {
        self.lanes.has_next()
    }

    fn pool(&self, axis: Axis) -> &RwLock<MotifPool> {
        &self.pools[axis.index()]
    }

    fn generative_context(&self) -> GenerativeContext {
        GenerativeContext {
            settings: &self.settings,
            neutrals: &self.neutrals,
            palette: self.palette.as_ref(),
        }
    }
}

// Everything behind these locks is append-only or a single-slot overwrite, so
// a panic elsewhere can't leave it half-updated.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
fn read<T>(rw: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    rw.read().unwrap_or_else(PoisonError::into_inner)
}
fn write<T>(rw: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    rw.write().unwrap_or_else(PoisonError::into_inner)
}
