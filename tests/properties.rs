// Copyright (c) 2024 Mike Tsao

use float_cmp::approx_eq;
use improvisor::{
    composition::{detect, find_longest_repeat, reverse, time_scale, TransformSettings},
    orchestration::{PlaybackQueue, Scheduler, TickOutcome},
    prelude::*,
    util::Rng,
};
use more_asserts::{assert_gt, assert_le};

fn note(pitch: u8, duration_ms: u32) -> Note {
    Note::new_with(pitch, duration_ms, Normal::maximum(), Timbre::default())
}

#[test]
fn quantizer_buckets() {
    let q = Quantizer::default();
    for d in 0..=500 {
        assert_eq!(q.quantize(d), 500);
    }
    for d in (2000..10_000).step_by(7) {
        assert_eq!(q.quantize(d), 2000);
    }
    assert_eq!(q.quantize(750), 1000);
}

#[test]
fn detector_prefers_length_three() {
    let history: Vec<Note> = [1, 2, 1, 2, 1, 2].iter().map(|k| note(*k, 500)).collect();
    let pool = MotifPool::new_with(Axis::Pitch, 16);
    let motif = detect(&history, Axis::Pitch, &pool, &Neutrals::default()).unwrap();
    assert_eq!(motif.len(), 3);
    assert_eq!(find_longest_repeat(&[1, 2, 1, 2, 1, 2]).map(|r| r.start), Some(0));
}

#[test]
fn detector_is_idempotent_once_inserted() {
    let history: Vec<Note> = [1, 2, 1, 2, 1, 2].iter().map(|k| note(*k, 500)).collect();
    let mut pool = MotifPool::new_with(Axis::Pitch, 16);
    let neutrals = Neutrals::default();
    let first = detect(&history, Axis::Pitch, &pool, &neutrals).unwrap();
    assert!(pool.insert(first));
    assert!(detect(&history, Axis::Pitch, &pool, &neutrals).is_none());
}

#[test]
fn selection_favors_the_newest_of_five() {
    let mut pool = MotifPool::new_with(Axis::Duration, 16);
    for d in [500, 1000, 1500, 2000, 2500] {
        assert!(pool.insert(Motif::new_with(Axis::Duration, vec![note(57, d)]).unwrap()));
    }
    let mut rng = Rng::new_with_seed(20240101);
    let mut newest = 0;
    let mut oldest = 0;
    for _ in 0..10_000 {
        match pool.select_weighted(&mut rng, 3.0).unwrap().key()[0] {
            2500 => newest += 1,
            500 => oldest += 1,
            _ => {}
        }
    }
    assert_gt!(newest, oldest);

    // About 1 - e^-0.6 of draws should land on the newest.
    let share = newest as f64 / 10_000.0;
    assert!(approx_eq!(f64, share, 1.0 - (-0.6f64).exp(), epsilon = 0.03), "{share}");
}

#[test]
fn reverse_round_trips() {
    let mut rng = Rng::new_with_seed(5);
    for len in 1..8 {
        let notes: Vec<Note> = (0..len)
            .map(|_| note(45 + rng.rand_range(0..26) as u8, 500 * (1 + rng.rand_range(0..4) as u32)))
            .collect();
        let m = Motif::new_with(Axis::Pitch, notes).unwrap();
        assert_eq!(reverse(&reverse(&m).unwrap()).unwrap(), m);
    }
}

#[test]
fn time_scale_never_grows_a_long_motif() {
    let settings = TransformSettings::default();
    let mut rng = Rng::new_with_seed(6);
    let m = Motif::new_with(Axis::Duration, vec![note(57, 500), note(57, 2500), note(57, 1000)]).unwrap();
    for factor in [1.0, 1.5, 2.0, 4.0] {
        for _ in 0..10 {
            let scaled = time_scale(&m, factor, &settings, &mut rng).unwrap();
            for (before, after) in m.notes().iter().zip(scaled.notes()) {
                assert_le!(after.duration_ms(), before.duration_ms());
            }
        }
    }
}

#[test]
fn scheduler_end_to_end() {
    let q = PlaybackQueue::new_with(8);
    q.push(note(60, 500)).unwrap();
    q.push(note(62, 1000)).unwrap();
    let mut s = Scheduler::new_with(500);
    s.arm(0);

    // The 500ms gate is already open at 500.
    match s.tick(500, &q).unwrap() {
        TickOutcome::Emitted(n) => assert_eq!(n.pitch(), 60),
        other => panic!("expected A, got {other:?}"),
    }
    assert_eq!(s.tick(999, &q).unwrap(), TickOutcome::Waiting);
    match s.tick(1000, &q).unwrap() {
        TickOutcome::Emitted(n) => assert_eq!(n.pitch(), 62),
        other => panic!("expected B, got {other:?}"),
    }
}

#[test]
fn pool_rejects_value_duplicates() {
    let mut pool = MotifPool::new_with(Axis::Pitch, 16);
    let m = Motif::new_with(Axis::Pitch, vec![note(60, 500), note(67, 500)]).unwrap();
    assert!(pool.insert(m.clone()));
    assert!(!pool.insert(m));
    assert_eq!(pool.len(), 1);
}
