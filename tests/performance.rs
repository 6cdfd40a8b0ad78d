// Copyright (c) 2024 Mike Tsao

use improvisor::{composition::Diatonic, orchestration::TickOutcome, prelude::*, util::CountRange};
use more_asserts::assert_ge;
use std::{sync::Arc, thread};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

// Simulates a few seconds of a duet: the performer repeats a phrase, and the
// improviser picks up on it and answers with merged pitch/rhythm notes.
#[test]
fn duet() {
    init_logging();
    let settings = ImproviserSettingsBuilder::default()
        .rng_seed(Some(31337))
        .seed_motifs(CountRange::new(1, 1))
        .low_water_mark(4)
        .build()
        .unwrap();
    let e = Improviser::new_with_palette(settings, Box::new(Diatonic::new_with(60))).unwrap();
    e.seed().unwrap();
    e.arm_at(0).unwrap();

    let phrase = [(60, 480), (64, 520), (67, 1010), (64, 490), (60, 1490)];
    let mut detected = Vec::new();
    for (pitch, duration_ms) in phrase.iter().chain(phrase.iter()) {
        detected.extend(e.on_note_received(*pitch, *duration_ms, 0.7, &[400.0, 900.0, 2400.0, 2900.0, 3400.0]));
    }
    assert!(
        detected.iter().any(|m| m.axis() == Axis::Pitch && m.key() == vec![6000, 6400, 6700, 6400, 6000]),
        "{detected:?}"
    );
    assert!(detected
        .iter()
        .any(|m| m.axis() == Axis::Duration && m.key() == vec![500, 500, 1000, 500, 1500]));

    for _ in 0..5 {
        e.trigger_mutate(Axis::Pitch).unwrap();
        e.trigger_mutate(Axis::Duration).unwrap();
    }

    let mut out: Vec<Note> = Vec::new();
    let mut last_emit_ms = 0;
    let mut last_duration_ms = 100;
    for now in (0..30_000).step_by(10) {
        if now % 100 == 0 {
            e.trigger_refill().unwrap();
        }
        if let TickOutcome::Emitted(note) = e.tick_at(now, &mut out).unwrap() {
            assert_ge!(now - last_emit_ms, last_duration_ms);
            last_emit_ms = now;
            last_duration_ms = note.duration_ms() as u64;
        }
    }
    assert_ge!(out.len(), 10);
    let range = e.settings().playable_range;
    for note in &out {
        assert!(range.contains(note.pitch() as i32));
        assert!(note.duration_ms() > 0);
        assert_eq!(note.timbre().arity(), 5);
    }
}

// Ingestion and the clock run on different threads against one engine.
#[test]
fn shared_between_threads() {
    init_logging();
    let settings = ImproviserSettingsBuilder::default()
        .rng_seed(Some(8))
        .initial_gate_ms(0)
        .build()
        .unwrap();
    let e = Arc::new(Improviser::new_with(settings).unwrap());
    e.seed().unwrap();
    e.arm_at(0).unwrap();

    let ingest = {
        let e = Arc::clone(&e);
        thread::spawn(move || {
            for i in 0..200 {
                e.on_note_received(50 + (i % 4) * 2, 500 + (i as u32 % 3) * 500, 0.5, &[0.0; 5]);
            }
        })
    };
    let clock = {
        let e = Arc::clone(&e);
        thread::spawn(move || {
            let mut out = Vec::new();
            for now in (0..100_000).step_by(50) {
                e.trigger_refill().unwrap();
                e.tick_at(now, &mut out).unwrap();
            }
            out.len()
        })
    };
    ingest.join().unwrap();
    let emitted = clock.join().unwrap();

    assert_eq!(e.history_len(), 200);
    assert_ge!(e.pool_len(Axis::Pitch), 2);
    assert_ge!(emitted, 50);
}
