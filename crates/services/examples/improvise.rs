// Copyright (c) 2024 Mike Tsao

//! Plays a short scripted phrase into an improviser and prints what it plays
//! back. A real deployment would feed notes from a pitch tracker and send the
//! emitted ones to a synthesizer.

use clap::Parser;
use improvisor::prelude::*;
use improvisor_services::{prelude::*, DEFAULT_TICK_INTERVAL};
use std::{
    path::PathBuf,
    time::{Duration, Instant},
};

/// The program's command-line arguments.
#[derive(clap::Parser, Debug, Default)]
#[clap(author, about, long_about = None)]
struct Args {
    /// A JSON settings file. Defaults apply to anything it leaves out.
    #[clap(short, long, value_parser)]
    settings: Option<PathBuf>,

    /// How long to run, in seconds
    #[clap(short, long, value_parser, default_value_t = 20)]
    duration: u64,

    /// Fix the random seed for a reproducible run
    #[clap(long, value_parser)]
    seed: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut settings = match args.settings {
        Some(path) => ImproviserSettings::load(&path)?,
        None => ImproviserSettings::default(),
    };
    if args.seed.is_some() {
        settings.rng_seed = args.seed;
    }

    // Keep the service in scope. If it's dropped, its channels go with it.
    let service = ImproviserService::new_with(settings, DEFAULT_TICK_INTERVAL)?;
    let sender = service.sender().clone();
    let receiver = service.receiver().clone();

    // A call the improviser can answer, played twice.
    let phrase = [(57, 500), (60, 500), (62, 1000), (60, 500), (57, 1500)];
    std::thread::spawn(move || {
        for (pitch, duration_ms) in phrase.iter().chain(phrase.iter()) {
            let _ = sender.send(ImproviserServiceInput::Note {
                pitch: *pitch,
                duration_ms: *duration_ms,
                amplitude: 0.8,
                timbre: vec![300.0, 870.0, 2250.0, 2800.0, 3300.0],
            });
            std::thread::sleep(Duration::from_millis(*duration_ms as u64));
        }
        let _ = sender.send(ImproviserServiceInput::Mutate(Axis::Pitch));
        let _ = sender.send(ImproviserServiceInput::Mutate(Axis::Duration));
    });

    let deadline = Instant::now() + Duration::from_secs(args.duration);
    while let Ok(event) = receiver.recv_deadline(deadline) {
        match event {
            ImproviserServiceEvent::Emitted(note) => println!("play {note}"),
            ImproviserServiceEvent::MotifAdded(axis, motif, origin) => {
                println!("{origin} {axis} motif {motif}")
            }
            ImproviserServiceEvent::Starved => println!("(starved)"),
            ImproviserServiceEvent::Failed(e) => eprintln!("error: {e}"),
            ImproviserServiceEvent::Quit => break,
        }
    }

    service.send_input(ImproviserServiceInput::Quit);
    println!("exiting...");

    Ok(())
}
