// Copyright (c) 2024 Mike Tsao

//! [ImproviserService] runs an [Improviser] on its own threads and talks to
//! the outside world through crossbeam channels.

use crate::{CrossbeamChannel, ProvidesService};
use crossbeam::channel::{Receiver, Select, Sender};
use improvisor::prelude::*;
use std::{sync::Arc, time::Duration};

/// How often the clock thread checks the gate unless told otherwise.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(5);

/// Commands for [ImproviserService]. Each one maps to a single engine
/// operation.
#[derive(Clone, Debug)]
pub enum ImproviserServiceInput {
    /// The performer played a note.
    Note {
        #[allow(missing_docs)]
        pitch: i32,
        #[allow(missing_docs)]
        duration_ms: u32,
        #[allow(missing_docs)]
        amplitude: f64,
        #[allow(missing_docs)]
        timbre: Vec<f64>,
    },
    /// Look for a new motif in recent history.
    Detect(Axis),
    /// Queue the next motif on any lane that's running low.
    Refill,
    /// Emit the next note if it's time. The clock thread already does this;
    /// sending it by hand is harmless.
    Tick,
    /// Invent a motif.
    Generate(Axis),
    /// Derive a motif from a recent one.
    Mutate(Axis),
    /// The app is ready to quit, so the service should end.
    Quit,
}

/// What [ImproviserService] reports back.
#[derive(Clone, Debug)]
pub enum ImproviserServiceEvent {
    /// A note is ready for the synthesizer.
    Emitted(Note),
    /// A pool learned a new motif. A command whose motif the pool already
    /// had produces no event.
    MotifAdded(Axis, Motif, MotifOrigin),
    /// The gate opened with nothing to play. Sent once per stall, not on
    /// every tick of it.
    Starved,
    /// A command couldn't be carried out.
    Failed(ImprovError),
    /// The service has processed [ImproviserServiceInput::Quit] and its
    /// threads are ending.
    Quit,
}

/// Sends every emitted note out as an [ImproviserServiceEvent::Emitted].
struct EventEgress(Sender<ImproviserServiceEvent>);
impl EmitsNotes for EventEgress {
    fn emit(&mut self, note: Note) {
        let _ = self.0.send(ImproviserServiceEvent::Emitted(note));
    }
}

/// Wraps an [Improviser] with a channel-based interface.
///
/// Construction seeds the pools and arms the engine, so notes start coming out
/// right away. One thread handles [ImproviserServiceInput]s; another wakes
/// every tick interval to refill the lanes and check the gate.
#[derive(Debug)]
pub struct ImproviserService {
    inputs: CrossbeamChannel<ImproviserServiceInput>,
    events: CrossbeamChannel<ImproviserServiceEvent>,

    engine: Arc<Improviser>,
}
impl ProvidesService<ImproviserServiceInput, ImproviserServiceEvent> for ImproviserService {
    fn sender(&self) -> &Sender<ImproviserServiceInput> {
        &self.inputs.sender
    }

    fn receiver(&self) -> &Receiver<ImproviserServiceEvent> {
        &self.events.receiver
    }
}
impl ImproviserService {
    /// Builds, seeds, and arms an engine from `settings`, then starts the
    /// service threads.
    pub fn new_with(settings: ImproviserSettings, tick_interval: Duration) -> anyhow::Result<Self> {
        let engine = Improviser::new_with(settings)?;
        let r = Self {
            inputs: Default::default(),
            events: Default::default(),
            engine: Arc::new(engine),
        };
        for motif in r.engine.seed()? {
            send_motif_added(&r.events.sender, motif, MotifOrigin::Generated);
        }
        r.engine.arm()?;
        r.spawn_threads(tick_interval);
        log::info!("improviser service started, ticking every {tick_interval:?}");
        Ok(r)
    }

    /// The engine this service drives, for inspection.
    pub fn engine(&self) -> &Arc<Improviser> {
        &self.engine
    }

    fn spawn_threads(&self, tick_interval: Duration) {
        let quit_clock = CrossbeamChannel::<()>::bounded(1);

        let daemon = ImproviserServiceDaemon {
            receiver: self.inputs.receiver.clone(),
            sender: self.events.sender.clone(),
            engine: Arc::clone(&self.engine),
            quit_clock: quit_clock.sender,
        };
        std::thread::spawn(move || daemon.execute());

        let clock = ImproviserClock {
            sender: self.events.sender.clone(),
            engine: Arc::clone(&self.engine),
            quit: quit_clock.receiver,
        };
        std::thread::spawn(move || clock.execute(tick_interval));
    }
}

struct ImproviserServiceDaemon {
    receiver: Receiver<ImproviserServiceInput>,
    sender: Sender<ImproviserServiceEvent>,
    engine: Arc<Improviser>,
    quit_clock: Sender<()>,
}
impl ImproviserServiceDaemon {
    fn execute(self) {
        while let Ok(input) = self.receiver.recv() {
            match input {
                ImproviserServiceInput::Note {
                    pitch,
                    duration_ms,
                    amplitude,
                    timbre,
                } => {
                    for motif in self
                        .engine
                        .on_note_received(pitch, duration_ms, amplitude, &timbre)
                    {
                        send_motif_added(&self.sender, motif, MotifOrigin::Detected);
                    }
                }
                ImproviserServiceInput::Detect(axis) => {
                    if let Some(motif) = self.engine.trigger_detect(axis) {
                        send_motif_added(&self.sender, motif, MotifOrigin::Detected);
                    }
                }
                ImproviserServiceInput::Refill => {
                    if let Err(e) = self.engine.trigger_refill() {
                        self.notify_failure(e);
                    }
                }
                ImproviserServiceInput::Tick => {
                    tick(&self.engine, &self.sender);
                }
                ImproviserServiceInput::Generate(axis) => {
                    self.handle_offer(self.engine.trigger_generate(axis), MotifOrigin::Generated)
                }
                ImproviserServiceInput::Mutate(axis) => {
                    self.handle_offer(self.engine.trigger_mutate(axis), MotifOrigin::Mutated)
                }
                ImproviserServiceInput::Quit => {
                    log::info!("ImproviserServiceInput::Quit");
                    let _ = self.quit_clock.send(());
                    let _ = self.sender.send(ImproviserServiceEvent::Quit);
                    break;
                }
            }
        }
    }

    fn handle_offer(&self, offer: Result<Offered, ImprovError>, origin: MotifOrigin) {
        match offer {
            Ok(Offered::Added(motif)) => send_motif_added(&self.sender, motif, origin),
            Ok(Offered::AlreadyKnown(motif)) => {
                log::debug!("{origin} {motif} was already known; nothing to report")
            }
            Err(e) => self.notify_failure(e),
        }
    }

    fn notify_failure(&self, e: ImprovError) {
        log::warn!("{e}");
        let _ = self.sender.send(ImproviserServiceEvent::Failed(e));
    }
}

struct ImproviserClock {
    sender: Sender<ImproviserServiceEvent>,
    engine: Arc<Improviser>,
    quit: Receiver<()>,
}
impl ImproviserClock {
    fn execute(self, tick_interval: Duration) {
        let ticker = crossbeam::channel::tick(tick_interval);
        let mut sel = Select::new();
        let tick_index = sel.recv(&ticker);
        let quit_index = sel.recv(&self.quit);
        loop {
            let oper = sel.select();
            match oper.index() {
                i if i == tick_index => {
                    if ImproviserService::recv_operation(oper, &ticker).is_err() {
                        break;
                    }
                    if let Err(e) = self.engine.trigger_refill() {
                        log::warn!("refill failed: {e}");
                    }
                    tick(&self.engine, &self.sender);
                }
                i if i == quit_index => {
                    let _ = ImproviserService::recv_operation(oper, &self.quit);
                    break;
                }
                _ => unreachable!(),
            }
        }
        log::debug!("clock stopped");
    }
}

fn send_motif_added(sender: &Sender<ImproviserServiceEvent>, motif: Motif, origin: MotifOrigin) {
    let _ = sender.send(ImproviserServiceEvent::MotifAdded(
        motif.axis(),
        motif,
        origin,
    ));
}

fn tick(engine: &Improviser, sender: &Sender<ImproviserServiceEvent>) {
    match engine.trigger_tick(&mut EventEgress(sender.clone())) {
        Ok(TickOutcome::Starved { newly: true }) => {
            let _ = sender.send(ImproviserServiceEvent::Starved);
        }
        Ok(_) => {}
        Err(e) => {
            let _ = sender.send(ImproviserServiceEvent::Failed(e));
        }
    }
}
