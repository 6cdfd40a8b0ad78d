// Copyright (c) 2024 Mike Tsao

//! Traits used by services.

use crossbeam::channel::{Receiver, RecvError, SelectedOperation, Sender};

/// A daemon that takes Inputs on one crossbeam channel and reports Events on
/// another.
///
/// Clients usually clone [ProvidesService::sender()] and
/// [ProvidesService::receiver()] once and then let the service itself sit in
/// scope; dropping it closes the channels.
pub trait ProvidesService<I: core::fmt::Debug, E: core::fmt::Debug> {
    /// Where Inputs go.
    fn sender(&self) -> &Sender<I>;

    /// Where Events come from.
    fn receiver(&self) -> &Receiver<E>;

    /// Sends an Input without blocking. A full or disconnected channel is
    /// logged and the Input is dropped.
    fn send_input(&self, input: I) {
        if let Err(e) = self.sender().try_send(input) {
            log::warn!("While sending: {e:?}");
        }
    }

    /// Completes a receive that a crossbeam [Select](crossbeam::channel::Select)
    /// picked. A disconnected channel is logged before the error is returned.
    fn recv_operation<T>(oper: SelectedOperation, receiver: &Receiver<T>) -> Result<T, RecvError> {
        let result = oper.recv(receiver);
        if let Err(e) = &result {
            log::warn!("While receiving from {receiver:?}: {e}");
        }
        result
    }
}
