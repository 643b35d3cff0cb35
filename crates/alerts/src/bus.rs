//! Alert publishing/subscription abstraction (mechanics only).
//!
//! The ledger publishes crossing events here after a durable commit; the
//! notification system (persistence, per-user read state, chat relays) lives
//! entirely on the consumer side of this seam.
//!
//! Delivery is at-least-once: a publish failure after a commit never rolls
//! the transaction back, and a retried publish may duplicate. Consumers must
//! be idempotent.

use std::sync::Arc;
use std::sync::mpsc::Receiver;
use std::time::Duration;

/// A subscription to an alert stream.
///
/// Broadcast semantics: each subscription receives a copy of every event
/// published after it was created. Intended for single-threaded consumption.
#[derive(Debug)]
pub struct Subscription<M> {
    receiver: Receiver<M>,
}

impl<M> Subscription<M> {
    pub fn new(receiver: Receiver<M>) -> Self {
        Self { receiver }
    }

    /// Block until the next event is available.
    pub fn recv(&self) -> Result<M, std::sync::mpsc::RecvError> {
        self.receiver.recv()
    }

    /// Try to receive an event without blocking.
    pub fn try_recv(&self) -> Result<M, std::sync::mpsc::TryRecvError> {
        self.receiver.try_recv()
    }

    /// Block for up to `timeout` waiting for an event.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<M, std::sync::mpsc::RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }
}

/// Transport-agnostic alert bus (pub/sub).
///
/// Implementations must be shareable across threads; publication may fail and
/// the failure is surfaced, but by then the triggering transaction is already
/// committed — callers log and move on.
pub trait AlertBus<M>: Send + Sync {
    type Error: core::fmt::Debug + Send + Sync + 'static;

    fn publish(&self, message: M) -> Result<(), Self::Error>;

    fn subscribe(&self) -> Subscription<M>;
}

impl<M, B> AlertBus<M> for Arc<B>
where
    B: AlertBus<M> + ?Sized,
{
    type Error = B::Error;

    fn publish(&self, message: M) -> Result<(), Self::Error> {
        (**self).publish(message)
    }

    fn subscribe(&self) -> Subscription<M> {
        (**self).subscribe()
    }
}
