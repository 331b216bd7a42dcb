// Copyright 2026 the Vismid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hand-off from the event thread to the render thread.
//!
//! The router never touches a responder. It turns every delivery into an
//! [`Intent`] and pushes it into a bounded channel; the scene drains the
//! channel on the render thread right before drawing. All animation state is
//! therefore mutated by a single thread, in dispatch order.
//!
//! Pushing never blocks the event thread. If the render thread falls so far
//! behind that the queue is full, the intent is dropped and a warning is
//! logged.

use crossbeam_channel::{Receiver, Sender, TrySendError};

use crate::event::{NoteEvent, Signal};
use crate::responder::ResponderId;

/// Default bound of the intent queue.
pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;

/// A pending delivery of one signal to one responder.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Intent {
    /// Responder that should receive the signal.
    pub target: ResponderId,
    /// Which `receive_*` method to call.
    pub signal: Signal,
    /// The originating event.
    pub event: NoteEvent,
}

/// Result of pushing an intent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[must_use]
pub enum Enqueue {
    /// The intent is queued.
    Queued,
    /// The queue was full; the intent was dropped.
    Full,
    /// The receiving side is gone; the intent was dropped.
    Closed,
}

/// Producer half of the intent queue. Cheap to clone.
#[derive(Clone, Debug)]
pub struct IntentSender {
    tx: Sender<Intent>,
}

impl IntentSender {
    /// Pushes `intent` without blocking.
    pub fn push(&self, intent: Intent) -> Enqueue {
        match self.tx.try_send(intent) {
            Ok(()) => Enqueue::Queued,
            Err(TrySendError::Full(dropped)) => {
                tracing::warn!(
                    responder = ?dropped.target,
                    signal = ?dropped.signal,
                    channel = dropped.event.channel,
                    "intent queue full, dropping intent"
                );
                Enqueue::Full
            }
            Err(TrySendError::Disconnected(_)) => {
                tracing::debug!("intent queue closed");
                Enqueue::Closed
            }
        }
    }
}

/// Consumer half of the intent queue, owned by the render thread.
#[derive(Debug)]
pub struct IntentReceiver {
    rx: Receiver<Intent>,
}

impl IntentReceiver {
    /// Takes every intent queued so far, oldest first, without blocking.
    ///
    /// Intents pushed while the iterator is being consumed may or may not be
    /// included; they are never lost.
    pub fn drain(&self) -> impl Iterator<Item = Intent> + '_ {
        self.rx.try_iter()
    }

    /// Number of intents waiting.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.rx.len()
    }
}

/// Creates a queue holding at most `capacity` intents.
///
/// A `capacity` of zero is raised to one; a rendezvous channel would drop
/// every push made while the render thread is not waiting.
#[must_use]
pub fn intent_queue(capacity: usize) -> (IntentSender, IntentReceiver) {
    let (tx, rx) = crossbeam_channel::bounded(capacity.max(1));
    (IntentSender { tx }, IntentReceiver { rx })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn intent(target: usize, signal: Signal) -> Intent {
        Intent {
            target: ResponderId(target),
            signal,
            event: NoteEvent::note_on(0, 64),
        }
    }

    #[test]
    fn drain_preserves_order() {
        let (tx, rx) = intent_queue(8);
        for i in 0..5 {
            assert_eq!(tx.push(intent(i, Signal::On)), Enqueue::Queued, "push {i}");
        }
        assert_eq!(rx.pending(), 5, "pending");
        let ids: Vec<usize> = rx.drain().map(|i| i.target.index()).collect();
        assert_eq!(ids, vec![0, 1, 2, 3, 4], "fifo order");
        assert_eq!(rx.drain().count(), 0, "drained queue is empty");
    }

    #[test]
    fn full_queue_drops() {
        let (tx, rx) = intent_queue(2);
        assert_eq!(tx.push(intent(0, Signal::On)), Enqueue::Queued, "first");
        assert_eq!(tx.push(intent(1, Signal::Off)), Enqueue::Queued, "second");
        assert_eq!(tx.push(intent(2, Signal::On)), Enqueue::Full, "third dropped");
        let ids: Vec<usize> = rx.drain().map(|i| i.target.index()).collect();
        assert_eq!(ids, vec![0, 1], "oldest intents survive");
    }

    #[test]
    fn closed_queue_reports() {
        let (tx, rx) = intent_queue(2);
        drop(rx);
        assert_eq!(tx.push(intent(0, Signal::On)), Enqueue::Closed, "receiver dropped");
    }

    #[test]
    fn zero_capacity_still_buffers() {
        let (tx, rx) = intent_queue(0);
        assert_eq!(tx.push(intent(0, Signal::On)), Enqueue::Queued, "buffered");
        assert_eq!(rx.drain().count(), 1, "one intent");
    }
}
