// Copyright 2026 the Vismid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Channel-keyed fan-out of note events.
//!
//! The [`Router`] owns a subscription table mapping each channel to an
//! ordered list of [`ResponderId`]s. Dispatching an event classifies it once
//! and queues one [`Intent`] per subscriber, in registration order. The
//! router holds no animation state and never blocks, so it is safe to call
//! from a playback engine's timing thread.
//!
//! ```
//! use vismid_core::event::{NoteEvent, Signal};
//! use vismid_core::intent::intent_queue;
//! use vismid_core::router::{DispatchOutcome, Router};
//! # use vismid_core::responder::Pulser;
//! # use vismid_core::scene::Scene;
//!
//! let (tx, rx) = intent_queue(16);
//! let mut scene = Scene::new(rx);
//! let id = scene.insert(Box::new(Pulser::new(vismid_core::kurbo::Point::ORIGIN, 10.0,
//!     vismid_core::color::Color::WHITE)));
//! let mut router = Router::new(tx);
//! router.register(id, 2);
//!
//! assert_eq!(
//!     router.dispatch(&NoteEvent::note_on(2, 90)),
//!     DispatchOutcome::Delivered { signal: Signal::On, queued: 1, dropped: 0 },
//! );
//! assert_eq!(router.dispatch(&NoteEvent::note_on(3, 90)), DispatchOutcome::Unroutable);
//! ```

use std::collections::BTreeMap;

use crate::event::{NoteEvent, Signal};
use crate::intent::{Enqueue, Intent, IntentSender};
use crate::responder::ResponderId;

/// What happened to a dispatched event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// No responder was ever registered on the event's channel.
    Unroutable,
    /// The event is neither a note-on nor a note-off.
    Ignored,
    /// The event was fanned out to the channel's subscribers.
    ///
    /// `queued + dropped` is the number of subscriptions on the channel.
    Delivered {
        /// The classification.
        signal: Signal,
        /// Intents accepted by the queue.
        queued: usize,
        /// Intents lost to a full or closed queue.
        dropped: usize,
    },
}

/// Routes classified note events to subscribed responders.
#[derive(Clone, Debug)]
pub struct Router {
    table: BTreeMap<u32, Vec<ResponderId>>,
    queue: IntentSender,
}

impl Router {
    /// Creates a router with an empty table that queues into `queue`.
    #[must_use]
    pub fn new(queue: IntentSender) -> Self {
        Self {
            table: BTreeMap::new(),
            queue,
        }
    }

    /// Subscribes `id` to `channel`.
    ///
    /// Appends to the channel's list. Registering the same responder twice
    /// makes it receive every event twice.
    pub fn register(&mut self, id: ResponderId, channel: u32) {
        self.table.entry(channel).or_default().push(id);
    }

    /// Channels that have at least one subscription, ascending.
    pub fn channels(&self) -> impl Iterator<Item = u32> + '_ {
        self.table.keys().copied()
    }

    /// Subscribers of `channel` in dispatch order.
    #[must_use]
    pub fn subscribers(&self, channel: u32) -> &[ResponderId] {
        self.table.get(&channel).map_or(&[], Vec::as_slice)
    }

    /// Classifies `event` and queues it for every subscriber of its channel.
    pub fn dispatch(&self, event: &NoteEvent) -> DispatchOutcome {
        let Some(subscribers) = self.table.get(&event.channel) else {
            tracing::trace!(channel = event.channel, "no subscribers, dropping event");
            return DispatchOutcome::Unroutable;
        };
        let Some(signal) = event.signal() else {
            tracing::trace!(?event.command, channel = event.channel, "ignoring event");
            return DispatchOutcome::Ignored;
        };
        tracing::trace!(
            ?signal,
            channel = event.channel,
            velocity = event.velocity,
            subscribers = subscribers.len(),
            "dispatch"
        );
        let mut queued = 0;
        for &target in subscribers {
            let pushed = self.queue.push(Intent {
                target,
                signal,
                event: *event,
            });
            if pushed == Enqueue::Queued {
                queued += 1;
            }
        }
        DispatchOutcome::Delivered {
            signal,
            queued,
            dropped: subscribers.len() - queued,
        }
    }

    /// Receiver boundary for raw channel messages.
    ///
    /// Decodes `bytes` with [`NoteEvent::from_bytes`] and dispatches the
    /// result. The timestamp is accepted for interface compatibility with
    /// playback engines and ignored. Malformed messages are logged and
    /// treated as unroutable.
    pub fn receive(&self, bytes: &[u8], timestamp: i64) -> DispatchOutcome {
        match NoteEvent::from_bytes(bytes) {
            Ok(event) => self.dispatch(&event),
            Err(err) => {
                tracing::trace!(%err, timestamp, "rejecting raw message");
                DispatchOutcome::Unroutable
            }
        }
    }
}
