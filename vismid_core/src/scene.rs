// Copyright 2026 the Vismid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The render-thread-owned set of responders.
//!
//! A [`Scene`] owns every responder and the receiving end of the intent
//! queue. Once per frame, [`Scene::frame`] applies the intents queued so far
//! in dispatch order and then renders each attached responder in attachment
//! order, so later responders draw on top of earlier ones.
//!
//! Responders may be detached from drawing and re-attached later. A detached
//! responder keeps receiving signals; it is simply not rendered, which also
//! means its animation does not advance.

use core::fmt;

use crate::intent::IntentReceiver;
use crate::paint::DrawContext;
use crate::responder::{Responder, ResponderId};

/// Counts from one [`Scene::frame`] call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Intents applied before drawing.
    pub applied: usize,
    /// Intents whose target was unknown to this scene.
    pub stale: usize,
    /// Responders rendered.
    pub rendered: usize,
}

/// Owner of all responders; lives on the render thread.
pub struct Scene {
    responders: Vec<Box<dyn Responder>>,
    draw_order: Vec<ResponderId>,
    intents: IntentReceiver,
}

impl fmt::Debug for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scene")
            .field("responders", &self.responders.len())
            .field("draw_order", &self.draw_order)
            .field("pending", &self.intents.pending())
            .finish_non_exhaustive()
    }
}

impl Scene {
    /// Creates an empty scene draining `intents`.
    #[must_use]
    pub fn new(intents: IntentReceiver) -> Self {
        Self {
            responders: Vec::new(),
            draw_order: Vec::new(),
            intents,
        }
    }

    /// Takes ownership of `responder`, attaches it for drawing, and returns
    /// its handle.
    pub fn insert(&mut self, responder: Box<dyn Responder>) -> ResponderId {
        let id = self.insert_detached(responder);
        self.draw_order.push(id);
        id
    }

    /// Takes ownership of `responder` without attaching it for drawing.
    pub fn insert_detached(&mut self, responder: Box<dyn Responder>) -> ResponderId {
        let id = ResponderId(self.responders.len());
        self.responders.push(responder);
        id
    }

    /// Stops drawing `id`. Returns `false` if it was not attached.
    pub fn detach(&mut self, id: ResponderId) -> bool {
        let before = self.draw_order.len();
        self.draw_order.retain(|&d| d != id);
        self.draw_order.len() != before
    }

    /// Starts drawing `id` on top of everything attached so far. Returns
    /// `false` if `id` is unknown or already attached.
    pub fn attach(&mut self, id: ResponderId) -> bool {
        if self.get(id).is_none() || self.is_attached(id) {
            return false;
        }
        self.draw_order.push(id);
        true
    }

    /// Is `id` currently drawn?
    #[must_use]
    pub fn is_attached(&self, id: ResponderId) -> bool {
        self.draw_order.contains(&id)
    }

    /// Attached responders, bottom to top.
    #[must_use]
    pub fn draw_order(&self) -> &[ResponderId] {
        &self.draw_order
    }

    /// Number of owned responders, attached or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.responders.len()
    }

    /// Does the scene own no responders?
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.responders.is_empty()
    }

    /// Borrows a responder.
    #[must_use]
    pub fn get(&self, id: ResponderId) -> Option<&dyn Responder> {
        self.responders.get(id.0).map(|r| &**r)
    }

    /// Applies the intents queued before this call, in dispatch order.
    ///
    /// Intents pushed while draining wait for the next call, so a producer
    /// that never pauses cannot stretch a frame. Returns `(applied, stale)`.
    pub fn apply_intents(&mut self) -> (usize, usize) {
        let mut applied = 0;
        let mut stale = 0;
        let budget = self.intents.pending();
        for intent in self.intents.drain().take(budget) {
            match self.responders.get_mut(intent.target.0) {
                Some(r) => {
                    r.deliver(intent.signal, &intent.event);
                    applied += 1;
                }
                None => {
                    tracing::warn!(responder = ?intent.target, "intent for unknown responder");
                    stale += 1;
                }
            }
        }
        (applied, stale)
    }

    /// Renders every attached responder, bottom to top. Returns how many
    /// were drawn.
    pub fn render(&mut self, ctx: &mut dyn DrawContext) -> usize {
        let mut rendered = 0;
        for &id in &self.draw_order {
            if let Some(r) = self.responders.get_mut(id.0) {
                r.render(ctx);
                rendered += 1;
            }
        }
        rendered
    }

    /// Runs one frame: drain intents, then draw.
    pub fn frame(&mut self, ctx: &mut dyn DrawContext) -> FrameStats {
        let (applied, stale) = self.apply_intents();
        let rendered = self.render(ctx);
        if applied > 0 || stale > 0 {
            tracing::debug!(applied, stale, rendered, "frame");
        }
        FrameStats {
            applied,
            stale,
            rendered,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use kurbo::Point;

    use super::*;
    use crate::color::Color;
    use crate::event::{NoteEvent, Signal};
    use crate::intent::{Intent, IntentSender, intent_queue};
    use crate::paint::Paint;
    use crate::responder::{GroupParams, Pulser, PulserGroup};
    use crate::router::Router;
    use crate::shape::Shape;

    /// Logs responder tags in draw order.
    #[derive(Default)]
    struct Tags(Vec<usize>);

    impl DrawContext for Tags {
        fn fill_shape(&mut self, shape: &Shape, _color: Color) {
            // Tag responders by their shape width.
            self.0.push(shape.bounds().width().round() as usize);
        }

        fn stroke_line(&mut self, _from: Point, _to: Point, _paint: &Paint) {}
    }

    /// Records fills and strokes.
    #[derive(Default)]
    struct Frame {
        fills: Vec<(Point, f64)>,
        lines: usize,
    }

    impl DrawContext for Frame {
        fn fill_shape(&mut self, shape: &Shape, _color: Color) {
            self.fills.push((shape.center(), shape.bounds().width()));
        }

        fn stroke_line(&mut self, _from: Point, _to: Point, _paint: &Paint) {
            self.lines += 1;
        }
    }

    #[derive(Clone, Default)]
    struct Counts {
        on: Arc<AtomicUsize>,
        off: Arc<AtomicUsize>,
    }

    impl Responder for Counts {
        fn receive_on(&mut self, _event: &NoteEvent) {
            self.on.fetch_add(1, Ordering::Relaxed);
        }

        fn receive_off(&mut self, _event: &NoteEvent) {
            self.off.fetch_add(1, Ordering::Relaxed);
        }

        fn render(&mut self, _ctx: &mut dyn DrawContext) {}

        fn apply_transform(&mut self, _t: kurbo::Affine) {}
    }

    /// Re-queues a note-on for itself every time it receives one.
    struct Echo {
        id: ResponderId,
        queue: IntentSender,
        heard: Arc<AtomicUsize>,
    }

    impl Responder for Echo {
        fn receive_on(&mut self, event: &NoteEvent) {
            self.heard.fetch_add(1, Ordering::Relaxed);
            let _ = self.queue.push(Intent {
                target: self.id,
                signal: Signal::On,
                event: *event,
            });
        }

        fn receive_off(&mut self, _event: &NoteEvent) {}

        fn render(&mut self, _ctx: &mut dyn DrawContext) {}

        fn apply_transform(&mut self, _t: kurbo::Affine) {}
    }

    fn pulser(size: f64) -> Box<dyn Responder> {
        Box::new(Pulser::new(Point::ORIGIN, size, Color::WHITE))
    }

    #[test]
    fn renders_in_attachment_order() {
        let (_tx, rx) = intent_queue(4);
        let mut scene = Scene::new(rx);
        let a = scene.insert(pulser(1.0));
        let b = scene.insert(pulser(2.0));
        let c = scene.insert(pulser(3.0));
        assert_eq!((a.index(), b.index(), c.index()), (0, 1, 2), "ids follow insertion");
        let mut tags = Tags::default();
        assert_eq!(scene.frame(&mut tags).rendered, 3, "three drawn");
        assert_eq!(tags.0, vec![1, 2, 3], "bottom to top");

        assert!(scene.detach(b), "b was attached");
        assert!(!scene.detach(b), "b already detached");
        assert!(scene.attach(b), "re-attach");
        assert!(!scene.attach(b), "already attached");
        assert_eq!(scene.draw_order(), &[a, c, b], "re-attached on top");

        let d = scene.insert_detached(pulser(4.0));
        assert_eq!(d.index(), 3, "detached inserts share the id space");
        assert_eq!(scene.len(), 4, "len counts every responder");
    }

    #[test]
    fn detached_responders_still_receive() {
        let (tx, rx) = intent_queue(16);
        let mut scene = Scene::new(rx);
        let counts = Counts::default();
        let id = scene.insert_detached(Box::new(counts.clone()));
        assert!(!scene.is_attached(id), "not drawn");
        let mut router = Router::new(tx);
        router.register(id, 0);
        router.dispatch(&NoteEvent::note_on(0, 10));
        let stats = scene.frame(&mut Tags::default());
        assert_eq!(stats.applied, 1, "applied");
        assert_eq!(stats.rendered, 0, "nothing attached");
        assert_eq!(counts.on.load(Ordering::Relaxed), 1, "received");
    }

    #[test]
    fn stale_ids_are_skipped() {
        let (tx, rx) = intent_queue(16);
        let mut scene = Scene::new(rx);
        let mut router = Router::new(tx);
        router.register(ResponderId(42), 0);
        router.dispatch(&NoteEvent::note_on(0, 10));
        let stats = scene.frame(&mut Tags::default());
        assert_eq!((stats.applied, stats.stale), (0, 1), "stale intent");
        assert!(!scene.attach(ResponderId(42)), "unknown id");
    }

    #[test]
    fn drain_stops_at_frame_start_backlog() {
        let (tx, rx) = intent_queue(16);
        let mut scene = Scene::new(rx);
        let heard = Arc::new(AtomicUsize::new(0));
        let id = scene.insert(Box::new(Echo {
            id: ResponderId(0),
            queue: tx.clone(),
            heard: Arc::clone(&heard),
        }));
        let mut router = Router::new(tx);
        router.register(id, 0);
        router.dispatch(&NoteEvent::note_on(0, 90));
        router.dispatch(&NoteEvent::note_on(0, 90));

        assert_eq!(scene.frame(&mut Tags::default()).applied, 2, "backlog only");
        assert_eq!(heard.load(Ordering::Relaxed), 2, "echoes deferred");
        assert_eq!(scene.intents.pending(), 2, "echoes wait for the next frame");
        assert_eq!(scene.frame(&mut Tags::default()).applied, 2, "next frame");
        assert_eq!(heard.load(Ordering::Relaxed), 4, "echoes applied");
    }

    #[test]
    fn intents_apply_before_drawing() {
        let (tx, rx) = intent_queue(16);
        let mut scene = Scene::new(rx);
        let id = scene.insert(pulser(10.0));
        let mut router = Router::new(tx);
        router.register(id, 0);
        router.dispatch(&NoteEvent::note_on(0, 90));
        let mut frame = Frame::default();
        scene.frame(&mut frame);
        // First frame after the note-on: 9 ticks remain, scale 10.
        assert!((frame.fills[0].1 - 100.0).abs() < 1e-6, "width {}", frame.fills[0].1);
    }

    /// Three units on channel 2: one note-on, then ten frames.
    #[test]
    fn three_unit_ring_on_channel_two() {
        let (tx, rx) = intent_queue(16);
        let mut scene = Scene::new(rx);
        let id = scene.insert(Box::new(PulserGroup::new(GroupParams {
            units: 3,
            unit_size: 10.0,
            diameter: 100.0,
            color: Color::rgb(0, 128, 255),
            offset: 0.0,
            reverse: false,
            activation_ticks: 10,
        })));
        let mut router = Router::new(tx);
        router.register(id, 2);
        router.dispatch(&NoteEvent::note_on(2, 100));

        let mut widths = Vec::new();
        for tick in 1..=10 {
            let mut frame = Frame::default();
            scene.frame(&mut frame);
            assert_eq!(frame.lines, 3, "tick {tick}: three links");
            assert_eq!(frame.fills.len(), 3, "tick {tick}: three units");
            let w = frame.fills[0].1;
            for (c, fw) in &frame.fills {
                assert!((fw - w).abs() < 1e-6, "units pulse together");
                assert!(
                    (c.distance(Point::ORIGIN) - 100.0).abs() < 1e-6,
                    "tick {tick}: unit off its circle"
                );
            }
            widths.push((w / 10.0).round());
        }
        assert_eq!(
            widths,
            vec![10.0, 9.0, 8.0, 7.0, 6.0, 5.0, 4.0, 3.0, 2.0, 1.0],
            "scale is 1 + remaining, base size on the expiring tick"
        );
        assert!(scene.get(id).is_some(), "group still owned");
    }

    #[test]
    fn dispatch_while_rendering() {
        const EVENTS: usize = 2_000;

        let (tx, rx) = intent_queue(EVENTS * 2);
        let mut scene = Scene::new(rx);
        let counts = Counts::default();
        let counter = scene.insert(Box::new(counts.clone()));
        let ring = scene.insert(Box::new(PulserGroup::new(GroupParams::default())));
        let mut router = Router::new(tx);
        router.register(counter, 0);
        router.register(ring, 0);

        let producer = std::thread::spawn(move || {
            for i in 0..EVENTS {
                let velocity = if i % 2 == 0 { 100 } else { 0 };
                router.dispatch(&NoteEvent::note_on(0, velocity));
            }
        });

        let mut applied = 0;
        while !producer.is_finished() {
            applied += scene.frame(&mut Frame::default()).applied;
        }
        producer.join().expect("producer panicked");
        applied += scene.frame(&mut Frame::default()).applied;

        assert_eq!(applied, EVENTS * 2, "every intent applied exactly once");
        assert_eq!(counts.on.load(Ordering::Relaxed), EVENTS / 2, "ons");
        assert_eq!(counts.off.load(Ordering::Relaxed), EVENTS / 2, "offs");
    }
}
