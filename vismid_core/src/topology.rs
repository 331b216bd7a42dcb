// Copyright 2026 the Vismid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Application context and the default ring wiring.
//!
//! A [`Visualizer`] collects responders and their channel subscriptions
//! during startup. Once wiring is complete, [`Visualizer::split`] hands the
//! [`Router`] to the event side and the [`Scene`] to the render side.

use core::f64::consts::TAU;

use crate::color::Color;
use crate::config::{TopologyConfig, VisualizerConfig};
use crate::intent::intent_queue;
use crate::responder::{GroupParams, PulserGroup, Responder, ResponderId};
use crate::router::Router;
use crate::scene::Scene;

/// Startup wiring of responders to channels.
#[derive(Debug)]
pub struct Visualizer {
    router: Router,
    scene: Scene,
}

impl Visualizer {
    /// Creates an empty visualizer whose intent queue holds `queue_capacity`
    /// intents.
    #[must_use]
    pub fn new(queue_capacity: usize) -> Self {
        let (tx, rx) = intent_queue(queue_capacity);
        Self {
            router: Router::new(tx),
            scene: Scene::new(rx),
        }
    }

    /// Builds the concentric-ring scene described by `config`.
    #[must_use]
    pub fn from_config(config: &VisualizerConfig) -> Self {
        let mut vis = Self::new(config.frame.queue_capacity);
        vis.add_rings(&config.topology);
        vis
    }

    /// Adds `responder` to the scene, drawn above everything added so far,
    /// and subscribes it to `channel`.
    pub fn register(&mut self, responder: Box<dyn Responder>, channel: u32) -> ResponderId {
        let id = self.scene.insert(responder);
        self.router.register(id, channel);
        id
    }

    /// Subscribes an already-added responder to another channel.
    pub fn subscribe(&mut self, id: ResponderId, channel: u32) {
        self.router.register(id, channel);
    }

    /// Adds one [`PulserGroup`] per ring.
    ///
    /// Rings are added outermost first so inner rings draw on top. Ring `i`
    /// listens on channel `i`, has radius `i · canvas_size / rings`, starts
    /// at angle `i · 2π / units_per_ring`, and rotates clockwise when `i` is
    /// even.
    pub fn add_rings(&mut self, topology: &TopologyConfig) {
        let rings = topology.rings;
        for i in (0..rings).rev() {
            let params = ring_params(topology, i);
            tracing::debug!(ring = i, diameter = params.diameter, "adding ring");
            self.register(Box::new(PulserGroup::new(params)), i);
        }
    }

    /// Borrows the router.
    #[must_use]
    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Borrows the scene.
    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Separates the event side from the render side.
    #[must_use]
    pub fn split(self) -> (Router, Scene) {
        (self.router, self.scene)
    }
}

/// Parameters for ring `i` of the default topology.
#[must_use]
pub fn ring_params(topology: &TopologyConfig, i: u32) -> GroupParams {
    let ring = f64::from(i);
    let units = topology.units_per_ring;
    GroupParams {
        units,
        unit_size: topology.unit_size,
        diameter: ring * topology.canvas_size / f64::from(topology.rings.max(1)),
        color: Color::ring_hue(i as usize),
        offset: if units == 0 {
            0.0
        } else {
            ring * TAU / units as f64
        },
        reverse: i % 2 == 0,
        activation_ticks: topology.activation_ticks,
    }
}
