// Copyright 2026 the Vismid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A ring of pulsers that rotates with the note-off history.

use core::f64::consts::TAU;

use kurbo::{Affine, Point};

use super::{DEFAULT_ACTIVATION_TICKS, Pulser, Responder};
use crate::color::Color;
use crate::event::NoteEvent;
use crate::paint::{DrawContext, Paint};

/// Rotation applied per frame before any note-off arrives (radians).
const INITIAL_STEP: f64 = 0.0025;

/// Peak rotation per frame once note-offs arrive (radians).
const PEAK_STEP: f64 = 0.05;

/// Degrees the rotation phase advances per note-off.
const PHASE_DEGREES_PER_OFF: u32 = 3;

/// Off-count period of the rotation step: `3° · 120 = 360°`.
pub(crate) const ROTATION_PERIOD: u32 = 360 / PHASE_DEGREES_PER_OFF;

/// Distance (in ring positions) between the two ends of a link segment.
const LINK_STRIDE: usize = 2;

/// End point of every link gradient, relative to the canvas origin.
const GRADIENT_END: Point = Point::new(0.0, 100.0);

/// Construction parameters for a [`PulserGroup`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GroupParams {
    /// Number of pulsers in the ring.
    pub units: usize,
    /// Diameter of each pulser.
    pub unit_size: f64,
    /// Distance from the origin to each pulser center.
    pub diameter: f64,
    /// Color shared by every pulser.
    pub color: Color,
    /// Angle of the first pulser (radians).
    pub offset: f64,
    /// Rotate clockwise instead of counterclockwise.
    pub reverse: bool,
    /// Activation duration handed to every pulser.
    pub activation_ticks: u32,
}

impl Default for GroupParams {
    fn default() -> Self {
        Self {
            units: 9,
            unit_size: 10.0,
            diameter: 100.0,
            color: Color::WHITE,
            offset: 0.0,
            reverse: false,
            activation_ticks: DEFAULT_ACTIVATION_TICKS,
        }
    }
}

/// A fixed ring of [`Pulser`]s sharing color and size.
///
/// Every signal is broadcast to the whole ring. Each frame the group draws a
/// gradient link from every pulser to the one two places ahead, then draws
/// the pulsers, then rotates them about the origin by the current step.
///
/// The step starts at `±0.0025` rad (sign from `reverse`). Every note-off
/// bumps an off counter `f` and resets the step to
/// `0.05 · cos(3f°)`, so the ring speeds up, slows down and reverses as
/// notes end. The step depends only on `f mod 120`.
#[derive(Clone, Debug)]
pub struct PulserGroup {
    units: Vec<Pulser>,
    direction: i32,
    offs: u32,
    step: f64,
}

impl PulserGroup {
    /// Builds a ring from `params`.
    ///
    /// Pulser `i` sits at angle `offset + i · 2π / units` on a circle of
    /// radius `diameter` around the origin.
    #[must_use]
    pub fn new(params: GroupParams) -> Self {
        let n = params.units;
        let units = (0..n)
            .map(|i| {
                let angle = params.offset + i as f64 * TAU / n as f64;
                let (s, c) = angle.sin_cos();
                Pulser::with_activation_ticks(
                    Point::new(params.diameter * c, params.diameter * s),
                    params.unit_size,
                    params.color,
                    params.activation_ticks,
                )
            })
            .collect();
        let direction = if params.reverse { -1 } else { 1 };
        Self {
            units,
            direction,
            offs: 0,
            step: f64::from(direction) * INITIAL_STEP,
        }
    }

    /// Returns the pulsers in ring order.
    #[must_use]
    pub fn units(&self) -> &[Pulser] {
        &self.units
    }

    /// Returns `-1` for a reversed ring, `+1` otherwise.
    #[inline]
    #[must_use]
    pub const fn direction(&self) -> i32 {
        self.direction
    }

    /// Returns the rotation applied at the end of the next render (radians).
    #[inline]
    #[must_use]
    pub const fn rotation_step(&self) -> f64 {
        self.step
    }

    /// Rotation step for off-count phase `f`.
    fn step_for(direction: i32, f: u32) -> f64 {
        let degrees = f64::from(direction) * f64::from(PHASE_DEGREES_PER_OFF * f) % 360.0;
        PEAK_STEP * degrees.to_radians().cos()
    }
}

impl Responder for PulserGroup {
    fn receive_on(&mut self, event: &NoteEvent) {
        for unit in &mut self.units {
            unit.receive_on(event);
        }
    }

    fn receive_off(&mut self, event: &NoteEvent) {
        self.offs = (self.offs + 1) % ROTATION_PERIOD;
        self.step = Self::step_for(self.direction, self.offs);
        for unit in &mut self.units {
            unit.receive_off(event);
        }
    }

    fn render(&mut self, ctx: &mut dyn DrawContext) {
        let n = self.units.len();
        if n == 0 {
            return;
        }
        for i in 0..n {
            let a = &self.units[i];
            let b = &self.units[(i + LINK_STRIDE) % n];
            let paint = Paint::LinearGradient {
                start: Point::ORIGIN,
                end: GRADIENT_END,
                from: a.color(),
                to: Color::WHITE,
            };
            ctx.stroke_line(a.position(), b.position(), &paint);
        }
        for unit in &mut self.units {
            unit.render(ctx);
        }
        self.apply_transform(Affine::rotate(self.step));
    }

    fn apply_transform(&mut self, t: Affine) {
        for unit in &mut self.units {
            unit.apply_transform(t);
        }
    }
}
