// Copyright 2026 the Vismid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The single-shape responder.

use kurbo::{Affine, Point};

use super::Responder;
use crate::color::Color;
use crate::event::NoteEvent;
use crate::paint::DrawContext;
use crate::shape::Shape;

/// Number of render ticks a pulser stays active after a note-on.
pub const DEFAULT_ACTIVATION_TICKS: u32 = 10;

/// A circle that swells on every note-on and shrinks back over a fixed
/// number of ticks.
///
/// After a note-on the pulser is active with `K` ticks remaining. Each
/// [`render`](Responder::render) first decrements the countdown (deactivating
/// at zero) and then draws: the base shape when inactive, or the base shape
/// scaled by `1 + remaining` about its own center when active. With the
/// default `K = 10` the first frame after a note-on draws at scale 10, the
/// ninth at scale 2, and the tenth back at the base size.
///
/// A note-on while active restarts the countdown; it never accumulates.
/// Note-offs are ignored.
#[derive(Clone, Debug)]
pub struct Pulser {
    base: Shape,
    position: Point,
    color: Color,
    active: bool,
    remaining: u32,
    activation_ticks: u32,
}

impl Pulser {
    /// Creates an inactive circular pulser of the given `size` (diameter)
    /// centered on `position`.
    #[must_use]
    pub fn new(position: Point, size: f64, color: Color) -> Self {
        Self::with_activation_ticks(position, size, color, DEFAULT_ACTIVATION_TICKS)
    }

    /// Like [`new`](Self::new), with a custom activation duration.
    #[must_use]
    pub fn with_activation_ticks(
        position: Point,
        size: f64,
        color: Color,
        activation_ticks: u32,
    ) -> Self {
        let base = Shape::circle(position, size);
        Self {
            position: base.center(),
            base,
            color,
            active: false,
            remaining: 0,
            activation_ticks,
        }
    }

    /// Returns the current position (center of the base shape).
    #[inline]
    #[must_use]
    pub const fn position(&self) -> Point {
        self.position
    }

    /// Returns the fill color.
    #[inline]
    #[must_use]
    pub const fn color(&self) -> Color {
        self.color
    }

    /// Returns the untransformed-by-pulse base shape.
    #[inline]
    #[must_use]
    pub const fn base(&self) -> &Shape {
        &self.base
    }

    /// Is the pulser currently swelling?
    #[inline]
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Ticks left before the pulse expires.
    #[inline]
    #[must_use]
    pub const fn remaining_ticks(&self) -> u32 {
        self.remaining
    }

    /// Returns the scale the next draw would use without advancing.
    #[must_use]
    pub fn current_scale(&self) -> f64 {
        if self.active {
            1.0 + f64::from(self.remaining)
        } else {
            1.0
        }
    }

    fn tick(&mut self) {
        if self.active {
            self.remaining = self.remaining.saturating_sub(1);
            if self.remaining == 0 {
                self.active = false;
            }
        }
    }
}

impl Responder for Pulser {
    fn receive_on(&mut self, _event: &NoteEvent) {
        self.active = self.activation_ticks > 0;
        self.remaining = self.activation_ticks;
    }

    fn receive_off(&mut self, _event: &NoteEvent) {}

    fn render(&mut self, ctx: &mut dyn DrawContext) {
        self.tick();
        if self.active {
            let scale = Affine::scale_about(self.current_scale(), self.base.center());
            ctx.fill_shape(&self.base.transformed(scale), self.color);
        } else {
            ctx.fill_shape(&self.base, self.color);
        }
    }

    fn apply_transform(&mut self, t: Affine) {
        if !t.is_finite() {
            tracing::warn!(?t, "ignoring non-finite transform");
            return;
        }
        self.base = self.base.transformed(t);
        self.position = self.base.center();
    }
}
