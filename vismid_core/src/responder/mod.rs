// Copyright 2026 the Vismid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Animated responders.
//!
//! A responder turns a stream of on/off signals into per-frame geometry. The
//! capability set is small and closed:
//!
//! - [`receive_on`](Responder::receive_on) / [`receive_off`](Responder::receive_off)
//!   mutate animation state in response to a classified note event;
//! - [`render`](Responder::render) advances the animation by one tick and
//!   draws the result;
//! - [`apply_transform`](Responder::apply_transform) moves the responder's
//!   geometry.
//!
//! Two implementors exist: [`Pulser`], a single shape that swells on a
//! note-on and decays over a fixed number of ticks, and [`PulserGroup`], a
//! ring of pulsers joined by gradient segments whose rotation follows the
//! note-off history.
//!
//! All four calls are made from the render thread only; see
//! [`Scene`](crate::scene::Scene).

mod group;
mod pulser;

use core::fmt;

use kurbo::Affine;

pub use group::{GroupParams, PulserGroup};
pub use pulser::{DEFAULT_ACTIVATION_TICKS, Pulser};

use crate::event::{NoteEvent, Signal};
use crate::paint::DrawContext;

/// A handle to a responder owned by a [`Scene`](crate::scene::Scene).
///
/// Handles are assigned in registration order and are never reused within a
/// scene, so the router can hold them without owning the responder.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ResponderId(pub(crate) usize);

impl ResponderId {
    /// Returns the raw slot index (for diagnostics only).
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Debug for ResponderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ResponderId({})", self.0)
    }
}

/// Something that reacts to note signals and draws itself each frame.
pub trait Responder: Send {
    /// Called for a note-on with non-zero velocity.
    fn receive_on(&mut self, event: &NoteEvent);

    /// Called for a note-off, or a note-on with zero velocity.
    fn receive_off(&mut self, event: &NoteEvent);

    /// Advances the animation by one tick and draws into `ctx`.
    fn render(&mut self, ctx: &mut dyn DrawContext);

    /// Applies `t` to this responder's geometry.
    fn apply_transform(&mut self, t: Affine);

    /// Delivers a classified signal to the matching `receive_*` method.
    fn deliver(&mut self, signal: Signal, event: &NoteEvent) {
        match signal {
            Signal::On => self.receive_on(event),
            Signal::Off => self.receive_off(event),
        }
    }
}

impl fmt::Debug for dyn Responder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Responder").finish_non_exhaustive()
    }
}
