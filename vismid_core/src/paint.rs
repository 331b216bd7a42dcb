// Copyright 2026 the Vismid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The outbound drawing seam.
//!
//! Responders never talk to a concrete surface. Each frame the scene hands
//! them a `&mut dyn DrawContext`, and they emit filled shapes and stroked
//! segments into it. Surfaces (a window, an SVG writer, a test recorder)
//! implement [`DrawContext`].
//!
//! Coordinates are canvas units with the origin at the canvas center and Y
//! pointing up. Mapping to device pixels is the surface's job.

use kurbo::Point;

use crate::color::Color;
use crate::shape::Shape;

/// How a stroke is colored.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Paint {
    /// A single color.
    Solid(Color),
    /// A linear gradient from `from` at `start` to `to` at `end`, in canvas
    /// coordinates. Points beyond the endpoints take the nearest end color.
    LinearGradient {
        /// Gradient start point.
        start: Point,
        /// Gradient end point.
        end: Point,
        /// Color at `start`.
        from: Color,
        /// Color at `end`.
        to: Color,
    },
}

impl From<Color> for Paint {
    fn from(c: Color) -> Self {
        Self::Solid(c)
    }
}

/// A drawing surface for one frame.
///
/// Implementations must tolerate any geometry, including degenerate and
/// very large shapes; responders do not clamp what they emit.
pub trait DrawContext {
    /// Fills `shape` with a solid color.
    fn fill_shape(&mut self, shape: &Shape, color: Color);

    /// Strokes a straight segment from `from` to `to`.
    fn stroke_line(&mut self, from: Point, to: Point, paint: &Paint);

    /// Strokes a connected polyline through `points`.
    ///
    /// The default implementation strokes each consecutive pair with
    /// [`stroke_line`](Self::stroke_line).
    fn stroke_polyline(&mut self, points: &[Point], paint: &Paint) {
        for pair in points.windows(2) {
            self.stroke_line(pair[0], pair[1], paint);
        }
    }
}
