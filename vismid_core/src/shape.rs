// Copyright 2026 the Vismid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Geometric outlines drawn by responders.

use kurbo::{Affine, BezPath, Circle, Point, Rect, Shape as _};

/// Flattening tolerance used when converting primitives to paths.
const PATH_TOLERANCE: f64 = 0.01;

/// A closed 2-D outline with a well-defined center.
///
/// The center is the center of the bounding box, which is what a unit uses as
/// its position and as the pivot for its pulse scaling.
#[derive(Clone, Debug, PartialEq)]
pub struct Shape {
    path: BezPath,
    bounds: Rect,
}

impl Shape {
    /// Creates a circle of the given `diameter` centered on `center`.
    #[must_use]
    pub fn circle(center: Point, diameter: f64) -> Self {
        Self::from_path(Circle::new(center, diameter / 2.0).to_path(PATH_TOLERANCE))
    }

    /// Wraps an arbitrary path.
    #[must_use]
    pub fn from_path(path: BezPath) -> Self {
        let bounds = path.bounding_box();
        Self { path, bounds }
    }

    /// Returns the underlying path.
    #[must_use]
    pub fn path(&self) -> &BezPath {
        &self.path
    }

    /// Returns the axis-aligned bounding box.
    #[must_use]
    pub const fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Returns the center of the bounding box.
    #[must_use]
    pub fn center(&self) -> Point {
        self.bounds.center()
    }

    /// Returns a new shape with `t` applied to every point.
    #[must_use]
    pub fn transformed(&self, t: Affine) -> Self {
        Self::from_path(t * self.path.clone())
    }
}
