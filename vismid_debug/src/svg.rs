// Copyright 2026 the Vismid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! SVG snapshots of a single frame.
//!
//! [`SvgCanvas`] implements [`DrawContext`] and renders one frame into an SVG
//! document: a black background, then every draw call inside a group that
//! moves the origin to the canvas center and flips Y so that it points up.
//! Gradient strokes become `<linearGradient>` definitions in user space.

use std::fmt::Write as _;
use std::io::{self, Write};

use kurbo::Point;

use vismid_core::color::Color;
use vismid_core::paint::{DrawContext, Paint};
use vismid_core::shape::Shape;

use crate::recorder::color_hex;

/// Stroke width of link segments, in canvas units.
const STROKE_WIDTH: f64 = 1.0;

/// A [`DrawContext`] that builds an SVG document for one frame.
#[derive(Clone, Debug)]
pub struct SvgCanvas {
    width: f64,
    height: f64,
    defs: String,
    body: String,
    gradients: usize,
}

impl SvgCanvas {
    /// Creates a canvas `width` by `height` canvas units.
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            defs: String::new(),
            body: String::new(),
            gradients: 0,
        }
    }

    /// Clears all drawn content, keeping the size.
    pub fn clear(&mut self) {
        self.defs.clear();
        self.body.clear();
        self.gradients = 0;
    }

    /// Returns the complete SVG document.
    #[must_use]
    pub fn finish(&self) -> String {
        let (w, h) = (self.width, self.height);
        let mut out = String::new();
        let _ = writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#
        );
        if !self.defs.is_empty() {
            let _ = writeln!(out, "<defs>\n{}</defs>", self.defs);
        }
        let _ = writeln!(out, r##"<rect width="{w}" height="{h}" fill="#000000"/>"##);
        let _ = writeln!(
            out,
            r#"<g transform="translate({} {}) scale(1 -1)">"#,
            w / 2.0,
            h / 2.0
        );
        out.push_str(&self.body);
        out.push_str("</g>\n</svg>\n");
        out
    }

    /// Writes the document to `writer`.
    pub fn write_to(&self, writer: &mut dyn Write) -> io::Result<()> {
        writer.write_all(self.finish().as_bytes())
    }

    fn stroke_attr(&mut self, paint: &Paint) -> String {
        match *paint {
            Paint::Solid(c) => color_hex(c),
            Paint::LinearGradient {
                start,
                end,
                from,
                to,
            } => {
                let id = format!("g{}", self.gradients);
                self.gradients += 1;
                let _ = writeln!(
                    self.defs,
                    r#"<linearGradient id="{id}" gradientUnits="userSpaceOnUse" x1="{}" y1="{}" x2="{}" y2="{}"><stop offset="0" stop-color="{}"/><stop offset="1" stop-color="{}"/></linearGradient>"#,
                    start.x,
                    start.y,
                    end.x,
                    end.y,
                    color_hex(from),
                    color_hex(to),
                );
                format!("url(#{id})")
            }
        }
    }
}

impl DrawContext for SvgCanvas {
    fn fill_shape(&mut self, shape: &Shape, color: Color) {
        let _ = writeln!(
            self.body,
            r#"<path d="{}" fill="{}"/>"#,
            shape.path().to_svg(),
            color_hex(color)
        );
    }

    fn stroke_line(&mut self, from: Point, to: Point, paint: &Paint) {
        let stroke = self.stroke_attr(paint);
        let _ = writeln!(
            self.body,
            r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{stroke}" stroke-width="{STROKE_WIDTH}"/>"#,
            from.x, from.y, to.x, to.y
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vismid_core::responder::{GroupParams, PulserGroup, Responder};

    #[test]
    fn empty_frame_has_background_and_flip() {
        let svg = SvgCanvas::new(400.0, 400.0).finish();
        assert!(svg.starts_with("<svg"), "root element");
        assert!(svg.contains(r##"fill="#000000""##), "black background");
        assert!(svg.contains("translate(200 200) scale(1 -1)"), "centered Y-up");
        assert!(!svg.contains("<defs>"), "no defs without gradients");
        assert!(svg.trim_end().ends_with("</svg>"), "closed");
    }

    #[test]
    fn ring_renders_paths_and_gradients() {
        let mut canvas = SvgCanvas::new(400.0, 400.0);
        let mut ring = PulserGroup::new(GroupParams {
            units: 3,
            color: Color::rgb(255, 0, 0),
            ..GroupParams::default()
        });
        ring.render(&mut canvas);
        let svg = canvas.finish();
        assert_eq!(svg.matches("<linearGradient").count(), 3, "one gradient per link");
        assert_eq!(svg.matches("<line ").count(), 3, "three links");
        assert_eq!(svg.matches("<path ").count(), 3, "three units");
        assert!(svg.contains(r##"stop-color="#ff0000""##), "unit color stop");
        assert!(svg.contains("url(#g2)"), "gradient ids are unique");
    }

    #[test]
    fn solid_strokes_inline_color() {
        let mut canvas = SvgCanvas::new(10.0, 10.0);
        canvas.stroke_line(Point::ORIGIN, Point::new(1.0, 0.0), &Paint::Solid(Color::WHITE));
        let svg = canvas.finish();
        assert!(svg.contains(r##"stroke="#ffffff""##), "inline stroke");
        canvas.clear();
        assert!(!canvas.finish().contains("<line"), "cleared");
    }

    #[test]
    fn write_to_matches_finish() {
        let mut canvas = SvgCanvas::new(20.0, 20.0);
        canvas.fill_shape(&Shape::circle(Point::ORIGIN, 4.0), Color::WHITE);
        let mut out = Vec::new();
        canvas.write_to(&mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), canvas.finish(), "same bytes");
    }
}
