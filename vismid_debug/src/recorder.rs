// Copyright 2026 the Vismid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-frame draw-command recording and JSON export.
//!
//! [`RecordingCanvas`] implements [`DrawContext`] and stores every call as a
//! [`DrawCommand`], grouped into frames by [`begin_frame`](RecordingCanvas::begin_frame).
//! [`export`] writes the recording as a JSON array of frames.

use std::io::{self, Write};

use kurbo::Point;
use serde_json::{Value, json};

use vismid_core::color::Color;
use vismid_core::paint::{DrawContext, Paint};
use vismid_core::shape::Shape;

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

/// One recorded draw call.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    /// [`DrawContext::fill_shape`]; the shape is reduced to its bounds.
    Fill {
        /// Center of the shape's bounding box.
        center: Point,
        /// Bounding-box width.
        width: f64,
        /// Bounding-box height.
        height: f64,
        /// Fill color.
        color: Color,
    },
    /// [`DrawContext::stroke_line`].
    Line {
        /// Segment start.
        from: Point,
        /// Segment end.
        to: Point,
        /// Stroke paint.
        paint: Paint,
    },
}

/// All commands emitted during one frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RecordedFrame {
    /// Frame index passed to [`RecordingCanvas::begin_frame`].
    pub frame_index: u64,
    /// Commands in emission order.
    pub commands: Vec<DrawCommand>,
}

impl RecordedFrame {
    /// Number of fill commands.
    #[must_use]
    pub fn fills(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Fill { .. }))
            .count()
    }

    /// Number of line commands.
    #[must_use]
    pub fn lines(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line { .. }))
            .count()
    }
}

// ---------------------------------------------------------------------------
// RecordingCanvas
// ---------------------------------------------------------------------------

/// A [`DrawContext`] that records instead of drawing.
///
/// Commands emitted before the first [`begin_frame`](Self::begin_frame) land
/// in an implicit frame 0.
#[derive(Clone, Debug, Default)]
pub struct RecordingCanvas {
    frames: Vec<RecordedFrame>,
}

impl RecordingCanvas {
    /// Creates an empty recording.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new frame; subsequent commands are recorded under it.
    pub fn begin_frame(&mut self, frame_index: u64) {
        self.frames.push(RecordedFrame {
            frame_index,
            commands: Vec::new(),
        });
    }

    /// Returns the recorded frames.
    #[must_use]
    pub fn frames(&self) -> &[RecordedFrame] {
        &self.frames
    }

    /// Returns the most recent frame, if any.
    #[must_use]
    pub fn last_frame(&self) -> Option<&RecordedFrame> {
        self.frames.last()
    }

    fn current(&mut self) -> &mut Vec<DrawCommand> {
        if self.frames.is_empty() {
            self.begin_frame(0);
        }
        let last = self.frames.len() - 1;
        &mut self.frames[last].commands
    }
}

impl DrawContext for RecordingCanvas {
    fn fill_shape(&mut self, shape: &Shape, color: Color) {
        let bounds = shape.bounds();
        self.current().push(DrawCommand::Fill {
            center: shape.center(),
            width: bounds.width(),
            height: bounds.height(),
            color,
        });
    }

    fn stroke_line(&mut self, from: Point, to: Point, paint: &Paint) {
        self.current().push(DrawCommand::Line {
            from,
            to,
            paint: *paint,
        });
    }
}

// ---------------------------------------------------------------------------
// JSON export
// ---------------------------------------------------------------------------

/// Writes `frames` as a pretty-printed JSON array.
pub fn export(frames: &[RecordedFrame], writer: &mut dyn Write) -> io::Result<()> {
    let out: Vec<Value> = frames
        .iter()
        .map(|f| {
            json!({
                "frame_index": f.frame_index,
                "commands": f.commands.iter().map(command_json).collect::<Vec<_>>(),
            })
        })
        .collect();
    serde_json::to_writer_pretty(writer, &out)?;
    Ok(())
}

fn command_json(cmd: &DrawCommand) -> Value {
    match cmd {
        DrawCommand::Fill {
            center,
            width,
            height,
            color,
        } => json!({
            "op": "fill",
            "center": [center.x, center.y],
            "width": width,
            "height": height,
            "color": color_hex(*color),
        }),
        DrawCommand::Line { from, to, paint } => json!({
            "op": "line",
            "from": [from.x, from.y],
            "to": [to.x, to.y],
            "paint": paint_json(paint),
        }),
    }
}

fn paint_json(paint: &Paint) -> Value {
    match *paint {
        Paint::Solid(c) => json!({ "solid": color_hex(c) }),
        Paint::LinearGradient {
            start,
            end,
            from,
            to,
        } => json!({
            "gradient": {
                "start": [start.x, start.y],
                "end": [end.x, end.y],
                "from": color_hex(from),
                "to": color_hex(to),
            }
        }),
    }
}

/// Formats a color as `#rrggbb` (or `#rrggbbaa` when not opaque).
pub(crate) fn color_hex(c: Color) -> String {
    if c.a == 255 {
        format!("#{:02x}{:02x}{:02x}", c.r, c.g, c.b)
    } else {
        format!("#{:02x}{:02x}{:02x}{:02x}", c.r, c.g, c.b, c.a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vismid_core::event::NoteEvent;
    use vismid_core::responder::{GroupParams, PulserGroup, Responder};

    #[test]
    fn records_per_frame() {
        let mut canvas = RecordingCanvas::new();
        let mut ring = PulserGroup::new(GroupParams {
            units: 4,
            ..GroupParams::default()
        });
        canvas.begin_frame(0);
        ring.render(&mut canvas);
        ring.receive_on(&NoteEvent::note_on(0, 100));
        canvas.begin_frame(1);
        ring.render(&mut canvas);

        let frames = canvas.frames();
        assert_eq!(frames.len(), 2, "two frames");
        assert_eq!((frames[0].lines(), frames[0].fills()), (4, 4), "frame 0");
        assert_eq!(frames[1].frame_index, 1, "index");
        let DrawCommand::Fill { width, .. } = &frames[1].commands[4] else {
            panic!("expected a fill after four links");
        };
        assert!((*width - 100.0).abs() < 1e-6, "pulsed width {width}");
    }

    #[test]
    fn implicit_first_frame() {
        let mut canvas = RecordingCanvas::new();
        canvas.stroke_line(Point::ORIGIN, Point::new(1.0, 1.0), &Paint::Solid(Color::WHITE));
        assert_eq!(canvas.frames().len(), 1, "implicit frame");
        assert_eq!(canvas.last_frame().map(RecordedFrame::lines), Some(1), "one line");
    }

    #[test]
    fn export_produces_valid_json() {
        let mut canvas = RecordingCanvas::new();
        canvas.begin_frame(7);
        canvas.fill_shape(
            &Shape::circle(Point::new(1.0, 2.0), 4.0),
            Color::rgb(255, 0, 16),
        );
        canvas.stroke_line(
            Point::ORIGIN,
            Point::new(3.0, 4.0),
            &Paint::LinearGradient {
                start: Point::ORIGIN,
                end: Point::new(0.0, 100.0),
                from: Color::rgb(0, 0, 255),
                to: Color::WHITE,
            },
        );
        let mut out = Vec::new();
        export(canvas.frames(), &mut out).unwrap();
        let v: Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(v[0]["frame_index"], 7, "frame index");
        assert_eq!(v[0]["commands"][0]["op"], "fill", "fill op");
        assert_eq!(v[0]["commands"][0]["color"], "#ff0010", "fill color");
        assert_eq!(v[0]["commands"][1]["paint"]["gradient"]["to"], "#ffffff", "gradient end");
    }

    #[test]
    fn translucent_hex() {
        let c = Color {
            a: 0x80,
            ..Color::BLACK
        };
        assert_eq!(color_hex(c), "#00000080", "alpha appended");
    }
}
