// Copyright 2026 the Vismid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Headless run of the concentric pulser rings.
//!
//! A synthetic sequencer thread feeds raw channel messages into the router
//! (note-ons, note-offs in both encodings, and control changes that the
//! router ignores) while the main thread drives the scene with a
//! [`FramePump`]. Every frame is recorded; every `--snapshot-every` frames an
//! SVG snapshot is written to `--out-dir`. With `--json`, the full recording
//! is exported when the run ends.

use std::fs::{self, File};
use std::io::BufWriter;
use std::ops::ControlFlow;
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

use vismid_core::color::Color;
use vismid_core::config::VisualizerConfig;
use vismid_core::kurbo::Point;
use vismid_core::paint::{DrawContext, Paint};
use vismid_core::pump::{FramePump, StopHandle};
use vismid_core::router::{DispatchOutcome, Router};
use vismid_core::shape::Shape;
use vismid_core::topology::Visualizer;

use vismid_debug::recorder::{self, RecordingCanvas};
use vismid_debug::svg::SvgCanvas;

/// Time between sequencer steps.
const STEP: Duration = Duration::from_millis(45);

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// TOML configuration file; defaults are used when absent.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Number of frames to run.
    #[arg(long, default_value_t = 150)]
    frames: u64,
    /// Write an SVG snapshot every N frames (0 disables snapshots).
    #[arg(long, default_value_t = 25)]
    snapshot_every: u64,
    /// Directory for SVG snapshots.
    #[arg(long, default_value = "pulse_demo_out")]
    out_dir: PathBuf,
    /// Export the full draw recording to this JSON file.
    #[arg(long)]
    json: Option<PathBuf>,
}

fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => VisualizerConfig::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => VisualizerConfig::default(),
    };
    let channels = config.topology.rings.max(1);
    let canvas_size = config.topology.canvas_size;

    let (router, mut scene) = Visualizer::from_config(&config).split();
    tracing::info!(
        responders = scene.len(),
        channels = router.channels().count(),
        "scene built"
    );

    if args.snapshot_every > 0 {
        fs::create_dir_all(&args.out_dir)
            .with_context(|| format!("creating {}", args.out_dir.display()))?;
    }

    let pump = FramePump::new(config.frame.interval).with_frame_limit(args.frames);
    tracing::info!(interval = ?pump.interval(), frames = args.frames, "starting frame pump");
    let stop = pump.stop_handle();
    let sequencer = {
        let stop = stop.clone();
        thread::Builder::new()
            .name("sequencer".into())
            .spawn(move || run_sequencer(&router, channels, &stop))
            .context("spawning sequencer thread")?
    };

    let mut recording = RecordingCanvas::new();
    let mut svg = SvgCanvas::new(canvas_size, canvas_size);
    let mut failure = None;
    let ran = pump.run(|tick| {
        recording.begin_frame(tick.frame_index);
        svg.clear();
        let stats = scene.frame(&mut Tee {
            a: &mut recording,
            b: &mut svg,
        });
        if tick.late {
            tracing::debug!(frame = tick.frame_index, "late frame");
        }
        if args.snapshot_every > 0 && tick.frame_index % args.snapshot_every == 0 {
            let path = args.out_dir.join(format!("frame_{:05}.svg", tick.frame_index));
            if let Err(err) = fs::write(&path, svg.finish()) {
                failure = Some(anyhow::Error::new(err).context(format!("writing {}", path.display())));
                return ControlFlow::Break(());
            }
            tracing::info!(frame = tick.frame_index, applied = stats.applied, path = %path.display(), "snapshot");
        }
        ControlFlow::Continue(())
    });

    stop.stop();
    let sent = sequencer
        .join()
        .map_err(|_| anyhow::anyhow!("sequencer thread panicked"))?;
    if let Some(err) = failure {
        return Err(err);
    }
    tracing::info!(frames = ran, messages = sent, "run finished");

    if let Some(path) = &args.json {
        let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
        recorder::export(recording.frames(), &mut BufWriter::new(file))
            .with_context(|| format!("writing {}", path.display()))?;
        tracing::info!(path = %path.display(), "recording exported");
    }
    Ok(())
}

fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_thread_names(true)
        .init();
}

/// Plays a fixed pattern until stopped. Returns the number of messages sent.
///
/// Each step lights one channel with a note-on and releases the previous
/// step's note, alternating between `0x8n` and zero-velocity `0x9n` offs.
/// Every eighth step also sends a control change, which the router ignores.
fn run_sequencer(router: &Router, channels: u32, stop: &StopHandle) -> u64 {
    let start = Instant::now();
    let mut sent = 0_u64;
    let mut previous: Option<(u8, u8)> = None;
    let mut step = 0_u32;
    while !stop.is_stopped() {
        let timestamp = i64::try_from(start.elapsed().as_micros()).unwrap_or(i64::MAX);
        let channel = status_channel(step % channels);
        let note = 36 + data_byte(step % 24);
        let velocity = 64 + data_byte(step.wrapping_mul(7) % 64);

        if let Some((ch, n)) = previous.take() {
            let off = if step % 2 == 0 {
                [0x80 | ch, n, 0]
            } else {
                [0x90 | ch, n, 0]
            };
            log_outcome(router.receive(&off, timestamp));
            sent += 1;
        }
        log_outcome(router.receive(&[0x90 | channel, note, velocity], timestamp));
        sent += 1;
        previous = Some((channel, note));

        if step % 8 == 0 {
            log_outcome(router.receive(&[0xB0 | channel, 7, 100], timestamp));
            sent += 1;
        }

        step = step.wrapping_add(1);
        thread::sleep(STEP);
    }
    sent
}

/// Maps a channel onto the low nibble of a status byte.
fn status_channel(channel: u32) -> u8 {
    u8::try_from(channel & 0x0F).unwrap_or(0)
}

/// Narrows a value already reduced below `0x80`.
fn data_byte(v: u32) -> u8 {
    u8::try_from(v & 0x7F).unwrap_or(0)
}

fn log_outcome(outcome: DispatchOutcome) {
    tracing::trace!(?outcome, "sent");
}

/// Forwards every draw call to two surfaces.
struct Tee<'a> {
    a: &'a mut RecordingCanvas,
    b: &'a mut SvgCanvas,
}

impl DrawContext for Tee<'_> {
    fn fill_shape(&mut self, shape: &Shape, color: Color) {
        self.a.fill_shape(shape, color);
        self.b.fill_shape(shape, color);
    }

    fn stroke_line(&mut self, from: Point, to: Point, paint: &Paint) {
        self.a.stroke_line(from, to, paint);
        self.b.stroke_line(from, to, paint);
    }
}
