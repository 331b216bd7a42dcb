// Copyright 2026 the Vismid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fixed-cadence frame driver.
//!
//! [`FramePump`] calls a frame callback once per interval on the calling
//! thread. Deadlines advance by exactly one interval per frame; if a frame
//! overruns so that the next deadline is already past, the pump restarts its
//! schedule from "now" instead of firing a burst of catch-up frames.
//!
//! The pump stops when the callback returns [`ControlFlow::Break`], when the
//! optional frame limit is reached, or when a [`StopHandle`] is triggered
//! from any thread.

use core::ops::ControlFlow;
use core::time::Duration;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Instant;

/// Default interval between frames.
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(20);

/// A frame opportunity delivered by the pump.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameTick {
    /// Monotonically increasing frame counter, starting at zero.
    pub frame_index: u64,
    /// When the frame started.
    pub now: Instant,
    /// The previous frame overran its slot and the schedule was reset.
    pub late: bool,
}

/// Requests that a running [`FramePump`] stop after its current frame.
#[derive(Clone, Debug, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    /// Signals the pump to stop.
    pub fn stop(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Has a stop been requested?
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Drives a frame callback at a fixed interval.
#[derive(Clone, Debug)]
pub struct FramePump {
    interval: Duration,
    limit: Option<u64>,
    stop: StopHandle,
}

impl FramePump {
    /// Creates a pump firing every `interval`, with no frame limit.
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            limit: None,
            stop: StopHandle::default(),
        }
    }

    /// Stops after `frames` frames.
    #[must_use]
    pub fn with_frame_limit(mut self, frames: u64) -> Self {
        self.limit = Some(frames);
        self
    }

    /// Returns a handle that stops this pump.
    #[must_use]
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Returns the frame interval.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Runs frames until stopped. Returns the number of frames run.
    pub fn run(&self, mut frame: impl FnMut(FrameTick) -> ControlFlow<()>) -> u64 {
        let mut frame_index = 0_u64;
        let mut next = Instant::now();
        let mut late = false;
        loop {
            if self.stop.is_stopped() || self.limit.is_some_and(|l| frame_index >= l) {
                break;
            }
            let flow = frame(FrameTick {
                frame_index,
                now: Instant::now(),
                late,
            });
            frame_index += 1;
            if flow.is_break() {
                break;
            }

            let Some(deadline) = next.checked_add(self.interval) else {
                next = Instant::now();
                continue;
            };
            next = deadline;
            let now = Instant::now();
            if let Some(wait) = next.checked_duration_since(now) {
                late = false;
                thread::sleep(wait);
            } else {
                tracing::trace!(frame_index, "frame overran its slot");
                late = true;
                next = now;
            }
        }
        frame_index
    }
}

impl Default for FramePump {
    fn default() -> Self {
        Self::new(DEFAULT_FRAME_INTERVAL)
    }
}
