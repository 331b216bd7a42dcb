// Copyright 2026 the Vismid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Construction-time configuration, loaded from TOML.
//!
//! Every field has a default, so an empty document is a valid configuration:
//!
//! ```toml
//! [topology]
//! rings = 16
//! units_per_ring = 9
//! unit_size = 10.0
//! canvas_size = 400.0
//! activation_ticks = 10
//!
//! [frame]
//! interval_ms = 20
//! queue_capacity = 1024
//! ```

use core::time::Duration;
use std::path::Path;

use serde::{Deserialize, Deserializer};
use thiserror::Error;

use crate::intent::DEFAULT_QUEUE_CAPACITY;
use crate::pump::DEFAULT_FRAME_INTERVAL;
use crate::responder::DEFAULT_ACTIVATION_TICKS;

/// Errors raised while loading a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config: {0}")]
    Read(#[from] std::io::Error),
    /// The document is not valid TOML or has mistyped fields.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    /// The values parsed but are unusable.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Top-level configuration.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VisualizerConfig {
    /// Ring layout.
    pub topology: TopologyConfig,
    /// Frame cadence and queueing.
    pub frame: FrameConfig,
}

/// Layout of the concentric rings.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TopologyConfig {
    /// Number of rings; ring `i` listens on channel `i`.
    pub rings: u32,
    /// Pulsers per ring.
    pub units_per_ring: usize,
    /// Pulser diameter in canvas units.
    pub unit_size: f64,
    /// Side of the square canvas in canvas units.
    pub canvas_size: f64,
    /// Render ticks a pulser stays active after a note-on.
    pub activation_ticks: u32,
}

impl Default for TopologyConfig {
    fn default() -> Self {
        Self {
            rings: 16,
            units_per_ring: 9,
            unit_size: 10.0,
            canvas_size: 400.0,
            activation_ticks: DEFAULT_ACTIVATION_TICKS,
        }
    }
}

/// Frame cadence and intent queueing.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FrameConfig {
    /// Time between frames.
    #[serde(rename = "interval_ms", deserialize_with = "de_duration_ms")]
    pub interval: Duration,
    /// Maximum number of undelivered intents.
    pub queue_capacity: usize,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_FRAME_INTERVAL,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

impl VisualizerConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::Parse`] for malformed TOML, unknown keys or
    ///   mistyped values.
    /// - [`ConfigError::Invalid`] when [`validate`](Self::validate) fails.
    pub fn parse_str(s: &str) -> Result<Self, ConfigError> {
        let cfg: Self = toml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::Read`] if the file cannot be read.
    /// - Anything [`parse_str`](Self::parse_str) returns.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let s = std::fs::read_to_string(path)?;
        Self::parse_str(&s)
    }

    /// Checks that the values describe a drawable scene.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = &self.topology;
        if t.units_per_ring == 0 {
            return Err(invalid("topology.units_per_ring must be at least 1"));
        }
        if !(t.unit_size.is_finite() && t.unit_size > 0.0) {
            return Err(invalid("topology.unit_size must be finite and positive"));
        }
        if !(t.canvas_size.is_finite() && t.canvas_size > 0.0) {
            return Err(invalid("topology.canvas_size must be finite and positive"));
        }
        if self.frame.interval.is_zero() {
            return Err(invalid("frame.interval_ms must be at least 1"));
        }
        if self.frame.queue_capacity == 0 {
            return Err(invalid("frame.queue_capacity must be at least 1"));
        }
        Ok(())
    }
}

fn invalid(msg: &str) -> ConfigError {
    tracing::warn!(msg, "rejecting configuration");
    ConfigError::Invalid(msg.to_owned())
}

/// Deserializes whole milliseconds into a [`Duration`].
fn de_duration_ms<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let ms = u64::deserialize(deserializer)?;
    Ok(Duration::from_millis(ms))
}
