// Copyright 2026 the Vismid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recording and SVG snapshot surfaces for vismid diagnostics.
//!
//! This crate provides [`DrawContext`](vismid_core::paint::DrawContext)
//! implementations for development and post-mortem analysis:
//!
//! - [`recorder::RecordingCanvas`]: per-frame draw-command recording, with
//!   [`recorder::export`] writing the recording as JSON.
//! - [`svg::SvgCanvas`]: renders one frame to a standalone SVG document.

pub mod recorder;
pub mod svg;
