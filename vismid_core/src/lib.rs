// Copyright 2026 the Vismid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Note-event routing and animated responders for live MIDI visualization.
//!
//! `vismid_core` turns a live stream of note-on/note-off events into
//! per-frame animated geometry. Events arrive on a playback engine's timing
//! thread; frames are drawn on a fixed-cadence render thread. Every piece of
//! animation state is mutated on the render thread only.
//!
//! # Architecture
//!
//! ```text
//!   playback engine (event thread)
//!       │  NoteEvent / raw bytes
//!       ▼
//!   Router::dispatch ──► Intent ──► bounded queue
//!                                        │
//!                 ┌──────────────────────┘
//!                 ▼
//!   FramePump tick ──► Scene::frame ──► drain intents ──► Responder::receive_*
//!                                 │
//!                                 └──► Responder::render ──► DrawContext
//! ```
//!
//! **[`event`]**: [`NoteEvent`](event::NoteEvent) and its on/off
//! classification, including the "note-on with velocity zero is a note-off"
//! rule.
//!
//! **[`router`]**: channel-keyed subscription table and fan-out.
//!
//! **[`intent`]**: the single-writer hand-off between the two threads.
//!
//! **[`scene`]**: render-thread owner of all responders.
//!
//! **[`responder`]**: the [`Responder`](responder::Responder) trait with
//! [`Pulser`](responder::Pulser) and [`PulserGroup`](responder::PulserGroup).
//!
//! **[`paint`]**: the [`DrawContext`](paint::DrawContext) surface seam.
//!
//! **[`shape`]**, **[`color`]**: geometry and color values. Transforms are
//! plain [`kurbo::Affine`] values.
//!
//! **[`pump`]**: fixed-interval frame driver.
//!
//! **[`config`]** and **[`topology`]**: TOML configuration and the default
//! concentric-ring wiring in an explicit [`Visualizer`](topology::Visualizer)
//! context.

pub mod color;
pub mod config;
pub mod event;
pub mod intent;
pub mod paint;
pub mod pump;
pub mod responder;
pub mod router;
pub mod scene;
pub mod shape;
pub mod topology;

pub use kurbo;
