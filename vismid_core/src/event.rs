// Copyright 2026 the Vismid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Note events and their on/off classification.
//!
//! A [`NoteEvent`] is the compact form a playback engine hands to the
//! [`Router`](crate::router::Router). The encoding is ambiguous on purpose:
//! a note-on carrying velocity zero is a note-off. [`NoteEvent::signal`]
//! resolves that ambiguity in one place.

use thiserror::Error;

/// Largest velocity a note event may carry.
pub const MAX_VELOCITY: u8 = 127;

/// Command kind of a channel message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Command {
    /// Note-on (`0x9n`).
    NoteOn,
    /// Note-off (`0x8n`).
    NoteOff,
    /// Any other channel-voice command, carrying its status nibble
    /// (e.g. `0xB0` for control change).
    Other(u8),
}

impl Command {
    /// Decodes the high nibble of a status byte.
    #[must_use]
    pub const fn from_status(status: u8) -> Self {
        match status & 0xF0 {
            0x90 => Self::NoteOn,
            0x80 => Self::NoteOff,
            other => Self::Other(other),
        }
    }
}

/// The classification of a note event as seen by responders.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Signal {
    /// A note started sounding.
    On,
    /// A note stopped sounding.
    Off,
}

/// Errors raised when decoding a raw message at the receiver boundary.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EventError {
    /// The message had no bytes.
    #[error("empty message")]
    Empty,
    /// The first byte was a data byte, not a status byte.
    #[error("missing status byte (got {0:#04x})")]
    MissingStatus(u8),
    /// System messages (`0xF0..=0xFF`) carry no channel.
    #[error("system message {0:#04x} has no channel")]
    System(u8),
    /// A data byte had its high bit set.
    #[error("data byte {0:#04x} out of range")]
    DataOutOfRange(u8),
}

/// A single channel message as delivered by the playback engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NoteEvent {
    /// Channel the message belongs to. Conventionally `0..16`, not bounded.
    pub channel: u32,
    /// Command kind.
    pub command: Command,
    /// Velocity (`0..=127`). Zero on a note-on means note-off.
    pub velocity: u8,
}

impl NoteEvent {
    /// Creates an event.
    #[must_use]
    pub const fn new(channel: u32, command: Command, velocity: u8) -> Self {
        Self {
            channel,
            command,
            velocity,
        }
    }

    /// Convenience constructor for a note-on.
    #[must_use]
    pub const fn note_on(channel: u32, velocity: u8) -> Self {
        Self::new(channel, Command::NoteOn, velocity)
    }

    /// Convenience constructor for a note-off.
    #[must_use]
    pub const fn note_off(channel: u32) -> Self {
        Self::new(channel, Command::NoteOff, 0)
    }

    /// Decodes a raw channel-voice message: a status byte followed by up to
    /// two data bytes. Velocity is the second data byte (zero when absent).
    ///
    /// # Errors
    ///
    /// - [`EventError::Empty`] for an empty slice.
    /// - [`EventError::MissingStatus`] when the first byte is a data byte.
    /// - [`EventError::System`] for `0xF0..=0xFF` status bytes.
    /// - [`EventError::DataOutOfRange`] when a data byte is `>= 0x80`.
    pub fn from_bytes(data: &[u8]) -> Result<Self, EventError> {
        let (&status, rest) = data.split_first().ok_or(EventError::Empty)?;
        if status < 0x80 {
            return Err(EventError::MissingStatus(status));
        }
        if status >= 0xF0 {
            return Err(EventError::System(status));
        }
        if let Some(&bad) = rest.iter().take(2).find(|&&b| b > MAX_VELOCITY) {
            return Err(EventError::DataOutOfRange(bad));
        }
        Ok(Self {
            channel: u32::from(status & 0x0F),
            command: Command::from_status(status),
            velocity: rest.get(1).copied().unwrap_or(0),
        })
    }

    /// Classifies this event, in precedence order:
    ///
    /// 1. note-on with non-zero velocity is [`Signal::On`];
    /// 2. note-off, or note-on with zero velocity, is [`Signal::Off`];
    /// 3. anything else is `None` and is ignored by the router.
    #[must_use]
    pub const fn signal(&self) -> Option<Signal> {
        match self.command {
            Command::NoteOn if self.velocity != 0 => Some(Signal::On),
            Command::NoteOn | Command::NoteOff => Some(Signal::Off),
            Command::Other(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_precedence() {
        assert_eq!(NoteEvent::note_on(0, 100).signal(), Some(Signal::On));
        assert_eq!(NoteEvent::note_on(0, 1).signal(), Some(Signal::On));
        assert_eq!(NoteEvent::note_on(0, 0).signal(), Some(Signal::Off));
        assert_eq!(NoteEvent::note_off(0).signal(), Some(Signal::Off));
        assert_eq!(
            NoteEvent::new(0, Command::NoteOff, 64).signal(),
            Some(Signal::Off)
        );
        assert_eq!(NoteEvent::new(0, Command::Other(0xB0), 90).signal(), None);
    }

    #[test]
    fn decode_note_on() {
        let e = NoteEvent::from_bytes(&[0x92, 60, 100]).unwrap();
        assert_eq!(e, NoteEvent::note_on(2, 100));
    }

    #[test]
    fn decode_note_off_keeps_release_velocity() {
        let e = NoteEvent::from_bytes(&[0x8F, 60, 40]).unwrap();
        assert_eq!(e.channel, 15);
        assert_eq!(e.command, Command::NoteOff);
        assert_eq!(e.velocity, 40);
        assert_eq!(e.signal(), Some(Signal::Off));
    }

    #[test]
    fn decode_other_commands() {
        let cc = NoteEvent::from_bytes(&[0xB3, 7, 127]).unwrap();
        assert_eq!(cc.command, Command::Other(0xB0));
        assert_eq!(cc.channel, 3);
        // Program change carries a single data byte.
        let pc = NoteEvent::from_bytes(&[0xC0, 5]).unwrap();
        assert_eq!(pc.command, Command::Other(0xC0));
        assert_eq!(pc.velocity, 0);
    }

    #[test]
    fn decode_rejects_malformed() {
        assert_eq!(NoteEvent::from_bytes(&[]), Err(EventError::Empty));
        assert_eq!(
            NoteEvent::from_bytes(&[0x40, 1, 2]),
            Err(EventError::MissingStatus(0x40))
        );
        assert_eq!(
            NoteEvent::from_bytes(&[0xF8]),
            Err(EventError::System(0xF8))
        );
        assert_eq!(
            NoteEvent::from_bytes(&[0x90, 60, 200]),
            Err(EventError::DataOutOfRange(200))
        );
    }
}
