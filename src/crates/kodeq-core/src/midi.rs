//! MIDI boundary between the engine and an output backend
//!
//! The engine only produces [`MidiMessage`] values and hands them to a
//! [`MidiSink`]. Device enumeration and byte-level transmission belong to the
//! backend on the other side of the sink; a backend running its own send
//! thread should be fed through [`ChannelSink`].

use crossbeam_channel::{Receiver, Sender};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MidiMessage {
    NoteOn { channel: u8, note: u8, velocity: u8 },
    NoteOff { channel: u8, note: u8 },
    ControlChange { channel: u8, controller: u8, value: u8 },
}

impl MidiMessage {
    /// Raw status and data bytes as sent on the wire
    pub fn to_bytes(&self) -> [u8; 3] {
        match *self {
            MidiMessage::NoteOn { channel, note, velocity } => [0x90 | channel, note, velocity],
            MidiMessage::NoteOff { channel, note } => [0x80 | channel, note, 0],
            MidiMessage::ControlChange { channel, controller, value } => {
                [0xB0 | channel, controller, value]
            }
        }
    }
}

impl fmt::Display for MidiMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MidiMessage::NoteOn { channel, note, velocity } => {
                write!(f, "note-on ch={} {} vel={}", channel, note_name(*note), velocity)
            }
            MidiMessage::NoteOff { channel, note } => {
                write!(f, "note-off ch={} {}", channel, note_name(*note))
            }
            MidiMessage::ControlChange { channel, controller, value } => {
                write!(f, "cc ch={} cc={} val={}", channel, controller, value)
            }
        }
    }
}

/// Receiver of outgoing MIDI messages
pub trait MidiSink {
    fn send(&mut self, message: MidiMessage);
}

/// Discards everything. Used when no backend is attached.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl MidiSink for NullSink {
    fn send(&mut self, message: MidiMessage) {
        log::trace!("midi (no backend): {}", message);
    }
}

/// Thread-safe hand-off to a backend running elsewhere
#[derive(Debug, Clone)]
pub struct ChannelSink {
    sender: Sender<MidiMessage>,
}

impl ChannelSink {
    pub fn new(sender: Sender<MidiMessage>) -> Self {
        ChannelSink { sender }
    }

    /// Unbounded channel; the receiver goes to the backend thread
    pub fn unbounded() -> (ChannelSink, Receiver<MidiMessage>) {
        let (sender, receiver) = crossbeam_channel::unbounded();
        (ChannelSink::new(sender), receiver)
    }
}

impl MidiSink for ChannelSink {
    fn send(&mut self, message: MidiMessage) {
        if self.sender.send(message).is_err() {
            log::warn!("midi backend disconnected, dropping {}", message);
        }
    }
}

impl MidiSink for Vec<MidiMessage> {
    fn send(&mut self, message: MidiMessage) {
        self.push(message);
    }
}

/// Convert a MIDI note number to a name (e.g. "C4", "G#5")
pub fn note_name(note: u8) -> String {
    const NOTE_NAMES: [&str; 12] = ["C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B"];

    if note > 127 {
        return "Invalid".to_string();
    }
    let octave = i32::from(note / 12) - 1;
    format!("{}{}", NOTE_NAMES[(note % 12) as usize], octave)
}

/// Clamp an integer to a 7-bit data byte
pub fn data_byte(value: i32) -> u8 {
    value.clamp(0, 127) as u8
}

/// Clamp an integer to a channel number
pub fn channel(value: i32) -> u8 {
    value.clamp(0, 15) as u8
}
