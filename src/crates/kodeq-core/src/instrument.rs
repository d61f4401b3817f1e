//! MIDI instruments: note, controller and sequence objects that write to a
//! [`MidiSink`]

use crate::deferred::Operation;
use crate::error::{Error, Result};
use crate::midi::{channel, data_byte, note_name, MidiMessage, MidiSink};
use crate::object::{Sequence, TickContext, SEQ_CAPACITY};
use std::fmt;

/// Single note with a length in ticks (`midi_note`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MidiNote {
    channel: u8,
    note: u8,
    velocity: u8,
    duration: i32,
    elapsed: i32,
    playing: bool,
}

impl Default for MidiNote {
    fn default() -> Self {
        MidiNote {
            channel: 0,
            note: 60,
            velocity: 100,
            duration: 1,
            elapsed: 0,
            playing: false,
        }
    }
}

impl MidiNote {
    pub const TYPE_NAME: &'static str = "midi_note";
    pub const ATTRIBUTES: &'static [&'static str] =
        &["channel", "note", "velocity", "duration", "playing"];

    pub fn value(&self) -> i32 {
        if self.playing {
            i32::from(self.velocity)
        } else {
            0
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn get(&self, name: &str) -> Result<i32> {
        match name {
            "channel" => Ok(i32::from(self.channel)),
            "note" => Ok(i32::from(self.note)),
            "velocity" => Ok(i32::from(self.velocity)),
            "duration" => Ok(self.duration),
            "playing" => Ok(i32::from(self.playing)),
            _ => Err(Error::unknown_attribute(Self::TYPE_NAME, name)),
        }
    }

    pub fn set(&mut self, name: &str, value: i32) -> Result<()> {
        match name {
            "channel" => self.channel = channel(value),
            "note" => self.note = data_byte(value),
            "velocity" => self.velocity = data_byte(value),
            "duration" => self.duration = value.max(1),
            "playing" => return Err(Error::read_only(Self::TYPE_NAME, name)),
            _ => return Err(Error::unknown_attribute(Self::TYPE_NAME, name)),
        }
        Ok(())
    }

    pub fn trigger(&mut self, sink: &mut dyn MidiSink) {
        if self.playing {
            sink.send(self.note_off());
        }
        sink.send(MidiMessage::NoteOn {
            channel: self.channel,
            note: self.note,
            velocity: self.velocity,
        });
        self.playing = true;
        self.elapsed = 0;
    }

    pub fn stop(&mut self, sink: &mut dyn MidiSink) {
        if self.playing {
            sink.send(self.note_off());
            self.playing = false;
            self.elapsed = 0;
        }
    }

    pub fn advance(&mut self, sink: &mut dyn MidiSink) {
        if !self.playing {
            return;
        }
        self.elapsed += 1;
        if self.elapsed >= self.duration {
            self.stop(sink);
        }
    }

    fn note_off(&self) -> MidiMessage {
        MidiMessage::NoteOff {
            channel: self.channel,
            note: self.note,
        }
    }
}

impl fmt::Display for MidiNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "midi_note: ch={} note={} vel={}",
            self.channel,
            note_name(self.note),
            self.velocity
        )?;
        if self.playing {
            write!(f, " [playing]")?;
        }
        Ok(())
    }
}

/// Control change sender (`midi_cc`)
///
/// Writing `value` marks the controller dirty; the message goes out on the
/// next advance so a burst of writes within one tick sends once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MidiCc {
    channel: u8,
    controller: u8,
    value: u8,
    dirty: bool,
}

impl Default for MidiCc {
    fn default() -> Self {
        MidiCc {
            channel: 0,
            controller: 1,
            value: 0,
            dirty: false,
        }
    }
}

impl MidiCc {
    pub const TYPE_NAME: &'static str = "midi_cc";
    pub const ATTRIBUTES: &'static [&'static str] = &["channel", "controller", "cc", "value"];

    pub fn value(&self) -> i32 {
        i32::from(self.value)
    }

    pub fn get(&self, name: &str) -> Result<i32> {
        match name {
            "channel" => Ok(i32::from(self.channel)),
            "controller" | "cc" => Ok(i32::from(self.controller)),
            "value" => Ok(i32::from(self.value)),
            _ => Err(Error::unknown_attribute(Self::TYPE_NAME, name)),
        }
    }

    pub fn set(&mut self, name: &str, value: i32) -> Result<()> {
        match name {
            "channel" => self.channel = channel(value),
            "controller" | "cc" => self.controller = data_byte(value),
            "value" => {
                self.value = data_byte(value);
                self.dirty = true;
            }
            _ => return Err(Error::unknown_attribute(Self::TYPE_NAME, name)),
        }
        Ok(())
    }

    pub fn send(&mut self, sink: &mut dyn MidiSink) {
        sink.send(MidiMessage::ControlChange {
            channel: self.channel,
            controller: self.controller,
            value: self.value,
        });
        self.dirty = false;
    }

    pub fn advance(&mut self, sink: &mut dyn MidiSink) {
        if self.dirty {
            self.send(sink);
        }
    }
}

impl fmt::Display for MidiCc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "midi_cc: ch={} cc={} val={}",
            self.channel, self.controller, self.value
        )
    }
}

/// Sequence that plays its positive steps as notes (`midi_seq`)
///
/// Each step maps to a note; `None` mutes the step. A sounded note is
/// released one tick later through the deferred queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MidiSeq {
    sequence: Sequence,
    channel: u8,
    velocity: u8,
    enabled: bool,
    notes: [Option<u8>; SEQ_CAPACITY],
}

impl Default for MidiSeq {
    fn default() -> Self {
        MidiSeq {
            sequence: Sequence::default(),
            channel: 0,
            velocity: 100,
            enabled: true,
            notes: [Some(60); SEQ_CAPACITY],
        }
    }
}

/// Parse `note_0`..`note_15`
fn note_slot(name: &str) -> Option<usize> {
    let digits = name.strip_prefix("note_")?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse::<usize>().ok().filter(|&n| n < SEQ_CAPACITY)
}

fn note_value(note: Option<u8>) -> i32 {
    note.map_or(-1, i32::from)
}

impl MidiSeq {
    pub const TYPE_NAME: &'static str = "midi_seq";
    pub const ATTRIBUTES: &'static [&'static str] = &[
        "data", "pos", "position", "length", "step", "playing", "midi_channel",
        "midi_velocity", "midi_enable", "note_map", "note_base", "note_0", "note_1", "note_2",
        "note_3", "note_4", "note_5", "note_6", "note_7", "note_8", "note_9", "note_10",
        "note_11", "note_12", "note_13", "note_14", "note_15",
    ];

    pub fn sequence(&self) -> &Sequence {
        &self.sequence
    }

    pub fn sequence_mut(&mut self) -> &mut Sequence {
        &mut self.sequence
    }

    pub fn value(&self) -> i32 {
        self.sequence.value()
    }

    pub fn note(&self, step: usize) -> Option<u8> {
        self.notes.get(step).copied().flatten()
    }

    pub fn get(&self, name: &str) -> Result<i32> {
        match name {
            "midi_channel" => Ok(i32::from(self.channel)),
            "midi_velocity" => Ok(i32::from(self.velocity)),
            "midi_enable" => Ok(i32::from(self.enabled)),
            // First mapped note, 60 when everything is muted
            "note_base" => Ok(self.notes.iter().flatten().next().map_or(60, |&n| i32::from(n))),
            _ => match note_slot(name) {
                Some(step) => Ok(note_value(self.notes[step])),
                None => self
                    .sequence
                    .get(name)
                    .map_err(|_| Error::unknown_attribute(Self::TYPE_NAME, name)),
            },
        }
    }

    pub fn set(&mut self, name: &str, value: i32) -> Result<()> {
        match name {
            "midi_channel" => self.channel = channel(value),
            "midi_velocity" => self.velocity = data_byte(value),
            "midi_enable" => self.enabled = value > 0,
            "note_map" => {
                for (i, slot) in self.notes[..8].iter_mut().enumerate() {
                    *slot = (value & (1 << i) != 0).then(|| data_byte(60 + i as i32));
                }
            }
            "note_base" => {
                let base = data_byte(value);
                for (i, slot) in self.notes.iter_mut().enumerate() {
                    if slot.is_some() {
                        *slot = Some(data_byte(i32::from(base) + i as i32));
                    }
                }
            }
            _ => match note_slot(name) {
                // Negative values mute the step
                Some(step) => self.notes[step] = (value >= 0).then(|| data_byte(value)),
                None => match self.sequence.set(name, value) {
                    Err(Error::UnknownAttribute { .. }) => {
                        return Err(Error::unknown_attribute(Self::TYPE_NAME, name))
                    }
                    Err(Error::ReadOnlyAttribute { .. }) => {
                        return Err(Error::read_only(Self::TYPE_NAME, name))
                    }
                    other => other?,
                },
            },
        }
        Ok(())
    }

    pub fn advance(&mut self, ctx: &mut TickContext<'_>) {
        self.sequence.advance();
        if !self.enabled || self.sequence.value() <= 0 {
            return;
        }
        let step = self.sequence.position() as usize;
        if let Some(note) = self.note(step) {
            ctx.sink.send(MidiMessage::NoteOn {
                channel: self.channel,
                note,
                velocity: self.velocity,
            });
            ctx.defer(Operation::Release {
                channel: self.channel,
                note,
            });
        }
    }
}

impl fmt::Display for MidiSeq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [MIDI ch={} {}]",
            self.sequence,
            self.channel,
            if self.enabled { "enabled" } else { "disabled" }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deferred::DeferredAction;

    #[test]
    fn test_note_lifecycle() {
        let mut sink: Vec<MidiMessage> = Vec::new();
        let mut note = MidiNote::default();
        note.set("duration", 2).unwrap();
        note.trigger(&mut sink);
        assert_eq!(note.value(), 100);

        note.advance(&mut sink);
        assert!(note.is_playing());
        note.advance(&mut sink);
        assert!(!note.is_playing());

        assert_eq!(
            sink,
            vec![
                MidiMessage::NoteOn { channel: 0, note: 60, velocity: 100 },
                MidiMessage::NoteOff { channel: 0, note: 60 },
            ]
        );
    }

    #[test]
    fn test_retrigger_releases_first() {
        let mut sink: Vec<MidiMessage> = Vec::new();
        let mut note = MidiNote::default();
        note.set("duration", 10).unwrap();
        note.trigger(&mut sink);
        note.trigger(&mut sink);
        assert_eq!(sink.len(), 3);
        assert_eq!(sink[1], MidiMessage::NoteOff { channel: 0, note: 60 });
    }

    #[test]
    fn test_note_fields_are_clamped() {
        let mut note = MidiNote::default();
        note.set("channel", 20).unwrap();
        note.set("velocity", 200).unwrap();
        note.set("duration", 0).unwrap();
        assert_eq!(note.get("channel").unwrap(), 15);
        assert_eq!(note.get("velocity").unwrap(), 127);
        assert_eq!(note.get("duration").unwrap(), 1);
        assert!(note.set("playing", 1).is_err());
    }

    #[test]
    fn test_cc_sends_once_after_write() {
        let mut sink: Vec<MidiMessage> = Vec::new();
        let mut cc = MidiCc::default();
        cc.set("cc", 7).unwrap();
        cc.set("value", 10).unwrap();
        cc.set("value", 64).unwrap();
        assert!(sink.is_empty());
        cc.advance(&mut sink);
        cc.advance(&mut sink);
        assert_eq!(
            sink,
            vec![MidiMessage::ControlChange { channel: 0, controller: 7, value: 64 }]
        );
    }

    #[test]
    fn test_note_map_and_base() {
        let mut seq = MidiSeq::default();
        seq.set("note_map", 0b0000_0101).unwrap();
        assert_eq!(seq.note(0), Some(60));
        assert_eq!(seq.note(1), None);
        assert_eq!(seq.note(2), Some(62));
        assert_eq!(seq.note(8), Some(60));

        seq.set("note_base", 36).unwrap();
        assert_eq!(seq.note(2), Some(38));
        assert_eq!(seq.get("note_1").unwrap(), -1);
        assert_eq!(seq.get("note_base").unwrap(), 36);

        seq.set("note_1", 50).unwrap();
        assert_eq!(seq.note(1), Some(50));
        assert!(seq.set("note_16", 1).is_err());
    }

    #[test]
    fn test_falls_back_to_sequence_attributes() {
        let mut seq = MidiSeq::default();
        seq.set("length", 4).unwrap();
        assert_eq!(seq.get("length").unwrap(), 4);
        assert_eq!(
            seq.get("tempo").unwrap_err(),
            Error::unknown_attribute("midi_seq", "tempo")
        );
    }

    #[test]
    fn test_advance_sounds_and_defers_release() {
        let mut sink: Vec<MidiMessage> = Vec::new();
        let mut deferred: Vec<DeferredAction> = Vec::new();
        let mut seq = MidiSeq::default();
        seq.set("data", 0b0000_0010).unwrap();
        seq.set("midi_channel", 2).unwrap();
        seq.sequence_mut().start();

        let mut ctx = TickContext {
            tick: 1,
            name: "S",
            sink: &mut sink,
            deferred: &mut deferred,
        };
        seq.advance(&mut ctx);

        assert_eq!(
            sink,
            vec![MidiMessage::NoteOn { channel: 2, note: 60, velocity: 100 }]
        );
        assert_eq!(
            deferred,
            vec![DeferredAction::new("S", Operation::Release { channel: 2, note: 60 })]
        );
    }
}
