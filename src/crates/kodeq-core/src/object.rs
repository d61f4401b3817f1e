//! Runtime objects bound to variables
//!
//! A [`RuntimeObject`] is anything a variable can hold: plain scalars, the
//! sequence and counter objects, every generator module, and the MIDI
//! instruments. All of them share one attribute interface (`get`/`set` by
//! name), a scalar `value()`, and a per-tick `advance`.

use crate::deferred::{DeferredAction, Operation};
use crate::error::{Error, Result};
use crate::instrument::{MidiCc, MidiNote, MidiSeq};
use crate::midi::MidiSink;
use crate::module::ModuleState;
use crate::value::Value;
use std::fmt;

pub const SEQ_CAPACITY: usize = 16;

/// What an object may touch while it advances
pub struct TickContext<'a> {
    /// Tick counter after this tick's increment
    pub tick: i32,
    /// Name the object is bound under
    pub name: &'a str,
    pub sink: &'a mut dyn MidiSink,
    /// Actions queued here run on the next tick
    pub deferred: &'a mut Vec<DeferredAction>,
}

impl TickContext<'_> {
    pub fn defer(&mut self, operation: Operation) {
        self.deferred
            .push(DeferredAction::new(self.name.to_string(), operation));
    }
}

/// 8-bit pattern object (`binary`)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BinaryPattern {
    bits: i32,
}

impl BinaryPattern {
    pub fn new(bits: i32) -> Self {
        BinaryPattern { bits: bits & 0xFF }
    }

    pub fn bits(&self) -> i32 {
        self.bits
    }
}

impl fmt::Display for BinaryPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "b{:08b}", self.bits)
    }
}

/// Step sequence object (`seq`)
///
/// Holds 16 data steps of which the first `length` are played. The cursor
/// only moves while playing; `start`, `stop` and `reset` arrive as deferred
/// actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequence {
    data: [i32; SEQ_CAPACITY],
    position: i32,
    length: i32,
    playing: bool,
}

impl Default for Sequence {
    fn default() -> Self {
        Sequence {
            data: [0; SEQ_CAPACITY],
            position: 0,
            length: 8,
            playing: false,
        }
    }
}

impl Sequence {
    pub const TYPE_NAME: &'static str = "seq";

    pub fn value(&self) -> i32 {
        self.data[self.position as usize]
    }

    pub fn position(&self) -> i32 {
        self.position
    }

    pub fn length(&self) -> i32 {
        self.length
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn data(&self) -> &[i32] {
        &self.data
    }

    /// First 8 steps as a bit pattern, bit i set when step i is positive
    pub fn data_bits(&self) -> i32 {
        self.data[..8]
            .iter()
            .enumerate()
            .filter(|(_, &v)| v > 0)
            .fold(0, |acc, (i, _)| acc | (1 << i))
    }

    pub fn get(&self, name: &str) -> Result<i32> {
        match name {
            "data" => Ok(self.data_bits()),
            "pos" | "position" => Ok(self.position),
            "length" => Ok(self.length),
            "step" => Ok(self.value()),
            "playing" => Ok(i32::from(self.playing)),
            _ => Err(Error::unknown_attribute(Self::TYPE_NAME, name)),
        }
    }

    pub fn set(&mut self, name: &str, value: i32) -> Result<()> {
        match name {
            "data" => {
                for (i, slot) in self.data[..8].iter_mut().enumerate() {
                    *slot = (value >> i) & 1;
                }
            }
            "pos" | "position" => self.position = value.rem_euclid(SEQ_CAPACITY as i32),
            "length" => self.length = value.clamp(1, SEQ_CAPACITY as i32),
            // Packed write: low nibble is the step, next byte the value
            "step" => self.data[(value & 0xF) as usize] = (value >> 4) & 0xFF,
            "playing" => return Err(Error::read_only(Self::TYPE_NAME, name)),
            _ => return Err(Error::unknown_attribute(Self::TYPE_NAME, name)),
        }
        Ok(())
    }

    pub fn advance(&mut self) {
        if self.playing {
            self.position = (self.position + 1) % self.length;
        }
    }

    pub fn start(&mut self) {
        self.playing = true;
        self.position = 0;
    }

    pub fn stop(&mut self) {
        self.playing = false;
    }

    pub fn reset(&mut self) {
        self.position = 0;
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "seq[")?;
        for i in 0..self.length {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", self.data[i as usize])?;
            if i == self.position {
                write!(f, "*")?;
            }
        }
        write!(f, "]")
    }
}

/// Free-running counter object (`count`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Counter {
    value: i32,
    min: i32,
    max: i32,
    step: i32,
    running: bool,
}

impl Default for Counter {
    fn default() -> Self {
        Counter {
            value: 0,
            min: 0,
            max: 16,
            step: 1,
            running: false,
        }
    }
}

impl Counter {
    pub const TYPE_NAME: &'static str = "count";

    pub fn value(&self) -> i32 {
        self.value
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn get(&self, name: &str) -> Result<i32> {
        match name {
            "value" => Ok(self.value),
            "min" => Ok(self.min),
            "max" => Ok(self.max),
            "step" => Ok(self.step),
            "running" => Ok(i32::from(self.running)),
            _ => Err(Error::unknown_attribute(Self::TYPE_NAME, name)),
        }
    }

    pub fn set(&mut self, name: &str, value: i32) -> Result<()> {
        match name {
            "value" => self.value = value,
            "min" => self.min = value,
            "max" => self.max = value,
            "step" => self.step = value,
            "running" => return Err(Error::read_only(Self::TYPE_NAME, name)),
            _ => return Err(Error::unknown_attribute(Self::TYPE_NAME, name)),
        }
        Ok(())
    }

    pub fn advance(&mut self) {
        if !self.running {
            return;
        }
        self.value = self.value.wrapping_add(self.step);
        if self.value > self.max {
            self.value = if self.step > 0 { self.min } else { self.max };
        } else if self.value < self.min {
            self.value = if self.step < 0 { self.max } else { self.min };
        }
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn reset(&mut self) {
        self.value = self.min;
    }
}

impl fmt::Display for Counter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "count:{} [{}:{}:{}]",
            self.value, self.min, self.max, self.step
        )
    }
}

/// Anything a variable can be bound to
#[derive(Debug, Clone)]
pub enum RuntimeObject {
    Int(i32),
    BinaryPattern(BinaryPattern),
    Sequence(Sequence),
    Counter(Counter),
    Module(ModuleState),
    MidiNote(MidiNote),
    MidiCc(MidiCc),
    MidiSeq(MidiSeq),
}

impl RuntimeObject {
    pub fn type_name(&self) -> &'static str {
        match self {
            RuntimeObject::Int(_) => "int",
            RuntimeObject::BinaryPattern(_) => "binary",
            RuntimeObject::Sequence(_) => Sequence::TYPE_NAME,
            RuntimeObject::Counter(_) => Counter::TYPE_NAME,
            RuntimeObject::Module(module) => module.type_name(),
            RuntimeObject::MidiNote(_) => MidiNote::TYPE_NAME,
            RuntimeObject::MidiCc(_) => MidiCc::TYPE_NAME,
            RuntimeObject::MidiSeq(_) => MidiSeq::TYPE_NAME,
        }
    }

    /// Scalar output used by expressions and MIDI
    pub fn value(&self) -> i32 {
        match self {
            RuntimeObject::Int(n) => *n,
            RuntimeObject::BinaryPattern(p) => p.bits(),
            RuntimeObject::Sequence(seq) => seq.value(),
            RuntimeObject::Counter(counter) => counter.value(),
            RuntimeObject::Module(module) => module.value(),
            RuntimeObject::MidiNote(note) => note.value(),
            RuntimeObject::MidiCc(cc) => cc.value(),
            RuntimeObject::MidiSeq(seq) => seq.value(),
        }
    }

    pub fn get(&self, name: &str) -> Result<Value> {
        let value = match self {
            RuntimeObject::Int(n) => match name {
                "value" => *n,
                _ => return Err(Error::unknown_attribute("int", name)),
            },
            RuntimeObject::BinaryPattern(p) => match name {
                "value" => p.bits(),
                _ => return Err(Error::unknown_attribute("binary", name)),
            },
            RuntimeObject::Sequence(seq) => seq.get(name)?,
            RuntimeObject::Counter(counter) => counter.get(name)?,
            RuntimeObject::Module(module) => module.parameter(name)?,
            RuntimeObject::MidiNote(note) => note.get(name)?,
            RuntimeObject::MidiCc(cc) => cc.get(name)?,
            RuntimeObject::MidiSeq(seq) => seq.get(name)?,
        };
        Ok(Value::Integer(value))
    }

    /// Assign an attribute; module values are read through their output
    pub fn set(&mut self, name: &str, value: Value) -> Result<()> {
        let value = value.to_int();
        match self {
            RuntimeObject::Int(n) => match name {
                "value" => *n = value,
                _ => return Err(Error::unknown_attribute("int", name)),
            },
            RuntimeObject::BinaryPattern(p) => match name {
                "value" => *p = BinaryPattern::new(value),
                _ => return Err(Error::unknown_attribute("binary", name)),
            },
            RuntimeObject::Sequence(seq) => seq.set(name, value)?,
            RuntimeObject::Counter(counter) => counter.set(name, value)?,
            RuntimeObject::Module(module) => module.set_parameter(name, value)?,
            RuntimeObject::MidiNote(note) => note.set(name, value)?,
            RuntimeObject::MidiCc(cc) => cc.set(name, value)?,
            RuntimeObject::MidiSeq(seq) => seq.set(name, value)?,
        }
        Ok(())
    }

    /// Attribute names this object answers to
    pub fn attributes(&self) -> Vec<&'static str> {
        match self {
            RuntimeObject::Int(_) | RuntimeObject::BinaryPattern(_) => vec!["value"],
            RuntimeObject::Sequence(_) => vec!["data", "pos", "position", "length", "step", "playing"],
            RuntimeObject::Counter(_) => vec!["value", "min", "max", "step", "running"],
            RuntimeObject::Module(module) => module.parameters().to_vec(),
            RuntimeObject::MidiNote(_) => MidiNote::ATTRIBUTES.to_vec(),
            RuntimeObject::MidiCc(_) => MidiCc::ATTRIBUTES.to_vec(),
            RuntimeObject::MidiSeq(_) => MidiSeq::ATTRIBUTES.to_vec(),
        }
    }

    pub fn supports(&self, operation: Operation) -> bool {
        use Operation::*;
        match self {
            RuntimeObject::Sequence(_) | RuntimeObject::MidiSeq(_) | RuntimeObject::Counter(_) => {
                matches!(operation, Start | Stop | Reset)
            }
            RuntimeObject::MidiNote(_) => matches!(operation, Trigger | Stop),
            RuntimeObject::MidiCc(_) => matches!(operation, Send),
            _ => false,
        }
    }

    /// Run a drained method call against this object
    pub fn apply(&mut self, operation: Operation, sink: &mut dyn MidiSink) -> Result<()> {
        if !self.supports(operation) {
            return Err(Error::unknown_method(self.type_name(), operation.method_name()));
        }
        match (self, operation) {
            (RuntimeObject::Sequence(seq), Operation::Start) => seq.start(),
            (RuntimeObject::Sequence(seq), Operation::Stop) => seq.stop(),
            (RuntimeObject::Sequence(seq), Operation::Reset) => seq.reset(),
            (RuntimeObject::MidiSeq(seq), Operation::Start) => seq.sequence_mut().start(),
            (RuntimeObject::MidiSeq(seq), Operation::Stop) => seq.sequence_mut().stop(),
            (RuntimeObject::MidiSeq(seq), Operation::Reset) => seq.sequence_mut().reset(),
            (RuntimeObject::Counter(counter), Operation::Start) => counter.start(),
            (RuntimeObject::Counter(counter), Operation::Stop) => counter.stop(),
            (RuntimeObject::Counter(counter), Operation::Reset) => counter.reset(),
            (RuntimeObject::MidiNote(note), Operation::Trigger) => note.trigger(sink),
            (RuntimeObject::MidiNote(note), Operation::Stop) => note.stop(sink),
            (RuntimeObject::MidiCc(cc), Operation::Send) => cc.send(sink),
            _ => {}
        }
        Ok(())
    }

    pub fn advance(&mut self, ctx: &mut TickContext<'_>) {
        match self {
            RuntimeObject::Int(_) | RuntimeObject::BinaryPattern(_) => {}
            RuntimeObject::Sequence(seq) => seq.advance(),
            RuntimeObject::Counter(counter) => counter.advance(),
            RuntimeObject::Module(module) => module.advance(ctx.tick),
            RuntimeObject::MidiNote(note) => note.advance(ctx.sink),
            RuntimeObject::MidiCc(cc) => cc.advance(ctx.sink),
            RuntimeObject::MidiSeq(seq) => seq.advance(ctx),
        }
    }

    /// Multi-line view for inspection; modules draw their state
    pub fn render(&self) -> String {
        match self {
            RuntimeObject::Module(module) => module.render(),
            other => other.to_string(),
        }
    }
}

impl From<Value> for RuntimeObject {
    fn from(value: Value) -> Self {
        match value {
            Value::Integer(n) => RuntimeObject::Int(n),
            Value::Module(module) => RuntimeObject::Module(module),
        }
    }
}

impl fmt::Display for RuntimeObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuntimeObject::Int(n) => write!(f, "int:{}", n),
            RuntimeObject::BinaryPattern(p) => write!(f, "{}", p),
            RuntimeObject::Sequence(seq) => write!(f, "{}", seq),
            RuntimeObject::Counter(counter) => write!(f, "{}", counter),
            RuntimeObject::Module(module) => write!(f, "{}:{}", module.type_name(), module.value()),
            RuntimeObject::MidiNote(note) => write!(f, "{}", note),
            RuntimeObject::MidiCc(cc) => write!(f, "{}", cc),
            RuntimeObject::MidiSeq(seq) => write!(f, "{}", seq),
        }
    }
}
