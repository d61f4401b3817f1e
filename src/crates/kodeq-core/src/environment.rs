//! Variable table and tick scheduler

use crate::config::RuntimeConfig;
use crate::deferred::{DeferredAction, Operation};
use crate::error::{Error, Result};
use crate::factory::create_object;
use crate::midi::{MidiMessage, MidiSink, NullSink};
use crate::object::{RuntimeObject, TickContext};
use crate::rng::Rng;
use crate::value::Value;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::mem;

/// Tick counter wraps at this value
pub const TICK_MODULUS: i32 = 256;

/// One row of [`Environment::snapshot`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SnapshotRow {
    pub name: String,
    pub type_name: String,
    pub value: i32,
}

/// Owns every bound object and drives them through ticks
///
/// Names are case-insensitive and stored upper case. Objects advance in name
/// order. Method calls are queued and run after the next tick's advances, so
/// an action queued during tick `n` takes effect during tick `n + 1`.
pub struct Environment {
    objects: BTreeMap<String, RuntimeObject>,
    pending: Vec<DeferredAction>,
    tick: i32,
    rng: Rng,
    sink: Box<dyn MidiSink>,
}

fn normalize(name: &str) -> String {
    name.trim_start_matches('$').to_ascii_uppercase()
}

impl Default for Environment {
    fn default() -> Self {
        Environment::new()
    }
}

impl Environment {
    /// Empty environment with a fixed seed of 0 and no MIDI backend
    pub fn new() -> Self {
        Environment {
            objects: BTreeMap::new(),
            pending: Vec::new(),
            tick: 0,
            rng: Rng::default(),
            sink: Box::new(NullSink),
        }
    }

    pub fn with_config(config: &RuntimeConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => Rng::new(seed),
            None => Rng::from_entropy(),
        };
        log::debug!("environment seeded with {}", rng.seed());
        Environment {
            rng,
            ..Environment::new()
        }
    }

    pub fn with_sink(mut self, sink: impl MidiSink + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    pub fn set_sink(&mut self, sink: Box<dyn MidiSink>) {
        self.sink = sink;
    }

    pub fn tick_count(&self) -> i32 {
        self.tick
    }

    pub fn rng(&self) -> &Rng {
        &self.rng
    }

    pub fn rng_mut(&mut self) -> &mut Rng {
        &mut self.rng
    }

    /// Bind an object, dropping whatever was bound under the name before
    pub fn bind(&mut self, name: &str, object: RuntimeObject) {
        let key = normalize(name);
        log::debug!("bind ${} = {}", key, object);
        self.objects.insert(key, object);
    }

    pub fn bind_value(&mut self, name: &str, value: Value) {
        self.bind(name, RuntimeObject::from(value));
    }

    /// Create an object from its type name and bind it
    pub fn create(&mut self, name: &str, type_name: &str) -> Result<()> {
        let object = create_object(type_name)?;
        self.bind(name, object);
        Ok(())
    }

    /// Bind `target` to an independent copy of `source`
    pub fn assign(&mut self, target: &str, source: &str) -> Result<()> {
        let copy = self.get(source)?.clone();
        self.bind(target, copy);
        Ok(())
    }

    pub fn unbind(&mut self, name: &str) -> Option<RuntimeObject> {
        self.objects.remove(&normalize(name))
    }

    pub fn lookup(&self, name: &str) -> Option<&RuntimeObject> {
        self.objects.get(&normalize(name))
    }

    pub fn lookup_mut(&mut self, name: &str) -> Option<&mut RuntimeObject> {
        self.objects.get_mut(&normalize(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.objects.contains_key(&normalize(name))
    }

    fn get(&self, name: &str) -> Result<&RuntimeObject> {
        self.lookup(name)
            .ok_or_else(|| Error::Unbound(normalize(name)))
    }

    fn get_mut(&mut self, name: &str) -> Result<&mut RuntimeObject> {
        self.lookup_mut(name)
            .ok_or_else(|| Error::Unbound(normalize(name)))
    }

    pub fn get_attribute(&self, name: &str, attribute: &str) -> Result<Value> {
        self.get(name)?.get(attribute)
    }

    pub fn set_attribute(&mut self, name: &str, attribute: &str, value: Value) -> Result<()> {
        self.get_mut(name)?.set(attribute, value)
    }

    /// Scalar value of a bound object
    pub fn value(&self, name: &str) -> Option<i32> {
        self.lookup(name).map(RuntimeObject::value)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.objects.keys().map(String::as_str)
    }

    /// Check a method call now and run it at the next tick
    pub fn invoke(&mut self, name: &str, method: &str) -> Result<()> {
        let object = self.get(name)?;
        let operation = Operation::from_method(method)
            .filter(|&op| object.supports(op))
            .ok_or_else(|| Error::unknown_method(object.type_name(), method))?;
        self.queue_deferred(DeferredAction::new(normalize(name), operation));
        Ok(())
    }

    pub fn queue_deferred(&mut self, action: DeferredAction) {
        log::trace!("queued {}", action);
        self.pending.push(action);
    }

    pub fn pending(&self) -> &[DeferredAction] {
        &self.pending
    }

    /// Advance the clock by one tick
    ///
    /// Runs the actions queued before this call, after every object has
    /// advanced. Actions queued during the tick, including note-offs a
    /// `midi_seq` queues while advancing, run on the next one.
    pub fn tick(&mut self) {
        self.tick = (self.tick + 1) % TICK_MODULUS;

        // Everything queued from here on, by advances or by the drain itself,
        // lands in the fresh queue and waits for the next tick
        let due = mem::take(&mut self.pending);

        for (name, object) in self.objects.iter_mut() {
            let mut ctx = TickContext {
                tick: self.tick,
                name,
                sink: self.sink.as_mut(),
                deferred: &mut self.pending,
            };
            object.advance(&mut ctx);
        }

        for action in due {
            self.run_action(action);
        }
    }

    pub fn run(&mut self, ticks: usize) {
        for _ in 0..ticks {
            self.tick();
        }
    }

    fn run_action(&mut self, action: DeferredAction) {
        if let Operation::Release { channel, note } = action.operation {
            self.sink.send(MidiMessage::NoteOff { channel, note });
            return;
        }
        let Some(object) = self.objects.get_mut(&action.target) else {
            log::warn!("skipping {}: ${} is no longer bound", action, action.target);
            return;
        };
        if let Err(e) = object.apply(action.operation, self.sink.as_mut()) {
            log::warn!("skipping {}: {}", action, e);
        }
    }

    pub fn snapshot(&self) -> Vec<SnapshotRow> {
        self.objects
            .iter()
            .map(|(name, object)| SnapshotRow {
                name: name.clone(),
                type_name: object.type_name().to_string(),
                value: object.value(),
            })
            .collect()
    }
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Environment")
            .field("objects", &self.objects)
            .field("pending", &self.pending)
            .field("tick", &self.tick)
            .field("rng", &self.rng)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, object) in &self.objects {
            writeln!(f, "${} = {}", name, object)?;
        }
        Ok(())
    }
}
