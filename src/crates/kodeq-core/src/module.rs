use crate::error::{Error, Result};
use crate::euclid::EuclideanModule;
use crate::oscillator::{Oscillator, Waveform};
use crate::pattern::PatternModule;
use crate::random::RandomModule;
use crate::sequencer::SequencerModule;
use serde::Serialize;
use std::fmt;

/// Every module type name, in registration order
pub const MODULE_TYPES: &[&str] = &["PAT", "EUC", "SIN", "TRI", "SAW", "SQR", "RND", "SEQ"];

/// A signal generator and its state
///
/// Modules never move on their own: the environment feeds the tick count in
/// through [`ModuleState::advance`], which sets `I` (pattern, Euclidean) or
/// `POS` (everything else).
#[derive(Debug, Clone, Serialize)]
pub enum ModuleState {
    Pattern(PatternModule),
    Euclidean(EuclideanModule),
    Oscillator(Oscillator),
    Random(RandomModule),
    Sequencer(SequencerModule),
}

impl ModuleState {
    /// Build a module with default parameters from its type name
    pub fn create(type_name: &str) -> Option<ModuleState> {
        let module = match type_name {
            "PAT" => ModuleState::Pattern(PatternModule::default()),
            "EUC" => ModuleState::Euclidean(EuclideanModule::default()),
            "SIN" => ModuleState::Oscillator(Oscillator::new(Waveform::Sine)),
            "TRI" => ModuleState::Oscillator(Oscillator::new(Waveform::Triangle)),
            "SAW" => ModuleState::Oscillator(Oscillator::new(Waveform::Sawtooth)),
            "SQR" => ModuleState::Oscillator(Oscillator::new(Waveform::Square)),
            "RND" => ModuleState::Random(RandomModule::default()),
            "SEQ" => ModuleState::Sequencer(SequencerModule::default()),
            _ => return None,
        };
        Some(module)
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            ModuleState::Pattern(_) => PatternModule::TYPE_NAME,
            ModuleState::Euclidean(_) => EuclideanModule::TYPE_NAME,
            ModuleState::Oscillator(osc) => osc.waveform.type_name(),
            ModuleState::Random(_) => RandomModule::TYPE_NAME,
            ModuleState::Sequencer(_) => SequencerModule::TYPE_NAME,
        }
    }

    pub fn parameters(&self) -> &'static [&'static str] {
        match self {
            ModuleState::Pattern(_) => PatternModule::PARAMETERS,
            ModuleState::Euclidean(_) => EuclideanModule::PARAMETERS,
            ModuleState::Oscillator(osc) => osc.parameters(),
            ModuleState::Random(_) => RandomModule::PARAMETERS,
            ModuleState::Sequencer(_) => SequencerModule::PARAMETERS,
        }
    }

    pub fn value(&self) -> i32 {
        match self {
            ModuleState::Pattern(m) => m.value(),
            ModuleState::Euclidean(m) => m.value(),
            ModuleState::Oscillator(m) => m.value(),
            ModuleState::Random(m) => m.value(),
            ModuleState::Sequencer(m) => m.value(),
        }
    }

    pub fn set_parameter(&mut self, name: &str, value: i32) -> Result<()> {
        match self {
            ModuleState::Pattern(m) => m.set_parameter(name, value),
            ModuleState::Euclidean(m) => m.set_parameter(name, value),
            ModuleState::Oscillator(m) => m.set_parameter(name, value),
            ModuleState::Random(m) => m.set_parameter(name, value),
            ModuleState::Sequencer(m) => m.set_parameter(name, value),
        }
    }

    pub fn parameter(&self, name: &str) -> Result<i32> {
        match self {
            ModuleState::Pattern(m) => m.parameter(name),
            ModuleState::Euclidean(m) => m.parameter(name),
            ModuleState::Oscillator(m) => m.parameter(name),
            ModuleState::Random(m) => m.parameter(name),
            ModuleState::Sequencer(m) => m.parameter(name),
        }
    }

    pub fn advance(&mut self, tick: i32) {
        match self {
            ModuleState::Pattern(m) => m.advance(tick),
            ModuleState::Euclidean(m) => m.advance(tick),
            ModuleState::Oscillator(m) => m.advance(tick),
            ModuleState::Random(m) => m.advance(tick),
            ModuleState::Sequencer(m) => m.advance(tick),
        }
    }

    /// Multi-line picture of the module state for inspection
    pub fn render(&self) -> String {
        match self {
            ModuleState::Pattern(m) => m.render(),
            ModuleState::Euclidean(m) => m.render(),
            ModuleState::Oscillator(m) => m.render(),
            ModuleState::Random(m) => m.render(),
            ModuleState::Sequencer(m) => m.render(),
        }
    }

    /// New `PAT` module with the low 8 bits rotated left by `amount`
    pub fn rotate(&self, amount: i32) -> Result<ModuleState> {
        match self {
            ModuleState::Pattern(m) => Ok(ModuleState::Pattern(m.rotated(amount))),
            other => Err(Error::unknown_method(other.type_name(), "rotate")),
        }
    }

    /// New `PAT` module with the low 8 bits mirrored
    pub fn reverse(&self) -> Result<ModuleState> {
        match self {
            ModuleState::Pattern(m) => Ok(ModuleState::Pattern(m.reversed())),
            other => Err(Error::unknown_method(other.type_name(), "reverse")),
        }
    }
}

impl fmt::Display for ModuleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_name())
    }
}
