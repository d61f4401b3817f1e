use crate::error::{Error, Result};
use crate::instrument::{MidiCc, MidiNote, MidiSeq};
use crate::module::{ModuleState, MODULE_TYPES};
use crate::object::{BinaryPattern, Counter, RuntimeObject, Sequence};

/// Object type names accepted by [`create_object`], besides the module types
pub const OBJECT_TYPES: &[&str] = &[
    "int", "binary", "seq", "count", "midi_note", "midi_cc", "midi_seq",
];

/// Build a fresh object with default state from its type name
///
/// Object names are lower case (`seq`, `count`, ...); module names are the
/// upper-case generator tags (`PAT`, `EUC`, ...).
pub fn create_object(type_name: &str) -> Result<RuntimeObject> {
    let object = match type_name {
        "int" => RuntimeObject::Int(0),
        "binary" => RuntimeObject::BinaryPattern(BinaryPattern::default()),
        "seq" => RuntimeObject::Sequence(Sequence::default()),
        "count" => RuntimeObject::Counter(Counter::default()),
        "midi_note" => RuntimeObject::MidiNote(MidiNote::default()),
        "midi_cc" => RuntimeObject::MidiCc(MidiCc::default()),
        "midi_seq" => RuntimeObject::MidiSeq(MidiSeq::default()),
        other => ModuleState::create(other)
            .map(RuntimeObject::Module)
            .ok_or_else(|| Error::UnknownType(other.to_string()))?,
    };
    log::debug!("created {} object", object.type_name());
    Ok(object)
}

/// Every name [`create_object`] accepts
pub fn all_types() -> impl Iterator<Item = &'static str> {
    OBJECT_TYPES.iter().chain(MODULE_TYPES.iter()).copied()
}
