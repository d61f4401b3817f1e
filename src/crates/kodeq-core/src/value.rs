use crate::module::ModuleState;
use serde::Serialize;
use std::fmt;

/// Represents a value produced by the engine
///
/// Values are never mutated through a binding: assigning a new value
/// replaces the old one wholesale.
#[derive(Debug, Clone, Serialize)]
pub enum Value {
    /// Plain integer
    Integer(i32),
    /// Snapshot of a module (pattern, oscillator, ...)
    Module(ModuleState),
}

impl Value {
    /// Scalar view: the integer itself, or the module's current output
    pub fn to_int(&self) -> i32 {
        match self {
            Value::Integer(n) => *n,
            Value::Module(module) => module.value(),
        }
    }

    pub fn as_integer(&self) -> Option<i32> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_module(&self) -> Option<&ModuleState> {
        match self {
            Value::Module(module) => Some(module),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "INTEGER",
            Value::Module(_) => "MODULE",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(n) => write!(f, "{}", n),
            Value::Module(module) => write!(f, "{}", module.type_name()),
        }
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Integer(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Integer(i32::from(b))
    }
}

impl From<ModuleState> for Value {
    fn from(module: ModuleState) -> Self {
        Value::Module(module)
    }
}

impl PartialEq<i32> for Value {
    fn eq(&self, other: &i32) -> bool {
        self.as_integer() == Some(*other)
    }
}
