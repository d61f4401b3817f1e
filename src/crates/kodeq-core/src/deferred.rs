//! Deferred actions
//!
//! Every method call on a runtime object is recorded as a [`DeferredAction`]
//! and executed at the next tick boundary. Actions are plain data: the target
//! is resolved by name when the queue is drained, so an object that was
//! unbound in the meantime is simply skipped.

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Operation {
    Start,
    Stop,
    Reset,
    Trigger,
    Send,
    /// Note-off for a note sounded on the previous tick
    Release { channel: u8, note: u8 },
}

impl Operation {
    /// Map a method name (`start`, `stop`, ...) to its operation
    pub fn from_method(method: &str) -> Option<Operation> {
        match method.to_ascii_lowercase().as_str() {
            "start" => Some(Operation::Start),
            "stop" => Some(Operation::Stop),
            "reset" => Some(Operation::Reset),
            "trigger" => Some(Operation::Trigger),
            "send" => Some(Operation::Send),
            _ => None,
        }
    }

    pub fn method_name(&self) -> &'static str {
        match self {
            Operation::Start => "start",
            Operation::Stop => "stop",
            Operation::Reset => "reset",
            Operation::Trigger => "trigger",
            Operation::Send => "send",
            Operation::Release { .. } => "release",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeferredAction {
    pub target: String,
    pub operation: Operation,
}

impl DeferredAction {
    pub fn new(target: impl Into<String>, operation: Operation) -> Self {
        DeferredAction {
            target: target.into(),
            operation,
        }
    }
}

impl fmt::Display for DeferredAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.operation {
            Operation::Release { channel, note } => {
                write!(f, "${}.release(ch={}, note={})", self.target, channel, note)
            }
            op => write!(f, "${}.{}()", self.target, op.method_name()),
        }
    }
}
