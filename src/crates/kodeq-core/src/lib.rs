//! Runtime for the KODEQ live-coding language
//!
//! This crate holds everything that lives between ticks: the signal
//! generators, the objects variables are bound to, and the environment that
//! advances them and runs deferred method calls.
//!
//! # Examples
//!
//! ```
//! use kodeq_core::{Environment, Value};
//!
//! let mut env = Environment::new();
//! env.create("beat", "EUC").unwrap();
//! env.set_attribute("beat", "K", Value::from(3)).unwrap();
//!
//! let hits: Vec<i32> = (0..8)
//!     .map(|_| {
//!         let v = env.value("beat").unwrap();
//!         env.tick();
//!         v
//!     })
//!     .collect();
//! assert_eq!(hits, vec![1, 0, 0, 1, 0, 0, 1, 0]);
//! ```
//!
//! # Main Components
//!
//! - **ModuleState**: generator modules (`PAT`, `EUC`, `SIN`, `TRI`, `SAW`, `SQR`, `RND`, `SEQ`)
//! - **RuntimeObject**: anything a variable can hold, with attribute access by name
//! - **Environment**: named objects, the tick counter and the deferred queue
//! - **MidiSink**: where MIDI instruments send their messages

pub mod config;
pub mod deferred;
pub mod environment;
pub mod error;
pub mod euclid;
pub mod factory;
pub mod instrument;
pub mod midi;
pub mod module;
pub mod object;
pub mod oscillator;
pub mod pattern;
pub mod random;
pub mod rng;
pub mod sequencer;
pub mod value;

pub use config::RuntimeConfig;
pub use deferred::{DeferredAction, Operation};
pub use environment::{Environment, SnapshotRow, TICK_MODULUS};
pub use error::{Error, Result};
pub use euclid::{euclid_pattern, euclid_step};
pub use factory::{all_types, create_object, OBJECT_TYPES};
pub use midi::{ChannelSink, MidiMessage, MidiSink, NullSink};
pub use module::{ModuleState, MODULE_TYPES};
pub use object::RuntimeObject;
pub use rng::Rng;
pub use value::Value;
