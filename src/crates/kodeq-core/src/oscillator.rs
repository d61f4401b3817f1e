//! Periodic waveform generators (`SIN`, `TRI`, `SAW`, `SQR`)
//!
//! Every waveform produces a raw sample in `0..=255` for the current phase,
//! then rescales it around the midpoint 128 by `amplitude / 127`.

use crate::error::{Error, Result};
use serde::Serialize;

const SINE_TABLE: [i32; 16] = [
    128, 176, 218, 245, 255, 245, 218, 176, 128, 80, 38, 11, 0, 11, 38, 80,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Waveform {
    Sine,
    Triangle,
    Sawtooth,
    Square,
}

impl Waveform {
    pub fn type_name(&self) -> &'static str {
        match self {
            Waveform::Sine => "SIN",
            Waveform::Triangle => "TRI",
            Waveform::Sawtooth => "SAW",
            Waveform::Square => "SQR",
        }
    }

    fn title(&self) -> &'static str {
        match self {
            Waveform::Sine => "Sine Wave",
            Waveform::Triangle => "Triangle Wave",
            Waveform::Sawtooth => "Sawtooth Wave",
            Waveform::Square => "Square Wave",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Oscillator {
    pub waveform: Waveform,
    pub length: i32,
    pub pos: i32,
    pub amplitude: i32,
    /// Percentage of the period spent high. Only the square wave reads it.
    pub duty: i32,
}

impl Oscillator {
    pub fn new(waveform: Waveform) -> Self {
        Oscillator {
            waveform,
            length: 16,
            pos: 0,
            amplitude: 127,
            duty: 50,
        }
    }

    pub fn parameters(&self) -> &'static [&'static str] {
        match self.waveform {
            Waveform::Square => &["LEN", "POS", "A", "D"],
            _ => &["LEN", "POS", "A"],
        }
    }

    fn phase(&self) -> i32 {
        self.pos.rem_euclid(self.length)
    }

    fn raw(&self) -> i32 {
        // widened so long periods cannot overflow the scaling
        let phase = i64::from(self.phase());
        let length = i64::from(self.length);
        let raw = match self.waveform {
            Waveform::Sine => i64::from(SINE_TABLE[(phase * 16 / length) as usize]),
            Waveform::Triangle => {
                let normalized = phase * 256 / length;
                if normalized < 128 {
                    normalized * 255 / 128
                } else {
                    255 - (normalized - 128) * 255 / 128
                }
            }
            Waveform::Sawtooth => phase * 255 / length,
            Waveform::Square => {
                if phase * 100 / length < i64::from(self.duty) {
                    255
                } else {
                    0
                }
            }
        };
        raw as i32
    }

    pub fn value(&self) -> i32 {
        128 + (self.raw() - 128) * self.amplitude / 127
    }

    pub fn set_parameter(&mut self, name: &str, value: i32) -> Result<()> {
        match name {
            "LEN" => self.length = value.max(1),
            "POS" => self.pos = value,
            "A" => self.amplitude = value.clamp(0, 127),
            "D" if self.waveform == Waveform::Square => self.duty = value.clamp(0, 100),
            _ => return Err(Error::unknown_attribute(self.waveform.type_name(), name)),
        }
        Ok(())
    }

    pub fn parameter(&self, name: &str) -> Result<i32> {
        match name {
            "LEN" => Ok(self.length),
            "POS" => Ok(self.pos),
            "A" => Ok(self.amplitude),
            "D" if self.waveform == Waveform::Square => Ok(self.duty),
            _ => Err(Error::unknown_attribute(self.waveform.type_name(), name)),
        }
    }

    pub fn advance(&mut self, tick: i32) {
        self.pos = tick;
    }

    pub fn render(&self) -> String {
        let mut rep = String::from(self.waveform.title());
        rep.push_str(&format!("\nLength: {}", self.length));
        rep.push_str(&format!("\nPosition: {}", self.phase()));
        rep.push_str(&format!("\nAmplitude: {}", self.amplitude));
        if self.waveform == Waveform::Square {
            rep.push_str(&format!("\nDuty Cycle: {}%", self.duty));
        }

        // One row, -10..=10 around the axis, marking the current level
        rep.push('\n');
        let level = (self.value() - 128) * 10 / 128;
        let axis = if self.waveform == Waveform::Sine { '|' } else { '-' };
        for y in (-10..=10).rev() {
            rep.push(if y == 0 {
                axis
            } else if y == level {
                '*'
            } else {
                ' '
            });
        }
        rep
    }
}
