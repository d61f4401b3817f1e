//! Step sequencer generator (`SEQ`)

use crate::error::{Error, Result};
use serde::Serialize;

pub const MAX_STEPS: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SequencerModule {
    pub steps: [i32; MAX_STEPS],
    pub pos: i32,
    pub length: i32,
    pub looping: bool,
}

impl Default for SequencerModule {
    fn default() -> Self {
        SequencerModule {
            steps: [0; MAX_STEPS],
            pos: 0,
            length: 8,
            looping: true,
        }
    }
}

/// Parse `S1`..`S16` into a zero-based step index
fn step_slot(name: &str) -> Option<usize> {
    let digits = name.strip_prefix('S')?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let n: usize = digits.parse().ok()?;
    (1..=MAX_STEPS).contains(&n).then(|| n - 1)
}

impl SequencerModule {
    pub const TYPE_NAME: &'static str = "SEQ";
    pub const PARAMETERS: &'static [&'static str] = &[
        "POS", "LEN", "LOOP", "S1", "S2", "S3", "S4", "S5", "S6", "S7", "S8", "S9", "S10",
        "S11", "S12", "S13", "S14", "S15", "S16",
    ];

    pub fn value(&self) -> i32 {
        if !self.looping && self.pos >= self.length {
            return 0;
        }
        self.steps[self.pos.rem_euclid(self.length) as usize]
    }

    pub fn set_step(&mut self, index: usize, value: i32) {
        if let Some(slot) = self.steps.get_mut(index) {
            *slot = value;
        }
    }

    pub fn step(&self, index: usize) -> i32 {
        self.steps.get(index).copied().unwrap_or(0)
    }

    pub fn set_parameter(&mut self, name: &str, value: i32) -> Result<()> {
        match name {
            "POS" => self.pos = value,
            "LEN" => self.length = value.clamp(1, MAX_STEPS as i32),
            "LOOP" => self.looping = value != 0,
            _ => match step_slot(name) {
                Some(slot) => self.steps[slot] = value,
                None => return Err(Error::unknown_attribute(Self::TYPE_NAME, name)),
            },
        }
        Ok(())
    }

    pub fn parameter(&self, name: &str) -> Result<i32> {
        match name {
            "POS" => Ok(self.pos),
            "LEN" => Ok(self.length),
            "LOOP" => Ok(i32::from(self.looping)),
            _ => step_slot(name)
                .map(|slot| self.steps[slot])
                .ok_or_else(|| Error::unknown_attribute(Self::TYPE_NAME, name)),
        }
    }

    pub fn advance(&mut self, tick: i32) {
        self.pos = tick;
    }

    pub fn render(&self) -> String {
        let current = self.pos.rem_euclid(self.length);
        let mut rep = String::from("Sequencer");
        rep.push_str(&format!("\nLength: {}", self.length));
        rep.push_str(&format!("\nPosition: {}", current));
        rep.push_str(&format!("\nLooping: {}", if self.looping { "Yes" } else { "No" }));
        rep.push_str("\nSteps:");
        for value in &self.steps[..self.length as usize] {
            rep.push_str(&format!(" {}", value));
        }
        rep.push('\n');
        for i in 0..self.length {
            rep.push_str(if i == current { "^ " } else { "  " });
        }
        rep
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_slot_names() {
        assert_eq!(step_slot("S1"), Some(0));
        assert_eq!(step_slot("S16"), Some(15));
        assert_eq!(step_slot("S0"), None);
        assert_eq!(step_slot("S17"), None);
        assert_eq!(step_slot("S"), None);
        assert_eq!(step_slot("S+1"), None);
        assert_eq!(step_slot("s1"), None);
    }

    #[test]
    fn test_looping_playback() {
        let mut seq = SequencerModule::default();
        seq.set_parameter("LEN", 3).unwrap();
        for (i, v) in [10, 20, 30].into_iter().enumerate() {
            seq.set_parameter(&format!("S{}", i + 1), v).unwrap();
        }
        let values: Vec<i32> = (0..7)
            .map(|t| {
                seq.advance(t);
                seq.value()
            })
            .collect();
        assert_eq!(values, vec![10, 20, 30, 10, 20, 30, 10]);
    }

    #[test]
    fn test_one_shot_goes_silent() {
        let mut seq = SequencerModule::default();
        seq.set_parameter("LEN", 2).unwrap();
        seq.set_parameter("S1", 5).unwrap();
        seq.set_parameter("S2", 6).unwrap();
        seq.set_parameter("LOOP", 0).unwrap();
        seq.advance(1);
        assert_eq!(seq.value(), 6);
        seq.advance(2);
        assert_eq!(seq.value(), 0);
    }

    #[test]
    fn test_length_clamped() {
        let mut seq = SequencerModule::default();
        seq.set_parameter("LEN", 40).unwrap();
        assert_eq!(seq.length, 16);
        seq.set_parameter("LEN", -1).unwrap();
        assert_eq!(seq.length, 1);
    }

    #[test]
    fn test_unknown_parameter() {
        let mut seq = SequencerModule::default();
        assert!(seq.set_parameter("S99", 1).is_err());
        assert!(seq.parameter("STEP").is_err());
        assert_eq!(seq.step(99), 0);
    }
}
