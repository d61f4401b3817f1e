//! Bit pattern generator (`PAT`)

use crate::error::{Error, Result};
use serde::Serialize;

/// Reads one bit of `bits` per step
///
/// The value at index `i` is bit `i mod 32`, least significant bit first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PatternModule {
    pub bits: i32,
    pub index: i32,
}

impl PatternModule {
    pub const TYPE_NAME: &'static str = "PAT";
    pub const PARAMETERS: &'static [&'static str] = &["P", "I"];

    pub fn new(bits: i32) -> Self {
        PatternModule { bits, index: 0 }
    }

    pub fn value(&self) -> i32 {
        (self.bits >> self.index.rem_euclid(32)) & 1
    }

    pub fn set_parameter(&mut self, name: &str, value: i32) -> Result<()> {
        match name {
            "P" => self.bits = value,
            "I" => self.index = value,
            _ => return Err(Error::unknown_attribute(Self::TYPE_NAME, name)),
        }
        Ok(())
    }

    pub fn parameter(&self, name: &str) -> Result<i32> {
        match name {
            "P" => Ok(self.bits),
            "I" => Ok(self.index),
            _ => Err(Error::unknown_attribute(Self::TYPE_NAME, name)),
        }
    }

    pub fn advance(&mut self, tick: i32) {
        self.index = tick;
    }

    /// Rotate the low 8 bits left by `amount` (negative rotates right)
    pub fn rotated(&self, amount: i32) -> PatternModule {
        let byte = (self.bits & 0xFF) as u8;
        let shift = amount.rem_euclid(8) as u32;
        PatternModule::new(i32::from(byte.rotate_left(shift)))
    }

    /// Mirror the low 8 bits (bit 0 becomes bit 7)
    pub fn reversed(&self) -> PatternModule {
        let byte = (self.bits & 0xFF) as u8;
        PatternModule::new(i32::from(byte.reverse_bits()))
    }

    pub fn render(&self) -> String {
        let step = self.index.rem_euclid(8);
        let mut rep = String::from("Pattern: ");
        for i in (0..8).rev() {
            rep.push(if (self.bits >> i) & 1 == 1 { '1' } else { '0' });
        }
        rep.push_str(&format!("\nIndex: {}", step));
        rep.push_str(&format!("\nCurrent Bit: {}", (self.bits >> step) & 1));
        rep.push_str("\n[");
        for i in 0..8 {
            let on = (self.bits >> i) & 1 == 1;
            rep.push(match (i == step, on) {
                (true, true) => '*',
                (true, false) => '.',
                (false, true) => 'o',
                (false, false) => '-',
            });
        }
        rep.push(']');
        rep
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bits_at(module: &mut PatternModule, range: std::ops::Range<i32>) -> Vec<i32> {
        range
            .map(|i| {
                module.advance(i);
                module.value()
            })
            .collect()
    }

    #[test]
    fn test_pattern_reads_lsb_first() {
        let mut pat = PatternModule::new(0b1011);
        assert_eq!(bits_at(&mut pat, 0..5), vec![1, 1, 0, 1, 0]);
    }

    #[test]
    fn test_pattern_index_wraps_at_32() {
        let mut pat = PatternModule::new(1);
        pat.set_parameter("I", 32).unwrap();
        assert_eq!(pat.value(), 1);
        pat.set_parameter("I", -32).unwrap();
        assert_eq!(pat.value(), 1);
    }

    #[test]
    fn test_unknown_parameter() {
        let mut pat = PatternModule::default();
        assert!(matches!(
            pat.set_parameter("p", 1),
            Err(Error::UnknownAttribute { .. })
        ));
        assert!(pat.parameter("LEN").is_err());
    }

    #[test]
    fn test_rotate_and_reverse() {
        let pat = PatternModule::new(0b1000_0001);
        assert_eq!(pat.rotated(1).bits, 0b0000_0011);
        assert_eq!(pat.rotated(-1).bits, 0b1100_0000);
        assert_eq!(PatternModule::new(0b0000_0110).reversed().bits, 0b0110_0000);
    }

    #[test]
    fn test_render() {
        let pat = PatternModule::new(0b101);
        let rep = pat.render();
        assert!(rep.starts_with("Pattern: 00000101"));
        assert!(rep.ends_with("[*-o-----]"));
    }
}
