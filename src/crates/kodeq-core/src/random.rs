//! Probabilistic gate pattern (`RND`)

use crate::error::{Error, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

/// Pre-generated random on/off pattern
///
/// `length` gates are drawn up front from the module's own generator, each
/// on with `probability` percent. Changing `P`, `LEN` or `SEED` redraws the
/// whole pattern; with `REGEN` on, so does every wrap of `POS` back to step 0.
#[derive(Debug, Clone, Serialize)]
pub struct RandomModule {
    pub probability: i32,
    pub seed: i32,
    pub length: i32,
    pub pos: i32,
    pub regenerate_on_cycle: bool,
    pattern: Vec<bool>,
    #[serde(skip)]
    rng: StdRng,
}

impl Default for RandomModule {
    fn default() -> Self {
        let mut module = RandomModule {
            probability: 50,
            seed: 0,
            length: 16,
            pos: 0,
            regenerate_on_cycle: true,
            pattern: Vec::new(),
            rng: StdRng::seed_from_u64(0),
        };
        module.generate();
        module
    }
}

/// Longest pattern `LEN` accepts; `POS` follows the 256-step tick counter
pub const MAX_LENGTH: i32 = 256;

impl RandomModule {
    pub const TYPE_NAME: &'static str = "RND";
    pub const PARAMETERS: &'static [&'static str] = &["P", "LEN", "POS", "SEED", "REGEN"];

    pub fn with_seed(seed: i32) -> Self {
        let mut module = RandomModule::default();
        module.reseed(seed);
        module
    }

    fn reseed(&mut self, seed: i32) {
        self.seed = seed;
        self.rng = StdRng::seed_from_u64(seed as u64);
        self.generate();
    }

    fn generate(&mut self) {
        let probability = self.probability;
        let rng = &mut self.rng;
        self.pattern = (0..self.length)
            .map(|_| rng.gen_range(1..=100) <= probability)
            .collect();
    }

    pub fn pattern(&self) -> &[bool] {
        &self.pattern
    }

    pub fn value(&self) -> i32 {
        let step = self.pos.rem_euclid(self.length) as usize;
        i32::from(self.pattern[step])
    }

    pub fn set_parameter(&mut self, name: &str, value: i32) -> Result<()> {
        match name {
            "P" => {
                self.probability = value.clamp(0, 100);
                self.generate();
            }
            "LEN" => {
                self.length = value.clamp(1, MAX_LENGTH);
                self.generate();
            }
            "POS" => self.set_pos(value),
            "SEED" => self.reseed(value),
            "REGEN" => self.regenerate_on_cycle = value != 0,
            _ => return Err(Error::unknown_attribute(Self::TYPE_NAME, name)),
        }
        Ok(())
    }

    pub fn parameter(&self, name: &str) -> Result<i32> {
        match name {
            "P" => Ok(self.probability),
            "LEN" => Ok(self.length),
            "POS" => Ok(self.pos),
            "SEED" => Ok(self.seed),
            "REGEN" => Ok(i32::from(self.regenerate_on_cycle)),
            _ => Err(Error::unknown_attribute(Self::TYPE_NAME, name)),
        }
    }

    pub fn advance(&mut self, tick: i32) {
        self.set_pos(tick);
    }

    fn set_pos(&mut self, pos: i32) {
        self.pos = pos;
        if self.regenerate_on_cycle && pos > 0 && pos % self.length == 0 {
            self.generate();
        }
    }

    pub fn render(&self) -> String {
        let step = self.pos.rem_euclid(self.length) as usize;
        let mut rep = String::from("Random Generator");
        rep.push_str(&format!("\nProbability: {}%", self.probability));
        rep.push_str(&format!("\nLength: {}", self.length));
        rep.push_str(&format!("\nPosition: {}", step));
        rep.push_str(&format!("\nSeed: {}", self.seed));
        rep.push_str(&format!(
            "\nRegenerate: {}",
            if self.regenerate_on_cycle { "Yes" } else { "No" }
        ));
        rep.push_str("\n[");
        for (i, &on) in self.pattern.iter().enumerate() {
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

    #[test]
    fn test_pattern_has_length_entries() {
        let mut rnd = RandomModule::default();
        assert_eq!(rnd.pattern().len(), 16);
        rnd.set_parameter("LEN", 5).unwrap();
        assert_eq!(rnd.pattern().len(), 5);
        rnd.set_parameter("LEN", 0).unwrap();
        assert_eq!(rnd.pattern().len(), 1);
    }

    #[test]
    fn test_length_is_capped() {
        let mut rnd = RandomModule::default();
        rnd.set_parameter("LEN", i32::MAX).unwrap();
        assert_eq!(rnd.parameter("LEN").unwrap(), MAX_LENGTH);
        assert_eq!(rnd.pattern().len(), MAX_LENGTH as usize);

        rnd.set_parameter("POS", 300).unwrap();
        assert_eq!(rnd.value(), i32::from(rnd.pattern()[44]));
    }

    #[test]
    fn test_probability_extremes() {
        let mut rnd = RandomModule::with_seed(3);
        rnd.set_parameter("P", 0).unwrap();
        assert!(rnd.pattern().iter().all(|&on| !on));
        rnd.set_parameter("P", 250).unwrap();
        assert_eq!(rnd.probability, 100);
        assert!(rnd.pattern().iter().all(|&on| on));
    }

    #[test]
    fn test_same_seed_same_pattern() {
        let a = RandomModule::with_seed(1234);
        let b = RandomModule::with_seed(1234);
        assert_eq!(a.pattern(), b.pattern());
    }

    #[test]
    fn test_regenerates_on_wrap_only_when_enabled() {
        let mut rnd = RandomModule::with_seed(9);
        rnd.set_parameter("LEN", 64).unwrap();
        let first = rnd.pattern().to_vec();

        rnd.set_parameter("POS", 63).unwrap();
        assert_eq!(rnd.pattern(), first.as_slice());

        rnd.set_parameter("POS", 64).unwrap();
        assert_ne!(rnd.pattern(), first.as_slice());

        rnd.set_parameter("REGEN", 0).unwrap();
        let second = rnd.pattern().to_vec();
        rnd.set_parameter("POS", 128).unwrap();
        assert_eq!(rnd.pattern(), second.as_slice());
    }

    #[test]
    fn test_clone_is_independent_and_identical() {
        let mut source = RandomModule::with_seed(77);
        source.set_parameter("LEN", 32).unwrap();
        let mut copy = source.clone();
        assert_eq!(copy.pattern(), source.pattern());

        // Same generator state, so the next redraw matches too
        copy.set_parameter("P", 60).unwrap();
        source.set_parameter("P", 60).unwrap();
        assert_eq!(copy.pattern(), source.pattern());

        copy.set_parameter("P", 0).unwrap();
        assert!(copy.pattern().iter().all(|&on| !on));
        assert_eq!(source.probability, 60);
    }

    #[test]
    fn test_value_reads_current_step() {
        let mut rnd = RandomModule::with_seed(5);
        rnd.set_parameter("REGEN", 0).unwrap();
        for pos in 0..40 {
            rnd.advance(pos);
            let expected = i32::from(rnd.pattern()[(pos % 16) as usize]);
            assert_eq!(rnd.value(), expected);
        }
    }
}
