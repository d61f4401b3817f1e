//! Euclidean rhythm generation (`EUC`)
//!
//! Onsets are spread over the steps with the closed form
//! `((index * hits) mod steps) < hits`. This is not the Bjorklund bucket
//! algorithm; patterns can differ from it by a rotation.

use crate::error::{Error, Result};
use serde::Serialize;

/// Value of step `index` of a `hits`-over-`steps` rhythm
///
/// # Examples
/// ```
/// use kodeq_core::euclid::euclid_step;
///
/// let pattern: Vec<i32> = (0..8).map(|i| euclid_step(3, 8, i)).collect();
/// assert_eq!(pattern, vec![1, 0, 0, 1, 0, 0, 1, 0]);
/// ```
pub fn euclid_step(hits: i32, steps: i32, index: i32) -> i32 {
    if steps <= 0 {
        return 0;
    }
    if hits >= steps {
        return 1;
    }
    if hits <= 0 {
        return 0;
    }

    let position = i64::from(index.rem_euclid(steps));
    let phase = (position * i64::from(hits)) % i64::from(steps);
    i32::from(phase < i64::from(hits))
}

/// Whole cycle of a rhythm, one entry per step
pub fn euclid_pattern(hits: i32, steps: i32) -> Vec<bool> {
    (0..steps.max(0)).map(|i| euclid_step(hits, steps, i) == 1).collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EuclideanModule {
    pub hits: i32,
    pub steps: i32,
    pub index: i32,
}

impl Default for EuclideanModule {
    fn default() -> Self {
        EuclideanModule {
            hits: 0,
            steps: 8,
            index: 0,
        }
    }
}

impl EuclideanModule {
    pub const TYPE_NAME: &'static str = "EUC";
    pub const PARAMETERS: &'static [&'static str] = &["K", "N", "I"];

    pub fn new(hits: i32, steps: i32) -> Self {
        EuclideanModule {
            hits: hits.max(0),
            steps: steps.max(1),
            index: 0,
        }
    }

    pub fn value(&self) -> i32 {
        euclid_step(self.hits, self.steps, self.index)
    }

    pub fn set_parameter(&mut self, name: &str, value: i32) -> Result<()> {
        match name {
            "K" => self.hits = value.max(0),
            // steps is a divisor
            "N" => self.steps = value.max(1),
            "I" => self.index = value,
            _ => return Err(Error::unknown_attribute(Self::TYPE_NAME, name)),
        }
        Ok(())
    }

    pub fn parameter(&self, name: &str) -> Result<i32> {
        match name {
            "K" => Ok(self.hits),
            "N" => Ok(self.steps),
            "I" => Ok(self.index),
            _ => Err(Error::unknown_attribute(Self::TYPE_NAME, name)),
        }
    }

    pub fn advance(&mut self, tick: i32) {
        self.index = tick;
    }

    pub fn render(&self) -> String {
        let step = self.index.rem_euclid(self.steps);
        let mut rep = format!("Euclidean: {}/{}", self.hits, self.steps);
        rep.push_str(&format!("\nIndex: {}", step));
        rep.push_str(&format!("\nCurrent Value: {}", self.value()));
        rep.push_str("\n[");
        for (i, on) in euclid_pattern(self.hits, self.steps).into_iter().enumerate() {
            rep.push(match (i as i32 == step, on) {
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

    fn as_ints(pattern: Vec<bool>) -> Vec<i32> {
        pattern.into_iter().map(i32::from).collect()
    }

    #[test]
    fn test_euclid_3_8() {
        assert_eq!(as_ints(euclid_pattern(3, 8)), vec![1, 0, 0, 1, 0, 0, 1, 0]);
    }

    #[test]
    fn test_euclid_5_8() {
        let pattern = euclid_pattern(5, 8);
        assert_eq!(pattern.len(), 8);
        assert_eq!(pattern.iter().filter(|&&x| x).count(), 5);
    }

    #[test]
    fn test_euclid_empty_and_full() {
        assert_eq!(euclid_pattern(0, 8), vec![false; 8]);
        assert_eq!(euclid_pattern(8, 8), vec![true; 8]);
        assert_eq!(euclid_pattern(10, 8), vec![true; 8]);
    }

    #[test]
    fn test_euclid_zero_steps() {
        assert_eq!(euclid_step(3, 0, 5), 0);
        assert_eq!(euclid_pattern(0, 0), Vec::<bool>::new());
    }

    #[test]
    fn test_negative_index_stays_in_range() {
        assert_eq!(euclid_step(3, 8, -8), euclid_step(3, 8, 0));
        assert_eq!(euclid_step(3, 8, -5), euclid_step(3, 8, 3));
    }

    #[test]
    fn test_module_clamps_parameters() {
        let mut euc = EuclideanModule::default();
        euc.set_parameter("N", 0).unwrap();
        assert_eq!(euc.steps, 1);
        euc.set_parameter("K", -3).unwrap();
        assert_eq!(euc.hits, 0);
        assert_eq!(euc.value(), 0);
        assert!(euc.set_parameter("X", 1).is_err());
    }

    #[test]
    fn test_module_follows_index() {
        let mut euc = EuclideanModule::new(3, 8);
        let values: Vec<i32> = (8..16)
            .map(|t| {
                euc.advance(t);
                euc.value()
            })
            .collect();
        assert_eq!(values, vec![1, 0, 0, 1, 0, 0, 1, 0]);
    }
}
