use crate::evaluator::Context;
use kodeq_core::Environment;

/// Variables read the bound object's scalar value; `RND` draws from the
/// environment's shared generator
impl Context for Environment {
    fn variable(&self, name: &str) -> Option<i32> {
        self.value(name)
    }

    fn tick(&self) -> i32 {
        self.tick_count()
    }

    fn random(&mut self, min: i32, max: i32) -> i32 {
        self.rng_mut().uniform(min, max)
    }
}
