use kodeq_core::{create_object, euclid_step, Environment, ModuleState, Value, TICK_MODULUS};
use proptest::prelude::*;

proptest! {
    #[test]
    fn euclid_places_exactly_k_hits(steps in 1i32..64, hits_seed in 0i32..64) {
        let hits = hits_seed % (steps + 1);
        let count: i32 = (0..steps).map(|i| euclid_step(hits, steps, i)).sum();
        prop_assert_eq!(count, hits);
    }
}

proptest! {
    #[test]
    fn euclid_is_periodic_for_any_index(hits in 0i32..32, steps in 1i32..32, index in any::<i32>()) {
        let wrapped = index.rem_euclid(steps);
        prop_assert_eq!(euclid_step(hits, steps, index), euclid_step(hits, steps, wrapped));
    }
}

proptest! {
    #[test]
    fn oscillators_stay_in_byte_range(
        kind in prop::sample::select(vec!["SIN", "TRI", "SAW", "SQR"]),
        len in any::<i32>(),
        pos in any::<i32>(),
        amp in any::<i32>(),
    ) {
        let mut osc = ModuleState::create(kind).unwrap();
        osc.set_parameter("LEN", len).unwrap();
        osc.set_parameter("POS", pos).unwrap();
        osc.set_parameter("A", amp).unwrap();
        let v = osc.value();
        prop_assert!((0..=255).contains(&v), "{} gave {}", kind, v);
    }
}

proptest! {
    #[test]
    fn gates_are_binary(
        kind in prop::sample::select(vec!["PAT", "EUC", "RND"]),
        pos in any::<i32>(),
    ) {
        let mut module = ModuleState::create(kind).unwrap();
        module.advance(pos);
        prop_assert!(matches!(module.value(), 0 | 1));
    }
}

proptest! {
    #[test]
    fn running_counter_stays_within_bounds(
        min in -50i32..50,
        span in 0i32..50,
        step in -60i32..60,
        ticks in 0usize..100,
    ) {
        let max = min + span;
        let mut env = Environment::new();
        env.bind("c", create_object("count").unwrap());
        env.set_attribute("c", "min", Value::from(min)).unwrap();
        env.set_attribute("c", "max", Value::from(max)).unwrap();
        env.set_attribute("c", "value", Value::from(min)).unwrap();
        env.set_attribute("c", "step", Value::from(step)).unwrap();
        env.invoke("c", "start").unwrap();
        env.run(ticks);
        let v = env.value("c").unwrap();
        prop_assert!(v >= min && v <= max, "{} outside {}..={}", v, min, max);
    }
}

proptest! {
    #[test]
    fn tick_counter_wraps(ticks in 0usize..1000) {
        let mut env = Environment::new();
        env.run(ticks);
        prop_assert_eq!(env.tick_count(), (ticks % TICK_MODULUS as usize) as i32);
    }
}
