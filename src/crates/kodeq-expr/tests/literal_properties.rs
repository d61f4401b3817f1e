use kodeq_core::Environment;
use kodeq_expr::{evaluate, parse_literal, to_binary_string, to_hex_string, Evaluator};
use proptest::prelude::*;
use proptest::test_runner::Config as ProptestConfig;

fn literal_text() -> impl Strategy<Value = String> {
    prop_oneof![
        (0i32..=i32::MAX).prop_map(|n| n.to_string()),
        "#[01]{0,32}",
        "[Xx][0-9A-Fa-f]{0,8}",
    ]
}

proptest! {
    #[test]
    fn binary_strings_round_trip(n in 0i32..256) {
        prop_assert_eq!(parse_literal(&to_binary_string(n)), Some(n));
    }
}

proptest! {
    #[test]
    fn any_value_round_trips_through_both_bases(n in any::<i32>()) {
        prop_assert_eq!(parse_literal(&to_binary_string(n)), Some(n));
        prop_assert_eq!(parse_literal(&to_hex_string(n)), Some(n));
    }
}

proptest! {
    #[test]
    fn evaluating_a_literal_matches_parse_literal(text in literal_text()) {
        let mut env = Environment::new();
        let result = evaluate(&text, &mut env);
        prop_assert!(result.is_clean(), "{:?}", result.diagnostics);
        prop_assert_eq!(Some(result.value), parse_literal(&text));
    }
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 512, .. ProptestConfig::default()
    })]
    #[test]
    fn arbitrary_text_never_panics(text in "[0-9#Xx$a-zT()?:<>=!&|^~+*/% ,-]{0,40}") {
        let mut env = Environment::new();
        let mut evaluator = Evaluator::new(&mut env).with_logging(false);
        let _ = evaluator.evaluate(&text);
    }
}

proptest! {
    #[test]
    fn sums_wrap_like_i32(a in any::<i32>(), b in 0i32..=i32::MAX) {
        let mut env = Environment::new();
        let text = format!("{} + {}", a.unsigned_abs(), b);
        let result = evaluate(&text, &mut env);
        if a == i32::MIN {
            // 2147483648 is not a valid literal
            prop_assert!(!result.is_clean());
        } else {
            prop_assert_eq!(result.value, a.wrapping_abs().wrapping_add(b));
        }
    }
}
