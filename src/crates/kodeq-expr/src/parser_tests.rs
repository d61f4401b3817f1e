// Precedence, recovery and evaluation cases for the expression language

#[cfg(test)]
mod tests {
    use crate::error::Diagnostic;
    use crate::evaluator::{evaluate, Evaluation};
    use crate::parser::{parse, MAX_DEPTH};
    use kodeq_core::{Environment, Value};

    fn eval(input: &str) -> Evaluation {
        let mut env = Environment::new();
        evaluate(input, &mut env)
    }

    // Helper for inputs that must evaluate without diagnostics
    fn assert_value(input: &str, expected: i32) {
        let result = eval(input);
        assert!(
            result.is_clean(),
            "'{}' produced diagnostics: {:?}",
            input,
            result.diagnostics
        );
        assert_eq!(result.value, expected, "'{}'", input);
    }

    fn assert_diagnosed(input: &str, expected: i32) -> Vec<Diagnostic> {
        let result = eval(input);
        assert!(!result.is_clean(), "'{}' should report a problem", input);
        assert_eq!(result.value, expected, "'{}'", input);
        result.diagnostics
    }

    #[test]
    fn test_documented_precedence() {
        assert_value("2+3*4", 14);
        assert_value("(2+3)*4", 20);
        assert_value("1<2?10:20", 10);
        assert_value("1<<2+1", 8);
    }

    #[test]
    fn test_bitwise_and_logical_levels() {
        assert_value("6 & 3 | 8 ^ 1", 11);
        assert_value("1 || 0 && 0", 1);
        assert_value("1 < 2 == 1", 1);
        assert_value("3 == 3 & 1", 1);
        assert_value("10 - 4 - 3", 3);
        assert_value("64 / 4 / 2", 8);
        assert_value("7 % 4 * 2", 6);
    }

    #[test]
    fn test_tree_shape() {
        let (expr, diagnostics) = parse("1+2*3-4");
        assert!(diagnostics.is_empty());
        assert_eq!(expr.to_string(), "((1 + (2 * 3)) - 4)");

        let (expr, _) = parse("a ? b : c ? d : e");
        assert_eq!(expr.to_string(), "(a ? b : (c ? d : e))");
    }

    #[test]
    fn test_conditional_is_right_associative() {
        assert_value("0 ? 1 : 0 ? 2 : 3", 3);
        assert_value("1 ? 2 : 3 ? 4 : 5", 2);
        assert_value("1 ? 0 ? 7 : 8 : 9", 8);
    }

    #[test]
    fn test_untaken_branch_has_no_effect() {
        assert_value("1 ? 5 : $missing", 5);
        assert_value("0 ? 5/0 : 6", 6);

        let mut a = Environment::new();
        let mut b = Environment::new();
        evaluate("1 ? 0 : RND(1, 1000)", &mut a);
        assert_eq!(
            evaluate("RND(1, 1000)", &mut a).value,
            evaluate("RND(1, 1000)", &mut b).value
        );
    }

    #[test]
    fn test_logical_operators_evaluate_both_sides() {
        let diagnostics = assert_diagnosed("0 && 5/0", 0);
        assert!(matches!(diagnostics[0], Diagnostic::DivisionByZero { .. }));
        assert_diagnosed("1 || $missing", 1);

        let mut a = Environment::new();
        let mut b = Environment::new();
        evaluate("0 && RND(1, 10)", &mut a);
        evaluate("RND(1, 10)", &mut b);
        assert_eq!(
            evaluate("RND(1, 1000)", &mut a).value,
            evaluate("RND(1, 1000)", &mut b).value
        );
    }

    #[test]
    fn test_division_by_zero() {
        assert_diagnosed("5/0", 0);
        assert_diagnosed("5%0", 0);
        // later siblings still evaluate
        assert_diagnosed("5/0 + 3", 3);
    }

    #[test]
    fn test_wrapping_arithmetic() {
        assert_value("2147483647 + 1", i32::MIN);
        assert_value("X80000000 / -1", i32::MIN);
        assert_value("X80000000 % -1", 0);
        assert_value("65536 * 65536", 0);
        assert_value("1 << 33", 2);
        assert_value("-8 >> 1", -4);
    }

    #[test]
    fn test_unary_operators() {
        assert_value("-2*3", -6);
        assert_value("-(2+3)", -5);
        assert_value("--3", 3);
        assert_value("~0", -1);
        assert_value("~#1111 & XFF", 0xF0);
    }

    #[test]
    fn test_literals() {
        assert_value("#1011", 11);
        assert_value("X1F", 31);
        assert_value("x1f", 31);
        assert_value("#", 0);
        assert_value("X", 0);
        assert_value("XFFFFFFFF", -1);

        let diagnostics = assert_diagnosed("99999999999", 0);
        assert!(matches!(
            diagnostics[0],
            Diagnostic::LiteralOutOfRange { .. }
        ));
    }

    #[test]
    fn test_functions() {
        assert_value("MIN(3, 1) + 1", 2);
        assert_value("max(3, 9)", 9);
        assert_value("Abs(-4)", 4);
        assert_value("CLAMP(20, 0, 15)", 15);
        assert_value("CLAMP(-3, 0, 15)", 0);
        assert_value("MAX(1, MIN(5, 3))", 3);

        let result = eval("RND(4, 4)");
        assert_eq!(result.value, 4);
    }

    #[test]
    fn test_function_errors() {
        let diagnostics = assert_diagnosed("FOO(1) + 2", 2);
        assert!(matches!(diagnostics[0], Diagnostic::UnknownFunction { .. }));

        let diagnostics = assert_diagnosed("MIN(1)", 0);
        assert_eq!(
            diagnostics[0],
            Diagnostic::WrongArity {
                function: "MIN".into(),
                expected: 2,
                found: 1,
                span: crate::span::Span::new(0, 6),
            }
        );
        assert_diagnosed("ABS()", 0);
    }

    #[test]
    fn test_rejected_calls_still_evaluate_arguments() {
        let mut a = Environment::new();
        let mut b = Environment::new();
        assert!(!evaluate("MIN(RND(1, 1000))", &mut a).is_clean());
        evaluate("RND(1, 1000)", &mut b);
        assert_eq!(
            evaluate("RND(1, 1000)", &mut a).value,
            evaluate("RND(1, 1000)", &mut b).value
        );

        let diagnostics = assert_diagnosed("FOO($x)", 0);
        assert_eq!(diagnostics.len(), 2);
        assert!(matches!(diagnostics[0], Diagnostic::UndefinedVariable { .. }));
        assert!(matches!(diagnostics[1], Diagnostic::UnknownFunction { .. }));
    }

    #[test]
    fn test_variables_and_tick() {
        let mut env = Environment::new();
        env.bind_value("a", Value::from(4));
        env.run(5);
        assert_eq!(evaluate("$a + $A", &mut env).value, 8);
        assert_eq!(evaluate("T + t", &mut env).value, 10);

        let result = evaluate("$b + 1", &mut env);
        assert_eq!(result.value, 1);
        assert_eq!(
            result.diagnostics,
            vec![Diagnostic::UndefinedVariable {
                name: "B".into(),
                span: crate::span::Span::new(0, 2),
            }]
        );
    }

    #[test]
    fn test_whitespace_is_insignificant() {
        assert_value(" 2 +\t3\n", 5);
        assert_value("2+3", 5);
    }

    #[test]
    fn test_syntax_recovery() {
        let diagnostics = assert_diagnosed("(1+2", 0);
        assert!(matches!(diagnostics[0], Diagnostic::UnclosedParen { .. }));

        assert_diagnosed("MAX(1, 2", 0);

        let diagnostics = assert_diagnosed("1 ? 2", 0);
        assert!(matches!(diagnostics[0], Diagnostic::MissingColon { .. }));

        let diagnostics = assert_diagnosed("1 + * 2", 1);
        assert_eq!(diagnostics.len(), 1);

        assert_diagnosed("", 0);
        assert_diagnosed("@", 0);
        assert_diagnosed("foo + 1", 1);
    }

    #[test]
    fn test_deep_nesting_is_abandoned() {
        let deep = [
            format!("{}1{}", "(".repeat(400), ")".repeat(400)),
            format!("{}1", "-".repeat(400)),
            format!("{}1{}", "MIN(".repeat(400), ", 1)".repeat(400)),
            format!("{}1", "1 ? ".repeat(400)),
            vec!["1"; 1000].join(" + "),
        ];
        for input in &deep {
            let diagnostics = assert_diagnosed(input, 0);
            assert_eq!(diagnostics.len(), 1, "{:?}", diagnostics);
            assert!(matches!(
                diagnostics[0],
                Diagnostic::TooDeep {
                    limit: MAX_DEPTH,
                    ..
                }
            ));
        }
    }

    #[test]
    fn test_moderate_nesting_still_evaluates() {
        assert_value(&format!("{}7{}", "(".repeat(100), ")".repeat(100)), 7);
        assert_value(&format!("{}5", "-".repeat(100)), 5);
        assert_value(&format!("{}3{}", "ABS(".repeat(60), ")".repeat(60)), 3);
        assert_value(&vec!["1"; 100].join(" + "), 100);
    }

    #[test]
    fn test_trailing_input_keeps_prefix() {
        let diagnostics = assert_diagnosed("3 + 4 ) 9", 7);
        match &diagnostics[0] {
            Diagnostic::TrailingInput { text, .. } => assert_eq!(text, ") 9"),
            other => panic!("unexpected diagnostic {:?}", other),
        }
        assert_diagnosed("1 2", 1);
    }
}
