use crate::span::Span;
use serde::Serialize;

/// Problems found while parsing or evaluating an expression
///
/// None of these stop evaluation: the affected node becomes 0 and the
/// diagnostic is collected for the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    #[error("Unexpected {found} at {span}")]
    UnexpectedToken { found: String, span: Span },

    #[error("Unexpected end of expression, expected {expected}")]
    UnexpectedEnd { expected: String, span: Span },

    #[error("Unclosed '(' opened at {span}")]
    UnclosedParen { span: Span },

    #[error("Expected ':' in conditional at {span}")]
    MissingColon { span: Span },

    #[error("Unexpected trailing input '{text}' at {span}")]
    TrailingInput { text: String, span: Span },

    #[error("Literal '{text}' out of range at {span}")]
    LiteralOutOfRange { text: String, span: Span },

    #[error("Expression nested deeper than {limit} levels at {span}")]
    TooDeep { limit: usize, span: Span },

    #[error("Unknown function '{name}' at {span}")]
    UnknownFunction { name: String, span: Span },

    #[error("{function} takes {expected} argument(s), got {found} at {span}")]
    WrongArity {
        function: String,
        expected: usize,
        found: usize,
        span: Span,
    },

    #[error("Unexpected identifier '{name}' at {span}")]
    BareIdentifier { name: String, span: Span },

    #[error("Undefined variable ${name} at {span}")]
    UndefinedVariable { name: String, span: Span },

    #[error("Division by zero at {span}")]
    DivisionByZero { span: Span },
}

impl Diagnostic {
    pub fn span(&self) -> Span {
        match self {
            Diagnostic::UnexpectedToken { span, .. }
            | Diagnostic::UnexpectedEnd { span, .. }
            | Diagnostic::UnclosedParen { span }
            | Diagnostic::MissingColon { span }
            | Diagnostic::TrailingInput { span, .. }
            | Diagnostic::LiteralOutOfRange { span, .. }
            | Diagnostic::TooDeep { span, .. }
            | Diagnostic::UnknownFunction { span, .. }
            | Diagnostic::WrongArity { span, .. }
            | Diagnostic::BareIdentifier { span, .. }
            | Diagnostic::UndefinedVariable { span, .. }
            | Diagnostic::DivisionByZero { span } => *span,
        }
    }

    /// True for problems found before evaluation started
    pub fn is_syntax(&self) -> bool {
        matches!(
            self,
            Diagnostic::UnexpectedToken { .. }
                | Diagnostic::UnexpectedEnd { .. }
                | Diagnostic::UnclosedParen { .. }
                | Diagnostic::MissingColon { .. }
                | Diagnostic::TrailingInput { .. }
                | Diagnostic::LiteralOutOfRange { .. }
                | Diagnostic::TooDeep { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_span() {
        let d = Diagnostic::DivisionByZero { span: Span::new(2, 5) };
        assert_eq!(d.to_string(), "Division by zero at 2..5");
        assert!(!d.is_syntax());
    }

    #[test]
    fn test_serializes_with_kind_tag() {
        let d = Diagnostic::UndefinedVariable {
            name: "A".into(),
            span: Span::new(0, 2),
        };
        let json = serde_json::to_value(&d).unwrap();
        assert_eq!(json["kind"], "undefined_variable");
        assert_eq!(json["name"], "A");
        assert_eq!(json["span"]["end"], 2);
    }
}
