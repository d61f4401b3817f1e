use crate::ast::{BinaryOp, Expr, UnaryOp};
use crate::error::Diagnostic;
use crate::parser::parse;
use crate::span::Span;
use serde::Serialize;

/// What an expression can ask of the runtime
pub trait Context {
    /// Scalar value of a variable; names arrive upper case without `$`
    fn variable(&self, name: &str) -> Option<i32>;

    fn tick(&self) -> i32;

    /// Uniform integer in `min..=max`
    fn random(&mut self, min: i32, max: i32) -> i32;
}

/// Built-in functions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
    Min,
    Max,
    Abs,
    Clamp,
    Rnd,
}

impl Function {
    /// Look up an upper-case function name
    pub fn from_name(name: &str) -> Option<Function> {
        match name {
            "MIN" => Some(Function::Min),
            "MAX" => Some(Function::Max),
            "ABS" => Some(Function::Abs),
            "CLAMP" => Some(Function::Clamp),
            "RND" => Some(Function::Rnd),
            _ => None,
        }
    }

    pub fn arity(&self) -> usize {
        match self {
            Function::Abs => 1,
            Function::Min | Function::Max | Function::Rnd => 2,
            Function::Clamp => 3,
        }
    }
}

/// Result of evaluating one expression
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Evaluation {
    pub value: i32,
    pub diagnostics: Vec<Diagnostic>,
}

impl Evaluation {
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Tree-walking evaluator
///
/// Only the taken branch of a conditional is visited, so a `RND` call or an
/// undefined variable in the other branch has no effect. `&&` and `||`
/// always evaluate both sides, and call arguments are evaluated before the
/// function name and arity are checked.
pub struct Evaluator<'c, C: Context + ?Sized> {
    context: &'c mut C,
    diagnostics: Vec<Diagnostic>,
    log_diagnostics: bool,
}

impl<'c, C: Context + ?Sized> Evaluator<'c, C> {
    pub fn new(context: &'c mut C) -> Self {
        Evaluator {
            context,
            diagnostics: Vec::new(),
            log_diagnostics: true,
        }
    }

    /// Turn `log::warn!` output for diagnostics on or off
    pub fn with_logging(mut self, enabled: bool) -> Self {
        self.log_diagnostics = enabled;
        self
    }

    /// Parse and evaluate `text`; problems are collected, never returned
    pub fn evaluate(&mut self, text: &str) -> i32 {
        let (expr, diagnostics) = parse(text);
        for diagnostic in diagnostics {
            self.report(text, diagnostic);
        }
        let value = self.eval(&expr);
        log::trace!("{} => {}", expr, value);
        value
    }

    /// Evaluate an already parsed tree
    pub fn eval(&mut self, expr: &Expr) -> i32 {
        match expr {
            Expr::Number { value, .. } => *value,
            Expr::Tick { .. } => self.context.tick(),
            Expr::Variable { name, span } => match self.context.variable(name) {
                Some(value) => value,
                None => self.fail(Diagnostic::UndefinedVariable {
                    name: name.clone(),
                    span: *span,
                }),
            },
            Expr::Name { name, span } => self.fail(Diagnostic::BareIdentifier {
                name: name.clone(),
                span: *span,
            }),
            Expr::Unary { op, operand, .. } => {
                let value = self.eval(operand);
                match op {
                    UnaryOp::Neg => value.wrapping_neg(),
                    UnaryOp::Not => !value,
                }
            }
            Expr::Binary { op, lhs, rhs, span } => {
                let lhs = self.eval(lhs);
                let rhs = self.eval(rhs);
                self.binary(*op, lhs, rhs, *span)
            }
            Expr::Conditional {
                condition,
                then_branch,
                else_branch,
                ..
            } => {
                if self.eval(condition) != 0 {
                    self.eval(then_branch)
                } else {
                    self.eval(else_branch)
                }
            }
            Expr::Call {
                function,
                args,
                span,
            } => self.call(function, args, *span),
            Expr::Invalid { .. } => 0,
        }
    }

    fn binary(&mut self, op: BinaryOp, lhs: i32, rhs: i32, span: Span) -> i32 {
        match op {
            BinaryOp::Or => i32::from(lhs != 0 || rhs != 0),
            BinaryOp::And => i32::from(lhs != 0 && rhs != 0),
            BinaryOp::BitOr => lhs | rhs,
            BinaryOp::BitXor => lhs ^ rhs,
            BinaryOp::BitAnd => lhs & rhs,
            BinaryOp::Eq => i32::from(lhs == rhs),
            BinaryOp::Ne => i32::from(lhs != rhs),
            BinaryOp::Lt => i32::from(lhs < rhs),
            BinaryOp::Gt => i32::from(lhs > rhs),
            BinaryOp::Le => i32::from(lhs <= rhs),
            BinaryOp::Ge => i32::from(lhs >= rhs),
            // Shift counts are taken mod 32
            BinaryOp::Shl => lhs.wrapping_shl(rhs as u32),
            BinaryOp::Shr => lhs.wrapping_shr(rhs as u32),
            BinaryOp::Add => lhs.wrapping_add(rhs),
            BinaryOp::Sub => lhs.wrapping_sub(rhs),
            BinaryOp::Mul => lhs.wrapping_mul(rhs),
            BinaryOp::Div | BinaryOp::Rem if rhs == 0 => {
                self.fail(Diagnostic::DivisionByZero { span })
            }
            BinaryOp::Div => lhs.wrapping_div(rhs),
            BinaryOp::Rem => lhs.wrapping_rem(rhs),
        }
    }

    fn call(&mut self, name: &str, args: &[Expr], span: Span) -> i32 {
        // Arguments run even when the call itself is rejected, so their
        // RND draws and diagnostics happen either way
        let values: Vec<i32> = args.iter().map(|arg| self.eval(arg)).collect();

        let Some(function) = Function::from_name(name) else {
            return self.fail(Diagnostic::UnknownFunction {
                name: name.to_string(),
                span,
            });
        };
        if args.len() != function.arity() {
            return self.fail(Diagnostic::WrongArity {
                function: name.to_string(),
                expected: function.arity(),
                found: args.len(),
                span,
            });
        }

        match (function, values.as_slice()) {
            (Function::Min, &[a, b]) => a.min(b),
            (Function::Max, &[a, b]) => a.max(b),
            (Function::Abs, &[a]) => a.wrapping_abs(),
            (Function::Clamp, &[a, lo, hi]) => a.max(lo).min(hi),
            (Function::Rnd, &[lo, hi]) => self.context.random(lo, hi),
            _ => 0,
        }
    }

    fn fail(&mut self, diagnostic: Diagnostic) -> i32 {
        if self.log_diagnostics {
            log::warn!("{}", diagnostic);
        }
        self.diagnostics.push(diagnostic);
        0
    }

    fn report(&mut self, source: &str, diagnostic: Diagnostic) {
        if self.log_diagnostics {
            log::warn!("{} in '{}'", diagnostic, source);
        }
        self.diagnostics.push(diagnostic);
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }
}

/// Evaluate `text` against `context` in one call
///
/// ```
/// use kodeq_core::Environment;
/// use kodeq_expr::evaluate;
///
/// let mut env = Environment::new();
/// assert_eq!(evaluate("1<<2+1", &mut env).value, 8);
/// assert_eq!(evaluate("5/0", &mut env).diagnostics.len(), 1);
/// ```
pub fn evaluate<C: Context + ?Sized>(text: &str, context: &mut C) -> Evaluation {
    let mut evaluator = Evaluator::new(context);
    let value = evaluator.evaluate(text);
    Evaluation {
        value,
        diagnostics: evaluator.take_diagnostics(),
    }
}
