use crate::span::Span;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UnaryOp {
    Neg,
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BinaryOp {
    Or,
    And,
    BitOr,
    BitXor,
    BitAnd,
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
    Shl,
    Shr,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

impl BinaryOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::Or => "||",
            BinaryOp::And => "&&",
            BinaryOp::BitOr => "|",
            BinaryOp::BitXor => "^",
            BinaryOp::BitAnd => "&",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Gt => ">",
            BinaryOp::Le => "<=",
            BinaryOp::Ge => ">=",
            BinaryOp::Shl => "<<",
            BinaryOp::Shr => ">>",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
        }
    }
}

/// Parsed expression tree
///
/// Semantic checks (unknown names, arity, division by zero) happen when the
/// tree is evaluated, so they only fire on branches that actually run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Expr {
    Number { value: i32, span: Span },
    Tick { span: Span },
    Variable { name: String, span: Span },
    /// Identifier not followed by `(`
    Name { name: String, span: Span },
    Unary { op: UnaryOp, operand: Box<Expr>, span: Span },
    Binary { op: BinaryOp, lhs: Box<Expr>, rhs: Box<Expr>, span: Span },
    Conditional {
        condition: Box<Expr>,
        then_branch: Box<Expr>,
        else_branch: Box<Expr>,
        span: Span,
    },
    Call { function: String, args: Vec<Expr>, span: Span },
    /// Placeholder for text that failed to parse; evaluates to 0
    Invalid { span: Span },
}

impl Expr {
    pub fn span(&self) -> Span {
        match self {
            Expr::Number { span, .. }
            | Expr::Tick { span }
            | Expr::Variable { span, .. }
            | Expr::Name { span, .. }
            | Expr::Unary { span, .. }
            | Expr::Binary { span, .. }
            | Expr::Conditional { span, .. }
            | Expr::Call { span, .. }
            | Expr::Invalid { span } => *span,
        }
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, Expr::Invalid { .. })
    }
}

/// Fully parenthesized rendering, handy for checking precedence
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Number { value, .. } => write!(f, "{}", value),
            Expr::Tick { .. } => write!(f, "T"),
            Expr::Variable { name, .. } => write!(f, "${}", name),
            Expr::Name { name, .. } => write!(f, "{}", name),
            Expr::Unary { op, operand, .. } => match op {
                UnaryOp::Neg => write!(f, "-{}", operand),
                UnaryOp::Not => write!(f, "~{}", operand),
            },
            Expr::Binary { op, lhs, rhs, .. } => write!(f, "({} {} {})", lhs, op.symbol(), rhs),
            Expr::Conditional {
                condition,
                then_branch,
                else_branch,
                ..
            } => write!(f, "({} ? {} : {})", condition, then_branch, else_branch),
            Expr::Call { function, args, .. } => {
                write!(f, "{}(", function)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            }
            Expr::Invalid { .. } => write!(f, "<error>"),
        }
    }
}
