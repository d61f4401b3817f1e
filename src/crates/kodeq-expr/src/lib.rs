//! Integer expression language for KODEQ
//!
//! Expressions are parsed to a tree and then evaluated against a
//! [`Context`] that supplies variables, the tick counter and randomness.
//! Evaluation never fails: problems become [`Diagnostic`]s and the affected
//! subexpression counts as 0.
//!
//! # Examples
//!
//! ```
//! use kodeq_core::{Environment, Value};
//! use kodeq_expr::evaluate;
//!
//! let mut env = Environment::new();
//! env.bind_value("a", Value::from(3));
//!
//! let result = evaluate("$a > 2 ? XFF & #1111 : 0", &mut env);
//! assert_eq!(result.value, 15);
//! assert!(result.is_clean());
//! ```
//!
//! # Syntax
//!
//! - Literals: `42`, `#1011` (binary), `X1F` / `x1f` (hex)
//! - Variables: `$name` (case-insensitive), tick counter: `T`
//! - Operators, loosest first: `?:`, `||`, `&&`, `|`, `^`, `&`,
//!   `==` `!=`, `<` `>` `<=` `>=`, `<<` `>>`, `+` `-`, `*` `/` `%`
//! - Unary: `-x`, `~x`
//! - Functions: `MIN(a,b)`, `MAX(a,b)`, `ABS(a)`, `CLAMP(a,lo,hi)`, `RND(lo,hi)`
//! - Nesting deeper than [`MAX_DEPTH`] abandons the input with a diagnostic

pub mod ast;
pub mod context;
pub mod error;
pub mod evaluator;
pub mod lexer;
pub mod literal;
pub mod parser;
pub mod span;

#[cfg(test)]
mod parser_tests;

pub use ast::{BinaryOp, Expr, UnaryOp};
pub use error::Diagnostic;
pub use evaluator::{evaluate, Context, Evaluation, Evaluator, Function};
pub use lexer::{Lexer, Token};
pub use literal::{parse_literal, to_binary_string, to_hex_string};
pub use parser::{parse, Parser, MAX_DEPTH};
pub use span::Span;
