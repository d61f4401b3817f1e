use crate::ast::{BinaryOp, Expr, UnaryOp};
use crate::error::Diagnostic;
use crate::lexer::{Lexer, Token};
use crate::literal::{parse_binary_digits, parse_hex_digits};
use crate::span::Span;

/// Binary operator levels, loosest first. `?:` sits above all of them.
const LEVELS: &[&[(Token, BinaryOp)]] = &[
    &[(Token::OrOr, BinaryOp::Or)],
    &[(Token::AndAnd, BinaryOp::And)],
    &[(Token::Pipe, BinaryOp::BitOr)],
    &[(Token::Caret, BinaryOp::BitXor)],
    &[(Token::Amp, BinaryOp::BitAnd)],
    &[(Token::EqEq, BinaryOp::Eq), (Token::NotEq, BinaryOp::Ne)],
    &[
        (Token::Less, BinaryOp::Lt),
        (Token::Greater, BinaryOp::Gt),
        (Token::LessEq, BinaryOp::Le),
        (Token::GreaterEq, BinaryOp::Ge),
    ],
    &[(Token::Shl, BinaryOp::Shl), (Token::Shr, BinaryOp::Shr)],
    &[(Token::Plus, BinaryOp::Add), (Token::Minus, BinaryOp::Sub)],
    &[
        (Token::Star, BinaryOp::Mul),
        (Token::Slash, BinaryOp::Div),
        (Token::Percent, BinaryOp::Rem),
    ],
];

/// Deepest nesting of parentheses, conditionals, unary operators and
/// operator chains before the parser gives up on the input
pub const MAX_DEPTH: usize = 128;

/// Expression parser
///
/// Never fails: malformed input yields [`Expr::Invalid`] nodes and
/// diagnostics, and parsing carries on from the next usable token.
/// Input nested past [`MAX_DEPTH`] is abandoned with a single
/// [`Diagnostic::TooDeep`].
pub struct Parser<'source> {
    lexer: Lexer<'source>,
    diagnostics: Vec<Diagnostic>,
    depth: usize,
    abandoned: bool,
}

impl<'source> Parser<'source> {
    pub fn new(source: &'source str) -> Self {
        Parser {
            lexer: Lexer::new(source),
            diagnostics: Vec::new(),
            depth: 0,
            abandoned: false,
        }
    }

    /// Parse the whole input. Trailing tokens are reported and ignored.
    pub fn parse(&mut self) -> Expr {
        let expr = match self.peek() {
            Some(_) => self.parse_conditional(),
            None => {
                self.error(Diagnostic::UnexpectedEnd {
                    expected: "expression".into(),
                    span: self.lexer.end_span(),
                });
                Expr::Invalid {
                    span: self.lexer.end_span(),
                }
            }
        };

        if let Some((_, first)) = self.next() {
            let mut span = first;
            while let Some((_, s)) = self.next() {
                span = span.merge(s);
            }
            self.error(Diagnostic::TrailingInput {
                text: self.lexer.slice(span).to_string(),
                span,
            });
        }
        expr
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    fn parse_conditional(&mut self) -> Expr {
        let span = self.next_span();
        if !self.descend(span) {
            return Expr::Invalid { span };
        }
        let expr = self.parse_ternary();
        self.depth -= 1;
        expr
    }

    fn parse_ternary(&mut self) -> Expr {
        let condition = self.parse_level(0);
        if !self.eat(Token::Question) {
            return condition;
        }

        let then_branch = self.parse_conditional();
        if !self.eat(Token::Colon) {
            let span = condition.span().merge(then_branch.span());
            self.error(Diagnostic::MissingColon { span });
            return Expr::Invalid { span };
        }
        // Right-associative: `a ? b : c ? d : e` nests in the else branch
        let else_branch = self.parse_conditional();

        let span = condition.span().merge(else_branch.span());
        Expr::Conditional {
            condition: Box::new(condition),
            then_branch: Box::new(then_branch),
            else_branch: Box::new(else_branch),
            span,
        }
    }

    fn parse_level(&mut self, level: usize) -> Expr {
        let Some(operators) = LEVELS.get(level) else {
            return self.parse_primary();
        };

        // Each link of a chain deepens the left-leaning tree by one
        let base = self.depth;
        let mut lhs = self.parse_level(level + 1);
        while let Some((op, op_span)) = self.peek().and_then(|(token, span)| {
            operators
                .iter()
                .find(|(t, _)| *t == token)
                .map(|&(_, op)| (op, span))
        }) {
            self.next();
            if !self.descend(op_span) {
                lhs = Expr::Invalid {
                    span: lhs.span().merge(op_span),
                };
                break;
            }
            let rhs = self.parse_level(level + 1);
            let span = lhs.span().merge(rhs.span());
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
                span,
            };
        }
        self.depth = base;
        lhs
    }

    fn parse_primary(&mut self) -> Expr {
        let Some((token, span)) = self.peek() else {
            let span = self.lexer.end_span();
            self.error(Diagnostic::UnexpectedEnd {
                expected: "operand".into(),
                span,
            });
            return Expr::Invalid { span };
        };

        match token {
            Token::LParen => {
                self.next();
                let inner = self.parse_conditional();
                match self.peek() {
                    Some((Token::RParen, _)) => {
                        self.next();
                        inner
                    }
                    _ => {
                        self.error(Diagnostic::UnclosedParen { span });
                        Expr::Invalid {
                            span: span.merge(inner.span()),
                        }
                    }
                }
            }
            Token::Minus | Token::Tilde => {
                self.next();
                if !self.descend(span) {
                    return Expr::Invalid { span };
                }
                let operand = self.parse_primary();
                self.depth -= 1;
                let op = if token == Token::Minus {
                    UnaryOp::Neg
                } else {
                    UnaryOp::Not
                };
                Expr::Unary {
                    op,
                    span: span.merge(operand.span()),
                    operand: Box::new(operand),
                }
            }
            Token::Decimal | Token::Binary | Token::Hex => {
                self.next();
                self.parse_literal(token, span)
            }
            Token::Variable => {
                self.next();
                let name = self.lexer.slice(span)[1..].to_ascii_uppercase();
                Expr::Variable { name, span }
            }
            Token::Ident => {
                self.next();
                let name = self.lexer.slice(span);
                if let Some((Token::LParen, _)) = self.peek() {
                    return self.parse_call(name.to_ascii_uppercase(), span);
                }
                if name.eq_ignore_ascii_case("t") {
                    Expr::Tick { span }
                } else {
                    Expr::Name {
                        name: name.to_string(),
                        span,
                    }
                }
            }
            Token::Error => {
                self.next();
                self.error(Diagnostic::UnexpectedToken {
                    found: format!("'{}'", self.lexer.slice(span)),
                    span,
                });
                Expr::Invalid { span }
            }
            // Operators and closers are left for the enclosing level so it
            // can resume after the missing operand
            _ => {
                self.error(Diagnostic::UnexpectedToken {
                    found: format!("'{}'", token),
                    span,
                });
                Expr::Invalid { span: Span::at(span.start) }
            }
        }
    }

    fn parse_literal(&mut self, token: Token, span: Span) -> Expr {
        let text = self.lexer.slice(span);
        let value = match token {
            Token::Binary => parse_binary_digits(&text[1..]),
            Token::Hex => parse_hex_digits(&text[1..]),
            _ => text.parse().ok(),
        };
        match value {
            Some(value) => Expr::Number { value, span },
            None => {
                self.error(Diagnostic::LiteralOutOfRange {
                    text: text.to_string(),
                    span,
                });
                Expr::Invalid { span }
            }
        }
    }

    /// `NAME(` has been seen; the name is already consumed
    fn parse_call(&mut self, function: String, name_span: Span) -> Expr {
        let open = match self.next() {
            Some((_, open)) => open,
            None => name_span,
        };
        let mut args = Vec::new();

        if let Some((Token::RParen, close)) = self.peek() {
            self.next();
            return Expr::Call {
                function,
                args,
                span: name_span.merge(close),
            };
        }

        loop {
            args.push(self.parse_conditional());
            match self.peek() {
                Some((Token::Comma, _)) => {
                    self.next();
                }
                Some((Token::RParen, close)) => {
                    self.next();
                    return Expr::Call {
                        function,
                        args,
                        span: name_span.merge(close),
                    };
                }
                _ => {
                    self.error(Diagnostic::UnclosedParen { span: open });
                    let end = args.last().map_or(open, Expr::span);
                    return Expr::Invalid {
                        span: name_span.merge(end),
                    };
                }
            }
        }
    }

    /// Enter one nesting level. Past [`MAX_DEPTH`] the rest of the input
    /// is discarded and `false` is returned.
    fn descend(&mut self, span: Span) -> bool {
        if self.abandoned {
            return false;
        }
        if self.depth >= MAX_DEPTH {
            self.diagnostics.push(Diagnostic::TooDeep {
                limit: MAX_DEPTH,
                span,
            });
            self.abandoned = true;
            while self.next().is_some() {}
            return false;
        }
        self.depth += 1;
        true
    }

    /// Once the input is abandoned, the enclosing levels only unwind
    fn error(&mut self, diagnostic: Diagnostic) {
        if !self.abandoned {
            self.diagnostics.push(diagnostic);
        }
    }

    fn next_span(&mut self) -> Span {
        match self.peek() {
            Some((_, span)) => span,
            None => self.lexer.end_span(),
        }
    }

    fn peek(&mut self) -> Option<(Token, Span)> {
        self.lexer.peek_token()
    }

    fn next(&mut self) -> Option<(Token, Span)> {
        self.lexer.next_token()
    }

    fn eat(&mut self, expected: Token) -> bool {
        match self.peek() {
            Some((token, _)) if token == expected => {
                self.next();
                true
            }
            _ => false,
        }
    }
}

/// Parse `source` into a tree plus any syntax diagnostics
pub fn parse(source: &str) -> (Expr, Vec<Diagnostic>) {
    let mut parser = Parser::new(source);
    let expr = parser.parse();
    (expr, parser.into_diagnostics())
}
