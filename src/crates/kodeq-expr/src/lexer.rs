use crate::span::Span;
use logos::Logos;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n]+")]
pub enum Token {
    // Literals
    #[regex(r"[0-9]+")]
    Decimal,
    #[regex(r"#[01]*")]
    Binary,
    // Wins ties against identifiers, so `xff` is hex but `xmax` is a name
    #[regex(r"[Xx][0-9A-Fa-f]*", priority = 3)]
    Hex,
    #[regex(r"\$[A-Za-z][A-Za-z0-9_]*")]
    Variable,
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Ident,

    // Delimiters
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token(",")]
    Comma,
    #[token("?")]
    Question,
    #[token(":")]
    Colon,

    // Operators
    #[token("||")]
    OrOr,
    #[token("&&")]
    AndAnd,
    #[token("|")]
    Pipe,
    #[token("^")]
    Caret,
    #[token("&")]
    Amp,
    #[token("==")]
    EqEq,
    #[token("!=")]
    NotEq,
    #[token("<")]
    Less,
    #[token(">")]
    Greater,
    #[token("<=")]
    LessEq,
    #[token(">=")]
    GreaterEq,
    #[token("<<")]
    Shl,
    #[token(">>")]
    Shr,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("~")]
    Tilde,

    // Anything the rules above reject
    Error,
}

impl Token {
    pub fn is_literal(&self) -> bool {
        matches!(self, Token::Decimal | Token::Binary | Token::Hex)
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Token::Decimal => "number",
            Token::Binary => "binary literal",
            Token::Hex => "hex literal",
            Token::Variable => "variable",
            Token::Ident => "identifier",
            Token::LParen => "(",
            Token::RParen => ")",
            Token::Comma => ",",
            Token::Question => "?",
            Token::Colon => ":",
            Token::OrOr => "||",
            Token::AndAnd => "&&",
            Token::Pipe => "|",
            Token::Caret => "^",
            Token::Amp => "&",
            Token::EqEq => "==",
            Token::NotEq => "!=",
            Token::Less => "<",
            Token::Greater => ">",
            Token::LessEq => "<=",
            Token::GreaterEq => ">=",
            Token::Shl => "<<",
            Token::Shr => ">>",
            Token::Plus => "+",
            Token::Minus => "-",
            Token::Star => "*",
            Token::Slash => "/",
            Token::Percent => "%",
            Token::Tilde => "~",
            Token::Error => "invalid character",
        };
        write!(f, "{}", text)
    }
}

/// Peekable token stream with spans
pub struct Lexer<'source> {
    inner: logos::Lexer<'source, Token>,
    peeked: Option<Option<(Token, Span)>>,
}

impl<'source> Lexer<'source> {
    pub fn new(source: &'source str) -> Self {
        Lexer {
            inner: Token::lexer(source),
            peeked: None,
        }
    }

    pub fn next_token(&mut self) -> Option<(Token, Span)> {
        if let Some(peeked) = self.peeked.take() {
            return peeked;
        }
        let token = self.inner.next()?;
        let span = Span::from(self.inner.span());
        Some((token.unwrap_or(Token::Error), span))
    }

    pub fn peek_token(&mut self) -> Option<(Token, Span)> {
        if self.peeked.is_none() {
            self.peeked = Some(self.next_token());
        }
        self.peeked.flatten()
    }

    pub fn source(&self) -> &'source str {
        self.inner.source()
    }

    pub fn slice(&self, span: Span) -> &'source str {
        span.text(self.source())
    }

    /// Span just past the last byte of input
    pub fn end_span(&self) -> Span {
        Span::at(self.source().len())
    }
}
