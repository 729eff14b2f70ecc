//! Token types for the SmartScript lexer.

use smartscript_types::Span;
use std::fmt;

/// A single token produced by the SmartScript lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// What kind of token this is.
    pub kind: TokenKind,
    /// Source location.
    pub span: Span,
}

impl Token {
    /// Create a new token.
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// Every token kind in the SmartScript grammar.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// A literal run of characters outside any tag (escapes resolved).
    Text(String),
    /// The tag opener `{$`.
    StartTag,
    /// The tag closer `$}`.
    EndTag,
    /// An identifier inside a tag: `FOR`, `END`, a variable name.
    Word(String),
    /// A function reference: `@sin` (carries the name without the `@`).
    Function(String),
    /// A single punctuation character: `=`, `+`, `"`, ...
    Symbol(char),
    /// A string constant with escapes already resolved.
    Str(String),
    /// An integer constant: `42`
    Integer(i64),
    /// A floating-point constant: `3.14`
    Double(f64),
    /// End of input.
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Text(_) => write!(f, "text"),
            TokenKind::StartTag => write!(f, "{{$"),
            TokenKind::EndTag => write!(f, "$}}"),
            TokenKind::Word(name) => write!(f, "{name}"),
            TokenKind::Function(name) => write!(f, "@{name}"),
            TokenKind::Symbol(c) => write!(f, "{c}"),
            TokenKind::Str(_) => write!(f, "string"),
            TokenKind::Integer(v) => write!(f, "{v}"),
            TokenKind::Double(v) => write!(f, "{v}"),
            TokenKind::Eof => write!(f, "end of input"),
        }
    }
}
