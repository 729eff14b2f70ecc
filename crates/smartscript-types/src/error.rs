use crate::Span;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which stage of the front end rejected the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    /// Malformed character sequence: bad escape, unterminated tag or
    /// string, malformed numeral.
    Lex,
    /// Structurally invalid document: unbalanced FOR/END, wrong element
    /// count or kind inside a tag, unknown tag name.
    Semantic,
}

/// A structured SmartScript front-end error.
///
/// Lexing and parsing are fail-fast: the first error aborts the whole
/// operation and this is the single value surfaced to the caller. The
/// serde derives let a hosting server report it as JSON without parsing
/// free-form strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptError {
    /// Source document name.
    pub file: String,
    /// Which stage produced the error.
    pub kind: ErrorKind,
    /// Human-readable message.
    pub message: String,
    /// Source location.
    #[serde(flatten)]
    pub span: Span,
    /// The exact source line for context.
    pub source_line: String,
}

impl ScriptError {
    /// Create a lex error.
    pub fn lex(
        file: impl Into<String>,
        message: impl Into<String>,
        span: Span,
        source_line: impl Into<String>,
    ) -> Self {
        Self {
            file: file.into(),
            kind: ErrorKind::Lex,
            message: message.into(),
            span,
            source_line: source_line.into(),
        }
    }

    /// Create a semantic error.
    pub fn semantic(
        file: impl Into<String>,
        message: impl Into<String>,
        span: Span,
        source_line: impl Into<String>,
    ) -> Self {
        Self {
            file: file.into(),
            kind: ErrorKind::Semantic,
            message: message.into(),
            span,
            source_line: source_line.into(),
        }
    }
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            ErrorKind::Lex => "lex error",
            ErrorKind::Semantic => "semantic error",
        };
        write!(
            f,
            "{}:{}: {}: {}",
            self.file, self.span, kind, self.message
        )
    }
}

impl std::error::Error for ScriptError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_location_and_kind() {
        let err = ScriptError::lex(
            "doc.smscr",
            "unterminated tag",
            Span::new(3, 8, 3, 8),
            "{$ FOR i 1",
        );
        assert_eq!(
            format!("{err}"),
            "doc.smscr:3:8: lex error: unterminated tag"
        );
    }

    #[test]
    fn json_round_trip() {
        let err = ScriptError::semantic(
            "doc.smscr",
            "too many END tags",
            Span::new(1, 1, 1, 8),
            "{$END$}",
        );
        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("\"semantic\""));
        assert!(json.contains("\"start_line\":1"));
        let back: ScriptError = serde_json::from_str(&json).unwrap();
        assert_eq!(back, err);
    }
}
