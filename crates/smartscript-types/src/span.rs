use serde::{Deserialize, Serialize};
use std::fmt;

/// Source location span.
///
/// Line and column values are 1-based so they can be pasted straight
/// into error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start_line: u32,
    pub start_col: u32,
    pub end_line: u32,
    pub end_col: u32,
}

impl Span {
    /// Create a new span.
    pub fn new(start_line: u32, start_col: u32, end_line: u32, end_col: u32) -> Self {
        Self {
            start_line,
            start_col,
            end_line,
            end_col,
        }
    }

    /// Create a zero-width span at a single position.
    pub fn point(line: u32, col: u32) -> Self {
        Self::new(line, col, line, col)
    }

    /// Extend this span so it also covers `other`.
    ///
    /// Spans in a document are produced in reading order, so `other`
    /// never starts before `self`.
    pub fn to(self, other: Span) -> Span {
        Span::new(
            self.start_line,
            self.start_col,
            other.end_line,
            other.end_col,
        )
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start_line, self.start_col)
    }
}

/// A named document source, kept around for error context.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub name: String,
    pub source: String,
    /// Byte offsets at which each line begins.
    line_starts: Vec<usize>,
}

impl SourceFile {
    /// Create a new source file.
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        let source = source.into();
        let line_starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self {
            name: name.into(),
            source,
            line_starts,
        }
    }

    /// Extract a source line by 1-based line number.
    ///
    /// Returns `None` if the line number is out of range.
    pub fn line(&self, line_number: u32) -> Option<&str> {
        let idx = line_number.checked_sub(1)? as usize;
        let start = *self.line_starts.get(idx)?;
        let end = self
            .line_starts
            .get(idx + 1)
            .map(|&next| next - 1)
            .unwrap_or(self.source.len());
        Some(self.source[start..end].trim_end_matches('\r'))
    }

    /// Number of lines in the document.
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_point_is_zero_width() {
        let s = Span::point(2, 7);
        assert_eq!(s, Span::new(2, 7, 2, 7));
    }

    #[test]
    fn span_to_covers_both_ends() {
        let a = Span::new(1, 3, 1, 5);
        let b = Span::new(1, 8, 2, 2);
        assert_eq!(a.to(b), Span::new(1, 3, 2, 2));
    }

    #[test]
    fn span_display_is_line_colon_col() {
        assert_eq!(format!("{}", Span::new(4, 9, 4, 12)), "4:9");
    }

    #[test]
    fn source_file_line_lookup() {
        let sf = SourceFile::new("doc.smscr", "first\nsecond\nthird");
        assert_eq!(sf.line(1), Some("first"));
        assert_eq!(sf.line(2), Some("second"));
        assert_eq!(sf.line(3), Some("third"));
        assert_eq!(sf.line(0), None);
        assert_eq!(sf.line(4), None);
        assert_eq!(sf.line_count(), 3);
    }

    #[test]
    fn source_file_crlf_lines() {
        let sf = SourceFile::new("doc.smscr", "one\r\ntwo\r\n");
        assert_eq!(sf.line(1), Some("one"));
        assert_eq!(sf.line(2), Some("two"));
    }

    #[test]
    fn source_file_empty() {
        let sf = SourceFile::new("doc.smscr", "");
        assert_eq!(sf.line(1), Some(""));
        assert_eq!(sf.line_count(), 1);
    }
}
