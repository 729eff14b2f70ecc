//! Core SmartScript lexer — converts document text to tokens on demand.
//!
//! Three explicit modes:
//! - [`Mode::Text`]: literal characters until `{$` or end of input,
//!   honoring the `\{` and `\\` escapes.
//! - [`Mode::Tag`]: whitespace-separated words, `@functions`, numbers,
//!   punctuation symbols, and the `$}` closer.
//! - [`Mode::Str`]: string content up to (but not including) the
//!   closing `"`, honoring `\"`, `\\`, `\n`, `\r`, `\t`.
//!
//! The mode is switched only by the caller; the first malformed
//! character sequence aborts with a lex [`ScriptError`].

use smartscript_types::{Result, ScriptError, SourceFile, Span};

use crate::token::{Token, TokenKind};

/// Lexer mode, driven entirely by the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Scanning literal document text.
    Text,
    /// Inside a `{$ ... $}` tag.
    Tag,
    /// Inside a string constant within a tag.
    Str,
}

/// The SmartScript lexer.
pub struct Lexer<'src> {
    /// The full document text as bytes.
    source: &'src [u8],
    /// Source file for error context.
    source_file: &'src SourceFile,
    /// Current byte offset into `source`.
    pos: usize,
    /// Current line number (1-based).
    line: u32,
    /// Current column number (1-based).
    col: u32,
    /// Current scanning mode.
    mode: Mode,
}

impl<'src> Lexer<'src> {
    /// Create a new lexer over the given document, starting in text mode.
    pub fn new(source_file: &'src SourceFile) -> Self {
        Self {
            source: source_file.source.as_bytes(),
            source_file,
            pos: 0,
            line: 1,
            col: 1,
            mode: Mode::Text,
        }
    }

    /// Switch the scanning mode. Called by the parser, never inferred.
    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    /// The current scanning mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Produce the next token, or fail with a lex error.
    pub fn next_token(&mut self) -> Result<Token> {
        match self.mode {
            Mode::Text => self.next_text_token(),
            Mode::Tag => self.next_tag_token(),
            Mode::Str => self.next_str_token(),
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Character-level helpers
    // ─────────────────────────────────────────────────────────────

    fn peek(&self) -> Option<u8> {
        self.source.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.source.get(self.pos + offset).copied()
    }

    fn advance(&mut self) -> Option<u8> {
        let ch = self.source.get(self.pos).copied()?;
        self.pos += 1;
        if ch == b'\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(ch)
    }

    fn at_end(&self) -> bool {
        self.pos >= self.source.len()
    }

    fn here(&self) -> Span {
        Span::point(self.line, self.col)
    }

    fn span_from(&self, start_line: u32, start_col: u32) -> Span {
        Span::new(
            start_line,
            start_col,
            self.line,
            self.col.saturating_sub(1).max(1),
        )
    }

    fn lex_error(&self, message: impl Into<String>, span: Span) -> ScriptError {
        let source_line = self.source_file.line(span.start_line).unwrap_or("");
        ScriptError::lex(&self.source_file.name, message, span, source_line)
    }

    // ─────────────────────────────────────────────────────────────
    // Text mode
    // ─────────────────────────────────────────────────────────────

    /// Scan literal text until `{$` or end of input.
    ///
    /// When `{$` is reached with pending text, the text token is emitted
    /// first and the next pull returns [`TokenKind::StartTag`].
    fn next_text_token(&mut self) -> Result<Token> {
        let start_line = self.line;
        let start_col = self.col;

        if self.at_end() {
            return Ok(Token::new(TokenKind::Eof, self.here()));
        }

        if self.peek() == Some(b'{') && self.peek_at(1) == Some(b'$') {
            self.advance();
            self.advance();
            return Ok(Token::new(
                TokenKind::StartTag,
                self.span_from(start_line, start_col),
            ));
        }

        let mut buf: Vec<u8> = Vec::new();
        loop {
            match self.peek() {
                None => break,
                Some(b'{') if self.peek_at(1) == Some(b'$') => break,
                Some(b'\\') => {
                    let esc_line = self.line;
                    let esc_col = self.col;
                    self.advance();
                    match self.advance() {
                        Some(b'{') => buf.push(b'{'),
                        Some(b'\\') => buf.push(b'\\'),
                        Some(other) => {
                            return Err(self.lex_error(
                                format!("invalid escape '\\{}' in document text", other as char),
                                self.span_from(esc_line, esc_col),
                            ));
                        }
                        None => {
                            return Err(self.lex_error(
                                "document ends with a dangling '\\'",
                                self.span_from(esc_line, esc_col),
                            ));
                        }
                    }
                }
                Some(ch) => {
                    self.advance();
                    buf.push(ch);
                }
            }
        }

        let text = String::from_utf8_lossy(&buf).into_owned();
        Ok(Token::new(
            TokenKind::Text(text),
            self.span_from(start_line, start_col),
        ))
    }

    // ─────────────────────────────────────────────────────────────
    // Tag mode
    // ─────────────────────────────────────────────────────────────

    fn skip_whitespace(&mut self) {
        while let Some(b' ' | b'\t' | b'\r' | b'\n') = self.peek() {
            self.advance();
        }
    }

    /// Scan one token inside a `{$ ... $}` tag.
    fn next_tag_token(&mut self) -> Result<Token> {
        self.skip_whitespace();

        let start_line = self.line;
        let start_col = self.col;

        if self.at_end() {
            return Err(self.lex_error("unterminated tag", self.here()));
        }

        if self.peek() == Some(b'$') && self.peek_at(1) == Some(b'}') {
            self.advance();
            self.advance();
            return Ok(Token::new(
                TokenKind::EndTag,
                self.span_from(start_line, start_col),
            ));
        }

        let ch = self.advance().unwrap_or(0);
        match ch {
            b'a'..=b'z' | b'A'..=b'Z' | b'_' => {
                let word = self.scan_identifier(ch);
                Ok(Token::new(
                    TokenKind::Word(word),
                    self.span_from(start_line, start_col),
                ))
            }

            b'@' => match self.peek() {
                Some(first @ (b'a'..=b'z' | b'A'..=b'Z')) => {
                    self.advance();
                    let name = self.scan_identifier(first);
                    Ok(Token::new(
                        TokenKind::Function(name),
                        self.span_from(start_line, start_col),
                    ))
                }
                _ => Err(self.lex_error(
                    "'@' must be followed by a function name",
                    self.span_from(start_line, start_col),
                )),
            },

            b'0'..=b'9' => self.scan_number(ch, start_line, start_col),

            _ if ch.is_ascii_punctuation() => Ok(Token::new(
                TokenKind::Symbol(ch as char),
                self.span_from(start_line, start_col),
            )),

            _ => Err(self.lex_error(
                format!("unexpected character '{}' in tag", ch as char),
                self.span_from(start_line, start_col),
            )),
        }
    }

    /// Continue an identifier whose first character was already consumed.
    fn scan_identifier(&mut self, first: u8) -> String {
        let mut name = String::new();
        name.push(first as char);
        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphanumeric() || ch == b'_' {
                self.advance();
                name.push(ch as char);
            } else {
                break;
            }
        }
        name
    }

    /// Scan an integer or double; the first digit was already consumed.
    fn scan_number(&mut self, first: u8, start_line: u32, start_col: u32) -> Result<Token> {
        let mut text = String::new();
        text.push(first as char);
        while let Some(ch @ b'0'..=b'9') = self.peek() {
            self.advance();
            text.push(ch as char);
        }

        let mut is_double = false;
        if self.peek() == Some(b'.') {
            if !matches!(self.peek_at(1), Some(b'0'..=b'9')) {
                self.advance();
                return Err(self.lex_error(
                    format!("malformed numeral '{text}.'"),
                    self.span_from(start_line, start_col),
                ));
            }
            is_double = true;
            self.advance();
            text.push('.');
            while let Some(ch @ b'0'..=b'9') = self.peek() {
                self.advance();
                text.push(ch as char);
            }
        }

        let span = self.span_from(start_line, start_col);
        let kind = if is_double {
            match text.parse::<f64>() {
                Ok(v) => TokenKind::Double(v),
                Err(_) => {
                    return Err(self.lex_error(format!("malformed numeral '{text}'"), span));
                }
            }
        } else {
            match text.parse::<i64>() {
                Ok(v) => TokenKind::Integer(v),
                Err(_) => {
                    return Err(self.lex_error(format!("malformed numeral '{text}'"), span));
                }
            }
        };
        Ok(Token::new(kind, span))
    }

    // ─────────────────────────────────────────────────────────────
    // String mode
    // ─────────────────────────────────────────────────────────────

    /// Scan string content up to an unescaped `"`.
    ///
    /// The closing quote is left unconsumed: the caller switches back to
    /// tag mode and reads it as a [`TokenKind::Symbol`].
    fn next_str_token(&mut self) -> Result<Token> {
        let start_line = self.line;
        let start_col = self.col;
        let mut buf: Vec<u8> = Vec::new();

        loop {
            match self.peek() {
                None => {
                    return Err(self.lex_error(
                        "unterminated string",
                        self.span_from(start_line, start_col),
                    ));
                }
                Some(b'"') => break,
                Some(b'\\') => {
                    let esc_line = self.line;
                    let esc_col = self.col;
                    self.advance();
                    match self.advance() {
                        Some(b'"') => buf.push(b'"'),
                        Some(b'\\') => buf.push(b'\\'),
                        Some(b'n') => buf.push(b'\n'),
                        Some(b'r') => buf.push(b'\r'),
                        Some(b't') => buf.push(b'\t'),
                        Some(other) => {
                            return Err(self.lex_error(
                                format!("invalid escape '\\{}' in string", other as char),
                                self.span_from(esc_line, esc_col),
                            ));
                        }
                        None => {
                            return Err(self.lex_error(
                                "unterminated string",
                                self.span_from(start_line, start_col),
                            ));
                        }
                    }
                }
                Some(ch) => {
                    self.advance();
                    buf.push(ch);
                }
            }
        }

        let value = String::from_utf8_lossy(&buf).into_owned();
        Ok(Token::new(
            TokenKind::Str(value),
            self.span_from(start_line, start_col),
        ))
    }
}
