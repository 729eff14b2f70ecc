//! Core parser: one explicit stack of open container nodes.
//!
//! The stack is seeded with the document node. Text appends to the
//! current top; a FOR tag pushes a new container; an END tag pops one.
//! The bottom entry is always the document and must be the sole
//! remaining item at end of input. Parsing is fail-fast and not
//! resumable: the first error aborts and no partial tree is exposed.

use smartscript_lexer::{Lexer, Mode, TokenKind};
use smartscript_types::ast::{
    DocumentNode, EchoNode, Element, ForLoopNode, Node, TextNode,
};
use smartscript_types::{Result, ScriptError, SourceFile, Span};

/// An entry on the open-container stack.
enum OpenNode {
    /// The document root; only ever the bottom entry.
    Document(Vec<Node>),
    /// A FOR loop whose body is still being parsed.
    ForLoop {
        variable: String,
        start: Element,
        end: Element,
        step: Option<Element>,
        children: Vec<Node>,
    },
}

impl OpenNode {
    fn children_mut(&mut self) -> &mut Vec<Node> {
        match self {
            OpenNode::Document(children) => children,
            OpenNode::ForLoop { children, .. } => children,
        }
    }
}

/// The SmartScript parser.
///
/// Owns the lexer and drives its mode switches; see the module docs for
/// the stack discipline.
pub struct Parser<'src> {
    lexer: Lexer<'src>,
    source_file: &'src SourceFile,
    stack: Vec<OpenNode>,
}

impl<'src> Parser<'src> {
    /// Create a parser for the given document.
    pub fn new(source_file: &'src SourceFile) -> Self {
        Self {
            lexer: Lexer::new(source_file),
            source_file,
            stack: vec![OpenNode::Document(Vec::new())],
        }
    }

    /// Parse the whole document into its root node.
    pub fn parse(mut self) -> Result<DocumentNode> {
        let eof_span = loop {
            let token = self.lexer.next_token()?;
            match token.kind {
                TokenKind::Text(text) => self.append_child(Node::Text(TextNode::new(text))),
                TokenKind::StartTag => self.parse_tag()?,
                TokenKind::Eof => break token.span,
                other => {
                    return Err(
                        self.semantic(format!("unexpected '{other}' outside a tag"), token.span)
                    );
                }
            }
        };

        // The top of the stack at EOF must be the document itself.
        match self.stack.pop() {
            Some(OpenNode::Document(children)) if self.stack.is_empty() => {
                Ok(DocumentNode::new(children))
            }
            _ => Err(self.semantic("not enough END tags", eof_span)),
        }
    }

    // ── Tag dispatch ──────────────────────────────────────────────────────────

    /// Parse one `{$ ... $}` tag; the opener has been consumed.
    fn parse_tag(&mut self) -> Result<()> {
        self.lexer.set_mode(Mode::Tag);
        let token = self.lexer.next_token()?;
        match token.kind {
            TokenKind::Symbol('=') => self.parse_echo_tag()?,
            TokenKind::Word(word) if word.eq_ignore_ascii_case("FOR") => self.parse_for_tag()?,
            TokenKind::Word(word) if word.eq_ignore_ascii_case("END") => {
                self.parse_end_tag(token.span)?
            }
            other => {
                return Err(self.semantic(format!("invalid tag name '{other}'"), token.span));
            }
        }
        self.lexer.set_mode(Mode::Text);
        Ok(())
    }

    /// `{$= element... $}` — appended to the stack top, never pushed.
    fn parse_echo_tag(&mut self) -> Result<()> {
        let mut elements = Vec::new();
        loop {
            let token = self.lexer.next_token()?;
            let element = match token.kind {
                TokenKind::EndTag => break,
                TokenKind::Word(name) => Element::Variable(name),
                TokenKind::Integer(value) => Element::ConstantInteger(value),
                TokenKind::Double(value) => Element::ConstantDouble(value),
                TokenKind::Function(name) => Element::Function(name),
                TokenKind::Symbol(c) if matches!(c, '+' | '-' | '*' | '/' | '^') => {
                    Element::Operator(c)
                }
                TokenKind::Symbol('"') => Element::String(self.parse_string_constant()?),
                other => {
                    return Err(
                        self.semantic(format!("unexpected '{other}' in echo tag"), token.span)
                    );
                }
            };
            elements.push(element);
        }
        self.append_child(Node::Echo(EchoNode::new(elements)));
        Ok(())
    }

    /// `{$ FOR var start end [step] $}` — appended *and* pushed.
    fn parse_for_tag(&mut self) -> Result<()> {
        let token = self.lexer.next_token()?;
        let variable = match token.kind {
            TokenKind::Word(name) => name,
            other => {
                return Err(self.semantic(
                    format!("FOR expects a variable name, got '{other}'"),
                    token.span,
                ));
            }
        };

        let mut values = Vec::new();
        let end_span = loop {
            let token = self.lexer.next_token()?;
            let value = match token.kind {
                TokenKind::EndTag => break token.span,
                TokenKind::Word(name) => Element::Variable(name),
                TokenKind::Integer(value) => Element::ConstantInteger(value),
                TokenKind::Double(value) => Element::ConstantDouble(value),
                TokenKind::Symbol('"') => Element::String(self.parse_string_constant()?),
                other => {
                    return Err(self.semantic(
                        format!("'{other}' cannot appear in a FOR tag"),
                        token.span,
                    ));
                }
            };
            values.push(value);
        };

        if values.len() > 3 {
            return Err(self.semantic("too many elements in FOR tag", end_span));
        }
        let step = if values.len() == 3 { values.pop() } else { None };
        let end = values.pop();
        let start = values.pop();
        let (Some(start), Some(end)) = (start, end) else {
            return Err(self.semantic("FOR tag needs start and end values", end_span));
        };

        self.stack.push(OpenNode::ForLoop {
            variable,
            start,
            end,
            step,
            children: Vec::new(),
        });
        Ok(())
    }

    /// `{$END$}` — pops the innermost open FOR loop.
    fn parse_end_tag(&mut self, tag_span: Span) -> Result<()> {
        let token = self.lexer.next_token()?;
        if token.kind != TokenKind::EndTag {
            return Err(self.semantic(
                format!("END takes no arguments, got '{}'", token.kind),
                token.span,
            ));
        }
        match self.stack.pop() {
            Some(OpenNode::ForLoop {
                variable,
                start,
                end,
                step,
                children,
            }) => {
                self.append_child(Node::ForLoop(ForLoopNode::new(
                    variable, start, end, step, children,
                )));
                Ok(())
            }
            // Only the document was left: no FOR is open.
            _ => Err(self.semantic("too many END tags", tag_span)),
        }
    }

    /// Read one string constant: switch to string mode for the content,
    /// then consume the closing quote back in tag mode.
    fn parse_string_constant(&mut self) -> Result<String> {
        self.lexer.set_mode(Mode::Str);
        let token = self.lexer.next_token()?;
        let value = match token.kind {
            TokenKind::Str(value) => value,
            other => {
                return Err(
                    self.semantic(format!("expected string content, got '{other}'"), token.span)
                );
            }
        };
        self.lexer.set_mode(Mode::Tag);
        let quote = self.lexer.next_token()?;
        match quote.kind {
            TokenKind::Symbol('"') => Ok(value),
            other => Err(self.semantic(
                format!("expected closing quote, got '{other}'"),
                quote.span,
            )),
        }
    }

    // ── Helpers ───────────────────────────────────────────────────────────────

    /// Append a finished node to the current stack top.
    fn append_child(&mut self, node: Node) {
        if let Some(open) = self.stack.last_mut() {
            open.children_mut().push(node);
        }
    }

    fn semantic(&self, message: impl Into<String>, span: Span) -> ScriptError {
        let source_line = self.source_file.line(span.start_line).unwrap_or("");
        ScriptError::semantic(&self.source_file.name, message, span, source_line)
    }
}
