//! AST node types for SmartScript documents.
//!
//! The tree is pure data: it is built once by the parser and never
//! mutated afterwards. Children are kept in insertion (document) order.
//! Every node and element can render itself back to source-literal text
//! with [`Node::to_source`] / [`Element::to_source`], which is used both
//! for diagnostics and for the reparse round-trip property.

use std::fmt;

// ══════════════════════════════════════════════════════════════════════════════
// Elements
// ══════════════════════════════════════════════════════════════════════════════

/// One operand/operator unit appearing inside a tag.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    /// A variable reference: `i`, `counter`
    Variable(String),
    /// An integer constant: `42`
    ConstantInteger(i64),
    /// A floating-point constant: `3.14`
    ConstantDouble(f64),
    /// A string constant (stored unescaped): `"hello"`
    String(String),
    /// A function reference: `@sin`
    Function(String),
    /// A single-character operator: one of `+ - * / ^`
    Operator(char),
}

impl Element {
    /// Render this element back to source-literal text.
    pub fn to_source(&self) -> String {
        match self {
            Element::Variable(name) => name.clone(),
            Element::ConstantInteger(v) => v.to_string(),
            Element::ConstantDouble(v) => {
                // Keep the decimal point so a reparse yields a double again.
                let text = format!("{v}");
                if text.contains('.') {
                    text
                } else {
                    format!("{text}.0")
                }
            }
            Element::String(value) => {
                let mut out = String::with_capacity(value.len() + 2);
                out.push('"');
                for ch in value.chars() {
                    match ch {
                        '"' => out.push_str("\\\""),
                        '\\' => out.push_str("\\\\"),
                        '\n' => out.push_str("\\n"),
                        '\r' => out.push_str("\\r"),
                        '\t' => out.push_str("\\t"),
                        _ => out.push(ch),
                    }
                }
                out.push('"');
                out
            }
            Element::Function(name) => format!("@{name}"),
            Element::Operator(symbol) => symbol.to_string(),
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_source())
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Nodes
// ══════════════════════════════════════════════════════════════════════════════

/// A node in the document tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// The document root. Only ever appears at the top of the tree.
    Document(DocumentNode),
    /// A literal run of characters.
    Text(TextNode),
    /// `{$ FOR var start end [step] $} ... {$END$}`
    ForLoop(ForLoopNode),
    /// `{$= elements... $}`
    Echo(EchoNode),
}

impl Node {
    /// Render this node (and its subtree) back to source text.
    pub fn to_source(&self) -> String {
        match self {
            Node::Document(doc) => doc.to_source(),
            Node::Text(text) => text.to_source(),
            Node::ForLoop(for_loop) => for_loop.to_source(),
            Node::Echo(echo) => echo.to_source(),
        }
    }
}

/// The document root; always exists and owns the top-level children.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DocumentNode {
    children: Vec<Node>,
}

impl DocumentNode {
    pub fn new(children: Vec<Node>) -> Self {
        Self { children }
    }

    /// Ordered, read-only access to the children.
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Render the whole document back to source text.
    pub fn to_source(&self) -> String {
        self.children.iter().map(Node::to_source).collect()
    }
}

/// An immutable literal run of characters.
#[derive(Debug, Clone, PartialEq)]
pub struct TextNode {
    text: String,
}

impl TextNode {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Render the text with `\` and `{$` re-escaped so a reparse yields
    /// the same literal.
    pub fn to_source(&self) -> String {
        self.text.replace('\\', "\\\\").replace("{$", "\\{$")
    }
}

/// A FOR loop: variable, start/end bounds, optional step, and the body
/// executed once per iteration.
#[derive(Debug, Clone, PartialEq)]
pub struct ForLoopNode {
    variable: String,
    start: Element,
    end: Element,
    step: Option<Element>,
    children: Vec<Node>,
}

impl ForLoopNode {
    pub fn new(
        variable: impl Into<String>,
        start: Element,
        end: Element,
        step: Option<Element>,
        children: Vec<Node>,
    ) -> Self {
        Self {
            variable: variable.into(),
            start,
            end,
            step,
            children,
        }
    }

    pub fn variable(&self) -> &str {
        &self.variable
    }

    pub fn start(&self) -> &Element {
        &self.start
    }

    pub fn end(&self) -> &Element {
        &self.end
    }

    pub fn step(&self) -> Option<&Element> {
        self.step.as_ref()
    }

    /// Ordered, read-only access to the loop body.
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Reconstruct the tag header, body and closing tag as source text.
    pub fn to_source(&self) -> String {
        let mut out = format!(
            "{{$ FOR {} {} {}",
            self.variable,
            self.start.to_source(),
            self.end.to_source()
        );
        if let Some(step) = &self.step {
            out.push(' ');
            out.push_str(&step.to_source());
        }
        out.push_str(" $}");
        for child in &self.children {
            out.push_str(&child.to_source());
        }
        out.push_str("{$END$}");
        out
    }
}

/// An echo tag: an ordered list of elements evaluated as an expression
/// program, with leftover stack values written to the sink.
#[derive(Debug, Clone, PartialEq)]
pub struct EchoNode {
    elements: Vec<Element>,
}

impl EchoNode {
    pub fn new(elements: Vec<Element>) -> Self {
        Self { elements }
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn to_source(&self) -> String {
        let mut out = String::from("{$=");
        for element in &self.elements {
            out.push(' ');
            out.push_str(&element.to_source());
        }
        out.push_str(" $}");
        out
    }
}
