//! Shared types for the SmartScript template engine.
//!
//! This crate defines the AST node and element types, source spans,
//! and the structured error type shared by the lexer, parser and
//! execution engine.

pub mod ast;
mod error;
mod span;

pub use error::{ErrorKind, ScriptError};
pub use span::{SourceFile, Span};

/// Result type used by the SmartScript front end.
pub type Result<T> = std::result::Result<T, ScriptError>;
