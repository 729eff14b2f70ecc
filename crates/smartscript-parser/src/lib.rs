//! SmartScript parser: converts a token stream into a document tree.

mod parser;

pub use parser::Parser;
