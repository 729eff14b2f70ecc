//! SmartScript lexer: converts document text into a token stream.
//!
//! The lexer is pull-based and stateful: it scans in one of three
//! explicit modes (text, tag, string) which the *parser* switches via
//! [`Lexer::set_mode`] — the lexer never infers a mode itself.

pub mod lexer;
pub mod token;

pub use lexer::{Lexer, Mode};
pub use token::{Token, TokenKind};
