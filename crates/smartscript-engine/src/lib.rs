//! SmartScript execution engine: a tree-walking interpreter that
//! renders a parsed document to an external [`Sink`].
//!
//! A run is single-threaded and fully synchronous: [`Engine::execute`]
//! returns only after the entire tree has been visited and all output
//! written. No state is shared across runs except the sink itself.

mod engine;
mod error;
mod functions;
mod multistack;
mod sink;
mod value;

pub use engine::Engine;
pub use error::{EvalError, EvalResult};
pub use multistack::MultiStack;
pub use sink::{BufferSink, Sink};
pub use value::Value;

use smartscript_parser::Parser;
use smartscript_types::{ScriptError, SourceFile};
use thiserror::Error;

/// Any failure while rendering a document end to end.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The document failed to lex or parse.
    #[error(transparent)]
    Parse(#[from] ScriptError),
    /// The document parsed but execution aborted.
    #[error(transparent)]
    Eval(#[from] EvalError),
}

/// Parse a document and execute it against the given sink.
///
/// Output written before a failing point remains in the sink; there is
/// no rollback.
pub fn render(source_file: &SourceFile, sink: &mut dyn Sink) -> Result<(), RenderError> {
    let document = Parser::new(source_file).parse()?;
    Engine::new(sink).execute(&document)?;
    Ok(())
}
