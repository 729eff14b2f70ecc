//! Runtime error types for the SmartScript engine.

use thiserror::Error;

/// Errors raised while executing a document.
///
/// Any of these aborts the run entirely; output already written to the
/// sink before the failing point remains written.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    /// A variable was read before any enclosing loop bound it.
    #[error("unbound variable '{0}'")]
    UnboundVariable(String),

    /// A non-numeric value appeared where a number is required.
    #[error("type mismatch: {0}")]
    TypeMismatch(String),

    /// Integer overflow or division by zero.
    #[error("arithmetic error: {0}")]
    Arithmetic(String),

    /// An echo element referenced a function not in the builtin catalog.
    #[error("unknown function '@{0}'")]
    UnknownFunction(String),

    /// An operator outside the supported `+ - * / ^` set.
    #[error("unknown operator '{0}'")]
    UnknownOperator(char),

    /// An operator or function needed more operands than the stack held.
    #[error("operand stack underflow in '{0}'")]
    StackUnderflow(String),

    /// A FOR bound or step was not a constant, string or variable.
    #[error("invalid loop argument '{0}'")]
    InvalidLoopArgument(String),
}

/// Result alias for engine operations.
pub type EvalResult<T> = Result<T, EvalError>;
