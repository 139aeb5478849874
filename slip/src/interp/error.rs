//! Runtime errors for the interpreter

use super::Value;
use std::fmt;

/// Runtime error during evaluation
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeError {
    pub kind: ErrorKind,
    pub message: String,
}

/// Kinds of runtime errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Symbol not bound anywhere on the environment chain
    UnboundSymbol,
    /// Wrong argument count for a special form, builtin or lambda
    ArityMismatch,
    /// Operand of a kind the operation does not support
    TypeMismatch,
    /// Call head is not a builtin or lambda
    NotCallable,
    /// Odd-length binding list, or a non-symbol where a name is required
    MalformedBinding,
    /// Raised by the `error` builtin
    UserRaised,
    /// Integer division or remainder by zero
    DivisionByZero,
    /// `nth` outside the list
    IndexOutOfBounds,
    /// Writing program output failed
    Io,
}

impl RuntimeError {
    pub fn unbound_symbol(name: &str) -> Self {
        RuntimeError {
            kind: ErrorKind::UnboundSymbol,
            message: format!("unbound symbol: {name}"),
        }
    }

    pub fn arity_mismatch(name: &str, expected: usize, got: usize) -> Self {
        RuntimeError {
            kind: ErrorKind::ArityMismatch,
            message: format!("{name} expects {expected} argument(s), got {got}"),
        }
    }

    pub fn arity_at_least(name: &str, min: usize, got: usize) -> Self {
        RuntimeError {
            kind: ErrorKind::ArityMismatch,
            message: format!("{name} expects at least {min} argument(s), got {got}"),
        }
    }

    pub fn type_error(expected: &str, got: &str) -> Self {
        RuntimeError {
            kind: ErrorKind::TypeMismatch,
            message: format!("type error: expected {expected}, got {got}"),
        }
    }

    pub fn type_mismatch(message: impl Into<String>) -> Self {
        RuntimeError {
            kind: ErrorKind::TypeMismatch,
            message: message.into(),
        }
    }

    pub fn not_callable(value: &Value) -> Self {
        RuntimeError {
            kind: ErrorKind::NotCallable,
            message: format!("not callable: {value} ({})", value.type_name()),
        }
    }

    pub fn malformed_binding(message: &str) -> Self {
        RuntimeError {
            kind: ErrorKind::MalformedBinding,
            message: format!("malformed binding: {message}"),
        }
    }

    /// The user's message is kept verbatim.
    pub fn user_raised(message: impl Into<String>) -> Self {
        RuntimeError {
            kind: ErrorKind::UserRaised,
            message: message.into(),
        }
    }

    pub fn division_by_zero() -> Self {
        RuntimeError {
            kind: ErrorKind::DivisionByZero,
            message: "division by zero".to_string(),
        }
    }

    pub fn index_out_of_bounds(index: i64, len: usize) -> Self {
        RuntimeError {
            kind: ErrorKind::IndexOutOfBounds,
            message: format!("index {index} out of bounds for length {len}"),
        }
    }

    pub fn io_error(message: &str) -> Self {
        RuntimeError {
            kind: ErrorKind::Io,
            message: format!("IO error: {message}"),
        }
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Runtime error: {}", self.message)
    }
}

impl std::error::Error for RuntimeError {}

/// Result type for interpreter operations
pub type InterpResult<T> = Result<T, RuntimeError>;
