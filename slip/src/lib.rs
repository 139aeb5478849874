//! Slip Interpreter Library
//!
//! A small Lisp: a logos/lalrpop reader producing data, and a tree-walking
//! evaluator over that data with lexical closures and proper tail calls.

pub mod error;
pub mod interp;
pub mod lexer;
pub mod parser;
pub mod repl;
pub mod span;

pub use error::{Error, Result};
pub use interp::{Interpreter, Value};
pub use span::Span;
