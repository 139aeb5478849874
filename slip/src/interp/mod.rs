//! Tree-walking interpreter
//!
//! The evaluator consumes [`Value`]s produced by the reader and reduces them
//! against an environment chain rooted in the builtin library.

mod builtins;
mod env;
mod error;
mod eval;
mod function;
mod quasi;
mod teardown;
mod value;

pub use env::{child_env, EnvRef, Environment};
pub use error::{ErrorKind, InterpResult, RuntimeError};
pub use eval::{apply, eval, Interpreter};
pub use function::{Arity, Builtin, Callable, Lambda, Native};
pub use value::{Items, Value};
