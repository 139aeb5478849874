//! Builtin library
//!
//! Every builtin lives in a static table; [`register`] binds each one by
//! name in the root environment before any user code runs.

mod arith;
mod convert;
mod list;
mod misc;
mod predicates;

use super::env::Environment;
use super::error::{InterpResult, RuntimeError};
use super::function::{Builtin, Callable};
use super::value::Value;

/// Bind the whole library into `env`
pub fn register(env: &mut Environment) {
    let tables: [&'static [Builtin]; 5] = [
        arith::BUILTINS,
        convert::BUILTINS,
        list::BUILTINS,
        predicates::BUILTINS,
        misc::BUILTINS,
    ];
    for table in tables {
        for builtin in table {
            env.define(builtin.name, Value::Callable(Callable::Builtin(builtin)));
        }
    }
}

fn list_arg(value: &Value) -> InterpResult<&[Value]> {
    value
        .as_list()
        .ok_or_else(|| RuntimeError::type_error("list", value.type_name()))
}

fn int_arg(value: &Value) -> InterpResult<i64> {
    match value {
        Value::Int(n) => Ok(*n),
        other => Err(RuntimeError::type_error("int", other.type_name())),
    }
}

fn number_arg(value: &Value) -> InterpResult<f64> {
    value
        .as_float()
        .ok_or_else(|| RuntimeError::type_error("number", value.type_name()))
}

fn str_arg(value: &Value) -> InterpResult<&str> {
    match value {
        Value::Str(s) => Ok(s),
        other => Err(RuntimeError::type_error("str", other.type_name())),
    }
}

fn callable_arg(value: &Value) -> InterpResult<&Callable> {
    value
        .as_callable()
        .ok_or_else(|| RuntimeError::not_callable(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_binds_every_name() {
        let mut env = Environment::new();
        register(&mut env);
        for name in [
            "+", "-", "*", "/", "int+", "int*", "<", "=", "not", "int", "float", "str", "list",
            "cons", "conj", "concat", "reverse", "first", "head", "rest", "tail", "init",
            "last", "nth", "len", "apply", "map", "nil?", "int?", "float?", "str?", "list?",
            "atom?", "fn?", "empty?", "true?", "error",
        ] {
            assert!(env.contains(name), "missing builtin {name}");
        }
    }

    #[test]
    fn test_builtin_names_are_unique() {
        let mut env = Environment::new();
        register(&mut env);
        let total: usize = [
            arith::BUILTINS,
            convert::BUILTINS,
            list::BUILTINS,
            predicates::BUILTINS,
            misc::BUILTINS,
        ]
        .iter()
        .map(|table| table.len())
        .sum();
        assert_eq!(env.local_names().len(), total);
    }

    #[test]
    fn test_arg_helpers_report_type() {
        let err = list_arg(&Value::Int(1)).unwrap_err();
        assert_eq!(err.message, "type error: expected list, got int");
        assert_eq!(number_arg(&Value::Int(2)).unwrap(), 2.0);
        assert!(int_arg(&Value::Float(2.0)).is_err());
        assert!(str_arg(&Value::symbol("s")).is_err());
        assert!(callable_arg(&Value::Nil).is_err());
    }
}
