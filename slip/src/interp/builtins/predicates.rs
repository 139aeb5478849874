//! Type predicates

use crate::interp::error::InterpResult;
use crate::interp::function::{Arity, Builtin};
use crate::interp::value::Value;

pub(super) static BUILTINS: &[Builtin] = &[
    Builtin::new("nil?", Arity::Exact(1), is_nil),
    Builtin::new("bool?", Arity::Exact(1), is_bool),
    Builtin::new("int?", Arity::Exact(1), is_int),
    Builtin::new("float?", Arity::Exact(1), is_float),
    Builtin::new("number?", Arity::Exact(1), is_number),
    Builtin::new("str?", Arity::Exact(1), is_str),
    Builtin::new("symbol?", Arity::Exact(1), is_symbol),
    Builtin::new("list?", Arity::Exact(1), is_list),
    Builtin::new("atom?", Arity::Exact(1), is_atom),
    Builtin::new("fn?", Arity::Exact(1), is_fn),
    Builtin::new("empty?", Arity::Exact(1), is_empty),
    Builtin::new("true?", Arity::Exact(1), is_true),
];

fn is_nil(args: &[Value]) -> InterpResult<Value> {
    Ok(Value::Bool(matches!(args[0], Value::Nil)))
}

fn is_bool(args: &[Value]) -> InterpResult<Value> {
    Ok(Value::Bool(matches!(args[0], Value::Bool(_))))
}

fn is_int(args: &[Value]) -> InterpResult<Value> {
    Ok(Value::Bool(matches!(args[0], Value::Int(_))))
}

fn is_float(args: &[Value]) -> InterpResult<Value> {
    Ok(Value::Bool(matches!(args[0], Value::Float(_))))
}

fn is_number(args: &[Value]) -> InterpResult<Value> {
    Ok(Value::Bool(args[0].is_number()))
}

fn is_str(args: &[Value]) -> InterpResult<Value> {
    Ok(Value::Bool(matches!(args[0], Value::Str(_))))
}

fn is_symbol(args: &[Value]) -> InterpResult<Value> {
    Ok(Value::Bool(matches!(args[0], Value::Symbol(_))))
}

fn is_list(args: &[Value]) -> InterpResult<Value> {
    Ok(Value::Bool(matches!(args[0], Value::List(_))))
}

/// Anything that is not a list, including nil and functions
fn is_atom(args: &[Value]) -> InterpResult<Value> {
    Ok(Value::Bool(!matches!(args[0], Value::List(_))))
}

fn is_fn(args: &[Value]) -> InterpResult<Value> {
    Ok(Value::Bool(matches!(args[0], Value::Callable(_))))
}

/// Nil, `()` and `""` are empty; every other value is not
fn is_empty(args: &[Value]) -> InterpResult<Value> {
    let empty = match &args[0] {
        Value::Nil => true,
        Value::List(_) | Value::Str(_) => args[0].is_empty(),
        _ => false,
    };
    Ok(Value::Bool(empty))
}

fn is_true(args: &[Value]) -> InterpResult<Value> {
    Ok(Value::Bool(args[0].is_truthy()))
}
