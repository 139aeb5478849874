//! List, string and higher-order builtins
//!
//! None of these touch their operands; every "modification" builds a new
//! list.

use super::{callable_arg, int_arg, list_arg, str_arg};
use crate::interp::error::{InterpResult, RuntimeError};
use crate::interp::eval::apply;
use crate::interp::function::{Arity, Builtin};
use crate::interp::value::Value;

pub(super) static BUILTINS: &[Builtin] = &[
    Builtin::new("list", Arity::AtLeast(0), list),
    Builtin::new("cons", Arity::Exact(2), cons),
    Builtin::new("conj", Arity::AtLeast(1), conj),
    Builtin::new("concat", Arity::AtLeast(0), concat),
    Builtin::new("reverse", Arity::Exact(1), reverse),
    Builtin::new("first", Arity::Exact(1), first),
    Builtin::new("head", Arity::Exact(1), first),
    Builtin::new("rest", Arity::Exact(1), rest),
    Builtin::new("tail", Arity::Exact(1), rest),
    Builtin::new("init", Arity::Exact(1), init),
    Builtin::new("last", Arity::Exact(1), last),
    Builtin::new("nth", Arity::Exact(2), nth),
    Builtin::new("len", Arity::Exact(1), len),
    Builtin::new("range", Arity::AtLeast(1), range),
    Builtin::new("split", Arity::Exact(2), split),
    Builtin::new("join", Arity::Exact(2), join),
    Builtin::new("apply", Arity::Exact(2), apply_builtin),
    Builtin::new("map", Arity::Exact(2), map),
    Builtin::new("filter", Arity::Exact(2), filter),
    Builtin::new("reduce", Arity::Exact(3), reduce),
];

fn list(args: &[Value]) -> InterpResult<Value> {
    Ok(Value::list(args.to_vec()))
}

/// `(cons x lst)`: `x` prepended
fn cons(args: &[Value]) -> InterpResult<Value> {
    let tail = list_arg(&args[1])?;
    let mut items = Vec::with_capacity(tail.len() + 1);
    items.push(args[0].clone());
    items.extend_from_slice(tail);
    Ok(Value::list(items))
}

/// `(conj lst x...)`: elements appended
fn conj(args: &[Value]) -> InterpResult<Value> {
    let mut items = list_arg(&args[0])?.to_vec();
    items.extend_from_slice(&args[1..]);
    Ok(Value::list(items))
}

/// Lists join into a list, strings into a string; no mixing
fn concat(args: &[Value]) -> InterpResult<Value> {
    if !args.is_empty() && args.iter().all(|v| matches!(v, Value::Str(_))) {
        let mut text = String::new();
        for arg in args {
            text.push_str(str_arg(arg)?);
        }
        return Ok(Value::str(text));
    }
    let mut items = Vec::new();
    for arg in args {
        items.extend_from_slice(list_arg(arg)?);
    }
    Ok(Value::list(items))
}

fn reverse(args: &[Value]) -> InterpResult<Value> {
    let items = list_arg(&args[0])?;
    Ok(Value::list(items.iter().rev().cloned().collect()))
}

fn first(args: &[Value]) -> InterpResult<Value> {
    Ok(list_arg(&args[0])?.first().cloned().unwrap_or(Value::Nil))
}

fn rest(args: &[Value]) -> InterpResult<Value> {
    let items = list_arg(&args[0])?;
    Ok(Value::list(items.get(1..).unwrap_or_default().to_vec()))
}

fn init(args: &[Value]) -> InterpResult<Value> {
    let items = list_arg(&args[0])?;
    let end = items.len().saturating_sub(1);
    Ok(Value::list(items[..end].to_vec()))
}

fn last(args: &[Value]) -> InterpResult<Value> {
    Ok(list_arg(&args[0])?.last().cloned().unwrap_or(Value::Nil))
}

fn nth(args: &[Value]) -> InterpResult<Value> {
    let items = list_arg(&args[0])?;
    let index = int_arg(&args[1])?;
    usize::try_from(index)
        .ok()
        .and_then(|i| items.get(i))
        .cloned()
        .ok_or_else(|| RuntimeError::index_out_of_bounds(index, items.len()))
}

/// Zero for anything that is not a list or string
fn len(args: &[Value]) -> InterpResult<Value> {
    Ok(Value::Int(args[0].len() as i64))
}

/// `(range end)`, `(range start end)` or `(range start end step)`
fn range(args: &[Value]) -> InterpResult<Value> {
    let bounds = args
        .iter()
        .map(int_arg)
        .collect::<InterpResult<Vec<_>>>()?;
    let (start, end, step) = match bounds.as_slice() {
        [end] => (0, *end, 1),
        [start, end] => (*start, *end, 1),
        [start, end, step] => (*start, *end, *step),
        _ => return Err(RuntimeError::arity_mismatch("range", 3, args.len())),
    };
    if step == 0 {
        return Err(RuntimeError::type_mismatch("range step must not be zero"));
    }
    let mut items = Vec::new();
    let mut n = start;
    while (step > 0 && n < end) || (step < 0 && n > end) {
        items.push(Value::Int(n));
        match n.checked_add(step) {
            Some(next) => n = next,
            None => break,
        }
    }
    Ok(Value::list(items))
}

fn split(args: &[Value]) -> InterpResult<Value> {
    let text = str_arg(&args[0])?;
    let sep = str_arg(&args[1])?;
    let parts: Vec<Value> = if sep.is_empty() {
        text.chars().map(|c| Value::str(c.to_string())).collect()
    } else {
        text.split(sep).map(Value::str).collect()
    };
    Ok(Value::list(parts))
}

fn join(args: &[Value]) -> InterpResult<Value> {
    let items = list_arg(&args[0])?;
    let sep = str_arg(&args[1])?;
    let parts: Vec<String> = items.iter().map(Value::to_raw_string).collect();
    Ok(Value::str(parts.join(sep)))
}

/// `(apply f (a b c))` is `(f a b c)`
fn apply_builtin(args: &[Value]) -> InterpResult<Value> {
    let callable = callable_arg(&args[0])?;
    let call_args = list_arg(&args[1])?.to_vec();
    apply(callable, call_args)
}

fn map(args: &[Value]) -> InterpResult<Value> {
    let callable = callable_arg(&args[0])?;
    let items = list_arg(&args[1])?;
    items
        .iter()
        .map(|item| apply(callable, vec![item.clone()]))
        .collect::<InterpResult<Vec<_>>>()
        .map(Value::list)
}

fn filter(args: &[Value]) -> InterpResult<Value> {
    let callable = callable_arg(&args[0])?;
    let mut kept = Vec::new();
    for item in list_arg(&args[1])? {
        if apply(callable, vec![item.clone()])?.is_truthy() {
            kept.push(item.clone());
        }
    }
    Ok(Value::list(kept))
}

/// `(reduce f init lst)`, folding left
fn reduce(args: &[Value]) -> InterpResult<Value> {
    let callable = callable_arg(&args[0])?;
    let mut acc = args[1].clone();
    for item in list_arg(&args[2])? {
        acc = apply(callable, vec![acc, item.clone()])?;
    }
    Ok(acc)
}
