//! Quasiquote expansion

use super::env::EnvRef;
use super::error::{InterpResult, RuntimeError};
use super::eval::eval;
use super::value::Value;

/// Copy `template` structurally, evaluating `(unquote x)` and splicing
/// `(unquote-splicing x)` at quoting depth zero.
///
/// Each nested `quasiquote` raises the depth by one and each nested
/// `unquote`/`unquote-splicing` lowers it again; forms above depth zero are
/// copied, not evaluated.
pub fn quasiquote(template: &Value, env: &EnvRef) -> InterpResult<Value> {
    expand(template, env, 0)
}

/// `(tag operand)` with a symbol tag
fn tagged(items: &[Value]) -> Option<(&str, &Value)> {
    match items {
        [Value::Symbol(tag), operand] => Some((&**tag, operand)),
        _ => None,
    }
}

fn expand(template: &Value, env: &EnvRef, depth: usize) -> InterpResult<Value> {
    let Value::List(items) = template else {
        return Ok(template.clone());
    };

    match tagged(items) {
        Some(("unquote", operand)) => {
            if depth == 0 {
                eval(operand, env)
            } else {
                Ok(Value::tagged("unquote", expand(operand, env, depth - 1)?))
            }
        }
        Some(("unquote-splicing", operand)) => {
            if depth == 0 {
                Err(RuntimeError::type_mismatch(
                    "unquote-splicing is only valid inside a list",
                ))
            } else {
                Ok(Value::tagged("unquote-splicing", expand(operand, env, depth - 1)?))
            }
        }
        Some(("quasiquote", operand)) => {
            Ok(Value::tagged("quasiquote", expand(operand, env, depth + 1)?))
        }
        _ => {
            let mut out = Vec::with_capacity(items.len());
            for item in items.iter() {
                match splice_operand(item, depth) {
                    Some(operand) => match eval(operand, env)? {
                        Value::List(spliced) => out.extend(spliced.iter().cloned()),
                        other => return Err(RuntimeError::type_error("list", other.type_name())),
                    },
                    None => out.push(expand(item, env, depth)?),
                }
            }
            Ok(Value::list(out))
        }
    }
}

/// Operand of an `(unquote-splicing x)` element that is live at this depth
fn splice_operand(item: &Value, depth: usize) -> Option<&Value> {
    if depth != 0 {
        return None;
    }
    match tagged(item.as_list()?) {
        Some(("unquote-splicing", operand)) => Some(operand),
        _ => None,
    }
}
