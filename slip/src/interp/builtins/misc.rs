//! Errors, reflection and output

use std::io::Write;

use crate::interp::error::{InterpResult, RuntimeError};
use crate::interp::function::{Arity, Builtin};
use crate::interp::value::Value;

pub(super) static BUILTINS: &[Builtin] = &[
    Builtin::new("error", Arity::Exact(1), raise),
    Builtin::new("type-of", Arity::Exact(1), type_of),
    Builtin::new("print", Arity::AtLeast(0), print),
    Builtin::new("println", Arity::AtLeast(0), println),
];

fn raise(args: &[Value]) -> InterpResult<Value> {
    Err(RuntimeError::user_raised(args[0].to_raw_string()))
}

fn type_of(args: &[Value]) -> InterpResult<Value> {
    Ok(Value::str(args[0].type_name()))
}

fn render(args: &[Value]) -> String {
    args.iter()
        .map(Value::to_raw_string)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Write the rendered arguments and flush so `print` output shows up
/// before a prompt
fn write_output(out: &mut impl Write, args: &[Value], newline: bool) -> InterpResult<()> {
    let text = render(args);
    let written = if newline {
        writeln!(out, "{text}")
    } else {
        write!(out, "{text}")
    };
    written
        .and_then(|()| out.flush())
        .map_err(|e| RuntimeError::io_error(&e.to_string()))
}

fn print(args: &[Value]) -> InterpResult<Value> {
    write_output(&mut std::io::stdout().lock(), args, false)?;
    Ok(Value::Nil)
}

fn println(args: &[Value]) -> InterpResult<Value> {
    write_output(&mut std::io::stdout().lock(), args, true)?;
    Ok(Value::Nil)
}
