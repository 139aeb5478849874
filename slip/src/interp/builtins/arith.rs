//! Arithmetic, comparison and boolean builtins
//!
//! Two numeric towers sit side by side: `+ - * /` always produce a float,
//! while the `int` family only accepts and returns integers.

use super::{int_arg, number_arg};
use crate::interp::error::{InterpResult, RuntimeError};
use crate::interp::function::{Arity, Builtin};
use crate::interp::value::Value;
use std::cmp::Ordering;

pub(super) static BUILTINS: &[Builtin] = &[
    Builtin::new("+", Arity::AtLeast(1), add),
    Builtin::new("-", Arity::AtLeast(1), sub),
    Builtin::new("*", Arity::AtLeast(1), mul),
    Builtin::new("/", Arity::AtLeast(1), div),
    Builtin::new("int+", Arity::AtLeast(1), int_add),
    Builtin::new("int-", Arity::AtLeast(1), int_sub),
    Builtin::new("int*", Arity::AtLeast(1), int_mul),
    Builtin::new("int/", Arity::AtLeast(1), int_div),
    Builtin::new("int%", Arity::Exact(2), int_rem),
    Builtin::new("abs", Arity::Exact(1), abs),
    Builtin::new("min", Arity::AtLeast(1), min),
    Builtin::new("max", Arity::AtLeast(1), max),
    Builtin::new("<", Arity::AtLeast(2), less),
    Builtin::new(">", Arity::AtLeast(2), greater),
    Builtin::new("<=", Arity::AtLeast(2), less_eq),
    Builtin::new(">=", Arity::AtLeast(2), greater_eq),
    Builtin::new("=", Arity::AtLeast(2), equal),
    Builtin::new("!=", Arity::Exact(2), not_equal),
    Builtin::new("not", Arity::Exact(1), not),
    Builtin::new("and", Arity::AtLeast(0), and),
    Builtin::new("or", Arity::AtLeast(0), or),
];

fn numbers(args: &[Value]) -> InterpResult<Vec<f64>> {
    args.iter().map(number_arg).collect()
}

fn ints(args: &[Value]) -> InterpResult<Vec<i64>> {
    args.iter().map(int_arg).collect()
}

fn add(args: &[Value]) -> InterpResult<Value> {
    Ok(Value::Float(numbers(args)?.into_iter().sum()))
}

fn sub(args: &[Value]) -> InterpResult<Value> {
    let nums = numbers(args)?;
    let result = match nums.split_first() {
        Some((first, [])) => -first,
        Some((first, rest)) => rest.iter().fold(*first, |acc, x| acc - x),
        None => 0.0,
    };
    Ok(Value::Float(result))
}

fn mul(args: &[Value]) -> InterpResult<Value> {
    Ok(Value::Float(numbers(args)?.into_iter().product()))
}

/// Always float; a zero divisor yields an infinity or NaN
fn div(args: &[Value]) -> InterpResult<Value> {
    let nums = numbers(args)?;
    let result = match nums.split_first() {
        Some((first, [])) => 1.0 / first,
        Some((first, rest)) => rest.iter().fold(*first, |acc, x| acc / x),
        None => 1.0,
    };
    Ok(Value::Float(result))
}

fn int_add(args: &[Value]) -> InterpResult<Value> {
    Ok(Value::Int(ints(args)?.into_iter().fold(0, i64::wrapping_add)))
}

fn int_sub(args: &[Value]) -> InterpResult<Value> {
    let nums = ints(args)?;
    let result = match nums.split_first() {
        Some((first, [])) => first.wrapping_neg(),
        Some((first, rest)) => rest.iter().fold(*first, |acc, x| acc.wrapping_sub(*x)),
        None => 0,
    };
    Ok(Value::Int(result))
}

fn int_mul(args: &[Value]) -> InterpResult<Value> {
    Ok(Value::Int(ints(args)?.into_iter().fold(1, i64::wrapping_mul)))
}

/// Truncating division
fn int_div(args: &[Value]) -> InterpResult<Value> {
    let nums = ints(args)?;
    let (first, rest) = match nums.split_first() {
        Some((first, [])) => (1, std::slice::from_ref(first)),
        Some((first, rest)) => (*first, rest),
        None => return Ok(Value::Int(1)),
    };
    let mut acc = first;
    for divisor in rest {
        if *divisor == 0 {
            return Err(RuntimeError::division_by_zero());
        }
        acc = acc.wrapping_div(*divisor);
    }
    Ok(Value::Int(acc))
}

fn int_rem(args: &[Value]) -> InterpResult<Value> {
    let (a, b) = (int_arg(&args[0])?, int_arg(&args[1])?);
    if b == 0 {
        return Err(RuntimeError::division_by_zero());
    }
    Ok(Value::Int(a.wrapping_rem(b)))
}

fn abs(args: &[Value]) -> InterpResult<Value> {
    match &args[0] {
        Value::Int(n) => Ok(Value::Int(n.wrapping_abs())),
        Value::Float(x) => Ok(Value::Float(x.abs())),
        other => Err(RuntimeError::type_error("number", other.type_name())),
    }
}

/// Keeps `Int` when every argument is an `Int`, otherwise promotes
fn extremum(args: &[Value], pick: Ordering) -> InterpResult<Value> {
    if args.iter().all(|v| matches!(v, Value::Int(_))) {
        let nums = ints(args)?;
        let best = nums.into_iter().reduce(|a, b| if b.cmp(&a) == pick { b } else { a });
        return Ok(best.map_or(Value::Nil, Value::Int));
    }
    let nums = numbers(args)?;
    let best = nums.into_iter().reduce(|a, b| {
        if b.partial_cmp(&a) == Some(pick) { b } else { a }
    });
    Ok(best.map_or(Value::Nil, Value::Float))
}

fn min(args: &[Value]) -> InterpResult<Value> {
    extremum(args, Ordering::Less)
}

fn max(args: &[Value]) -> InterpResult<Value> {
    extremum(args, Ordering::Greater)
}

/// Order two numbers (ints promoted) or two strings.
/// `None` for NaN.
fn order(a: &Value, b: &Value) -> InterpResult<Option<Ordering>> {
    match (a, b) {
        (Value::Int(x), Value::Int(y)) => Ok(Some(x.cmp(y))),
        (Value::Str(x), Value::Str(y)) => Ok(Some(x.cmp(y))),
        _ => Ok(number_arg(a)?.partial_cmp(&number_arg(b)?)),
    }
}

/// Holds iff every adjacent pair satisfies `accept`; stops at the first
/// pair that does not
fn chain(args: &[Value], accept: fn(Ordering) -> bool) -> InterpResult<Value> {
    for pair in args.windows(2) {
        match order(&pair[0], &pair[1])? {
            Some(ord) if accept(ord) => {}
            _ => return Ok(Value::Bool(false)),
        }
    }
    Ok(Value::Bool(true))
}

fn less(args: &[Value]) -> InterpResult<Value> {
    chain(args, Ordering::is_lt)
}

fn greater(args: &[Value]) -> InterpResult<Value> {
    chain(args, Ordering::is_gt)
}

fn less_eq(args: &[Value]) -> InterpResult<Value> {
    chain(args, Ordering::is_le)
}

fn greater_eq(args: &[Value]) -> InterpResult<Value> {
    chain(args, Ordering::is_ge)
}

/// Scalar numbers compare after promotion; everything else structurally.
/// Mismatched kinds are simply unequal.
fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Int(x), Value::Float(y)) | (Value::Float(y), Value::Int(x)) => *x as f64 == *y,
        _ => a == b,
    }
}

fn equal(args: &[Value]) -> InterpResult<Value> {
    Ok(Value::Bool(
        args.windows(2).all(|pair| values_equal(&pair[0], &pair[1])),
    ))
}

fn not_equal(args: &[Value]) -> InterpResult<Value> {
    Ok(Value::Bool(!values_equal(&args[0], &args[1])))
}

fn not(args: &[Value]) -> InterpResult<Value> {
    Ok(Value::Bool(!args[0].is_truthy()))
}

fn and(args: &[Value]) -> InterpResult<Value> {
    Ok(Value::Bool(args.iter().all(Value::is_truthy)))
}

fn or(args: &[Value]) -> InterpResult<Value> {
    Ok(Value::Bool(args.iter().any(Value::is_truthy)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interp::ErrorKind;

    fn call(f: fn(&[Value]) -> InterpResult<Value>, args: &[Value]) -> Value {
        f(args).unwrap()
    }

    #[test]
    fn test_add_always_float() {
        assert_eq!(call(add, &[Value::Int(2), Value::Int(2)]), Value::Float(4.0));
        assert_eq!(call(add, &[Value::Int(2), Value::Float(2.0)]), Value::Float(4.0));
        assert_eq!(call(add, &[Value::Int(1), Value::Int(2), Value::Int(3)]), Value::Float(6.0));
    }

    #[test]
    fn test_sub_and_negate() {
        assert_eq!(call(sub, &[Value::Int(10), Value::Int(4)]), Value::Float(6.0));
        assert_eq!(call(sub, &[Value::Int(3)]), Value::Float(-3.0));
    }

    #[test]
    fn test_div_always_float() {
        assert_eq!(call(div, &[Value::Int(7), Value::Int(2)]), Value::Float(3.5));
        assert_eq!(call(div, &[Value::Int(4)]), Value::Float(0.25));
        assert_eq!(call(div, &[Value::Int(1), Value::Int(0)]), Value::Float(f64::INFINITY));
    }

    #[test]
    fn test_general_arithmetic_rejects_non_numbers() {
        let err = add(&[Value::Int(1), Value::str("2")]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::TypeMismatch);
    }

    #[test]
    fn test_int_family_stays_int() {
        assert_eq!(call(int_mul, &[Value::Int(2), Value::Int(3)]), Value::Int(6));
        assert_eq!(call(int_add, &[Value::Int(2), Value::Int(3)]), Value::Int(5));
        assert_eq!(call(int_sub, &[Value::Int(2), Value::Int(3)]), Value::Int(-1));
        assert_eq!(call(int_sub, &[Value::Int(2)]), Value::Int(-2));
        assert_eq!(call(int_div, &[Value::Int(7), Value::Int(2)]), Value::Int(3));
        assert_eq!(call(int_div, &[Value::Int(-7), Value::Int(2)]), Value::Int(-3));
        assert_eq!(call(int_rem, &[Value::Int(7), Value::Int(3)]), Value::Int(1));
    }

    #[test]
    fn test_int_family_rejects_floats() {
        let err = int_add(&[Value::Int(1), Value::Float(1.0)]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::TypeMismatch);
    }

    #[test]
    fn test_int_division_by_zero() {
        assert_eq!(
            int_div(&[Value::Int(1), Value::Int(0)]).unwrap_err().kind,
            ErrorKind::DivisionByZero
        );
        assert_eq!(
            int_rem(&[Value::Int(1), Value::Int(0)]).unwrap_err().kind,
            ErrorKind::DivisionByZero
        );
    }

    #[test]
    fn test_int_overflow_wraps() {
        assert_eq!(call(int_add, &[Value::Int(i64::MAX), Value::Int(1)]), Value::Int(i64::MIN));
    }

    #[test]
    fn test_min_max() {
        assert_eq!(call(min, &[Value::Int(3), Value::Int(1), Value::Int(2)]), Value::Int(1));
        assert_eq!(call(max, &[Value::Int(3), Value::Float(4.5)]), Value::Float(4.5));
        assert_eq!(call(abs, &[Value::Int(-3)]), Value::Int(3));
        assert_eq!(call(abs, &[Value::Float(-1.5)]), Value::Float(1.5));
    }

    #[test]
    fn test_comparison_chains() {
        assert_eq!(call(less, &[Value::Int(1), Value::Int(2), Value::Int(3)]), Value::Bool(true));
        assert_eq!(call(less, &[Value::Int(1), Value::Int(3), Value::Int(2)]), Value::Bool(false));
        assert_eq!(call(greater, &[Value::Int(3), Value::Int(2), Value::Int(1)]), Value::Bool(true));
        assert_eq!(call(less_eq, &[Value::Int(1), Value::Int(1)]), Value::Bool(true));
        assert_eq!(call(greater_eq, &[Value::Int(1), Value::Int(2)]), Value::Bool(false));
    }

    #[test]
    fn test_comparison_promotes_mixed_kinds() {
        assert_eq!(call(less, &[Value::Int(1), Value::Float(1.5)]), Value::Bool(true));
        assert_eq!(call(equal, &[Value::Int(2), Value::Float(2.0)]), Value::Bool(true));
    }

    #[test]
    fn test_comparison_short_circuits() {
        // The failing pair comes first, so the string is never compared
        assert_eq!(
            call(less, &[Value::Int(2), Value::Int(1), Value::str("x")]),
            Value::Bool(false)
        );
        assert!(less(&[Value::Int(1), Value::str("x")]).is_err());
    }

    #[test]
    fn test_string_ordering() {
        assert_eq!(call(less, &[Value::str("abc"), Value::str("abd")]), Value::Bool(true));
    }

    #[test]
    fn test_equal_cross_kind_is_false() {
        assert_eq!(call(equal, &[Value::Int(2), Value::str("2")]), Value::Bool(false));
        assert_eq!(call(equal, &[Value::Nil, Value::Bool(false)]), Value::Bool(false));
        assert_eq!(call(not_equal, &[Value::Int(2), Value::str("2")]), Value::Bool(true));
    }

    #[test]
    fn test_equal_many() {
        assert_eq!(call(equal, &[Value::Int(1), Value::Int(1), Value::Int(1)]), Value::Bool(true));
        assert_eq!(call(equal, &[Value::Int(1), Value::Int(1), Value::Int(2)]), Value::Bool(false));
    }

    #[test]
    fn test_boolean_ops_use_truthiness() {
        assert_eq!(call(not, &[Value::Int(0)]), Value::Bool(false));
        assert_eq!(call(not, &[Value::Nil]), Value::Bool(true));
        assert_eq!(call(and, &[Value::Int(1), Value::str("")]), Value::Bool(true));
        assert_eq!(call(and, &[Value::Int(1), Value::Bool(false)]), Value::Bool(false));
        assert_eq!(call(or, &[Value::Nil, Value::Bool(false)]), Value::Bool(false));
        assert_eq!(call(or, &[]), Value::Bool(false));
    }
}
