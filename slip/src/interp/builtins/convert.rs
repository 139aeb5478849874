//! Conversion builtins
//!
//! Each one converts a single value and is registered with
//! [`Builtin::each`], so `(int "1" "2")` yields `(1 2)`.

use crate::interp::error::{InterpResult, RuntimeError};
use crate::interp::function::Builtin;
use crate::interp::value::Value;

pub(super) static BUILTINS: &[Builtin] = &[
    Builtin::each("int", to_int),
    Builtin::each("float", to_float),
    Builtin::each("str", to_str),
];

fn to_int(value: &Value) -> InterpResult<Value> {
    match value {
        Value::Int(n) => Ok(Value::Int(*n)),
        // Saturating, NaN becomes 0
        Value::Float(x) => Ok(Value::Int(*x as i64)),
        Value::Bool(b) => Ok(Value::Int(i64::from(*b))),
        Value::Str(s) => {
            let text = s.trim();
            text.parse::<i64>()
                .ok()
                .or_else(|| text.parse::<f64>().ok().map(|x| x as i64))
                .map(Value::Int)
                .ok_or_else(|| RuntimeError::type_mismatch(format!("cannot convert {value} to int")))
        }
        other => Err(RuntimeError::type_error("number, bool or str", other.type_name())),
    }
}

fn to_float(value: &Value) -> InterpResult<Value> {
    match value {
        Value::Int(n) => Ok(Value::Float(*n as f64)),
        Value::Float(x) => Ok(Value::Float(*x)),
        Value::Bool(b) => Ok(Value::Float(if *b { 1.0 } else { 0.0 })),
        Value::Str(s) => s
            .trim()
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|_| RuntimeError::type_mismatch(format!("cannot convert {value} to float"))),
        other => Err(RuntimeError::type_error("number, bool or str", other.type_name())),
    }
}

fn to_str(value: &Value) -> InterpResult<Value> {
    Ok(Value::str(value.to_raw_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interp::ErrorKind;

    #[test]
    fn test_to_int() {
        assert_eq!(to_int(&Value::Float(3.9)).unwrap(), Value::Int(3));
        assert_eq!(to_int(&Value::Float(-3.9)).unwrap(), Value::Int(-3));
        assert_eq!(to_int(&Value::str(" 42 ")).unwrap(), Value::Int(42));
        assert_eq!(to_int(&Value::str("2.5")).unwrap(), Value::Int(2));
        assert_eq!(to_int(&Value::Bool(true)).unwrap(), Value::Int(1));
    }

    #[test]
    fn test_to_int_failures() {
        assert_eq!(to_int(&Value::str("abc")).unwrap_err().kind, ErrorKind::TypeMismatch);
        assert_eq!(to_int(&Value::Nil).unwrap_err().kind, ErrorKind::TypeMismatch);
    }

    #[test]
    fn test_to_float() {
        assert_eq!(to_float(&Value::Int(2)).unwrap(), Value::Float(2.0));
        assert_eq!(to_float(&Value::str("1.25")).unwrap(), Value::Float(1.25));
        assert!(to_float(&Value::empty_list()).is_err());
    }

    #[test]
    fn test_to_str() {
        assert_eq!(to_str(&Value::Int(5)).unwrap(), Value::str("5"));
        assert_eq!(to_str(&Value::Float(5.0)).unwrap(), Value::str("5.0"));
        assert_eq!(to_str(&Value::str("raw")).unwrap(), Value::str("raw"));
        assert_eq!(to_str(&Value::Nil).unwrap(), Value::str("nil"));
    }

    #[test]
    fn test_vectorized_through_builtin() {
        let int = &BUILTINS[0];
        assert_eq!(
            int.call(&[Value::str("1"), Value::Float(2.5)]).unwrap(),
            Value::list(vec![Value::Int(1), Value::Int(2)])
        );
        assert_eq!(int.call(&[Value::str("7")]).unwrap(), Value::Int(7));
        assert_eq!(int.call(&[]).unwrap_err().kind, ErrorKind::ArityMismatch);
    }
}
