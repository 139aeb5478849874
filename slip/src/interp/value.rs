//! Runtime values for the interpreter

use super::function::Callable;
use super::teardown::Worklist;
use std::fmt;
use std::ops::Deref;
use std::rc::Rc;

/// Runtime value
///
/// Values are immutable once built. Lists, strings and symbols share their
/// storage, so cloning a value never copies its contents.
#[derive(Debug, Clone)]
pub enum Value {
    /// Absence of a value; distinct from `false` and from `()`
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    /// Raw text, displayed quoted
    Str(Rc<str>),
    /// Identifier; evaluates to its binding
    Symbol(Rc<str>),
    /// Ordered sequence, also the shape of every compound expression
    List(Items),
    /// Builtin or lambda
    Callable(Callable),
}

impl Value {
    pub fn str(s: impl Into<Rc<str>>) -> Self {
        Value::Str(s.into())
    }

    pub fn symbol(name: impl Into<Rc<str>>) -> Self {
        Value::Symbol(name.into())
    }

    pub fn list(items: Vec<Value>) -> Self {
        Value::List(items.into())
    }

    pub fn empty_list() -> Self {
        Value::list(Vec::new())
    }

    /// `(tag operand)`, the expansion of reader macros like `'x`
    pub fn tagged(tag: &str, operand: Value) -> Self {
        Value::list(vec![Value::symbol(tag), operand])
    }

    /// Everything except `nil` and `false` is true, including `0`, `""` and `()`.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Nil | Value::Bool(false))
    }

    /// Get type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::Symbol(_) => "symbol",
            Value::List(_) => "list",
            Value::Callable(_) => "fn",
        }
    }

    /// Element count of a list, character count of a string, zero otherwise
    pub fn len(&self) -> usize {
        match self {
            Value::List(items) => items.len(),
            Value::Str(s) => s.chars().count(),
            _ => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Value::Int(_) | Value::Float(_))
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(&**items),
            _ => None,
        }
    }

    pub fn as_symbol(&self) -> Option<&Rc<str>> {
        match self {
            Value::Symbol(name) => Some(name),
            _ => None,
        }
    }

    pub fn as_callable(&self) -> Option<&Callable> {
        match self {
            Value::Callable(callable) => Some(callable),
            _ => None,
        }
    }

    /// Numeric value with `Int` promoted to `f64`
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(x) => Some(*x),
            Value::Int(n) => Some(*n as f64),
            _ => None,
        }
    }

    /// Display form without quoting a top-level string.
    ///
    /// Used by `str`, `print` and `error`; nested strings stay quoted.
    pub fn to_raw_string(&self) -> String {
        match self {
            Value::Str(s) => s.to_string(),
            other => other.to_string(),
        }
    }
}

/// Storage of a list value.
///
/// Dropping the last reference tears nested lists and closures down on a
/// heap worklist, so arbitrarily deep nesting never recurses on the host
/// stack.
#[derive(Clone)]
pub struct Items(Rc<[Value]>);

impl Items {
    /// The elements, when this is the only reference to them
    pub(super) fn unique_mut(&mut self) -> Option<&mut [Value]> {
        Rc::get_mut(&mut self.0)
    }

    pub(super) fn is_unique(&self) -> bool {
        Rc::strong_count(&self.0) == 1
    }
}

impl From<Vec<Value>> for Items {
    fn from(items: Vec<Value>) -> Self {
        Items(items.into())
    }
}

impl Deref for Items {
    type Target = [Value];

    fn deref(&self) -> &[Value] {
        &self.0
    }
}

impl PartialEq for Items {
    fn eq(&self, other: &Self) -> bool {
        **self == **other
    }
}

impl fmt::Debug for Items {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&**self, f)
    }
}

impl Drop for Items {
    fn drop(&mut self) {
        let Some(slots) = self.unique_mut() else {
            return;
        };
        if slots.iter().any(Worklist::owns_children) {
            let mut work = Worklist::default();
            work.push_slots(slots);
            work.run();
        }
    }
}

/// Debug formatting keeps the fractional part (`4.0`), so floats re-read as
/// floats. Non-finite values use the reader's `+inf.0`/`-inf.0`/`+nan.0`.
fn write_float(f: &mut fmt::Formatter<'_>, x: f64) -> fmt::Result {
    if x.is_nan() {
        write!(f, "+nan.0")
    } else if x.is_infinite() {
        write!(f, "{}inf.0", if x > 0.0 { "+" } else { "-" })
    } else {
        write!(f, "{x:?}")
    }
}

fn write_escaped(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    write!(f, "\"")?;
    for c in s.chars() {
        match c {
            '"' => write!(f, "\\\"")?,
            '\\' => write!(f, "\\\\")?,
            '\n' => write!(f, "\\n")?,
            '\t' => write!(f, "\\t")?,
            '\r' => write!(f, "\\r")?,
            '\0' => write!(f, "\\0")?,
            c => write!(f, "{c}")?,
        }
    }
    write!(f, "\"")
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(x) => write_float(f, *x),
            Value::Str(s) => write_escaped(f, s),
            Value::Symbol(name) => write!(f, "{name}"),
            Value::List(items) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, ")")
            }
            Value::Callable(callable) => write!(f, "{callable}"),
        }
    }
}

/// Structural equality. `Int` and `Float` never compare equal here; numeric
/// promotion belongs to the `=` builtin.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Symbol(a), Value::Symbol(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Callable(a), Value::Callable(b)) => a == b,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_display() {
        assert_eq!(format!("{}", Value::Nil), "nil");
        assert_eq!(format!("{}", Value::Int(42)), "42");
        assert_eq!(format!("{}", Value::Float(4.0)), "4.0");
        assert_eq!(format!("{}", Value::Float(0.5)), "0.5");
        assert_eq!(format!("{}", Value::Bool(true)), "true");
        assert_eq!(format!("{}", Value::symbol("foo")), "foo");
    }

    #[test]
    fn test_string_display_is_quoted_and_escaped() {
        insta::assert_snapshot!(Value::str("say \"hi\"\n"), @r#""say \"hi\"\n""#);
    }

    #[test]
    fn test_list_display() {
        let list = Value::list(vec![
            Value::symbol("+"),
            Value::Int(1),
            Value::list(vec![Value::str("a"), Value::Float(2.5)]),
            Value::empty_list(),
        ]);
        insta::assert_snapshot!(list, @r#"(+ 1 ("a" 2.5) ())"#);
    }

    #[test]
    fn test_raw_string() {
        assert_eq!(Value::str("hi").to_raw_string(), "hi");
        assert_eq!(
            Value::list(vec![Value::str("hi")]).to_raw_string(),
            "(\"hi\")"
        );
    }

    #[test]
    fn test_value_truthy() {
        assert!(!Value::Nil.is_truthy());
        assert!(!Value::Bool(false).is_truthy());
        assert!(Value::Bool(true).is_truthy());
        assert!(Value::Int(0).is_truthy());
        assert!(Value::Float(0.0).is_truthy());
        assert!(Value::str("").is_truthy());
        assert!(Value::empty_list().is_truthy());
        assert!(Value::symbol("x").is_truthy());
    }

    #[test]
    fn test_len() {
        assert_eq!(Value::list(vec![Value::Nil, Value::Nil]).len(), 2);
        assert_eq!(Value::str("héllo").len(), 5);
        assert_eq!(Value::Int(12345).len(), 0);
        assert_eq!(Value::Nil.len(), 0);
    }

    #[test]
    fn test_list_equality_is_structural() {
        let a = Value::list(vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
        let b = Value::list(vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
        let c = Value::list(vec![Value::Int(1), Value::str("2"), Value::Int(3)]);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_no_numeric_coercion_in_equality() {
        assert_ne!(Value::Int(1), Value::Float(1.0));
        assert_ne!(
            Value::list(vec![Value::Int(1)]),
            Value::list(vec![Value::Float(1.0)])
        );
    }

    #[test]
    fn test_nil_is_not_empty_list() {
        assert_ne!(Value::Nil, Value::empty_list());
        assert_ne!(Value::Nil, Value::Bool(false));
    }

    #[test]
    fn test_non_finite_float_display() {
        assert_eq!(Value::Float(f64::INFINITY).to_string(), "+inf.0");
        assert_eq!(Value::Float(f64::NEG_INFINITY).to_string(), "-inf.0");
        assert_eq!(Value::Float(f64::NAN).to_string(), "+nan.0");
        assert_eq!(Value::Float(-0.5).to_string(), "-0.5");
    }

    #[test]
    fn test_tagged() {
        let quoted = Value::tagged("quote", Value::symbol("x"));
        assert_eq!(format!("{quoted}"), "(quote x)");
    }
}
