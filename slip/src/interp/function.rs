//! Builtins and lambdas behind one callable contract

use super::env::{child_env, EnvRef};
use super::error::{InterpResult, RuntimeError};
use super::value::Value;
use std::fmt;
use std::rc::Rc;

/// Accepted argument counts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exact(usize),
    AtLeast(usize),
}

impl Arity {
    pub fn check(self, name: &str, got: usize) -> InterpResult<()> {
        match self {
            Arity::Exact(n) if got != n => Err(RuntimeError::arity_mismatch(name, n, got)),
            Arity::AtLeast(n) if got < n => Err(RuntimeError::arity_at_least(name, n, got)),
            _ => Ok(()),
        }
    }
}

/// Host implementation of a builtin
#[derive(Debug, Clone, Copy)]
pub enum Native {
    /// Receives the whole argument slice
    Slice(fn(&[Value]) -> InterpResult<Value>),
    /// Converts a single value. With one argument the result is returned
    /// as-is; with several, each is converted and the results come back as
    /// a list.
    Each(fn(&Value) -> InterpResult<Value>),
}

/// Host-native function registered in the root environment
#[derive(Debug)]
pub struct Builtin {
    pub name: &'static str,
    pub arity: Arity,
    pub native: Native,
}

impl Builtin {
    pub const fn new(
        name: &'static str,
        arity: Arity,
        func: fn(&[Value]) -> InterpResult<Value>,
    ) -> Self {
        Builtin {
            name,
            arity,
            native: Native::Slice(func),
        }
    }

    /// Single-value conversion, vectorized over extra arguments
    pub const fn each(name: &'static str, func: fn(&Value) -> InterpResult<Value>) -> Self {
        Builtin {
            name,
            arity: Arity::AtLeast(1),
            native: Native::Each(func),
        }
    }

    pub fn call(&self, args: &[Value]) -> InterpResult<Value> {
        self.arity.check(self.name, args.len())?;
        match self.native {
            Native::Slice(func) => func(args),
            Native::Each(func) => match args {
                [single] => func(single),
                many => many
                    .iter()
                    .map(func)
                    .collect::<InterpResult<Vec<_>>>()
                    .map(Value::list),
            },
        }
    }
}

/// User-defined function closing over its defining environment
pub struct Lambda {
    pub name: Option<Rc<str>>,
    pub params: Vec<Rc<str>>,
    pub body: Rc<[Value]>,
    pub env: EnvRef,
}

impl Lambda {
    /// Build a lambda from a parameter list form and a body sequence.
    ///
    /// Every parameter must be a symbol.
    pub fn new(
        name: Option<Rc<str>>,
        params: &Value,
        body: &[Value],
        env: &EnvRef,
    ) -> InterpResult<Self> {
        let params = params
            .as_list()
            .ok_or_else(|| RuntimeError::malformed_binding("parameter list must be a list"))?
            .iter()
            .map(|param| {
                param.as_symbol().cloned().ok_or_else(|| {
                    RuntimeError::malformed_binding(&format!(
                        "parameter must be a symbol, got {param}"
                    ))
                })
            })
            .collect::<InterpResult<Vec<_>>>()?;
        Ok(Lambda {
            name,
            params,
            body: body.to_vec().into(),
            env: Rc::clone(env),
        })
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("lambda")
    }

    /// Fresh child of the captured environment with each parameter bound
    /// to its argument. The count must match exactly.
    pub fn bind(&self, args: Vec<Value>) -> InterpResult<EnvRef> {
        if args.len() != self.params.len() {
            return Err(RuntimeError::arity_mismatch(
                self.display_name(),
                self.params.len(),
                args.len(),
            ));
        }
        let scope = child_env(&self.env);
        {
            let mut frame = scope.borrow_mut();
            for (param, arg) in self.params.iter().zip(args) {
                frame.define(Rc::clone(param), arg);
            }
        }
        Ok(scope)
    }
}

// The captured environment usually contains this lambda, so it is left out.
impl fmt::Debug for Lambda {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lambda")
            .field("name", &self.name)
            .field("params", &self.params)
            .field("body", &self.body)
            .finish_non_exhaustive()
    }
}

/// Anything that can sit in call position
#[derive(Debug, Clone)]
pub enum Callable {
    Builtin(&'static Builtin),
    Lambda(Rc<Lambda>),
}

/// Identity, not structure: two lambdas with the same text are different
/// closures.
impl PartialEq for Callable {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Callable::Builtin(a), Callable::Builtin(b)) => std::ptr::eq(*a, *b),
            (Callable::Lambda(a), Callable::Lambda(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Callable::Builtin(builtin) => write!(f, "<builtin {}>", builtin.name),
            Callable::Lambda(lambda) => {
                write!(f, "<fn ")?;
                if let Some(name) = &lambda.name {
                    write!(f, "{name} ")?;
                }
                write!(f, "(")?;
                for (i, param) in lambda.params.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{param}")?;
                }
                write!(f, ")>")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interp::env::Environment;
    use crate::interp::ErrorKind;

    fn first(args: &[Value]) -> InterpResult<Value> {
        Ok(args[0].clone())
    }

    fn negate(value: &Value) -> InterpResult<Value> {
        match value {
            Value::Int(n) => Ok(Value::Int(-n)),
            other => Err(RuntimeError::type_error("int", other.type_name())),
        }
    }

    static FIRST: Builtin = Builtin::new("first-arg", Arity::AtLeast(1), first);
    static NEGATE: Builtin = Builtin::each("negate", negate);

    fn params(names: &[&str]) -> Value {
        Value::list(names.iter().map(|n| Value::symbol(*n)).collect())
    }

    #[test]
    fn test_arity_check() {
        assert!(Arity::Exact(2).check("f", 2).is_ok());
        assert_eq!(
            Arity::Exact(2).check("f", 1).unwrap_err().kind,
            ErrorKind::ArityMismatch
        );
        assert!(Arity::AtLeast(1).check("f", 5).is_ok());
        assert!(Arity::AtLeast(1).check("f", 0).is_err());
    }

    #[test]
    fn test_builtin_enforces_arity() {
        let err = FIRST.call(&[]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::ArityMismatch);
        assert_eq!(FIRST.call(&[Value::Int(1)]).unwrap(), Value::Int(1));
    }

    #[test]
    fn test_each_single_argument_is_scalar() {
        assert_eq!(NEGATE.call(&[Value::Int(3)]).unwrap(), Value::Int(-3));
    }

    #[test]
    fn test_each_many_arguments_is_list() {
        let result = NEGATE.call(&[Value::Int(1), Value::Int(2)]).unwrap();
        assert_eq!(result, Value::list(vec![Value::Int(-1), Value::Int(-2)]));
    }

    #[test]
    fn test_each_propagates_element_error() {
        let err = NEGATE.call(&[Value::Int(1), Value::str("x")]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::TypeMismatch);
    }

    #[test]
    fn test_lambda_rejects_non_symbol_params() {
        let env = Environment::new().into_ref();
        let bad = Value::list(vec![Value::symbol("x"), Value::Int(1)]);
        let err = Lambda::new(None, &bad, &[Value::Nil], &env).unwrap_err();
        assert_eq!(err.kind, ErrorKind::MalformedBinding);
    }

    #[test]
    fn test_lambda_bind_exact_arity() {
        let env = Environment::new().into_ref();
        let lambda = Lambda::new(Some("add".into()), &params(&["a", "b"]), &[Value::Nil], &env).unwrap();

        let err = lambda.bind(vec![Value::Int(1)]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::ArityMismatch);
        assert!(err.message.starts_with("add"));
        assert!(lambda.bind(vec![Value::Int(1), Value::Int(2), Value::Int(3)]).is_err());

        let scope = lambda.bind(vec![Value::Int(1), Value::Int(2)]).unwrap();
        assert_eq!(scope.borrow().get("b"), Some(Value::Int(2)));
        // Captured environment is untouched
        assert!(!env.borrow().contains("a"));
    }

    #[test]
    fn test_each_bind_is_a_fresh_scope() {
        let env = Environment::new().into_ref();
        let lambda = Lambda::new(None, &params(&["x"]), &[Value::Nil], &env).unwrap();
        let first = lambda.bind(vec![Value::Int(1)]).unwrap();
        let second = lambda.bind(vec![Value::Int(2)]).unwrap();
        assert!(!Rc::ptr_eq(&first, &second));
        assert_eq!(first.borrow().get("x"), Some(Value::Int(1)));
    }

    #[test]
    fn test_callable_display() {
        let env = Environment::new().into_ref();
        let named = Lambda::new(Some("inc".into()), &params(&["x"]), &[Value::Nil], &env).unwrap();
        let anon = Lambda::new(None, &params(&["a", "b"]), &[Value::Nil], &env).unwrap();
        assert_eq!(format!("{}", Callable::Lambda(Rc::new(named))), "<fn inc (x)>");
        assert_eq!(format!("{}", Callable::Lambda(Rc::new(anon))), "<fn (a b)>");
        assert_eq!(format!("{}", Callable::Builtin(&NEGATE)), "<builtin negate>");
    }

    #[test]
    fn test_callable_identity_equality() {
        let env = Environment::new().into_ref();
        let a = Rc::new(Lambda::new(None, &params(&[]), &[Value::Nil], &env).unwrap());
        let b = Rc::new(Lambda::new(None, &params(&[]), &[Value::Nil], &env).unwrap());
        assert_eq!(Callable::Lambda(Rc::clone(&a)), Callable::Lambda(Rc::clone(&a)));
        assert_ne!(Callable::Lambda(a), Callable::Lambda(b));
        assert_eq!(Callable::Builtin(&NEGATE), Callable::Builtin(&NEGATE));
    }
}
