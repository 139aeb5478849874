//! Expression evaluator
//!
//! Evaluation is a loop over `(expression, environment)` states. A step
//! either finishes with a value or hands back the next state when the
//! remaining work is a tail position (an `if` branch, the last form of a
//! body, a lambda body...). The driver loops on those instead of recursing,
//! so self-recursive tail calls run in constant host stack.

use super::builtins;
use super::env::{child_env, EnvRef, Environment};
use super::error::{InterpResult, RuntimeError};
use super::function::{Callable, Lambda};
use super::quasi::quasiquote;
use super::value::Value;
use std::rc::Rc;

/// Stack growth parameters for deep non-tail recursion
const STACK_RED_ZONE: usize = 128 * 1024; // 128KB remaining triggers growth
const STACK_GROW_SIZE: usize = 4 * 1024 * 1024; // Grow by 4MB each time

/// The interpreter: owns the root environment shared by every top-level
/// evaluation.
pub struct Interpreter {
    global_env: EnvRef,
}

impl Interpreter {
    /// Create a new interpreter with the builtin library installed
    pub fn new() -> Self {
        let mut root = Environment::new();
        builtins::register(&mut root);
        Interpreter {
            global_env: root.into_ref(),
        }
    }

    /// The persistent top-level environment
    pub fn global_env(&self) -> &EnvRef {
        &self.global_env
    }

    /// Evaluate one top-level expression.
    ///
    /// A failure aborts only this expression; earlier definitions stay.
    pub fn eval(&self, expr: &Value) -> InterpResult<Value> {
        eval(expr, &self.global_env)
    }

    /// Evaluate expressions in order, returning the last value (`nil` if
    /// there are none). Stops at the first error.
    pub fn eval_all(&self, exprs: &[Value]) -> InterpResult<Value> {
        let mut result = Value::Nil;
        for expr in exprs {
            result = self.eval(expr)?;
        }
        Ok(result)
    }

    /// Read and evaluate every form in `source`
    pub fn eval_source(&self, source: &str) -> crate::Result<Value> {
        let exprs = crate::parser::read(source)?;
        Ok(self.eval_all(&exprs)?)
    }

    /// Root bindings that are not builtins, sorted by name
    pub fn user_bindings(&self) -> Vec<(Rc<str>, Value)> {
        let env = self.global_env.borrow();
        env.local_names()
            .into_iter()
            .filter_map(|name| {
                let value = env.get(&name)?;
                match value {
                    Value::Callable(Callable::Builtin(builtin)) if *builtin.name == *name => None,
                    _ => Some((name, value)),
                }
            })
            .collect()
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of one reduction step
enum Step {
    /// Evaluation finished
    Done(Value),
    /// Keep going with this expression in this environment (tail position)
    Continue(Value, EnvRef),
}

/// Evaluate an expression with automatic stack growth for deep recursion
pub fn eval(expr: &Value, env: &EnvRef) -> InterpResult<Value> {
    // Grow stack if we're running low
    stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || trampoline(expr, env))
}

/// Drive steps until one produces a value
fn trampoline(expr: &Value, env: &EnvRef) -> InterpResult<Value> {
    let mut step = eval_step(expr, env)?;
    loop {
        match step {
            Step::Done(value) => return Ok(value),
            Step::Continue(next, next_env) => step = eval_step(&next, &next_env)?,
        }
    }
}

/// Apply a callable to already-evaluated arguments, exactly as an ordinary
/// call would
pub fn apply(callable: &Callable, args: Vec<Value>) -> InterpResult<Value> {
    match apply_step(callable, args)? {
        Step::Done(value) => Ok(value),
        Step::Continue(body, scope) => eval(&body, &scope),
    }
}

fn apply_step(callable: &Callable, args: Vec<Value>) -> InterpResult<Step> {
    match callable {
        Callable::Builtin(builtin) => builtin.call(&args).map(Step::Done),
        Callable::Lambda(lambda) => {
            tracing::trace!(name = lambda.display_name(), args = args.len(), "apply lambda");
            let scope = lambda.bind(args)?;
            eval_body(&lambda.body, scope)
        }
    }
}

fn eval_step(expr: &Value, env: &EnvRef) -> InterpResult<Step> {
    match expr {
        Value::Symbol(name) => env.borrow().lookup(name).map(Step::Done),
        Value::List(items) => match items.split_first() {
            Some((head, args)) => eval_form(head, args, env),
            // `()` evaluates to itself
            None => Ok(Step::Done(expr.clone())),
        },
        Value::Nil
        | Value::Bool(_)
        | Value::Int(_)
        | Value::Float(_)
        | Value::Str(_)
        | Value::Callable(_) => Ok(Step::Done(expr.clone())),
    }
}

/// Special forms are matched on the head symbol before anything is
/// evaluated; everything else is a call.
fn eval_form(head: &Value, args: &[Value], env: &EnvRef) -> InterpResult<Step> {
    if let Value::Symbol(name) = head {
        match &**name {
            "quote" => return eval_quote(args),
            "if" => return eval_if(args, env),
            "let" => return eval_let(args, env),
            "def" => return eval_def(args, env),
            "set!" => return eval_set(args, env),
            "fn" => return eval_fn(args, env),
            "begin" => return eval_begin(args, env),
            "cond" => return eval_cond(args, env),
            "quasiquote" => return eval_quasiquote(args, env),
            "eval" => return eval_eval(args, env),
            _ => {}
        }
    }
    eval_call(head, args, env)
}

fn expect_args(form: &str, args: &[Value], n: usize) -> InterpResult<()> {
    if args.len() != n {
        return Err(RuntimeError::arity_mismatch(form, n, args.len()));
    }
    Ok(())
}

fn expect_at_least(form: &str, args: &[Value], n: usize) -> InterpResult<()> {
    if args.len() < n {
        return Err(RuntimeError::arity_at_least(form, n, args.len()));
    }
    Ok(())
}

/// Evaluate all but the last form for effect; the last one continues in
/// tail position. An empty body is `nil`.
fn eval_body(body: &[Value], env: EnvRef) -> InterpResult<Step> {
    let Some((last, init)) = body.split_last() else {
        return Ok(Step::Done(Value::Nil));
    };
    for expr in init {
        eval(expr, &env)?;
    }
    Ok(Step::Continue(last.clone(), env))
}

fn eval_quote(args: &[Value]) -> InterpResult<Step> {
    expect_args("quote", args, 1)?;
    Ok(Step::Done(args[0].clone()))
}

fn eval_if(args: &[Value], env: &EnvRef) -> InterpResult<Step> {
    expect_args("if", args, 3)?;
    let branch = if eval(&args[0], env)?.is_truthy() {
        &args[1]
    } else {
        &args[2]
    };
    Ok(Step::Continue(branch.clone(), Rc::clone(env)))
}

/// `(let (n1 e1 n2 e2 ...) body...)`
fn eval_let(args: &[Value], env: &EnvRef) -> InterpResult<Step> {
    expect_at_least("let", args, 2)?;
    let bindings = args[0]
        .as_list()
        .ok_or_else(|| RuntimeError::malformed_binding("let bindings must be a list"))?;
    if bindings.len() % 2 != 0 {
        return Err(RuntimeError::malformed_binding(
            "let bindings must be name/value pairs",
        ));
    }

    let scope = child_env(env);
    for pair in bindings.chunks(2) {
        let name = pair[0].as_symbol().ok_or_else(|| {
            RuntimeError::malformed_binding(&format!("let name must be a symbol, got {}", pair[0]))
        })?;
        // Evaluated in the new scope so earlier bindings are visible
        let value = eval(&pair[1], &scope)?;
        scope.borrow_mut().define(Rc::clone(name), value);
    }
    eval_body(&args[1..], scope)
}

/// `(def name expr)` or `(def (name params...) body...)`
fn eval_def(args: &[Value], env: &EnvRef) -> InterpResult<Step> {
    expect_at_least("def", args, 2)?;
    let (name, value) = match &args[0] {
        Value::Symbol(name) => {
            expect_args("def", args, 2)?;
            let value = match named_fn(&args[1]) {
                Some(fn_args) => make_lambda(Some(Rc::clone(name)), fn_args, env)?,
                None => eval(&args[1], env)?,
            };
            (Rc::clone(name), value)
        }
        Value::List(signature) => {
            let (name, params) = signature.split_first().ok_or_else(|| {
                RuntimeError::malformed_binding("def signature needs a function name")
            })?;
            let name = name.as_symbol().ok_or_else(|| {
                RuntimeError::malformed_binding(&format!("def name must be a symbol, got {name}"))
            })?;
            let lambda = Lambda::new(
                Some(Rc::clone(name)),
                &Value::list(params.to_vec()),
                &args[1..],
                env,
            )?;
            (Rc::clone(name), Value::Callable(Callable::Lambda(Rc::new(lambda))))
        }
        other => {
            return Err(RuntimeError::malformed_binding(&format!(
                "def name must be a symbol, got {other}"
            )));
        }
    };
    tracing::debug!(%name, "def");
    env.borrow_mut().define(name, value);
    Ok(Step::Done(Value::Nil))
}

/// Operands of a literal `(fn ...)` form, so `(def f (fn ...))` can name
/// the lambda it creates
fn named_fn(expr: &Value) -> Option<&[Value]> {
    match expr.as_list()?.split_first()? {
        (Value::Symbol(head), rest) if &**head == "fn" => Some(rest),
        _ => None,
    }
}

/// `(set! name expr)` rebinds the nearest enclosing `name`
fn eval_set(args: &[Value], env: &EnvRef) -> InterpResult<Step> {
    expect_args("set!", args, 2)?;
    let name = args[0].as_symbol().ok_or_else(|| {
        RuntimeError::malformed_binding(&format!("set! name must be a symbol, got {}", args[0]))
    })?;
    let value = eval(&args[1], env)?;
    tracing::debug!(%name, "set!");
    if !env.borrow_mut().assign(name, value) {
        return Err(RuntimeError::unbound_symbol(name));
    }
    Ok(Step::Done(Value::Nil))
}

fn eval_fn(args: &[Value], env: &EnvRef) -> InterpResult<Step> {
    make_lambda(None, args, env).map(Step::Done)
}

fn make_lambda(name: Option<Rc<str>>, args: &[Value], env: &EnvRef) -> InterpResult<Value> {
    expect_at_least("fn", args, 2)?;
    let lambda = Lambda::new(name, &args[0], &args[1..], env)?;
    Ok(Value::Callable(Callable::Lambda(Rc::new(lambda))))
}

fn eval_begin(args: &[Value], env: &EnvRef) -> InterpResult<Step> {
    expect_at_least("begin", args, 1)?;
    eval_body(args, Rc::clone(env))
}

/// `(cond (test body...) ...)`: first truthy test wins, later clauses are
/// never touched
fn eval_cond(args: &[Value], env: &EnvRef) -> InterpResult<Step> {
    for clause in args {
        let parts = clause
            .as_list()
            .ok_or_else(|| RuntimeError::type_error("cond clause", clause.type_name()))?;
        let (test, body) = parts
            .split_first()
            .ok_or_else(|| RuntimeError::type_mismatch("cond clause must have a test"))?;
        if eval(test, env)?.is_truthy() {
            return eval_body(body, Rc::clone(env));
        }
    }
    Ok(Step::Done(Value::Nil))
}

fn eval_quasiquote(args: &[Value], env: &EnvRef) -> InterpResult<Step> {
    expect_args("quasiquote", args, 1)?;
    quasiquote(&args[0], env).map(Step::Done)
}

/// `(eval expr)`: the value of `expr` is itself evaluated, in tail position
fn eval_eval(args: &[Value], env: &EnvRef) -> InterpResult<Step> {
    expect_args("eval", args, 1)?;
    let code = eval(&args[0], env)?;
    Ok(Step::Continue(code, Rc::clone(env)))
}

fn eval_call(head: &Value, args: &[Value], env: &EnvRef) -> InterpResult<Step> {
    let callee = eval(head, env)?;
    let Value::Callable(callable) = callee else {
        return Err(RuntimeError::not_callable(&callee));
    };
    let args = args
        .iter()
        .map(|arg| eval(arg, env))
        .collect::<InterpResult<Vec<_>>>()?;
    apply_step(&callable, args)
}
