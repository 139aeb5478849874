//! Iterative teardown of deep value graphs
//!
//! Lists, lambdas and environments nest through `Rc`, and the compiler's
//! drop glue recurses once per level. A tail-recursive loop can build such
//! a chain a million levels deep in constant stack, so freeing it has to
//! run in constant stack as well. The `Drop` impls of [`Items`] and
//! [`Environment`] hand their uniquely owned children to a [`Worklist`],
//! which empties each node before letting it go.
//!
//! [`Items`]: super::value::Items
//! [`Environment`]: super::env::Environment

use super::env::{EnvRef, Environment};
use super::function::Callable;
use super::value::Value;
use std::rc::Rc;

/// Nodes whose last reference is held here, waiting to be emptied
#[derive(Default)]
pub(super) struct Worklist {
    values: Vec<Value>,
    envs: Vec<EnvRef>,
}

impl Worklist {
    /// True if dropping `value` would free nested lists, lambdas or scopes
    pub(super) fn owns_children(value: &Value) -> bool {
        match value {
            Value::List(items) => items.is_unique(),
            Value::Callable(Callable::Lambda(lambda)) => Rc::strong_count(lambda) == 1,
            _ => false,
        }
    }

    /// Take ownership of `value`; shared values just lose a reference
    pub(super) fn push_value(&mut self, value: Value) {
        if Self::owns_children(&value) {
            self.values.push(value);
        }
    }

    /// Move every element out, leaving `nil` behind
    pub(super) fn push_slots(&mut self, slots: &mut [Value]) {
        for slot in slots {
            self.push_value(std::mem::replace(slot, Value::Nil));
        }
    }

    pub(super) fn push_env(&mut self, env: EnvRef) {
        if Rc::strong_count(&env) == 1 {
            self.envs.push(env);
        }
    }

    /// Move the bindings and the parent link out of `env`
    pub(super) fn push_env_contents(&mut self, env: &mut Environment) {
        let parent = env.release_into(self);
        if let Some(parent) = parent {
            self.push_env(parent);
        }
    }

    /// Empty and drop everything queued, including what emptying uncovers
    pub(super) fn run(mut self) {
        loop {
            if let Some(mut env) = self.envs.pop() {
                if let Some(cell) = Rc::get_mut(&mut env) {
                    self.push_env_contents(cell.get_mut());
                }
            } else if let Some(mut value) = self.values.pop() {
                self.push_children(&mut value);
            } else {
                break;
            }
        }
    }

    fn push_children(&mut self, value: &mut Value) {
        match value {
            Value::List(items) => {
                if let Some(slots) = items.unique_mut() {
                    self.push_slots(slots);
                }
            }
            Value::Callable(Callable::Lambda(lambda)) => {
                if let Some(lambda) = Rc::get_mut(lambda) {
                    if let Some(body) = Rc::get_mut(&mut lambda.body) {
                        self.push_slots(body);
                    }
                    if let Some(cell) = Rc::get_mut(&mut lambda.env) {
                        self.push_env_contents(cell.get_mut());
                    }
                }
            }
            _ => {}
        }
    }
}
