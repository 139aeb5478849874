//! Environment for variable bindings

use super::error::{InterpResult, RuntimeError};
use super::teardown::Worklist;
use super::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Shared reference to an environment
///
/// Closures hold one of these, which keeps their defining scope alive.
pub type EnvRef = Rc<RefCell<Environment>>;

/// Environment holding variable bindings
#[derive(Debug, Default)]
pub struct Environment {
    /// Variable bindings in this scope
    bindings: HashMap<Rc<str>, Value>,
    /// Parent environment for lexical scoping
    parent: Option<EnvRef>,
}

impl Environment {
    /// Create a new root environment
    pub fn new() -> Self {
        Environment {
            bindings: HashMap::new(),
            parent: None,
        }
    }

    /// Create a new environment with a parent
    pub fn with_parent(parent: EnvRef) -> Self {
        Environment {
            bindings: HashMap::new(),
            parent: Some(parent),
        }
    }

    /// Wrap in Rc<RefCell<>>
    pub fn into_ref(self) -> EnvRef {
        Rc::new(RefCell::new(self))
    }

    /// Bind `name` in this scope, overwriting any local binding.
    /// Never touches the parent chain.
    pub fn define(&mut self, name: impl Into<Rc<str>>, value: Value) {
        self.bindings.insert(name.into(), value);
    }

    /// Look up a variable in the scope chain
    pub fn get(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.bindings.get(name) {
            Some(value.clone())
        } else if let Some(parent) = &self.parent {
            parent.borrow().get(name)
        } else {
            None
        }
    }

    /// Like [`get`](Self::get), failing with `UnboundSymbol` at the root.
    pub fn lookup(&self, name: &str) -> InterpResult<Value> {
        self.get(name)
            .ok_or_else(|| RuntimeError::unbound_symbol(name))
    }

    /// Overwrite the nearest enclosing binding of `name`.
    /// Returns false if no scope on the chain binds it.
    pub fn assign(&mut self, name: &str, value: Value) -> bool {
        if let Some(slot) = self.bindings.get_mut(name) {
            *slot = value;
            true
        } else if let Some(parent) = &self.parent {
            parent.borrow_mut().assign(name, value)
        } else {
            false
        }
    }

    /// Check if a variable exists in the scope chain
    pub fn contains(&self, name: &str) -> bool {
        if self.bindings.contains_key(name) {
            true
        } else if let Some(parent) = &self.parent {
            parent.borrow().contains(name)
        } else {
            false
        }
    }

    /// Names bound directly in this scope, sorted
    pub fn local_names(&self) -> Vec<Rc<str>> {
        let mut names: Vec<_> = self.bindings.keys().cloned().collect();
        names.sort();
        names
    }

    /// Hand every binding to `work` and unlink the parent
    pub(super) fn release_into(&mut self, work: &mut Worklist) -> Option<EnvRef> {
        for (_, value) in self.bindings.drain() {
            work.push_value(value);
        }
        self.parent.take()
    }
}

impl Drop for Environment {
    fn drop(&mut self) {
        if self.bindings.is_empty() && self.parent.is_none() {
            return;
        }
        let mut work = Worklist::default();
        work.push_env_contents(self);
        work.run();
    }
}

/// Create a child environment from a parent reference
pub fn child_env(parent: &EnvRef) -> EnvRef {
    Environment::with_parent(Rc::clone(parent)).into_ref()
}
