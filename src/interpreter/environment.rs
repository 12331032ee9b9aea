use std::{cell::RefCell, collections::HashMap, rc::Rc};

use crate::interpreter::value::core::Value;

/// One lexical scope: a name-to-value mapping plus an optional link to the
/// enclosing scope.
///
/// Scopes only point outward, so a chain of `Rc`s never forms a cycle
/// through parent links. Closures hold an `Rc` to the scope they were
/// defined in, which keeps that scope alive after the block or call that
/// created it has finished.
///
/// ## Example
/// ```
/// use std::rc::Rc;
///
/// use volt::interpreter::{environment::Environment, value::core::Value};
///
/// let globals = Rc::new(Environment::new());
/// globals.define("x", Value::Number(1.0));
///
/// let inner = Environment::with_enclosing(Rc::clone(&globals));
/// inner.define("x", Value::Number(2.0));
///
/// assert_eq!(inner.get("x"), Some(Value::Number(2.0)));
/// assert_eq!(globals.get("x"), Some(Value::Number(1.0)));
/// ```
#[derive(Debug, Default)]
pub struct Environment {
    values:    RefCell<HashMap<String, Value>>,
    enclosing: Option<Rc<Self>>,
}

impl Environment {
    /// Creates an outermost scope.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a scope nested inside `enclosing`.
    #[must_use]
    pub fn with_enclosing(enclosing: Rc<Self>) -> Self {
        Self { values:    RefCell::new(HashMap::new()),
               enclosing: Some(enclosing), }
    }

    /// The scope this one is nested in.
    #[must_use]
    pub const fn enclosing(&self) -> Option<&Rc<Self>> {
        self.enclosing.as_ref()
    }

    /// Binds `name` in this scope, shadowing any outer binding and replacing
    /// any existing binding here.
    pub fn define(&self, name: impl Into<String>, value: Value) {
        self.values.borrow_mut().insert(name.into(), value);
    }

    /// Looks `name` up, walking outward from this scope.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.values.borrow().get(name) {
            return Some(value.clone());
        }
        self.enclosing.as_ref().and_then(|outer| outer.get(name))
    }

    /// Updates the nearest existing binding of `name`.
    ///
    /// # Returns
    /// `false` when no scope in the chain binds `name`; nothing is changed
    /// in that case.
    pub fn assign(&self, name: &str, value: Value) -> bool {
        if let Some(slot) = self.values.borrow_mut().get_mut(name) {
            *slot = value;
            return true;
        }
        self.enclosing
            .as_ref()
            .is_some_and(|outer| outer.assign(name, value))
    }

    /// Whether any scope in the chain binds `name`.
    #[must_use]
    pub fn exists(&self, name: &str) -> bool {
        self.values.borrow().contains_key(name)
        || self.enclosing.as_ref().is_some_and(|outer| outer.exists(name))
    }

    /// Names bound directly in this scope, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.values.borrow().keys().cloned().collect();
        names.sort();
        names
    }

    /// Removes every binding in this scope.
    pub fn clear(&self) {
        self.values.borrow_mut().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assign_updates_the_nearest_binding() {
        let outer = Rc::new(Environment::new());
        outer.define("x", Value::Number(1.0));
        let inner = Environment::with_enclosing(Rc::clone(&outer));

        assert!(inner.assign("x", Value::Number(5.0)));
        assert_eq!(outer.get("x"), Some(Value::Number(5.0)));
        assert!(inner.names().is_empty());
    }

    #[test]
    fn assign_to_unknown_name_fails() {
        let env = Environment::new();
        assert!(!env.assign("missing", Value::Nil));
        assert!(!env.exists("missing"));
    }
}
