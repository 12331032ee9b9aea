use std::{cell::RefCell, collections::BTreeMap};

use crate::{interpreter::value::core::Value, util::num::format_number};

/// Storage behind `Value::HashMap`.
///
/// Keys are canonical strings (see [`key_of`]). Entries are kept sorted by
/// key so `keys()`, `values()` and printing are deterministic.
#[derive(Debug, Default)]
pub struct HashMapValue {
    entries: RefCell<BTreeMap<String, Value>>,
}

/// Converts a value into its canonical key string.
///
/// Numbers, strings, booleans and nil are accepted; numbers use their display
/// form, so `1` and `1.0` name the same entry, as do `1` and `"1"`.
///
/// # Returns
/// - `Some(String)`: The key.
/// - `None`: For arrays, hash maps and callables.
///
/// # Example
/// ```
/// use volt::interpreter::value::{core::Value, hash_map::key_of};
///
/// assert_eq!(key_of(&Value::Number(1.0)).as_deref(), Some("1"));
/// assert_eq!(key_of(&Value::Bool(true)).as_deref(), Some("true"));
/// assert_eq!(key_of(&Value::from(vec![])), None);
/// ```
#[must_use]
pub fn key_of(value: &Value) -> Option<String> {
    match value {
        Value::Nil => Some("nil".to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(format_number(*n)),
        Value::String(s) => Some(s.to_string()),
        Value::Array(_) | Value::HashMap(_) | Value::Callable(_) => None,
    }
}

impl HashMapValue {
    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Whether the map has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// The value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Value> {
        self.entries.borrow().get(key).cloned()
    }

    /// Inserts or replaces the value under `key`.
    pub fn set(&self, key: String, value: Value) {
        self.entries.borrow_mut().insert(key, value);
    }

    /// Whether an entry exists for `key`.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.borrow().contains_key(key)
    }

    /// Removes the entry for `key`, returning its value.
    pub fn remove(&self, key: &str) -> Option<Value> {
        self.entries.borrow_mut().remove(key)
    }

    /// All keys, in sorted order.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.entries.borrow().keys().cloned().collect()
    }

    /// All values, in key order.
    #[must_use]
    pub fn values(&self) -> Vec<Value> {
        self.entries.borrow().values().cloned().collect()
    }

    /// A copy of all entries, in key order.
    #[must_use]
    pub fn entries(&self) -> Vec<(String, Value)> {
        self.entries
            .borrow()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

impl FromIterator<(String, Value)> for HashMapValue {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self { entries: RefCell::new(iter.into_iter().collect()) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_keys_use_the_printed_form() {
        assert_eq!(key_of(&Value::Number(1.0)).as_deref(), Some("1"));
        assert_eq!(key_of(&Value::Number(0.5)).as_deref(), Some("0.5"));
        assert_eq!(key_of(&Value::Number(2f64.powi(63))).as_deref(), Some("9223372036854775808"));
        assert_eq!(key_of(&Value::Number(2f64.powi(63) - 1024.0)).as_deref(), Some("9223372036854774784"));
    }

    #[test]
    fn collections_are_not_keys() {
        assert_eq!(key_of(&Value::Nil).as_deref(), Some("nil"));
        assert_eq!(key_of(&Value::from(Vec::new())), None);
    }
}
