use std::{fmt, rc::Rc};

use crate::{
    ast::{Location, LiteralValue},
    error::RuntimeError,
    interpreter::{
        evaluator::core::EvalResult,
        value::{array::ArrayValue, callable::Callable, hash_map::HashMapValue},
    },
    util::num::format_number,
};

/// Represents a runtime value in the interpreter.
///
/// Scalars are copied on assignment. Strings are immutable and shared.
/// Arrays, hash maps and callables are reference types: every binding that
/// aliases one sees the same storage, and equality on them is identity.
#[derive(Debug, Clone, Default)]
pub enum Value {
    /// The absence of a value.
    #[default]
    Nil,
    /// `true` or `false`.
    Bool(bool),
    /// A double precision number. There is no separate integer type.
    Number(f64),
    /// An immutable string.
    String(Rc<str>),
    /// A growable, heterogeneous array.
    Array(Rc<ArrayValue>),
    /// A mapping from canonical string keys to values.
    HashMap(Rc<HashMapValue>),
    /// A native function or a closure.
    Callable(Rc<Callable>),
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(Rc::from(v))
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(Rc::from(v))
    }
}

impl From<Vec<Self>> for Value {
    fn from(v: Vec<Self>) -> Self {
        Self::Array(Rc::new(ArrayValue::new(v)))
    }
}

impl From<HashMapValue> for Value {
    fn from(v: HashMapValue) -> Self {
        Self::HashMap(Rc::new(v))
    }
}

impl From<Callable> for Value {
    fn from(v: Callable) -> Self {
        Self::Callable(Rc::new(v))
    }
}

impl From<&LiteralValue> for Value {
    fn from(lit: &LiteralValue) -> Self {
        match lit {
            LiteralValue::Number(n) => Self::Number(*n),
            LiteralValue::String(s) => Self::from(s.as_str()),
            LiteralValue::Bool(b) => Self::Bool(*b),
            LiteralValue::Nil => Self::Nil,
        }
    }
}

impl Value {
    /// Converts the value to a boolean for use in conditions.
    ///
    /// `nil` and `false` are falsy, as are the number zero, the empty string,
    /// and empty arrays and hash maps. Everything else, including every
    /// callable, is truthy.
    ///
    /// # Example
    /// ```
    /// use volt::interpreter::value::core::Value;
    ///
    /// assert!(!Value::Nil.is_truthy());
    /// assert!(!Value::Number(0.0).is_truthy());
    /// assert!(Value::from("a").is_truthy());
    /// assert!(!Value::from(Vec::new()).is_truthy());
    /// ```
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Nil => false,
            Self::Bool(b) => *b,
            Self::Number(n) => *n != 0.0,
            Self::String(s) => !s.is_empty(),
            Self::Array(a) => !a.is_empty(),
            Self::HashMap(m) => !m.is_empty(),
            Self::Callable(_) => true,
        }
    }

    /// The name the `type()` builtin reports for this value.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Nil => "nil",
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Array(_) => "array",
            Self::HashMap(_) => "hashmap",
            Self::Callable(_) => "function",
        }
    }

    /// Extracts a number, or fails with a type error naming `what`.
    ///
    /// # Parameters
    /// - `what`: Describes the operand in the error message.
    /// - `loc`: Source location for error reporting.
    ///
    /// # Returns
    /// - `Ok(f64)`: If the value is a number.
    /// - `Err(RuntimeError::TypeError)`: Otherwise.
    pub fn as_number(&self, what: &str, loc: Location) -> EvalResult<f64> {
        match self {
            Self::Number(n) => Ok(*n),
            other => Err(RuntimeError::type_error(format!("{what} must be a number, got {}",
                                                          other.type_name()),
                                                  loc)),
        }
    }

    /// Extracts a callable, or fails with a type error naming `what`.
    pub fn as_callable(&self, what: &str, loc: Location) -> EvalResult<&Rc<Callable>> {
        match self {
            Self::Callable(c) => Ok(c),
            other => Err(RuntimeError::type_error(format!("{what} must be a function, got {}",
                                                          other.type_name()),
                                                  loc)),
        }
    }

    /// Extracts an array, or fails with a type error naming `what`.
    pub fn as_array(&self, what: &str, loc: Location) -> EvalResult<&Rc<ArrayValue>> {
        match self {
            Self::Array(a) => Ok(a),
            other => Err(RuntimeError::type_error(format!("{what} must be an array, got {}",
                                                          other.type_name()),
                                                  loc)),
        }
    }

    /// Formats the value as it appears inside a container, where strings
    /// are quoted.
    ///
    /// # Example
    /// ```
    /// use volt::interpreter::value::core::Value;
    ///
    /// let v = Value::from(vec![Value::from("a"), Value::Number(1.5)]);
    /// assert_eq!(v.to_string(), "[\"a\", 1.5]");
    /// assert_eq!(Value::from("a").repr(), "\"a\"");
    /// ```
    #[must_use]
    pub fn repr(&self) -> String {
        let mut out = String::new();
        write_value(&mut out, self, true, &mut Vec::new());
        out
    }
}

/// Same-kind scalars compare by value. Arrays, hash maps and callables
/// compare by identity. Values of different kinds are never equal.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Nil, Self::Nil) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Array(a), Self::Array(b)) => Rc::ptr_eq(a, b),
            (Self::HashMap(a), Self::HashMap(b)) => Rc::ptr_eq(a, b),
            (Self::Callable(a), Self::Callable(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// Writes `value`, tracking the containers currently being written so that
/// an array holding itself prints `[...]` instead of recursing forever.
fn write_value(out: &mut String, value: &Value, nested: bool, seen: &mut Vec<*const ()>) {
    match value {
        Value::Nil => out.push_str("nil"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => out.push_str(&format_number(*n)),
        Value::String(s) if nested => {
            out.push('"');
            out.push_str(s);
            out.push('"');
        },
        Value::String(s) => out.push_str(s),
        Value::Array(array) => {
            let id = Rc::as_ptr(array).cast::<()>();
            if seen.contains(&id) {
                out.push_str("[...]");
                return;
            }
            seen.push(id);
            out.push('[');
            for (i, element) in array.snapshot().iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_value(out, element, true, seen);
            }
            out.push(']');
            seen.pop();
        },
        Value::HashMap(map) => {
            let id = Rc::as_ptr(map).cast::<()>();
            if seen.contains(&id) {
                out.push_str("{...}");
                return;
            }
            seen.push(id);
            out.push('{');
            for (i, (key, element)) in map.entries().iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                out.push('"');
                out.push_str(key);
                out.push_str("\": ");
                write_value(out, element, true, seen);
            }
            out.push('}');
            seen.pop();
        },
        Value::Callable(callable) => out.push_str(&callable.to_string()),
    }
}

/// Formats the value as `print` shows it. Top-level strings print raw.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        write_value(&mut out, self, false, &mut Vec::new());
        f.write_str(&out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrays_compare_by_identity() {
        let a = Value::from(vec![Value::Number(1.0)]);
        let b = Value::from(vec![Value::Number(1.0)]);

        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }

    #[test]
    fn cross_kind_values_are_unequal() {
        assert_ne!(Value::Number(0.0), Value::Bool(false));
        assert_ne!(Value::Nil, Value::Bool(false));
        assert_ne!(Value::from("1"), Value::Number(1.0));
    }

    #[test]
    fn self_containing_array_prints() {
        let v = Value::from(vec![Value::Number(1.0)]);
        if let Value::Array(a) = &v {
            a.push(v.clone());
        }
        assert_eq!(v.to_string(), "[1, [...]]");
    }

    #[test]
    fn hash_map_display_is_sorted_and_quoted() {
        let map = HashMapValue::default();
        map.set("b".to_string(), Value::from("x"));
        map.set("a".to_string(), Value::Number(1.0));

        assert_eq!(Value::from(map).to_string(), r#"{"a": 1, "b": "x"}"#);
    }
}
