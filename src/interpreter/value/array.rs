use std::cell::RefCell;

use crate::interpreter::value::core::Value;

/// Storage behind `Value::Array`.
///
/// Interior mutability lets every alias of the array push, pop and assign
/// elements. Borrows never outlive a method call: iteration goes through
/// [`ArrayValue::snapshot`] so callbacks may mutate the array while a
/// higher-order method walks it.
#[derive(Debug, Default)]
pub struct ArrayValue {
    elements: RefCell<Vec<Value>>,
}

impl ArrayValue {
    /// Wraps existing elements.
    #[must_use]
    pub const fn new(elements: Vec<Value>) -> Self {
        Self { elements: RefCell::new(elements) }
    }

    /// Number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.borrow().len()
    }

    /// Whether the array has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.borrow().is_empty()
    }

    /// The element at `index`, if in bounds.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<Value> {
        self.elements.borrow().get(index).cloned()
    }

    /// Replaces the element at `index`. Returns `false` when out of bounds.
    #[must_use]
    pub fn set(&self, index: usize, value: Value) -> bool {
        match self.elements.borrow_mut().get_mut(index) {
            Some(slot) => {
                *slot = value;
                true
            },
            None => false,
        }
    }

    /// Appends an element.
    pub fn push(&self, value: Value) {
        self.elements.borrow_mut().push(value);
    }

    /// Removes and returns the last element.
    pub fn pop(&self) -> Option<Value> {
        self.elements.borrow_mut().pop()
    }

    /// A copy of the current elements. Containers inside stay shared.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Value> {
        self.elements.borrow().clone()
    }

    /// Copies the elements in `start..end`. Empty when `start >= end`.
    #[must_use]
    pub fn slice(&self, start: usize, end: usize) -> Vec<Value> {
        let elements = self.elements.borrow();
        let end = end.min(elements.len());
        if start >= end {
            return Vec::new();
        }
        elements[start..end].to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_out_of_bounds_is_rejected() {
        let array = ArrayValue::new(vec![Value::Nil]);
        assert!(array.set(0, Value::Bool(true)));
        assert!(!array.set(1, Value::Bool(true)));
        assert_eq!(array.get(0), Some(Value::Bool(true)));
    }

    #[test]
    fn slice_clamps_and_handles_empty_ranges() {
        let array = ArrayValue::new((1..=4).map(|n| Value::Number(f64::from(n))).collect());
        assert_eq!(array.slice(1, 3), [Value::Number(2.0), Value::Number(3.0)]);
        assert!(array.slice(3, 1).is_empty());
        assert_eq!(array.slice(2, 10).len(), 2);
    }
}
