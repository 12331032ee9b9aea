use std::rc::Rc;

use crate::{
    ast::{Expr, Location},
    error::RuntimeError,
    interpreter::{
        evaluator::core::{EvalResult, Interpreter},
        value::{
            array::ArrayValue,
            callable::{Callable, NativeFunction},
            core::Value,
            hash_map::{HashMapValue, key_of},
        },
    },
    util::num::{clamp_slice_bound, f64_to_index_checked, usize_to_f64},
};

const HASH_MAP_KEY_ERROR: &str = "Hash map index must be a string, number, boolean, or nil";

impl Interpreter {
    /// Evaluates `object[index]`.
    ///
    /// Arrays take an integer index in `0..length`. Hash maps take any
    /// key-like value and yield `nil` for a missing key.
    ///
    /// # Errors
    /// - `RuntimeError::IndexOutOfBounds` for array indices outside the array.
    /// - `RuntimeError::InvalidIndex` for fractional array indices, unusable
    ///   hash-map keys, or values that cannot be indexed.
    pub(crate) fn eval_index(&mut self, object: &Expr, index: &Expr, loc: Location) -> EvalResult<Value> {
        let object = self.evaluate(object)?;
        let index = self.evaluate(index)?;

        match &object {
            Value::Array(array) => {
                let position = array_index(array, &index, loc)?;
                array.get(position)
                     .ok_or(RuntimeError::IndexOutOfBounds { index: usize_to_f64(position),
                                                             length: array.len(),
                                                             loc })
            },
            Value::HashMap(map) => Ok(map.get(&hash_map_key(&index, loc)?).unwrap_or_default()),
            other => Err(not_indexable(other, loc)),
        }
    }

    /// Evaluates `object[index] = value` and yields the assigned value.
    ///
    /// The object, the index and the value are evaluated in that order.
    pub(crate) fn eval_index_assign(&mut self,
                                    object: &Expr,
                                    index: &Expr,
                                    value: &Expr,
                                    loc: Location)
                                    -> EvalResult<Value> {
        let object = self.evaluate(object)?;
        let index = self.evaluate(index)?;
        let value = self.evaluate(value)?;

        match &object {
            Value::Array(array) => {
                let position = array_index(array, &index, loc)?;
                if !array.set(position, value.clone()) {
                    return Err(RuntimeError::IndexOutOfBounds { index: usize_to_f64(position),
                                                                length: array.len(),
                                                                loc });
                }
            },
            Value::HashMap(map) => map.set(hash_map_key(&index, loc)?, value.clone()),
            other => return Err(not_indexable(other, loc)),
        }
        Ok(value)
    }

    /// Evaluates `{ key: value, ... }`.
    ///
    /// Keys and values are evaluated in source order. A repeated key keeps
    /// the last value.
    pub(crate) fn eval_hash_map_literal(&mut self, entries: &[(Expr, Expr)], loc: Location) -> EvalResult<Value> {
        let map = HashMapValue::default();

        for (key, value) in entries {
            let key = self.evaluate(key)?;
            let value = self.evaluate(value)?;
            map.set(hash_map_key(&key, loc)?, value);
        }
        Ok(Value::from(map))
    }

    /// Evaluates `object.name`.
    ///
    /// Properties (`length`, `size`) yield their value directly. Methods
    /// yield a native function bound to the receiver, so `list.push` can be
    /// stored and called later.
    ///
    /// # Errors
    /// - `RuntimeError::UnknownMember` for a name the receiver's type lacks.
    /// - `RuntimeError::NoMembers` if the receiver is not an array or hash map.
    pub(crate) fn eval_member(&mut self, object: &Expr, name: &str, loc: Location) -> EvalResult<Value> {
        match self.evaluate(object)? {
            Value::Array(array) => array_member(array, name, loc),
            Value::HashMap(map) => hash_map_member(map, name, loc),
            _ => Err(RuntimeError::NoMembers { loc }),
        }
    }
}

fn array_index(array: &ArrayValue, index: &Value, loc: Location) -> EvalResult<usize> {
    match index {
        Value::Number(n) => f64_to_index_checked(*n, array.len(), loc),
        other => Err(RuntimeError::InvalidIndex { details: format!("Array index must be a number, got {}",
                                                                   other.type_name()),
                                                  loc }),
    }
}

fn hash_map_key(index: &Value, loc: Location) -> EvalResult<String> {
    key_of(index).ok_or_else(|| RuntimeError::InvalidIndex { details: HASH_MAP_KEY_ERROR.to_string(),
                                                             loc })
}

fn not_indexable(value: &Value, loc: Location) -> RuntimeError {
    RuntimeError::InvalidIndex { details: format!("Only arrays and hash maps can be indexed, not {}",
                                                  value.type_name()),
                                 loc }
}

/// Wraps a closure as a bound method value.
fn method(name: &str,
          arity: usize,
          func: impl Fn(&mut Interpreter, &[Value], Location) -> EvalResult<Value> + 'static)
          -> Value {
    Value::from(Callable::Native(NativeFunction::new(name, arity, func)))
}

/// Resolves a member of an array.
///
/// Higher-order methods iterate over a snapshot taken when they are called,
/// so a callback that mutates the array does not disturb the iteration.
fn array_member(array: Rc<ArrayValue>, name: &str, loc: Location) -> EvalResult<Value> {
    let member = match name {
        "length" => Value::Number(usize_to_f64(array.len())),
        "push" => method("push", 1, move |_, args, _| {
            array.push(args[0].clone());
            Ok(Value::Nil)
        }),
        "pop" => method("pop", 0, move |_, _, _| Ok(array.pop().unwrap_or_default())),
        "map" => method("map", 1, move |interpreter, args, loc| {
            let mapped = array.snapshot()
                              .into_iter()
                              .map(|element| interpreter.call_value(&args[0], &[element], loc))
                              .collect::<EvalResult<Vec<_>>>()?;
            Ok(Value::from(mapped))
        }),
        "filter" => method("filter", 1, move |interpreter, args, loc| {
            let mut kept = Vec::new();
            for element in array.snapshot() {
                if interpreter.call_value(&args[0], std::slice::from_ref(&element), loc)?
                              .is_truthy()
                {
                    kept.push(element);
                }
            }
            Ok(Value::from(kept))
        }),
        "reduce" => method("reduce", 2, move |interpreter, args, loc| {
            let mut accumulator = args[1].clone();
            for element in array.snapshot() {
                accumulator = interpreter.call_value(&args[0], &[accumulator, element], loc)?;
            }
            Ok(accumulator)
        }),
        "find" => method("find", 1, move |interpreter, args, loc| {
            for element in array.snapshot() {
                if interpreter.call_value(&args[0], std::slice::from_ref(&element), loc)?
                              .is_truthy()
                {
                    return Ok(element);
                }
            }
            Ok(Value::Nil)
        }),
        "some" => method("some", 1, move |interpreter, args, loc| {
            for element in array.snapshot() {
                if interpreter.call_value(&args[0], &[element], loc)?.is_truthy() {
                    return Ok(Value::Bool(true));
                }
            }
            Ok(Value::Bool(false))
        }),
        "every" => method("every", 1, move |interpreter, args, loc| {
            for element in array.snapshot() {
                if !interpreter.call_value(&args[0], &[element], loc)?.is_truthy() {
                    return Ok(Value::Bool(false));
                }
            }
            Ok(Value::Bool(true))
        }),
        "slice" => method("slice", 2, move |_, args, loc| {
            let length = array.len();
            let start = clamp_slice_bound(args[0].as_number("Slice start", loc)?, length);
            let end = clamp_slice_bound(args[1].as_number("Slice end", loc)?, length);
            Ok(Value::from(array.slice(start, end)))
        }),
        "concat" => method("concat", 1, move |_, args, loc| {
            let other = args[0].as_array("Argument of 'concat'", loc)?;
            let mut combined = array.snapshot();
            combined.extend(other.snapshot());
            Ok(Value::from(combined))
        }),
        "join" => method("join", 1, move |_, args, loc| {
            let Value::String(separator) = &args[0] else {
                return Err(RuntimeError::type_error(format!("Separator of 'join' must be a string, got {}",
                                                            args[0].type_name()),
                                                    loc));
            };
            let parts: Vec<String> = array.snapshot().iter().map(Value::to_string).collect();
            Ok(Value::from(parts.join(&**separator)))
        }),
        _ => {
            return Err(RuntimeError::UnknownMember { type_name: "array",
                                                     name: name.to_string(),
                                                     loc });
        },
    };
    Ok(member)
}

/// Resolves a member of a hash map.
fn hash_map_member(map: Rc<HashMapValue>, name: &str, loc: Location) -> EvalResult<Value> {
    let member = match name {
        "size" => Value::Number(usize_to_f64(map.len())),
        "keys" => method("keys", 0, move |_, _, _| {
            Ok(Value::from(map.keys().into_iter().map(Value::from).collect::<Vec<_>>()))
        }),
        "values" => method("values", 0, move |_, _, _| Ok(Value::from(map.values()))),
        "has" => method("has", 1, move |_, args, _| {
            Ok(Value::Bool(key_of(&args[0]).is_some_and(|key| map.contains(&key))))
        }),
        "remove" => method("remove", 1, move |_, args, loc| {
            let key = hash_map_key(&args[0], loc)?;
            Ok(map.remove(&key).unwrap_or_default())
        }),
        _ => {
            return Err(RuntimeError::UnknownMember { type_name: "hash map",
                                                     name: name.to_string(),
                                                     loc });
        },
    };
    Ok(member)
}
