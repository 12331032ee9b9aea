use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::{
    ast::Location,
    error::RuntimeError,
    interpreter::{
        evaluator::core::{EvalResult, Interpreter},
        value::{callable::NativeFunction, core::Value},
    },
    util::num::usize_to_f64,
};

/// Type alias for builtin function handlers.
///
/// A builtin receives a slice of evaluated argument values, already checked
/// against its arity, and the call site location.
type BuiltinFn = fn(&[Value], Location) -> EvalResult<Value>;

/// Defines builtin functions by generating a lookup table and a name list.
///
/// Each entry provides:
/// - a string name,
/// - the exact number of arguments,
/// - a function pointer implementing the builtin.
///
/// The macro produces:
/// - `BuiltinDef` (internal metadata),
/// - `BUILTIN_TABLE` (static table used for registration),
/// - `BUILTIN_FUNCTIONS` (public list of builtin names).
macro_rules! builtin_functions {
    (
        $(
            $name:literal => {
                arity: $arity:expr,
                func: $func:expr $(,)?
            }
        ),* $(,)?
    ) => {
        struct BuiltinDef {
            name:  &'static str,
            arity: usize,
            func:  BuiltinFn,
        }
        static BUILTIN_TABLE: &[BuiltinDef] = &[
            $(
                BuiltinDef { name: $name, arity: $arity, func: $func },
            )*
        ];
        /// Names of every function in the built-in library.
        pub const BUILTIN_FUNCTIONS: &[&str] = &[
            $($name,)*
        ];
    };
}

/// Generates a one-argument builtin that applies an `f64` method.
macro_rules! number_builtin {
    ($fname:ident, $method:ident) => {
        fn $fname(args: &[Value], loc: Location) -> EvalResult<Value> {
            let x = args[0].as_number(concat!("Argument of '", stringify!($method), "'"), loc)?;
            Ok(Value::Number(x.$method()))
        }
    };
}

builtin_functions! {
    "clock"  => { arity: 0, func: clock },
    "len"    => { arity: 1, func: len },
    "str"    => { arity: 1, func: str_fn },
    "num"    => { arity: 1, func: num },
    "type"   => { arity: 1, func: type_fn },
    "keys"   => { arity: 1, func: keys },
    "values" => { arity: 1, func: values },
    "sqrt"   => { arity: 1, func: sqrt },
    "floor"  => { arity: 1, func: floor },
    "ceil"   => { arity: 1, func: ceil },
    "round"  => { arity: 1, func: round },
    "abs"    => { arity: 1, func: abs },
    "min"    => { arity: 2, func: min },
    "max"    => { arity: 2, func: max },
}

/// Installs the built-in library into the interpreter's global scope.
pub(crate) fn register(interpreter: &mut Interpreter) {
    for def in BUILTIN_TABLE {
        let func = def.func;
        interpreter.define_native(NativeFunction::new(def.name, def.arity, move |_, args, loc| {
                                      func(args, loc)
                                  }));
    }
}

fn native_error(name: &str, details: impl Into<String>, loc: Location) -> RuntimeError {
    RuntimeError::Native { name: name.to_string(),
                           details: details.into(),
                           loc }
}

/// Seconds since the Unix epoch, with millisecond precision.
fn clock(_args: &[Value], _loc: Location) -> EvalResult<Value> {
    let elapsed = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default();
    let millis = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
    Ok(Value::Number(Duration::from_millis(millis).as_secs_f64()))
}

/// Length of a string (in characters), an array or a hash map.
fn len(args: &[Value], loc: Location) -> EvalResult<Value> {
    let length = match &args[0] {
        Value::String(s) => s.chars().count(),
        Value::Array(a) => a.len(),
        Value::HashMap(m) => m.len(),
        other => {
            return Err(native_error("len",
                                    format!("requires a string, array or hash map, got {}",
                                            other.type_name()),
                                    loc));
        },
    };
    Ok(Value::Number(usize_to_f64(length)))
}

/// The value's display form as a string.
fn str_fn(args: &[Value], _loc: Location) -> EvalResult<Value> {
    Ok(Value::from(args[0].to_string()))
}

/// Converts numbers, numeric strings and booleans to a number.
fn num(args: &[Value], loc: Location) -> EvalResult<Value> {
    match &args[0] {
        Value::Number(n) => Ok(Value::Number(*n)),
        Value::Bool(b) => Ok(Value::Number(if *b { 1.0 } else { 0.0 })),
        Value::String(s) => s.trim()
                             .parse()
                             .map(Value::Number)
                             .map_err(|_| native_error("num", format!("Cannot convert string to number: {s}"), loc)),
        other => Err(native_error("num", format!("Cannot convert {} to number", other.type_name()), loc)),
    }
}

fn type_fn(args: &[Value], _loc: Location) -> EvalResult<Value> {
    Ok(Value::from(args[0].type_name()))
}

fn keys(args: &[Value], loc: Location) -> EvalResult<Value> {
    match &args[0] {
        Value::HashMap(m) => Ok(Value::from(m.keys().into_iter().map(Value::from).collect::<Vec<_>>())),
        other => Err(native_error("keys", format!("requires a hash map, got {}", other.type_name()), loc)),
    }
}

fn values(args: &[Value], loc: Location) -> EvalResult<Value> {
    match &args[0] {
        Value::HashMap(m) => Ok(Value::from(m.values())),
        other => Err(native_error("values", format!("requires a hash map, got {}", other.type_name()), loc)),
    }
}

number_builtin!(floor, floor);
number_builtin!(ceil, ceil);
number_builtin!(round, round);
number_builtin!(abs, abs);

fn sqrt(args: &[Value], loc: Location) -> EvalResult<Value> {
    let x = args[0].as_number("Argument of 'sqrt'", loc)?;
    if x < 0.0 {
        return Err(native_error("sqrt", "requires a non-negative number", loc));
    }
    Ok(Value::Number(x.sqrt()))
}

fn min(args: &[Value], loc: Location) -> EvalResult<Value> {
    let a = args[0].as_number("Arguments of 'min'", loc)?;
    let b = args[1].as_number("Arguments of 'min'", loc)?;
    Ok(Value::Number(a.min(b)))
}

fn max(args: &[Value], loc: Location) -> EvalResult<Value> {
    let a = args[0].as_number("Arguments of 'max'", loc)?;
    let b = args[1].as_number("Arguments of 'max'", loc)?;
    Ok(Value::Number(a.max(b)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOC: Location = Location::new(1, 1);

    #[test]
    fn table_and_name_list_agree() {
        assert_eq!(BUILTIN_TABLE.len(), BUILTIN_FUNCTIONS.len());
        assert!(BUILTIN_FUNCTIONS.contains(&"clock"));
    }

    #[test]
    fn num_parses_strings_and_booleans() {
        assert_eq!(num(&[Value::from(" 2.5 ")], LOC).unwrap(), Value::Number(2.5));
        assert_eq!(num(&[Value::Bool(true)], LOC).unwrap(), Value::Number(1.0));
        assert!(num(&[Value::from("abc")], LOC).is_err());
    }

    #[test]
    fn len_counts_characters() {
        assert_eq!(len(&[Value::from("héllo")], LOC).unwrap(), Value::Number(5.0));
        assert!(len(&[Value::Number(3.0)], LOC).is_err());
    }

    #[test]
    fn rounding_helpers() {
        assert_eq!(floor(&[Value::Number(3.8)], LOC).unwrap(), Value::Number(3.0));
        assert_eq!(ceil(&[Value::Number(3.2)], LOC).unwrap(), Value::Number(4.0));
        assert_eq!(round(&[Value::Number(2.5)], LOC).unwrap(), Value::Number(3.0));
        assert_eq!(abs(&[Value::Number(-2.0)], LOC).unwrap(), Value::Number(2.0));
    }
}
