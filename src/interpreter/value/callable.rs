use std::{fmt, rc::Rc};

use crate::{
    ast::{FunctionDecl, Location},
    interpreter::{
        environment::Environment,
        evaluator::core::{EvalResult, Interpreter},
        value::core::Value,
    },
};

/// Signature of a native function body.
///
/// Natives receive the interpreter so that higher-order ones (`map`,
/// `filter`, ...) can call back into user code, and the call site location
/// for error reporting.
pub type NativeFn = Rc<dyn Fn(&mut Interpreter, &[Value], Location) -> EvalResult<Value>>;

/// A function implemented by the host.
#[derive(Clone)]
pub struct NativeFunction {
    /// Name used for display and error messages.
    pub name:  String,
    /// Exact number of arguments accepted.
    pub arity: usize,
    /// The implementation.
    pub func:  NativeFn,
}

impl NativeFunction {
    /// Wraps a closure as a native function.
    pub fn new(name: impl Into<String>,
               arity: usize,
               func: impl Fn(&mut Interpreter, &[Value], Location) -> EvalResult<Value> + 'static)
               -> Self {
        Self { name: name.into(),
               arity,
               func: Rc::new(func) }
    }
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeFunction")
         .field("name", &self.name)
         .field("arity", &self.arity)
         .finish_non_exhaustive()
    }
}

/// Anything that can be called.
pub enum Callable {
    /// A host-provided function.
    Native(NativeFunction),
    /// A user function together with the scope it was defined in.
    Closure {
        /// Parameters and body.
        declaration: Rc<FunctionDecl>,
        /// The environment active where the function was defined.
        environment: Rc<Environment>,
    },
}

impl Callable {
    /// Exact number of arguments the callable accepts.
    ///
    /// # Example
    /// ```
    /// use volt::interpreter::value::callable::{Callable, NativeFunction};
    /// use volt::interpreter::value::core::Value;
    ///
    /// let clock = Callable::Native(NativeFunction::new("clock", 0, |_, _, _| Ok(Value::Nil)));
    /// assert_eq!(clock.arity(), 0);
    /// assert_eq!(clock.to_string(), "<native fn clock>");
    /// ```
    #[must_use]
    pub fn arity(&self) -> usize {
        match self {
            Self::Native(native) => native.arity,
            Self::Closure { declaration, .. } => declaration.params.len(),
        }
    }

    /// The callable's name, if it has one.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Native(native) => Some(&native.name),
            Self::Closure { declaration, .. } => declaration.name.as_deref(),
        }
    }
}

impl fmt::Display for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Native(native) => write!(f, "<native fn {}>", native.name),
            Self::Closure { declaration, .. } => match &declaration.name {
                Some(name) => write!(f, "<fn {name}>"),
                None => write!(f, "<fn>"),
            },
        }
    }
}

/// Closures print their name only; the captured environment can be large
/// and may contain the closure itself.
impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Native(native) => native.fmt(f),
            Self::Closure { declaration, .. } => f.debug_struct("Closure")
                                                  .field("name", &declaration.name)
                                                  .field("params", &declaration.params)
                                                  .finish_non_exhaustive(),
        }
    }
}
