use std::rc::Rc;

use tracing::trace;

use crate::{
    ast::{Expr, FunctionDecl, Location},
    error::RuntimeError,
    interpreter::{
        environment::Environment,
        evaluator::core::{EvalResult, Flow, Interpreter, MAX_CALL_DEPTH},
        value::{callable::Callable, core::Value},
    },
};

impl Interpreter {
    /// Evaluates a call expression.
    ///
    /// The callee is evaluated first, then every argument from left to
    /// right, and only then is the call made.
    pub(crate) fn eval_call(&mut self, callee: &Expr, arguments: &[Expr], loc: Location) -> EvalResult<Value> {
        let callee = self.evaluate(callee)?;
        let args = arguments.iter()
                            .map(|argument| self.evaluate(argument))
                            .collect::<EvalResult<Vec<_>>>()?;

        self.call_value(&callee, &args, loc)
    }

    /// Calls a value with already evaluated arguments.
    ///
    /// Used for call expressions and by natives that take callbacks, such as
    /// `map` and `filter`.
    ///
    /// # Errors
    /// - `RuntimeError::NotCallable` if `callee` is not a function.
    /// - `RuntimeError::ArgumentCountMismatch` if `args` does not match the
    ///   callee's arity.
    /// - `RuntimeError::StackOverflow` if the call would nest deeper than
    ///   [`MAX_CALL_DEPTH`].
    /// - Any error raised by the callee.
    pub fn call_value(&mut self, callee: &Value, args: &[Value], loc: Location) -> EvalResult<Value> {
        let Value::Callable(callable) = callee else {
            return Err(RuntimeError::NotCallable { type_name: callee.type_name(),
                                                   loc });
        };

        let arity = callable.arity();
        if args.len() != arity {
            return Err(RuntimeError::ArgumentCountMismatch { expected: arity,
                                                             found: args.len(),
                                                             loc });
        }

        if self.call_depth >= MAX_CALL_DEPTH {
            return Err(RuntimeError::StackOverflow { depth: MAX_CALL_DEPTH,
                                                     loc });
        }

        trace!(callee = %callable, args = args.len(), depth = self.call_depth, "call");
        self.call_depth += 1;
        let result = match &**callable {
            Callable::Native(native) => {
                let func = Rc::clone(&native.func);
                func(self, args, loc)
            },
            Callable::Closure { declaration,
                                environment, } => self.call_closure(declaration, environment, args),
        };
        self.call_depth -= 1;
        result
    }

    /// Runs a user function.
    ///
    /// Parameters are bound in a fresh scope whose parent is the closure's
    /// defining scope, not the caller's. Falling off the end of the body
    /// yields `nil`.
    fn call_closure(&mut self,
                    declaration: &FunctionDecl,
                    closure: &Rc<Environment>,
                    args: &[Value])
                    -> EvalResult<Value> {
        let scope = Environment::with_enclosing(Rc::clone(closure));
        for (param, arg) in declaration.params.iter().zip(args) {
            scope.define(param.as_str(), arg.clone());
        }

        match self.execute_block(&declaration.body, Rc::new(scope))? {
            Flow::Return(value) => Ok(value),
            Flow::Normal | Flow::Break | Flow::Continue => Ok(Value::Nil),
        }
    }
}
