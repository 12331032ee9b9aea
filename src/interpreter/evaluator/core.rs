use std::{io, rc::Rc};

use tracing::debug;

use crate::{
    ast::{Expr, Location, Stmt},
    error::RuntimeError,
    interpreter::{
        environment::Environment,
        evaluator::builtin,
        value::{
            callable::{Callable, NativeFunction},
            core::Value,
        },
    },
    util::stack::ensure_sufficient_stack,
};

/// Result type used by the evaluator.
///
/// All evaluation functions return either a value of type `T` or a
/// `RuntimeError` describing the failure.
pub type EvalResult<T> = Result<T, RuntimeError>;

/// How many function calls may be active at once.
///
/// A call beyond this depth fails with [`RuntimeError::StackOverflow`]
/// instead of exhausting memory.
pub const MAX_CALL_DEPTH: usize = 2000;

/// How a statement finished.
///
/// `return`, `break` and `continue` unwind through ordinary return values
/// rather than through the error channel, so no caller can mistake one for a
/// runtime error. Every construct that runs nested statements decides
/// explicitly which signals it consumes and which it passes on.
#[derive(Debug, Clone, PartialEq)]
pub enum Flow {
    /// Continue with the next statement.
    Normal,
    /// Unwind to the enclosing function call with this value.
    Return(Value),
    /// Leave the nearest enclosing loop.
    Break,
    /// Skip to the next iteration of the nearest enclosing loop.
    Continue,
}

/// Stores the runtime state and executes programs.
///
/// ## Usage
///
/// An `Interpreter` is created once and reused: globals persist between
/// calls to [`execute`](Self::execute) and [`evaluate`](Self::evaluate), which
/// is what the REPL relies on.
///
/// ```
/// use volt::{
///     interpreter::{evaluator::core::Interpreter, lexer::tokenize, parser::parse_program},
///     util::output::SharedOutput,
/// };
///
/// let out = SharedOutput::new();
/// let mut interpreter = Interpreter::with_output(out.clone());
///
/// let tokens = tokenize("let greeting = \"hi\"; print greeting + \" there\";");
/// let (program, errors) = parse_program(&tokens);
/// assert!(errors.is_empty());
///
/// interpreter.execute(&program).unwrap();
/// assert_eq!(out.contents(), "hi there\n");
/// ```
pub struct Interpreter {
    /// The outermost scope, holding natives and top-level bindings.
    pub(crate) globals:     Rc<Environment>,
    /// The scope statements currently execute in.
    pub(crate) environment: Rc<Environment>,
    /// Natives installed through [`define`](Self::define), replayed on reset.
    host_natives:           Vec<NativeFunction>,
    /// Number of function calls currently in progress.
    pub(crate) call_depth:  usize,
    /// Where `print` writes.
    pub(crate) out:         Box<dyn io::Write>,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    /// Creates an interpreter that prints to standard output.
    #[must_use]
    pub fn new() -> Self {
        Self::with_output(io::stdout())
    }

    /// Creates an interpreter that prints to `out`.
    ///
    /// The built-in library is registered before this returns.
    #[must_use]
    pub fn with_output(out: impl io::Write + 'static) -> Self {
        let globals = Rc::new(Environment::new());
        let mut interpreter = Self { environment: Rc::clone(&globals),
                                     globals,
                                     host_natives: Vec::new(),
                                     call_depth: 0,
                                     out: Box::new(out) };
        builtin::register(&mut interpreter);
        interpreter
    }

    /// Registers a host function in the global scope.
    ///
    /// The implementation receives the already evaluated arguments; the
    /// interpreter checks the argument count against `arity` before calling
    /// it. An `Err` message is raised as a [`RuntimeError::Native`] located
    /// at the call site. Functions registered here survive
    /// [`reset`](Self::reset).
    ///
    /// # Example
    /// ```
    /// use volt::{interpreter::{evaluator::core::Interpreter, value::core::Value}, run_with};
    /// use volt::util::output::SharedOutput;
    ///
    /// let out = SharedOutput::new();
    /// let mut interpreter = Interpreter::with_output(out.clone());
    /// interpreter.define("double", 1, |args| match &args[0] {
    ///                Value::Number(n) => Ok(Value::Number(n * 2.0)),
    ///                _ => Err("expected a number".to_string()),
    ///            });
    ///
    /// run_with(&mut interpreter, "print double(21);").unwrap();
    /// assert_eq!(out.contents(), "42\n");
    /// ```
    pub fn define(&mut self,
                  name: &str,
                  arity: usize,
                  implementation: impl Fn(&[Value]) -> Result<Value, String> + 'static) {
        let native_name = name.to_string();
        let native = NativeFunction::new(name, arity, move |_, args, loc| {
            implementation(args).map_err(|details| RuntimeError::Native { name: native_name.clone(),
                                                                          details,
                                                                          loc })
        });
        self.define_native(native.clone());
        self.host_natives.push(native);
    }

    /// Binds a native function in the global scope.
    pub(crate) fn define_native(&mut self, native: NativeFunction) {
        debug!(name = %native.name, arity = native.arity, "registering native");
        let name = native.name.clone();
        self.globals.define(name, Value::from(Callable::Native(native)));
    }

    /// Clears every user binding and re-registers the natives.
    ///
    /// Both the built-in library and functions installed with
    /// [`define`](Self::define) are available again afterwards.
    pub fn reset(&mut self) {
        debug!("resetting interpreter");
        self.globals.clear();
        self.environment = Rc::clone(&self.globals);
        self.call_depth = 0;
        builtin::register(self);
        for native in self.host_natives.clone() {
            self.define_native(native);
        }
    }

    /// Looks up a global binding.
    #[must_use]
    pub fn global(&self, name: &str) -> Option<Value> {
        self.globals.get(name)
    }

    /// Executes a program.
    ///
    /// A `return`, `break` or `continue` that reaches the top level is
    /// ignored; the parser rejects those, so only hand-built trees get here.
    ///
    /// # Errors
    /// Stops at the first runtime error. Bindings made before the error are
    /// kept.
    pub fn execute(&mut self, statements: &[Stmt]) -> EvalResult<()> {
        debug!(statements = statements.len(), "executing program");
        self.environment = Rc::clone(&self.globals);
        self.call_depth = 0;
        for statement in statements {
            let flow = self.execute_statement(statement)?;
            if flow != Flow::Normal {
                debug!(?flow, "ignoring control flow signal at top level");
            }
        }
        Ok(())
    }

    /// Evaluates an expression and returns the resulting value.
    ///
    /// This is the main entry point for expression evaluation. The evaluator
    /// dispatches on the expression kind: literals, variables, operators,
    /// assignments, calls, collection literals, indexing, member access and
    /// function expressions.
    ///
    /// # Errors
    /// Any runtime error raised while evaluating `expr` or its operands.
    pub fn evaluate(&mut self, expr: &Expr) -> EvalResult<Value> {
        ensure_sufficient_stack(|| self.eval_expr(expr))
    }

    fn eval_expr(&mut self, expr: &Expr) -> EvalResult<Value> {
        match expr {
            Expr::Literal { value, .. } => Ok(Value::from(value)),
            Expr::Variable { name, loc } => self.lookup(name, *loc),
            Expr::Grouping { expr, .. } => self.evaluate(expr),
            Expr::Unary { op, expr, loc } => self.eval_unary(*op, expr, *loc),
            Expr::Binary { left, op, right, loc } => self.eval_binary(left, *op, right, *loc),
            Expr::Logical { left, op, right, .. } => self.eval_logical(left, *op, right),
            Expr::Ternary { condition,
                            then_branch,
                            else_branch,
                            .. } => {
                if self.evaluate(condition)?.is_truthy() {
                    self.evaluate(then_branch)
                } else {
                    self.evaluate(else_branch)
                }
            },
            Expr::Assign { name, value, .. } => {
                let value = self.evaluate(value)?;
                self.assign(name, value.clone());
                Ok(value)
            },
            Expr::CompoundAssign { name, op, value, loc } => {
                self.eval_compound_assign(name, *op, value, *loc)
            },
            Expr::Update { name,
                           op,
                           prefix,
                           loc, } => self.eval_update(name, *op, *prefix, *loc),
            Expr::Call { callee,
                         arguments,
                         loc, } => self.eval_call(callee, arguments, *loc),
            Expr::ArrayLiteral { elements, .. } => {
                let values = elements.iter()
                                     .map(|element| self.evaluate(element))
                                     .collect::<EvalResult<Vec<_>>>()?;
                Ok(Value::from(values))
            },
            Expr::HashMapLiteral { entries, loc } => self.eval_hash_map_literal(entries, *loc),
            Expr::Index { object, index, loc } => self.eval_index(object, index, *loc),
            Expr::IndexAssign { object,
                                index,
                                value,
                                loc, } => self.eval_index_assign(object, index, value, *loc),
            Expr::Member { object, name, loc } => self.eval_member(object, name, *loc),
            Expr::Function(declaration) => {
                Ok(Value::from(Callable::Closure { declaration: Rc::clone(declaration),
                                                   environment: Rc::clone(&self.environment), }))
            },
        }
    }

    /// Reads a variable, walking the scope chain outward.
    pub(crate) fn lookup(&self, name: &str, loc: Location) -> EvalResult<Value> {
        self.environment
            .get(name)
            .ok_or_else(|| RuntimeError::UnknownVariable { name: name.to_string(),
                                                           loc })
    }

    /// Assigns to the nearest binding of `name`.
    ///
    /// Assigning to a name that no scope binds defines it in the current
    /// scope.
    pub(crate) fn assign(&self, name: &str, value: Value) {
        if !self.environment.assign(name, value.clone()) {
            debug!(name, "implicitly defining variable on assignment");
            self.environment.define(name, value);
        }
    }
}
