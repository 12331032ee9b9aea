use std::{io::Write as _, mem, rc::Rc};

use crate::{
    ast::{Expr, Location, Stmt},
    error::RuntimeError,
    interpreter::{
        environment::Environment,
        evaluator::core::{EvalResult, Flow, Interpreter},
        value::{callable::Callable, core::Value},
    },
    util::stack::ensure_sufficient_stack,
};

impl Interpreter {
    /// Executes a single statement.
    ///
    /// # Returns
    /// How the statement finished. Loops consume `Break` and `Continue`;
    /// function calls consume `Return`. Everything else passes signals up
    /// unchanged.
    ///
    /// # Errors
    /// The first runtime error raised by the statement.
    pub fn execute_statement(&mut self, statement: &Stmt) -> EvalResult<Flow> {
        ensure_sufficient_stack(|| self.exec_stmt(statement))
    }

    fn exec_stmt(&mut self, statement: &Stmt) -> EvalResult<Flow> {
        match statement {
            Stmt::Expression { expr, .. } => {
                self.evaluate(expr)?;
                Ok(Flow::Normal)
            },
            Stmt::Print { expr, loc } => {
                let value = self.evaluate(expr)?;
                self.print(&value, *loc)?;
                Ok(Flow::Normal)
            },
            Stmt::Let { name, initializer, .. } => {
                let value = match initializer {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::Nil,
                };
                self.environment.define(name.as_str(), value);
                Ok(Flow::Normal)
            },
            Stmt::Block { statements, .. } => {
                let scope = Environment::with_enclosing(Rc::clone(&self.environment));
                self.execute_block(statements, Rc::new(scope))
            },
            Stmt::If { condition,
                       then_branch,
                       else_branch,
                       .. } => {
                if self.evaluate(condition)?.is_truthy() {
                    self.execute_statement(then_branch)
                } else if let Some(else_branch) = else_branch {
                    self.execute_statement(else_branch)
                } else {
                    Ok(Flow::Normal)
                }
            },
            Stmt::While { condition, body, .. } => self.execute_while(condition, body),
            Stmt::RunUntil { body, condition, .. } => self.execute_run_until(body, condition),
            Stmt::For { initializer,
                        condition,
                        increment,
                        body,
                        .. } => {
                let scope = Environment::with_enclosing(Rc::clone(&self.environment));
                let previous = mem::replace(&mut self.environment, Rc::new(scope));
                let result = self.execute_for(initializer.as_deref(),
                                              condition.as_ref(),
                                              increment.as_ref(),
                                              body);
                self.environment = previous;
                result
            },
            Stmt::Function(declaration) => {
                let closure = Callable::Closure { declaration: Rc::clone(declaration),
                                                  environment: Rc::clone(&self.environment), };
                let name = declaration.name.clone().unwrap_or_default();
                self.environment.define(name, Value::from(closure));
                Ok(Flow::Normal)
            },
            Stmt::Return { value, .. } => {
                let value = match value {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::Nil,
                };
                Ok(Flow::Return(value))
            },
            Stmt::Break { .. } => Ok(Flow::Break),
            Stmt::Continue { .. } => Ok(Flow::Continue),
        }
    }

    /// Executes `statements` with `environment` as the active scope.
    ///
    /// The previous scope is restored on every exit path: normal completion,
    /// a control flow signal, or a runtime error.
    pub(crate) fn execute_block(&mut self,
                                statements: &[Stmt],
                                environment: Rc<Environment>)
                                -> EvalResult<Flow> {
        let previous = mem::replace(&mut self.environment, environment);
        let result = self.execute_sequence(statements);
        self.environment = previous;
        result
    }

    /// Runs statements in order until one finishes with a signal.
    fn execute_sequence(&mut self, statements: &[Stmt]) -> EvalResult<Flow> {
        for statement in statements {
            let flow = self.execute_statement(statement)?;
            if flow != Flow::Normal {
                return Ok(flow);
            }
        }
        Ok(Flow::Normal)
    }

    fn execute_while(&mut self, condition: &Expr, body: &Stmt) -> EvalResult<Flow> {
        while self.evaluate(condition)?.is_truthy() {
            match self.execute_statement(body)? {
                Flow::Break => break,
                Flow::Return(value) => return Ok(Flow::Return(value)),
                Flow::Normal | Flow::Continue => {},
            }
        }
        Ok(Flow::Normal)
    }

    /// Runs the body, then stops once the condition is truthy.
    fn execute_run_until(&mut self, body: &Stmt, condition: &Expr) -> EvalResult<Flow> {
        loop {
            match self.execute_statement(body)? {
                Flow::Break => break,
                Flow::Return(value) => return Ok(Flow::Return(value)),
                Flow::Normal | Flow::Continue => {},
            }
            if self.evaluate(condition)?.is_truthy() {
                break;
            }
        }
        Ok(Flow::Normal)
    }

    /// Runs a `for` loop inside the loop scope the caller set up.
    ///
    /// The increment runs after every iteration that ends normally or with
    /// `continue`.
    fn execute_for(&mut self,
                   initializer: Option<&Stmt>,
                   condition: Option<&Expr>,
                   increment: Option<&Expr>,
                   body: &Stmt)
                   -> EvalResult<Flow> {
        if let Some(initializer) = initializer {
            self.execute_statement(initializer)?;
        }

        loop {
            if let Some(condition) = condition
               && !self.evaluate(condition)?.is_truthy()
            {
                break;
            }
            match self.execute_statement(body)? {
                Flow::Break => break,
                Flow::Return(value) => return Ok(Flow::Return(value)),
                Flow::Normal | Flow::Continue => {},
            }
            if let Some(increment) = increment {
                self.evaluate(increment)?;
            }
        }
        Ok(Flow::Normal)
    }

    /// Writes a value and a newline to the output sink.
    fn print(&mut self, value: &Value, loc: Location) -> EvalResult<()> {
        writeln!(self.out, "{value}").map_err(|err| RuntimeError::Io { details: err.to_string(),
                                                                       loc })
    }
}
