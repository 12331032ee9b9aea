use crate::{
    ast::{Expr, Location, UnaryOperator, UpdateOperator},
    error::RuntimeError,
    interpreter::{
        evaluator::core::{EvalResult, Interpreter},
        value::core::Value,
    },
};

impl Interpreter {
    /// Evaluates `-x` and `!x`.
    ///
    /// # Errors
    /// `RuntimeError::TypeError` when negating something other than a
    /// number.
    pub(crate) fn eval_unary(&mut self, op: UnaryOperator, expr: &Expr, loc: Location) -> EvalResult<Value> {
        let value = self.evaluate(expr)?;

        match op {
            UnaryOperator::Not => Ok(Value::Bool(!value.is_truthy())),
            UnaryOperator::Negate => match value {
                Value::Number(n) => Ok(Value::Number(-n)),
                other => Err(RuntimeError::type_error(format!("Operand of '-' must be a number, got {}",
                                                              other.type_name()),
                                                      loc)),
            },
        }
    }

    /// Evaluates `++x`, `x++`, `--x` and `x--`.
    ///
    /// # Returns
    /// The updated value for the prefix forms, the original value for the
    /// postfix forms.
    ///
    /// # Errors
    /// - `RuntimeError::UnknownVariable` if `name` is unbound.
    /// - `RuntimeError::TypeError` if it does not hold a number.
    pub(crate) fn eval_update(&mut self,
                              name: &str,
                              op: UpdateOperator,
                              prefix: bool,
                              loc: Location)
                              -> EvalResult<Value> {
        let old = self.lookup(name, loc)?.as_number(&format!("Operand of '{op}'"), loc)?;
        let new = match op {
            UpdateOperator::Increment => old + 1.0,
            UpdateOperator::Decrement => old - 1.0,
        };
        self.assign(name, Value::Number(new));

        Ok(Value::Number(if prefix { new } else { old }))
    }
}
