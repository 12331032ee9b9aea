use crate::{
    ast::{BinaryOperator, Expr, Location, LogicalOperator},
    error::RuntimeError,
    interpreter::{
        evaluator::core::{EvalResult, Interpreter},
        value::core::Value,
    },
    util::num::format_number,
};

impl Interpreter {
    /// Evaluates a binary expression.
    ///
    /// Both operands are evaluated, left first, before the operator is
    /// applied.
    pub(crate) fn eval_binary(&mut self,
                              left: &Expr,
                              op: BinaryOperator,
                              right: &Expr,
                              loc: Location)
                              -> EvalResult<Value> {
        let left = self.evaluate(left)?;
        let right = self.evaluate(right)?;
        apply_binary(op, &left, &right, loc)
    }

    /// Evaluates `&&` and `||` with short-circuiting.
    ///
    /// The result is whichever operand decided the outcome, not necessarily
    /// a boolean: `nil || "x"` yields `"x"`.
    pub(crate) fn eval_logical(&mut self,
                               left: &Expr,
                               op: LogicalOperator,
                               right: &Expr)
                               -> EvalResult<Value> {
        let left = self.evaluate(left)?;
        let decided = match op {
            LogicalOperator::Or => left.is_truthy(),
            LogicalOperator::And => !left.is_truthy(),
        };
        if decided {
            return Ok(left);
        }
        self.evaluate(right)
    }

    /// Evaluates `name op= value`.
    ///
    /// Reads the current binding, applies the operator with the same rules
    /// as the binary form (so `+=` concatenates strings) and stores the
    /// result back.
    pub(crate) fn eval_compound_assign(&mut self,
                                       name: &str,
                                       op: BinaryOperator,
                                       value: &Expr,
                                       loc: Location)
                                       -> EvalResult<Value> {
        let current = self.lookup(name, loc)?;
        let operand = self.evaluate(value)?;
        let result = apply_binary(op, &current, &operand, loc)?;
        self.assign(name, result.clone());
        Ok(result)
    }
}

/// Applies a binary operator to two evaluated operands.
///
/// - `+` adds numbers, concatenates strings, and stringifies a number paired
///   with a string.
/// - `-`, `*`, `/`, `%` and the comparisons require two numbers.
/// - `==` and `!=` accept any operands.
///
/// # Errors
/// - `RuntimeError::TypeError` for operands of the wrong type.
/// - `RuntimeError::DivisionByZero` when dividing by zero.
///
/// # Example
/// ```
/// use volt::{
///     ast::{BinaryOperator, Location},
///     interpreter::{evaluator::binary::apply_binary, value::core::Value},
/// };
///
/// let loc = Location::new(1, 1);
/// let s = apply_binary(BinaryOperator::Add, &Value::from("Count: "), &Value::Number(42.0), loc);
/// assert_eq!(s.unwrap(), Value::from("Count: 42"));
///
/// let r = apply_binary(BinaryOperator::Mod, &Value::Number(10.0), &Value::Number(3.0), loc);
/// assert_eq!(r.unwrap(), Value::Number(1.0));
/// ```
pub fn apply_binary(op: BinaryOperator, left: &Value, right: &Value, loc: Location) -> EvalResult<Value> {
    use BinaryOperator::{
        Add, Div, Equal, Greater, GreaterEqual, Less, LessEqual, Mod, Mul, NotEqual, Sub,
    };

    match op {
        Add => add(left, right, loc),
        Equal => Ok(Value::Bool(left == right)),
        NotEqual => Ok(Value::Bool(left != right)),
        Sub | Mul | Div | Mod | Less | Greater | LessEqual | GreaterEqual => {
            let (Value::Number(l), Value::Number(r)) = (left, right) else {
                return Err(RuntimeError::type_error(format!("Operands of '{op}' must be numbers, got {} and {}",
                                                            left.type_name(),
                                                            right.type_name()),
                                                    loc));
            };
            Ok(match op {
                Sub => Value::Number(l - r),
                Mul => Value::Number(l * r),
                Div if *r == 0.0 => return Err(RuntimeError::DivisionByZero { loc }),
                Div => Value::Number(l / r),
                Mod => Value::Number(l % r),
                Less => Value::Bool(l < r),
                Greater => Value::Bool(l > r),
                LessEqual => Value::Bool(l <= r),
                _ => Value::Bool(l >= r),
            })
        },
    }
}

fn add(left: &Value, right: &Value, loc: Location) -> EvalResult<Value> {
    match (left, right) {
        (Value::Number(l), Value::Number(r)) => Ok(Value::Number(l + r)),
        (Value::String(l), Value::String(r)) => Ok(Value::from(format!("{l}{r}"))),
        (Value::String(l), Value::Number(r)) => Ok(Value::from(format!("{l}{}", format_number(*r)))),
        (Value::Number(l), Value::String(r)) => Ok(Value::from(format!("{}{r}", format_number(*l)))),
        _ => Err(RuntimeError::type_error(format!("Operands of '+' must be two numbers or two strings, got {} and {}",
                                                  left.type_name(),
                                                  right.type_name()),
                                          loc)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOC: Location = Location::new(1, 1);

    fn num(n: f64) -> Value {
        Value::Number(n)
    }

    #[test]
    fn number_prefix_concatenation() {
        let v = apply_binary(BinaryOperator::Add, &num(42.0), &Value::from(" items"), LOC).unwrap();
        assert_eq!(v, Value::from("42 items"));
    }

    #[test]
    fn division_by_zero_is_an_error() {
        let err = apply_binary(BinaryOperator::Div, &num(1.0), &num(0.0), LOC).unwrap_err();
        assert!(matches!(err, RuntimeError::DivisionByZero { .. }));
    }

    #[test]
    fn modulo_keeps_sign_of_dividend() {
        let v = apply_binary(BinaryOperator::Mod, &num(-7.0), &num(3.0), LOC).unwrap();
        assert_eq!(v, num(-1.0));
    }

    #[test]
    fn comparison_requires_numbers() {
        let err = apply_binary(BinaryOperator::Less, &Value::from("a"), &Value::from("b"), LOC);
        assert!(matches!(err, Err(RuntimeError::TypeError { .. })));
    }

    #[test]
    fn equality_across_kinds_is_false() {
        let v = apply_binary(BinaryOperator::Equal, &Value::Nil, &num(0.0), LOC).unwrap();
        assert_eq!(v, Value::Bool(false));
    }
}
