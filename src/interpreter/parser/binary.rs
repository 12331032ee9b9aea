use crate::{
    ast::{Expr, LogicalOperator},
    error::ParseError,
    interpreter::{
        lexer::TokenKind,
        parser::{
            core::{ParseResult, Parser},
            utils::{compound_operator, token_to_binary_operator},
        },
    },
    util::stack::ensure_sufficient_stack,
};

impl Parser<'_, '_> {
    /// Parses assignment, the lowest precedence level.
    ///
    /// Assignment is right-associative. The target must be a variable or an
    /// index expression; `a[i] = v` is rewritten into an index assignment.
    /// Compound operators (`+=`, `-=`, `*=`, `/=`) only accept variables.
    /// Any other target is reported and the left-hand side is returned
    /// unchanged so parsing can continue.
    ///
    /// Grammar:
    /// ```text
    /// assignment := (IDENTIFIER | call "[" expression "]") "=" assignment
    ///             | IDENTIFIER ("+=" | "-=" | "*=" | "/=") assignment
    ///             | ternary
    /// ```
    pub(in crate::interpreter::parser) fn assignment(&mut self) -> ParseResult<Expr> {
        let expr = self.ternary()?;

        if self.match_kind(TokenKind::Equal) {
            let equals = self.previous();
            let value = Box::new(ensure_sufficient_stack(|| self.assignment())?);

            return Ok(match expr {
                Expr::Variable { name, loc } => Expr::Assign { name, value, loc },
                Expr::Index { object, index, loc } => Expr::IndexAssign { object,
                                                                          index,
                                                                          value,
                                                                          loc },
                other => {
                    self.report(ParseError::InvalidAssignmentTarget { lexeme: equals.lexeme.to_string(),
                                                                      loc:    equals.location(), });
                    other
                },
            });
        }

        if let Some(token) = self.match_any(&[TokenKind::PlusEqual,
                                              TokenKind::MinusEqual,
                                              TokenKind::StarEqual,
                                              TokenKind::SlashEqual])
           && let Some(op) = compound_operator(token.kind)
        {
            let value = Box::new(ensure_sufficient_stack(|| self.assignment())?);

            return Ok(match expr {
                Expr::Variable { name, .. } => Expr::CompoundAssign { name,
                                                                      op,
                                                                      value,
                                                                      loc: token.location() },
                other => {
                    self.report(ParseError::InvalidAssignmentTarget { lexeme: token.lexeme.to_string(),
                                                                      loc:    token.location(), });
                    other
                },
            });
        }

        Ok(expr)
    }

    /// Parses the conditional operator.
    ///
    /// Right-associative: `a ? b : c ? d : e` groups as `a ? b : (c ? d : e)`.
    /// The middle operand may be any expression, including an assignment.
    ///
    /// Grammar: `ternary := logical_or ("?" expression ":" ternary)?`
    fn ternary(&mut self) -> ParseResult<Expr> {
        let condition = self.logical_or()?;

        if self.match_kind(TokenKind::Question) {
            let loc = self.previous().location();
            let then_branch = self.expression()?;
            self.consume(TokenKind::Colon, "Expect ':' after then branch of ternary expression")?;
            let else_branch = ensure_sufficient_stack(|| self.ternary())?;

            return Ok(Expr::Ternary { condition: Box::new(condition),
                                      then_branch: Box::new(then_branch),
                                      else_branch: Box::new(else_branch),
                                      loc });
        }

        Ok(condition)
    }

    /// Grammar: `logical_or := logical_and ("||" logical_and)*`
    fn logical_or(&mut self) -> ParseResult<Expr> {
        let mut left = self.logical_and()?;

        while self.match_kind(TokenKind::OrOr) {
            let loc = self.previous().location();
            let right = self.logical_and()?;
            left = Expr::Logical { left: Box::new(left),
                                   op: LogicalOperator::Or,
                                   right: Box::new(right),
                                   loc };
        }
        Ok(left)
    }

    /// Grammar: `logical_and := equality ("&&" equality)*`
    fn logical_and(&mut self) -> ParseResult<Expr> {
        let mut left = self.equality()?;

        while self.match_kind(TokenKind::AndAnd) {
            let loc = self.previous().location();
            let right = self.equality()?;
            left = Expr::Logical { left: Box::new(left),
                                   op: LogicalOperator::And,
                                   right: Box::new(right),
                                   loc };
        }
        Ok(left)
    }

    /// Grammar: `equality := comparison (("==" | "!=") comparison)*`
    fn equality(&mut self) -> ParseResult<Expr> {
        self.left_associative(&[TokenKind::EqualEqual, TokenKind::BangEqual], Self::comparison)
    }

    /// Grammar: `comparison := additive (("<" | ">" | "<=" | ">=") additive)*`
    fn comparison(&mut self) -> ParseResult<Expr> {
        self.left_associative(&[TokenKind::Less,
                                TokenKind::Greater,
                                TokenKind::LessEqual,
                                TokenKind::GreaterEqual],
                              Self::additive)
    }

    /// Grammar: `additive := multiplicative (("+" | "-") multiplicative)*`
    fn additive(&mut self) -> ParseResult<Expr> {
        self.left_associative(&[TokenKind::Plus, TokenKind::Minus], Self::multiplicative)
    }

    /// Grammar: `multiplicative := unary (("*" | "/" | "%") unary)*`
    fn multiplicative(&mut self) -> ParseResult<Expr> {
        self.left_associative(&[TokenKind::Star, TokenKind::Slash, TokenKind::Percent],
                              Self::unary)
    }

    /// Parses one left-associative level of binary operators.
    ///
    /// # Parameters
    /// - `operators`: Token kinds accepted at this level.
    /// - `operand`: Parser for the next-higher precedence level.
    ///
    /// # Returns
    /// A left-leaning tree of `Expr::Binary` nodes.
    fn left_associative(&mut self,
                        operators: &[TokenKind],
                        operand: fn(&mut Self) -> ParseResult<Expr>)
                        -> ParseResult<Expr> {
        let mut left = operand(self)?;

        while let Some(token) = self.match_any(operators)
              && let Some(op) = token_to_binary_operator(token.kind)
        {
            let right = operand(self)?;
            left = Expr::Binary { left: Box::new(left),
                                  op,
                                  right: Box::new(right),
                                  loc: token.location() };
        }
        Ok(left)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        ast::BinaryOperator,
        interpreter::{lexer::tokenize, parser::parse_expression},
    };

    fn parse(source: &str) -> Expr {
        let (expr, errors) = parse_expression(&tokenize(source));
        assert!(errors.is_empty(), "{errors:?}");
        expr.unwrap()
    }

    #[test]
    fn multiplication_binds_tighter_than_addition() {
        let Expr::Binary { op, right, .. } = parse("1 + 2 * 3") else {
            panic!("expected a binary expression");
        };
        assert_eq!(op, BinaryOperator::Add);
        assert!(matches!(*right, Expr::Binary { op: BinaryOperator::Mul, .. }));
    }

    #[test]
    fn subtraction_is_left_associative() {
        let Expr::Binary { left, .. } = parse("10 - 4 - 3") else {
            panic!("expected a binary expression");
        };
        assert!(matches!(*left, Expr::Binary { op: BinaryOperator::Sub, .. }));
    }

    #[test]
    fn ternary_is_right_associative() {
        let Expr::Ternary { else_branch, .. } = parse("a ? b : c ? d : e") else {
            panic!("expected a ternary");
        };
        assert!(matches!(*else_branch, Expr::Ternary { .. }));
    }

    #[test]
    fn index_target_becomes_index_assignment() {
        assert!(matches!(parse("a[0] = 1"), Expr::IndexAssign { .. }));
    }

    #[test]
    fn and_binds_tighter_than_or() {
        let Expr::Logical { op, right, .. } = parse("a || b && c") else {
            panic!("expected a logical expression");
        };
        assert_eq!(op, LogicalOperator::Or);
        assert!(matches!(*right, Expr::Logical { op: LogicalOperator::And, .. }));
    }
}
