use crate::{
    ast::{Expr, LiteralValue, UnaryOperator, UpdateOperator},
    error::ParseError,
    interpreter::{
        lexer::{Token, TokenKind},
        parser::{
            MAX_ARGUMENTS,
            core::{ParseResult, Parser},
        },
    },
    util::stack::ensure_sufficient_stack,
};

impl<'t, 'src> Parser<'t, 'src> {
    /// Parses prefix operators.
    ///
    /// `!` and `-` apply to any operand. Prefix `++` and `--` require a
    /// variable; any other operand is reported.
    ///
    /// Grammar: `unary := ("!" | "-") unary | ("++" | "--") unary | postfix`
    pub(in crate::interpreter::parser) fn unary(&mut self) -> ParseResult<Expr> {
        if let Some(token) = self.match_any(&[TokenKind::Bang, TokenKind::Minus]) {
            let op = if token.kind == TokenKind::Bang {
                UnaryOperator::Not
            } else {
                UnaryOperator::Negate
            };
            let expr = ensure_sufficient_stack(|| self.unary())?;

            return Ok(Expr::Unary { op,
                                    expr: Box::new(expr),
                                    loc: token.location() });
        }

        if let Some(token) = self.match_any(&[TokenKind::PlusPlus, TokenKind::MinusMinus]) {
            let operand = ensure_sufficient_stack(|| self.unary())?;
            return Ok(self.update(token, operand, true));
        }

        self.postfix()
    }

    /// Grammar: `postfix := call ("++" | "--")?`
    fn postfix(&mut self) -> ParseResult<Expr> {
        let expr = self.call()?;

        if let Some(token) = self.match_any(&[TokenKind::PlusPlus, TokenKind::MinusMinus]) {
            return Ok(self.update(token, expr, false));
        }
        Ok(expr)
    }

    /// Builds an increment or decrement node, or reports a bad target.
    fn update(&mut self, token: &Token<'_>, operand: Expr, prefix: bool) -> Expr {
        let op = if token.kind == TokenKind::PlusPlus {
            UpdateOperator::Increment
        } else {
            UpdateOperator::Decrement
        };

        match operand {
            Expr::Variable { name, .. } => Expr::Update { name,
                                                          op,
                                                          prefix,
                                                          loc: token.location() },
            other => {
                self.report(ParseError::InvalidAssignmentTarget { lexeme: token.lexeme.to_string(),
                                                                  loc:    token.location(), });
                other
            },
        }
    }

    /// Parses calls, indexing and member access, all left-associative.
    ///
    /// Grammar: `call := primary ( "(" arguments? ")" | "[" expression "]" | "." IDENTIFIER )*`
    fn call(&mut self) -> ParseResult<Expr> {
        let mut expr = self.primary()?;

        loop {
            if self.match_kind(TokenKind::LParen) {
                let loc = self.previous().location();
                let arguments = self.comma_separated(TokenKind::RParen,
                                                     "arguments",
                                                     Some(MAX_ARGUMENTS),
                                                     false,
                                                     Self::expression)?;
                expr = Expr::Call { callee: Box::new(expr),
                                    arguments,
                                    loc };
            } else if self.match_kind(TokenKind::LBracket) {
                let loc = self.previous().location();
                let index = self.expression()?;
                self.consume(TokenKind::RBracket, "Expect ']' after index")?;
                expr = Expr::Index { object: Box::new(expr),
                                     index: Box::new(index),
                                     loc };
            } else if self.match_kind(TokenKind::Dot) {
                let name = self.consume(TokenKind::Identifier, "Expect property name after '.'")?;
                expr = Expr::Member { object: Box::new(expr),
                                      name:   name.lexeme.to_string(),
                                      loc:    name.location(), };
            } else {
                break;
            }
        }
        Ok(expr)
    }

    /// Parses literals, names, groupings, collection literals and function
    /// expressions.
    ///
    /// Grammar:
    /// ```text
    /// primary := NUMBER | STRING | "true" | "false" | "nil" | IDENTIFIER
    ///          | "(" expression ")"
    ///          | "[" (expression ("," expression)* ","?)? "]"
    ///          | "{" (expression ":" expression ("," ...)* ","?)? "}"
    ///          | "fn" "(" parameters? ")" block
    /// ```
    fn primary(&mut self) -> ParseResult<Expr> {
        let token = self.peek();
        let loc = token.location();

        let literal = match token.kind {
            TokenKind::Number => Some(LiteralValue::Number(self.number_literal(token)?)),
            TokenKind::String => Some(LiteralValue::String(token.literal.clone().unwrap_or_default())),
            TokenKind::True => Some(LiteralValue::Bool(true)),
            TokenKind::False => Some(LiteralValue::Bool(false)),
            TokenKind::Nil => Some(LiteralValue::Nil),
            _ => None,
        };
        if let Some(value) = literal {
            self.advance();
            return Ok(Expr::Literal { value, loc });
        }

        match token.kind {
            TokenKind::Identifier => {
                self.advance();
                Ok(Expr::Variable { name: token.lexeme.to_string(),
                                    loc })
            },
            TokenKind::LParen => {
                self.advance();
                let expr = self.expression()?;
                self.consume(TokenKind::RParen, "Expect ')' after expression")?;
                Ok(Expr::Grouping { expr: Box::new(expr),
                                    loc })
            },
            TokenKind::LBracket => {
                self.advance();
                let elements =
                    self.comma_separated(TokenKind::RBracket, "array elements", None, true, Self::expression)?;
                Ok(Expr::ArrayLiteral { elements, loc })
            },
            TokenKind::LBrace => {
                self.advance();
                let entries = self.comma_separated(TokenKind::RBrace,
                                                   "hash map entries",
                                                   None,
                                                   true,
                                                   Self::hash_map_entry)?;
                Ok(Expr::HashMapLiteral { entries, loc })
            },
            TokenKind::Fn => {
                self.advance();
                Ok(Expr::Function(self.function_rest(None, loc)?))
            },
            _ => Err(self.error_at(token, "Expect expression")),
        }
    }

    /// Grammar: `entry := expression ":" expression`
    fn hash_map_entry(&mut self) -> ParseResult<(Expr, Expr)> {
        let key = self.expression()?;
        self.consume(TokenKind::Colon, "Expect ':' after hash map key")?;
        let value = self.expression()?;
        Ok((key, value))
    }

    fn number_literal(&self, token: &Token<'_>) -> ParseResult<f64> {
        token.lexeme
             .parse()
             .map_err(|_| self.error_at(token, "Invalid number literal"))
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        ast::Expr,
        error::ParseError,
        interpreter::{lexer::tokenize, parser::parse_expression},
    };

    #[test]
    fn postfix_chain_is_left_associative() {
        let (expr, errors) = parse_expression(&tokenize("a.b[0](1)"));
        assert!(errors.is_empty());
        let Some(Expr::Call { callee, .. }) = expr else {
            panic!("expected a call");
        };
        assert!(matches!(*callee, Expr::Index { .. }));
    }

    #[test]
    fn increment_requires_a_variable() {
        let (_, errors) = parse_expression(&tokenize("5++"));
        assert!(matches!(errors.as_slice(), [ParseError::InvalidAssignmentTarget { .. }]));
    }

    #[test]
    fn trailing_comma_in_array_literal() {
        let (expr, errors) = parse_expression(&tokenize("[1, 2, ]"));
        assert!(errors.is_empty());
        assert!(matches!(expr, Some(Expr::ArrayLiteral { elements, .. }) if elements.len() == 2));
    }

    #[test]
    fn function_expression() {
        let (expr, errors) = parse_expression(&tokenize("fn (x) { return x * 2; }"));
        assert!(errors.is_empty());
        assert!(matches!(expr, Some(Expr::Function(decl)) if decl.params == ["x"]));
    }
}
