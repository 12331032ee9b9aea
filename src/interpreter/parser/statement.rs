use std::rc::Rc;

use crate::{
    ast::{FunctionDecl, Location, Stmt},
    error::ParseError,
    interpreter::{
        lexer::TokenKind,
        parser::{
            MAX_ARGUMENTS,
            core::{ParseResult, Parser},
        },
    },
    util::stack::ensure_sufficient_stack,
};

impl Parser<'_, '_> {
    /// Parses one declaration or statement, recovering from errors.
    ///
    /// On failure the error is recorded, the parser resynchronizes at the
    /// next statement boundary and `None` is returned.
    ///
    /// Grammar: `declaration := letDecl | fnDecl | statement`
    pub(in crate::interpreter::parser) fn declaration(&mut self) -> Option<Stmt> {
        let result = if self.match_kind(TokenKind::Let) {
            self.let_declaration()
        } else if self.check(TokenKind::Fn) && self.check_next(TokenKind::Identifier) {
            self.advance();
            self.function_declaration()
        } else {
            self.statement()
        };

        match result {
            Ok(stmt) => Some(stmt),
            Err(err) => {
                self.report(err);
                self.synchronize();
                None
            },
        }
    }

    /// `letDecl := "let" IDENTIFIER ("=" expression)? ";"`
    ///
    /// The `let` keyword has already been consumed.
    fn let_declaration(&mut self) -> ParseResult<Stmt> {
        let name = self.consume(TokenKind::Identifier, "Expect variable name")?;
        let initializer = if self.match_kind(TokenKind::Equal) {
            Some(self.expression()?)
        } else {
            None
        };
        self.consume(TokenKind::Semicolon, "Expect ';' after variable declaration")?;

        Ok(Stmt::Let { name: name.lexeme.to_string(),
                       initializer,
                       loc: name.location() })
    }

    /// `fnDecl := "fn" IDENTIFIER "(" parameters? ")" block`
    ///
    /// The `fn` keyword has already been consumed.
    fn function_declaration(&mut self) -> ParseResult<Stmt> {
        let keyword = self.previous();
        let name = self.consume(TokenKind::Identifier, "Expect function name")?;
        let decl = self.function_rest(Some(name.lexeme.to_string()), keyword.location())?;

        Ok(Stmt::Function(decl))
    }

    /// Parses a parameter list and body, shared by declarations and function
    /// expressions.
    ///
    /// The body is parsed with the loop depth cleared, so `break` inside a
    /// function cannot target a loop around the function.
    pub(in crate::interpreter::parser) fn function_rest(&mut self,
                                                        name: Option<String>,
                                                        loc: Location)
                                                        -> ParseResult<Rc<FunctionDecl>> {
        self.consume(TokenKind::LParen, "Expect '(' after function name")?;
        let params = self.comma_separated(TokenKind::RParen,
                                          "parameters",
                                          Some(MAX_ARGUMENTS),
                                          false,
                                          |parser| {
                                              parser.consume(TokenKind::Identifier,
                                                             "Expect parameter name")
                                                    .map(|token| token.lexeme.to_string())
                                          })?;
        self.consume(TokenKind::LBrace, "Expect '{' before function body")?;

        let enclosing_loops = std::mem::replace(&mut self.loop_depth, 0);
        self.function_depth += 1;
        let body = self.block_statements();
        self.function_depth -= 1;
        self.loop_depth = enclosing_loops;

        Ok(Rc::new(FunctionDecl { name,
                                  params,
                                  body: body?,
                                  loc }))
    }

    /// Parses a statement that is not a declaration.
    ///
    /// Grammar:
    /// ```text
    /// statement := printStmt | block | ifStmt | whileStmt | runStmt
    ///            | forStmt | returnStmt | breakStmt | continueStmt
    ///            | exprStmt
    /// ```
    fn statement(&mut self) -> ParseResult<Stmt> {
        ensure_sufficient_stack(|| self.statement_kind())
    }

    fn statement_kind(&mut self) -> ParseResult<Stmt> {
        let token = self.peek();
        let loc = token.location();

        match token.kind {
            TokenKind::Print => {
                self.advance();
                let expr = self.expression()?;
                self.consume(TokenKind::Semicolon, "Expect ';' after value")?;
                Ok(Stmt::Print { expr, loc })
            },
            TokenKind::LBrace => {
                self.advance();
                Ok(Stmt::Block { statements: self.block_statements()?,
                                 loc })
            },
            TokenKind::If => {
                self.advance();
                self.if_statement()
            },
            TokenKind::While => {
                self.advance();
                self.while_statement()
            },
            TokenKind::Run => {
                self.advance();
                self.run_until_statement()
            },
            TokenKind::For => {
                self.advance();
                self.for_statement()
            },
            TokenKind::Return => {
                self.advance();
                self.return_statement()
            },
            TokenKind::Break | TokenKind::Continue => {
                self.advance();
                self.loop_control(token.kind)
            },
            _ => self.expression_statement(),
        }
    }

    /// Parses declarations up to the closing `}`.
    ///
    /// The opening `{` has already been consumed. Errors inside the block are
    /// recovered from statement by statement; only a missing `}` fails the
    /// block itself.
    pub(in crate::interpreter::parser) fn block_statements(&mut self) -> ParseResult<Vec<Stmt>> {
        let mut statements = Vec::new();

        while !self.check(TokenKind::RBrace) && !self.is_at_end() {
            if let Some(stmt) = self.declaration() {
                statements.push(stmt);
            }
        }

        self.consume(TokenKind::RBrace, "Expect '}' after block")?;
        Ok(statements)
    }

    /// `ifStmt := "if" "(" expression ")" statement ("else" statement)?`
    ///
    /// A dangling `else` binds to the nearest `if`.
    fn if_statement(&mut self) -> ParseResult<Stmt> {
        let loc = self.previous().location();
        self.consume(TokenKind::LParen, "Expect '(' after 'if'")?;
        let condition = self.expression()?;
        self.consume(TokenKind::RParen, "Expect ')' after if condition")?;

        let then_branch = Box::new(self.statement()?);
        let else_branch = if self.match_kind(TokenKind::Else) {
            Some(Box::new(self.statement()?))
        } else {
            None
        };

        Ok(Stmt::If { condition,
                      then_branch,
                      else_branch,
                      loc })
    }

    /// `whileStmt := "while" "(" expression ")" statement`
    fn while_statement(&mut self) -> ParseResult<Stmt> {
        let loc = self.previous().location();
        self.consume(TokenKind::LParen, "Expect '(' after 'while'")?;
        let condition = self.expression()?;
        self.consume(TokenKind::RParen, "Expect ')' after condition")?;
        let body = Box::new(self.loop_body()?);

        Ok(Stmt::While { condition, body, loc })
    }

    /// `runStmt := "run" statement "until" "(" expression ")" ";"`
    fn run_until_statement(&mut self) -> ParseResult<Stmt> {
        let loc = self.previous().location();
        let body = Box::new(self.loop_body()?);
        self.consume(TokenKind::Until, "Expect 'until' after run body")?;
        self.consume(TokenKind::LParen, "Expect '(' after 'until'")?;
        let condition = self.expression()?;
        self.consume(TokenKind::RParen, "Expect ')' after until condition")?;
        self.consume(TokenKind::Semicolon, "Expect ';' after run-until statement")?;

        Ok(Stmt::RunUntil { body, condition, loc })
    }

    /// Parses a C-style `for` loop.
    ///
    /// Grammar:
    /// ```text
    /// forStmt := "for" "(" (letDecl | exprStmt | ";")
    ///                      expression? ";"
    ///                      expression? ")" statement
    /// ```
    fn for_statement(&mut self) -> ParseResult<Stmt> {
        let loc = self.previous().location();
        self.consume(TokenKind::LParen, "Expect '(' after 'for'")?;

        let initializer = if self.match_kind(TokenKind::Semicolon) {
            None
        } else if self.match_kind(TokenKind::Let) {
            Some(Box::new(self.let_declaration()?))
        } else {
            Some(Box::new(self.expression_statement()?))
        };

        let condition = if self.check(TokenKind::Semicolon) {
            None
        } else {
            Some(self.expression()?)
        };
        self.consume(TokenKind::Semicolon, "Expect ';' after loop condition")?;

        let increment = if self.check(TokenKind::RParen) {
            None
        } else {
            Some(self.expression()?)
        };
        self.consume(TokenKind::RParen, "Expect ')' after for clauses")?;

        let body = Box::new(self.loop_body()?);

        Ok(Stmt::For { initializer,
                       condition,
                       increment,
                       body,
                       loc })
    }

    /// Parses a loop body with `break` and `continue` allowed.
    fn loop_body(&mut self) -> ParseResult<Stmt> {
        self.loop_depth += 1;
        let body = self.statement();
        self.loop_depth -= 1;
        body
    }

    /// `returnStmt := "return" expression? ";"`
    fn return_statement(&mut self) -> ParseResult<Stmt> {
        let loc = self.previous().location();
        if self.function_depth == 0 {
            self.report(ParseError::ReturnOutsideFunction { loc });
        }

        let value = if self.check(TokenKind::Semicolon) {
            None
        } else {
            Some(self.expression()?)
        };
        self.consume(TokenKind::Semicolon, "Expect ';' after return value")?;

        Ok(Stmt::Return { value, loc })
    }

    /// `breakStmt := "break" ";"` and `continueStmt := "continue" ";"`
    fn loop_control(&mut self, kind: TokenKind) -> ParseResult<Stmt> {
        let keyword = self.previous();
        let loc = keyword.location();
        if self.loop_depth == 0 {
            self.report(ParseError::OutsideLoop { keyword: keyword.lexeme.to_string(),
                                                  loc });
        }
        self.consume(TokenKind::Semicolon, &format!("Expect ';' after '{}'", keyword.lexeme))?;

        if kind == TokenKind::Break {
            Ok(Stmt::Break { loc })
        } else {
            Ok(Stmt::Continue { loc })
        }
    }

    /// `exprStmt := expression ";"`
    fn expression_statement(&mut self) -> ParseResult<Stmt> {
        let loc = self.peek().location();
        let expr = self.expression()?;
        self.consume(TokenKind::Semicolon, "Expect ';' after expression")?;

        Ok(Stmt::Expression { expr, loc })
    }
}
