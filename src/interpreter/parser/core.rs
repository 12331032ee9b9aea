use tracing::debug;

use crate::{
    ast::{Expr, Stmt},
    error::ParseError,
    interpreter::lexer::{Token, TokenKind},
    util::stack::ensure_sufficient_stack,
};

pub type ParseResult<T> = Result<T, ParseError>;

/// Stand-in returned when reading past the end of a token slice that lacks
/// its `Eof` terminator.
static EOF: Token<'static> = Token { kind:    TokenKind::Eof,
                                     lexeme:  "",
                                     line:    1,
                                     column:  1,
                                     literal: None, };

/// Recursive-descent parser over a token slice.
///
/// Errors inside a statement abort that statement only: the error is
/// recorded, the parser skips to the next statement boundary and carries on.
/// Errors that leave the tree well-formed (an invalid assignment target, a
/// `break` outside a loop) are recorded without aborting anything.
pub struct Parser<'t, 'src> {
    tokens:                    &'t [Token<'src>],
    current:                   usize,
    errors:                    Vec<ParseError>,
    /// Number of loops enclosing the current position.
    pub(super) loop_depth:     usize,
    /// Number of function bodies enclosing the current position.
    pub(super) function_depth: usize,
}

/// Parses a whole program.
///
/// # Parameters
/// - `tokens`: Output of [`tokenize`](crate::interpreter::lexer::tokenize).
///
/// # Returns
/// The statements that parsed successfully, and every diagnostic recorded on
/// the way. The program should only be run when the error list is empty.
///
/// ## Example
/// ```
/// use volt::interpreter::{lexer::tokenize, parser::parse_program};
///
/// let tokens = tokenize("let = 1; print 2; print ;");
/// let (program, errors) = parse_program(&tokens);
///
/// assert_eq!(program.len(), 1);
/// assert_eq!(errors.len(), 2);
/// ```
#[must_use]
pub fn parse_program(tokens: &[Token<'_>]) -> (Vec<Stmt>, Vec<ParseError>) {
    let mut parser = Parser::new(tokens);
    let mut statements = Vec::new();

    while !parser.is_at_end() {
        if let Some(stmt) = parser.declaration() {
            statements.push(stmt);
        }
    }

    debug!(statements = statements.len(), errors = parser.errors.len(), "parsed program");
    (statements, parser.errors)
}

/// Parses a single expression, as typed at the REPL.
///
/// One trailing `;` is accepted. Anything after the expression is reported.
///
/// ## Example
/// ```
/// use volt::interpreter::{lexer::tokenize, parser::parse_expression};
///
/// let (expr, errors) = parse_expression(&tokenize("1 + 2 * 3"));
/// assert!(errors.is_empty());
/// assert_eq!(expr.unwrap().to_string(), "1 + 2 * 3");
///
/// let (_, errors) = parse_expression(&tokenize("let x = 1;"));
/// assert!(!errors.is_empty());
/// ```
#[must_use]
pub fn parse_expression(tokens: &[Token<'_>]) -> (Option<Expr>, Vec<ParseError>) {
    let mut parser = Parser::new(tokens);

    let expr = match parser.expression() {
        Ok(expr) => Some(expr),
        Err(err) => {
            parser.report(err);
            None
        },
    };

    if expr.is_some() {
        parser.match_kind(TokenKind::Semicolon);
        if !parser.is_at_end() {
            let err = parser.error_at(parser.peek(), "Expect end of expression");
            parser.report(err);
        }
    }

    (expr, parser.errors)
}

impl<'t, 'src> Parser<'t, 'src> {
    /// Creates a parser positioned at the first token.
    #[must_use]
    pub fn new(tokens: &'t [Token<'src>]) -> Self {
        Self { tokens,
               current: 0,
               errors: Vec::new(),
               loop_depth: 0,
               function_depth: 0 }
    }

    /// Parses an expression at the lowest precedence level.
    ///
    /// Grammar: `expression := assignment`
    pub fn expression(&mut self) -> ParseResult<Expr> {
        ensure_sufficient_stack(|| self.assignment())
    }

    /// Records a diagnostic without interrupting the parse.
    pub(in crate::interpreter::parser) fn report(&mut self, err: ParseError) {
        debug!(%err, "parse error");
        self.errors.push(err);
    }

    /// The token about to be consumed.
    pub(in crate::interpreter::parser) fn peek(&self) -> &'t Token<'src> {
        let tokens = self.tokens;
        tokens.get(self.current).unwrap_or(&EOF)
    }

    /// The most recently consumed token.
    pub(in crate::interpreter::parser) fn previous(&self) -> &'t Token<'src> {
        let tokens = self.tokens;
        self.current
            .checked_sub(1)
            .and_then(|i| tokens.get(i))
            .unwrap_or(&EOF)
    }

    pub(in crate::interpreter::parser) fn is_at_end(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    pub(in crate::interpreter::parser) fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    /// Looks one token past the current one.
    pub(in crate::interpreter::parser) fn check_next(&self, kind: TokenKind) -> bool {
        self.tokens.get(self.current + 1).is_some_and(|token| token.kind == kind)
    }

    /// Consumes the current token and returns it. Never moves past `Eof`.
    pub(in crate::interpreter::parser) fn advance(&mut self) -> &'t Token<'src> {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.previous()
    }

    /// Consumes the current token if it has the given kind.
    pub(in crate::interpreter::parser) fn match_kind(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            return true;
        }
        false
    }

    /// Consumes the current token if its kind is one of `kinds`.
    pub(in crate::interpreter::parser) fn match_any(&mut self, kinds: &[TokenKind]) -> Option<&'t Token<'src>> {
        if kinds.contains(&self.peek().kind) {
            return Some(self.advance());
        }
        None
    }

    /// Consumes a token of the given kind or fails with `message`.
    pub(in crate::interpreter::parser) fn consume(&mut self,
                                                  kind: TokenKind,
                                                  message: &str)
                                                  -> ParseResult<&'t Token<'src>> {
        if self.check(kind) {
            return Ok(self.advance());
        }
        Err(self.error_at(self.peek(), message))
    }

    /// Builds the diagnostic for `token`.
    ///
    /// Tokens the lexer could not classify get their own error kinds, so the
    /// user sees "Unterminated string" instead of whatever the grammar
    /// expected at that position.
    pub(in crate::interpreter::parser) fn error_at(&self, token: &Token<'_>, message: &str) -> ParseError {
        let loc = token.location();
        match token.kind {
            TokenKind::Eof => ParseError::UnexpectedEndOfInput { message: message.to_string(),
                                                                 loc },
            TokenKind::Error if token.lexeme.starts_with('"') => {
                ParseError::UnterminatedString { lexeme: token.lexeme.to_string(),
                                                 loc }
            },
            TokenKind::Error => ParseError::UnexpectedCharacter { lexeme: token.lexeme.to_string(),
                                                                  loc },
            _ => ParseError::UnexpectedToken { lexeme: token.lexeme.to_string(),
                                               message: message.to_string(),
                                               loc },
        }
    }

    /// Skips tokens until the start of the next statement.
    ///
    /// Always consumes at least one token, which guarantees progress. Stops
    /// after a `;` or before a keyword that can only start a statement.
    pub(in crate::interpreter::parser) fn synchronize(&mut self) {
        self.advance();

        while !self.is_at_end() {
            if self.previous().kind == TokenKind::Semicolon {
                return;
            }
            match self.peek().kind {
                TokenKind::Let
                | TokenKind::If
                | TokenKind::While
                | TokenKind::For
                | TokenKind::Run
                | TokenKind::Fn
                | TokenKind::Return
                | TokenKind::Print
                | TokenKind::Break
                | TokenKind::Continue => return,
                _ => {
                    self.advance();
                },
            }
        }
    }
}
