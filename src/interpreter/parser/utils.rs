use crate::{
    ast::BinaryOperator,
    error::ParseError,
    interpreter::{
        lexer::TokenKind,
        parser::core::{ParseResult, Parser},
    },
};

impl Parser<'_, '_> {
    /// Parses a comma-separated list of items until a closing token.
    ///
    /// This utility is shared by array and hash-map literals, argument lists
    /// and parameter lists. An immediately encountered closing token produces
    /// an empty list.
    ///
    /// Grammar (simplified): `list := (item ("," item)* ","?)? closing`
    ///
    /// # Parameters
    /// - `closing`: The token that terminates the list (e.g., `]` or `)`).
    /// - `what`: Plural noun for the items, used in diagnostics.
    /// - `max_items`: Limit beyond which a diagnostic is recorded. Parsing
    ///   continues past the limit.
    /// - `trailing_comma`: Whether `item, closing` is accepted.
    /// - `parse_item`: Function used to parse each list element.
    ///
    /// # Returns
    /// A vector of parsed items.
    ///
    /// # Errors
    /// Returns a `ParseError` if an item fails to parse or the closing token
    /// is missing.
    pub(in crate::interpreter::parser) fn comma_separated<T>(
        &mut self,
        closing: TokenKind,
        what: &'static str,
        max_items: Option<usize>,
        trailing_comma: bool,
        mut parse_item: impl FnMut(&mut Self) -> ParseResult<T>)
        -> ParseResult<Vec<T>> {
        let mut items = Vec::new();

        if !self.check(closing) {
            loop {
                if let Some(max) = max_items
                   && items.len() == max
                {
                    let token = self.peek();
                    self.report(ParseError::TooManyItems { what,
                                                           lexeme: token.lexeme.to_string(),
                                                           loc: token.location() });
                }
                items.push(parse_item(self)?);

                if !self.match_kind(TokenKind::Comma) {
                    break;
                }
                if trailing_comma && self.check(closing) {
                    break;
                }
            }
        }

        self.consume(closing, &format!("Expect '{}' after {what}", closing_lexeme(closing)))?;
        Ok(items)
    }
}

/// Maps a token to the binary operator it denotes.
///
/// # Parameters
/// - `kind`: The token kind to convert.
///
/// # Returns
/// - `Some(BinaryOperator)` for arithmetic, comparison and equality tokens.
/// - `None` for every other token.
pub(in crate::interpreter::parser) const fn token_to_binary_operator(kind: TokenKind)
                                                                     -> Option<BinaryOperator> {
    match kind {
        TokenKind::Plus => Some(BinaryOperator::Add),
        TokenKind::Minus => Some(BinaryOperator::Sub),
        TokenKind::Star => Some(BinaryOperator::Mul),
        TokenKind::Slash => Some(BinaryOperator::Div),
        TokenKind::Percent => Some(BinaryOperator::Mod),
        TokenKind::Less => Some(BinaryOperator::Less),
        TokenKind::Greater => Some(BinaryOperator::Greater),
        TokenKind::LessEqual => Some(BinaryOperator::LessEqual),
        TokenKind::GreaterEqual => Some(BinaryOperator::GreaterEqual),
        TokenKind::EqualEqual => Some(BinaryOperator::Equal),
        TokenKind::BangEqual => Some(BinaryOperator::NotEqual),
        _ => None,
    }
}

/// Maps `+=`, `-=`, `*=` and `/=` to the operator they apply.
pub(in crate::interpreter::parser) const fn compound_operator(kind: TokenKind) -> Option<BinaryOperator> {
    match kind {
        TokenKind::PlusEqual => Some(BinaryOperator::Add),
        TokenKind::MinusEqual => Some(BinaryOperator::Sub),
        TokenKind::StarEqual => Some(BinaryOperator::Mul),
        TokenKind::SlashEqual => Some(BinaryOperator::Div),
        _ => None,
    }
}

const fn closing_lexeme(kind: TokenKind) -> &'static str {
    match kind {
        TokenKind::RParen => ")",
        TokenKind::RBracket => "]",
        TokenKind::RBrace => "}",
        _ => "delimiter",
    }
}
