use thiserror::Error;

use crate::ast::Location;

/// Represents all errors that can occur during lexing or parsing.
///
/// Parse errors are collected rather than raised: the parser records one,
/// resynchronizes at the next statement boundary and keeps going, so a single
/// pass can report several independent mistakes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Found a token that does not fit the grammar here.
    #[error("[Line {}, Col {}] Error at '{lexeme}': {message}", .loc.line, .loc.column)]
    UnexpectedToken {
        /// The offending token's text.
        lexeme:  String,
        /// What the parser expected.
        message: String,
        /// Where the token starts.
        loc:     Location,
    },
    /// Reached the end of input while a construct was still open.
    #[error("[Line {}, Col {}] Error at end: {message}", .loc.line, .loc.column)]
    UnexpectedEndOfInput {
        /// What the parser expected.
        message: String,
        /// The end of the source.
        loc:     Location,
    },
    /// The lexer produced a character the language does not use.
    #[error("[Line {}, Col {}] Error at '{lexeme}': Unexpected character", .loc.line, .loc.column)]
    UnexpectedCharacter {
        /// The unrecognized text.
        lexeme: String,
        /// Where it appears.
        loc:    Location,
    },
    /// A string literal is missing its closing quote.
    #[error("[Line {}, Col {}] Error at '{lexeme}': Unterminated string", .loc.line, .loc.column)]
    UnterminatedString {
        /// The partial string.
        lexeme: String,
        /// Where the string starts.
        loc:    Location,
    },
    /// The left-hand side of `=` is not a variable or an index expression.
    #[error("[Line {}, Col {}] Error at '{lexeme}': Invalid assignment target", .loc.line, .loc.column)]
    InvalidAssignmentTarget {
        /// The assignment operator.
        lexeme: String,
        /// Where the operator appears.
        loc:    Location,
    },
    /// `break` or `continue` outside of any loop.
    #[error("[Line {}, Col {}] Error at '{keyword}': '{keyword}' outside of a loop", .loc.line, .loc.column)]
    OutsideLoop {
        /// Either `break` or `continue`.
        keyword: String,
        /// Where the keyword appears.
        loc:     Location,
    },
    /// `return` at the top level of a program.
    #[error("[Line {}, Col {}] Error at 'return': Cannot return from top-level code", .loc.line, .loc.column)]
    ReturnOutsideFunction {
        /// Where the keyword appears.
        loc: Location,
    },
    /// More than 255 parameters or arguments.
    #[error("[Line {}, Col {}] Error at '{lexeme}': Can't have more than 255 {what}", .loc.line, .loc.column)]
    TooManyItems {
        /// `parameters` or `arguments`.
        what:   &'static str,
        /// The token where the limit was exceeded.
        lexeme: String,
        /// Where that token appears.
        loc:    Location,
    },
}

impl ParseError {
    /// Gets the source location of the error.
    ///
    /// ## Example
    /// ```
    /// use volt::{ast::Location, error::ParseError};
    ///
    /// let err = ParseError::ReturnOutsideFunction { loc: Location::new(2, 1) };
    /// assert_eq!(err.location(), Location::new(2, 1));
    /// assert_eq!(err.to_string(),
    ///            "[Line 2, Col 1] Error at 'return': Cannot return from top-level code");
    /// ```
    #[must_use]
    pub const fn location(&self) -> Location {
        match self {
            Self::UnexpectedToken { loc, .. }
            | Self::UnexpectedEndOfInput { loc, .. }
            | Self::UnexpectedCharacter { loc, .. }
            | Self::UnterminatedString { loc, .. }
            | Self::InvalidAssignmentTarget { loc, .. }
            | Self::OutsideLoop { loc, .. }
            | Self::ReturnOutsideFunction { loc }
            | Self::TooManyItems { loc, .. } => *loc,
        }
    }
}
