/// Parsing errors.
///
/// Defines the diagnostics recorded while lexing and parsing source code:
/// unexpected tokens, malformed literals, invalid assignment targets and
/// misplaced control-flow keywords.
pub mod parse_error;
/// Runtime errors.
///
/// Contains all error types that can be raised during evaluation, such as
/// type mismatches, division by zero, bad indices or arity mismatches.
pub mod runtime_error;

use std::fmt;

pub use parse_error::ParseError;
pub use runtime_error::RuntimeError;
use thiserror::Error;

/// Everything that can stop a program from running to completion.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// The source did not parse. Holds every diagnostic from the pass.
    #[error("{}", ParseErrors(.0))]
    Parse(Vec<ParseError>),
    /// Evaluation stopped with an error.
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

struct ParseErrors<'a>(&'a [ParseError]);

impl fmt::Display for ParseErrors<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{err}")?;
        }
        Ok(())
    }
}

impl From<Vec<ParseError>> for Error {
    fn from(errors: Vec<ParseError>) -> Self {
        Self::Parse(errors)
    }
}
