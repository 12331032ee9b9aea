use thiserror::Error;

use crate::ast::Location;

/// Represents all errors that can occur during evaluation.
///
/// Runtime errors unwind straight to the host. They never carry the
/// `return`/`break`/`continue` signals, which travel as
/// [`Flow`](crate::interpreter::evaluator::core::Flow) values instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuntimeError {
    /// Read an undefined variable.
    #[error("Error on line {}, column {}: Undefined variable '{name}'.", .loc.line, .loc.column)]
    UnknownVariable {
        /// The name of the variable.
        name: String,
        /// Where it was referenced.
        loc:  Location,
    },
    /// An operator or builtin received operands of the wrong type.
    #[error("Error on line {}, column {}: {details}", .loc.line, .loc.column)]
    TypeError {
        /// Details about the mismatch.
        details: String,
        /// Where the operation happened.
        loc:     Location,
    },
    /// Divided by the number zero.
    #[error("Error on line {}, column {}: Division by zero.", .loc.line, .loc.column)]
    DivisionByZero {
        /// Where the division happened.
        loc: Location,
    },
    /// Indexed an array outside `0..length`.
    #[error("Error on line {}, column {}: Array index {index} out of bounds for length {length}.", .loc.line, .loc.column)]
    IndexOutOfBounds {
        /// The index that was used.
        index:  f64,
        /// The array length at the time.
        length: usize,
        /// Where the index expression is.
        loc:    Location,
    },
    /// The index has the wrong type for the indexed value.
    #[error("Error on line {}, column {}: {details}", .loc.line, .loc.column)]
    InvalidIndex {
        /// Details about the index.
        details: String,
        /// Where the index expression is.
        loc:     Location,
    },
    /// Called a function with the wrong number of arguments.
    #[error("Error on line {}, column {}: Expected {expected} arguments but got {found}.", .loc.line, .loc.column)]
    ArgumentCountMismatch {
        /// The callee's arity.
        expected: usize,
        /// The number of arguments supplied.
        found:    usize,
        /// Where the call is.
        loc:      Location,
    },
    /// Called something that is not a function.
    #[error("Error on line {}, column {}: Can only call functions, not {type_name}.", .loc.line, .loc.column)]
    NotCallable {
        /// Type name of the callee value.
        type_name: &'static str,
        /// Where the call is.
        loc:       Location,
    },
    /// Accessed a member the receiver's type does not have.
    #[error("Error on line {}, column {}: Unknown {type_name} member: {name}", .loc.line, .loc.column)]
    UnknownMember {
        /// `array` or `hash map`.
        type_name: &'static str,
        /// The member name.
        name:      String,
        /// Where the member access is.
        loc:       Location,
    },
    /// Accessed a member of a value that has none.
    #[error("Error on line {}, column {}: Only arrays and hash maps have members.", .loc.line, .loc.column)]
    NoMembers {
        /// Where the member access is.
        loc: Location,
    },
    /// Function calls nested deeper than the interpreter allows.
    #[error("Error on line {}, column {}: Maximum recursion depth exceeded (limit: {depth}).", .loc.line, .loc.column)]
    StackOverflow {
        /// The call depth limit that was reached.
        depth: usize,
        /// The call that would have exceeded it.
        loc:   Location,
    },
    /// A native function reported a failure.
    #[error("Error on line {}, column {}: {name}: {details}", .loc.line, .loc.column)]
    Native {
        /// Name of the native function.
        name:    String,
        /// The message it returned.
        details: String,
        /// Where the call is.
        loc:     Location,
    },
    /// Writing program output failed.
    #[error("Error on line {}, column {}: Could not write output: {details}", .loc.line, .loc.column)]
    Io {
        /// The underlying I/O error message.
        details: String,
        /// The `print` statement.
        loc:     Location,
    },
}

impl RuntimeError {
    /// Gets the source location of the error.
    #[must_use]
    pub const fn location(&self) -> Location {
        match self {
            Self::UnknownVariable { loc, .. }
            | Self::TypeError { loc, .. }
            | Self::DivisionByZero { loc }
            | Self::IndexOutOfBounds { loc, .. }
            | Self::InvalidIndex { loc, .. }
            | Self::ArgumentCountMismatch { loc, .. }
            | Self::NotCallable { loc, .. }
            | Self::UnknownMember { loc, .. }
            | Self::NoMembers { loc }
            | Self::StackOverflow { loc, .. }
            | Self::Native { loc, .. }
            | Self::Io { loc, .. } => *loc,
        }
    }

    /// Shorthand for a [`RuntimeError::TypeError`].
    pub(crate) fn type_error(details: impl Into<String>, loc: Location) -> Self {
        Self::TypeError { details: details.into(),
                          loc }
    }
}
