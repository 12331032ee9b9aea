/// Parser state, token navigation and the public entry points.
///
/// Holds the token cursor, the recorded diagnostics and the error recovery
/// logic shared by every grammar rule.
pub mod core;

/// Statement parsing.
///
/// Declarations, blocks, conditionals, the three loop forms, `return`,
/// `break` and `continue`.
pub mod statement;

/// Binary operator parsing.
///
/// Assignment, the ternary operator and every left-associative binary
/// precedence level down to multiplication.
pub mod binary;

/// Unary, postfix and primary expression parsing.
pub mod unary;

/// Utility functions for the parser.
///
/// Provides helpers for comma-separated lists and token-to-operator mapping.
pub mod utils;

pub use self::core::{ParseResult, Parser, parse_expression, parse_program};

/// Maximum number of parameters of a function, and of arguments in a call.
pub const MAX_ARGUMENTS: usize = 255;
