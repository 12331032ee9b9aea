//! # volt
//!
//! volt is a tree-walking interpreter for VoltScript, a small dynamically
//! typed scripting language with first-class functions, closures, arrays and
//! hash maps.
//!
//! Source text goes through three phases: [`tokenize`] turns it into tokens,
//! [`parse_program`] builds the syntax tree while collecting every syntax
//! error, and an [`Interpreter`] executes the tree.

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::large_enum_variant,
    clippy::string_lit_as_bytes,
    clippy::match_same_arms,
    clippy::cargo,
    clippy::nursery,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
    clippy::pedantic,
    //missing_docs,
)]
#![allow(clippy::missing_errors_doc)]

use tracing::debug;

pub use crate::{
    error::Error,
    interpreter::{
        evaluator::core::Interpreter,
        lexer::tokenize,
        parser::{parse_expression, parse_program},
        value::core::Value,
    },
};
use crate::{ast::Stmt, util::output::SharedOutput};

/// Defines the structure of parsed code.
///
/// This module declares the `Expr` and `Stmt` enums that represent the
/// syntactic structure of source code as a tree. The AST is built by the parser
/// and traversed by the evaluator.
///
/// # Responsibilities
/// - Defines expression and statement types for all language constructs.
/// - Attaches source locations to AST nodes for error reporting.
/// - Prints a tree back as source that parses to the same tree.
pub mod ast;
/// Provides unified error types for parsing and evaluation.
///
/// This module defines all errors that can be raised during lexing, parsing, or
/// evaluating code. Each one carries the source location it refers to.
///
/// # Responsibilities
/// - Defines error enums for the parser and the evaluator.
/// - Attaches line and column numbers and detailed messages for context.
/// - Aggregates both kinds into the top-level [`Error`].
pub mod error;
/// Orchestrates the entire process of code execution.
///
/// This module ties together lexing, parsing, evaluation, value
/// representations, error handling, and all supporting infrastructure to
/// provide a complete runtime for source code evaluation. It exposes the public
/// API for interpreting and executing expressions or programs.
///
/// # Responsibilities
/// - Coordinates all core components: lexer, parser, evaluator, and value
///   types.
/// - Provides entry points for parsing and evaluating user code.
/// - Manages the flow of data and errors between phases.
pub mod interpreter;
/// General utilities for safe numeric conversion and helpers.
///
/// This module provides reusable helpers that are used throughout the
/// interpreter: number formatting, conversions between `usize` and `f64`, and
/// an in-memory output sink.
///
/// # Responsibilities
/// - Safely convert between `usize` and `f64` without silent data loss.
/// - Format numbers the way `print` shows them.
/// - Capture program output for embedding and tests.
pub mod util;

/// Tokenizes and parses `source`.
///
/// # Errors
/// Returns [`Error::Parse`] with every diagnostic if the source does not
/// parse.
///
/// # Examples
/// ```
/// let program = volt::parse_source("let x = 1; print x;").unwrap();
/// assert_eq!(program.len(), 2);
///
/// let err = volt::parse_source("let = 1;").unwrap_err();
/// assert!(matches!(err, volt::Error::Parse(_)));
/// ```
pub fn parse_source(source: &str) -> Result<Vec<Stmt>, Error> {
    let tokens = tokenize(source);
    let (program, errors) = parse_program(&tokens);
    if errors.is_empty() {
        Ok(program)
    } else {
        Err(Error::Parse(errors))
    }
}

/// Parses and executes `source` with an existing interpreter.
///
/// Nothing runs if the source has a syntax error. Globals defined by the
/// program stay in `interpreter` afterwards.
///
/// # Errors
/// Returns [`Error::Parse`] if parsing fails, or [`Error::Runtime`] for the
/// first runtime error.
pub fn run_with(interpreter: &mut Interpreter, source: &str) -> Result<(), Error> {
    let program = parse_source(source)?;
    debug!(statements = program.len(), "running program");
    interpreter.execute(&program)?;
    Ok(())
}

/// Runs `source` in a fresh interpreter that prints to standard output.
///
/// # Errors
/// Returns an error if parsing or evaluation fails.
///
/// # Examples
/// ```
/// use volt::run;
///
/// assert!(run("let result = 2 + 2;").is_ok());
///
/// // 'x' is not defined.
/// assert!(run("let y = x + 1;").is_err());
/// ```
pub fn run(source: &str) -> Result<(), Error> {
    run_with(&mut Interpreter::new(), source)
}

/// Runs `source` in a fresh interpreter and returns what it printed.
///
/// # Errors
/// Returns an error if parsing or evaluation fails. Output printed before a
/// runtime error is discarded.
///
/// # Examples
/// ```
/// let out = volt::run_captured("print \"Count: \" + 42;").unwrap();
/// assert_eq!(out, "Count: 42\n");
/// ```
pub fn run_captured(source: &str) -> Result<String, Error> {
    let out = SharedOutput::new();
    run_with(&mut Interpreter::with_output(out.clone()), source)?;
    Ok(out.contents())
}
