/// Lexical scopes.
///
/// An `Environment` maps names to values and links to the scope that
/// encloses it. Closures keep their defining scope alive through that link.
pub mod environment;
/// The evaluator module executes AST nodes and computes results.
///
/// The evaluator walks the tree, evaluates expressions, executes statements
/// and manages the scope chain. It is the core execution engine of the
/// interpreter.
///
/// # Responsibilities
/// - Evaluates every expression and statement kind.
/// - Propagates `return`, `break` and `continue` as explicit flow signals.
/// - Reports runtime errors such as type mismatches or division by zero.
pub mod evaluator;
/// The lexer module tokenizes source code for further parsing.
///
/// The lexer (tokenizer) reads the raw source text and produces a stream of
/// tokens, each corresponding to meaningful language elements such as numbers,
/// identifiers, operators, delimiters, and keywords. This is the first stage of
/// interpretation.
///
/// # Responsibilities
/// - Converts the input character stream into tokens with type and source
///   location.
/// - Handles numeric and string literals, identifiers, keywords and
///   operators.
/// - Emits error tokens for unknown characters and unterminated strings.
pub mod lexer;
/// The parser module builds the abstract syntax tree (AST) from tokens.
///
/// The parser processes the token stream produced by the lexer and constructs
/// an AST that represents the syntactic structure of expressions and
/// statements. This enables later phases to analyze and execute user code.
///
/// # Responsibilities
/// - Converts tokens into structured AST nodes (expressions, statements).
/// - Collects every syntax error with its location and resynchronizes at
///   statement boundaries.
pub mod parser;
/// The value module defines the runtime data types for evaluation.
///
/// This module declares the closed set of runtime values: nil, booleans,
/// numbers, strings, arrays, hash maps and callables. Arrays and hash maps
/// are shared by reference, so mutation through one alias is visible through
/// every other.
pub mod value;
