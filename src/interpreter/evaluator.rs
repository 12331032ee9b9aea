/// Binary and logical operator evaluation.
///
/// Arithmetic, string concatenation with number coercion, comparisons,
/// equality, short-circuiting `&&`/`||` and compound assignment.
pub mod binary;

/// The built-in native library.
///
/// Installed into the global scope by every new interpreter and again on
/// reset.
pub mod builtin;

/// Core evaluation logic and interpreter state.
///
/// Contains the `Interpreter`, the `Flow` signal returned by statements, and
/// expression dispatch.
pub mod core;

/// Function calls.
///
/// Argument evaluation, arity checks, and invocation of natives and
/// closures.
pub mod function;

/// Indexing and member access on arrays and hash maps.
pub mod member;

/// Statement execution, blocks and loops.
pub mod statement;

/// Unary operators and the increment/decrement forms.
pub mod unary;
