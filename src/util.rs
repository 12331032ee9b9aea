/// Numeric helpers.
///
/// Number formatting for display, and checked conversions between `f64`
/// and `usize` for array indices, lengths and slice bounds. Conversions that
/// can fail return a `Result` carrying a located runtime error.
pub mod num;
/// Output sinks.
///
/// A cloneable in-memory writer for capturing what a program prints.
pub mod output;
/// Stack growth for deep recursion.
///
/// The parser and evaluator recurse once per nesting level of the program,
/// so both route their recursive entry points through
/// [`ensure_sufficient_stack`](stack::ensure_sufficient_stack).
pub mod stack;
