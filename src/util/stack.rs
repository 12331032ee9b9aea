/// Bytes of stack that must remain before a new segment is allocated.
const RED_ZONE: usize = 100 * 1024;

/// Size of each newly allocated stack segment.
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Runs `f`, first moving to a fresh heap-allocated stack segment if less than
/// [`RED_ZONE`] bytes remain on the current one.
///
/// Wrapping the recursive entry points of the parser and the evaluator lets
/// deeply nested programs run without overflowing the thread's stack. How
/// deep a script may recurse is then bounded only by the interpreter's call
/// depth limit.
///
/// ## Example
/// ```
/// use volt::util::stack::ensure_sufficient_stack;
///
/// fn depth(n: u32) -> u32 {
///     ensure_sufficient_stack(|| if n == 0 { 0 } else { 1 + depth(n - 1) })
/// }
///
/// assert_eq!(depth(100_000), 100_000);
/// ```
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

/// Runs `f` directly; stack segments cannot be allocated on WebAssembly.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
