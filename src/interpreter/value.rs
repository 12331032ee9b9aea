/// Array storage.
///
/// Defines `ArrayValue`, the shared, interior-mutable element vector behind
/// `Value::Array`.
pub mod array;
/// Callable values.
///
/// Native functions registered by the host and user closures that capture
/// their defining environment.
pub mod callable;
/// The `Value` enum.
///
/// Truthiness, equality, type names and display formatting for every runtime
/// value.
pub mod core;
/// Hash map storage.
///
/// Defines `HashMapValue` and the canonical string form used for keys.
pub mod hash_map;
