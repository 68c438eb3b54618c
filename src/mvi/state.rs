//! Base trait for state in the MVI architecture.

/// Marker trait for state values.
///
/// States should be:
/// - Immutable (Clone to create new states)
/// - Self-contained (all data a view needs)
/// - Comparable (PartialEq for detecting changes)
pub trait State: Clone + PartialEq + Send + Sync + 'static {}

impl<T: State> State for Option<T> {}

impl State for () {}

impl State for String {}
