//! Base trait for actions in the MVI architecture.

/// Marker trait for action values.
///
/// Actions represent:
/// - User input (key presses, clicks)
/// - System events (timers, network callbacks)
/// - Results fed back by effects
///
/// Actions are processed by reducers to produce new states.
pub trait Action: Send + 'static {
    /// True if this action asks for the enclosing optional feature to be removed.
    ///
    /// [`IfLet`](crate::compose::IfLet) never forwards such an action to the
    /// child reducer. Only presentation-aware actions override this.
    fn is_dismiss(&self) -> bool {
        false
    }
}

impl Action for () {}
