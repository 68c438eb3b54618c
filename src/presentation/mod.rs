//! State-driven navigation and presentation.
//!
//! A parent shows a child by setting a destination field and hides it by
//! clearing the field; it never calls into a view imperatively.
//!
//! - [`PresentationAction`] / [`ActionEnvelope`]: what a presented child sends
//! - [`destination!`](crate::destination): generates a destination union and
//!   the reducer routing actions to its active case
//! - [`PresentationLifecycle`]: the animated show/hide state machine

mod action;
mod destination;
mod lifecycle;

pub use action::{ActionEnvelope, EnvelopeError, PresentationAction, RawEnvelope};
#[doc(hidden)]
pub use destination::absorb;
pub use destination::{Destination, DestinationAction};
pub use lifecycle::{
    fallback_delay, schedule_with_fallback, LifecycleAction, LifecycleConfig, PresentationLifecycle,
    PresentationState, PresentationStatus, DEFAULT_TIMEOUT_MULTIPLIER, MAX_TIMEOUT_MULTIPLIER,
    MIN_TIMEOUT_MULTIPLIER,
};
