//! Model-View-Intent (MVI) architecture primitives.
//!
//! This module provides the base traits for unidirectional data flow.
//!
//! # Architecture
//!
//! ```text
//! Action ──→ Reducer ──→ State ──→ View
//!    ↑          │                    │
//!    │          └──→ Effect ──┐      │
//!    └────────────────────────┴──────┘
//! ```
//!
//! - **State**: Immutable representation of a feature
//! - **Action**: User input, system events, effect results
//! - **Reducer**: Pure function producing the next state and an [`Effect`](crate::effect::Effect)

mod action;
mod reducer;
mod state;

pub use action::Action;
pub use reducer::{reducer_fn, FnReducer, Reducer};
pub use state::State;
