//! A unidirectional state container with effects, composition operators,
//! and state-driven presentation.

pub mod compose;
pub mod config;
pub mod effect;
pub mod logging;
pub mod mvi;
pub mod presentation;
pub mod store;

pub use effect::{CancelId, Effect, Sender};
pub use mvi::{Action, Reducer, State};
pub use store::{Store, StoreError, Subscription};
