//! Reducer composition operators.
//!
//! - [`Scope`]: child state always present
//! - [`IfLet`]: child state optional, no-op while absent
//! - [`Combine`]: several reducers over one state, effects batched
//!
//! Each operator is itself a [`Reducer`](crate::mvi::Reducer), so they nest.

mod combine;
mod if_let;
mod scope;

pub use combine::{combine_reducers, BoxedReducer, Combine};
pub use if_let::IfLet;
pub use scope::Scope;
