//! Store and dispatch loop.
//!
//! # Contract
//!
//! - `dispatch(action)`: reduce and commit synchronously, then hand the effect
//!   to the interpreter
//! - `subscribe(listener)`: called after every committed change
//! - `state()` / `with_state()`: always the current value
//!
//! State changes only inside `dispatch`, one dispatch at a time. Effect tasks
//! never touch state; they send actions that re-enter `dispatch`.

mod builder;
mod error;
mod runtime;
mod subscription;

pub use builder::StoreBuilder;
pub use error::StoreError;
pub use runtime::Store;
pub use subscription::Subscription;
