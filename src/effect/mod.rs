//! Effect algebra and interpreter.
//!
//! Reducers return an [`Effect`] describing follow-up work. The store hands
//! it to the interpreter once per dispatch:
//!
//! - `Run` / `FireAndForget` tasks are spawned on the tokio runtime
//! - `Batch` / `Merge` start every branch immediately
//! - `Cancel(id)` stops every live task registered under `id`
//! - `Map` rewrites a child effect's actions into the parent action type
//!
//! Task errors and panics are logged and treated as a completion that
//! produced no further actions.

mod algebra;
mod cancel;
mod interpreter;
mod sender;

pub use algebra::{Effect, EffectKind, FireTask, Mapped, RunTask, TaskError, TaskFuture};
pub use cancel::CancelId;
pub use sender::Sender;
pub use tokio_util::sync::CancellationToken;

pub(crate) use interpreter::Interpreter;
pub(crate) use sender::Sink;
