//! Channel through which a running task feeds actions back into its store.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

/// Destination for actions produced by effects.
///
/// Receives the producing task's token so the store can drop the action if
/// the task is cancelled while the action waits for its turn to dispatch.
pub(crate) type Sink<A> = Arc<dyn Fn(A, &CancellationToken) + Send + Sync>;

/// Handle given to a [`Effect::run`](super::Effect::run) task.
///
/// Once the task's cancellation id has been cancelled (or the owning store
/// has shut down) every further `send` is dropped.
pub struct Sender<A> {
    sink: Sink<A>,
    token: CancellationToken,
}

impl<A> Clone for Sender<A> {
    fn clone(&self) -> Self {
        Self {
            sink: Arc::clone(&self.sink),
            token: self.token.clone(),
        }
    }
}

impl<A> Sender<A> {
    pub(crate) fn new(sink: Sink<A>, token: CancellationToken) -> Self {
        Self { sink, token }
    }

    /// Dispatch `action` into the store.
    ///
    /// Returns `false` if the task was cancelled and the action was dropped.
    pub fn send(&self, action: A) -> bool {
        if self.token.is_cancelled() {
            tracing::trace!(
                action = std::any::type_name::<A>(),
                "Dropped action from cancelled task"
            );
            return false;
        }
        (self.sink)(action, &self.token);
        true
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Resolves once the task has been cancelled.
    pub async fn cancelled(&self) {
        self.token.cancelled().await
    }
}
