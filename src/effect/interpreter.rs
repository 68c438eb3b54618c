//! Executes effects on the tokio runtime and tracks cancellable tasks.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;

use super::algebra::{Effect, TaskFuture};
use super::cancel::CancelId;
use super::sender::{Sender, Sink};

/// Live tasks, keyed by cancellation id.
///
/// A cancelled task is removed immediately; a finished task removes itself.
#[derive(Default)]
struct TaskRegistry {
    next_key: u64,
    tagged: HashMap<CancelId, HashMap<u64, CancellationToken>>,
    untagged: HashSet<u64>,
}

impl TaskRegistry {
    fn register(&mut self, id: Option<&CancelId>, token: CancellationToken) -> u64 {
        let key = self.next_key;
        self.next_key += 1;
        match id {
            Some(id) => {
                self.tagged.entry(id.clone()).or_default().insert(key, token);
            }
            None => {
                self.untagged.insert(key);
            }
        }
        key
    }

    fn release(&mut self, key: u64, id: Option<&CancelId>) {
        match id {
            Some(id) => {
                if let Some(tasks) = self.tagged.get_mut(id) {
                    tasks.remove(&key);
                    if tasks.is_empty() {
                        self.tagged.remove(id);
                    }
                }
            }
            None => {
                self.untagged.remove(&key);
            }
        }
    }

    fn cancel(&mut self, id: &CancelId) -> usize {
        let Some(tasks) = self.tagged.remove(id) else {
            return 0;
        };
        for token in tasks.values() {
            token.cancel();
        }
        tasks.len()
    }

    fn len(&self) -> usize {
        self.untagged.len() + self.tagged.values().map(HashMap::len).sum::<usize>()
    }

    fn clear(&mut self) {
        self.tagged.clear();
        self.untagged.clear();
    }
}

/// Runs effects handed over by a store.
///
/// `Cancel` is applied synchronously at hand-off; tasks are spawned and run
/// concurrently. Every task token is a child of one root token so that a
/// store teardown stops all of them.
pub(crate) struct Interpreter {
    registry: Arc<Mutex<TaskRegistry>>,
    root: CancellationToken,
    runtime: Handle,
}

impl Interpreter {
    pub(crate) fn new(runtime: Handle) -> Self {
        Self {
            registry: Arc::new(Mutex::new(TaskRegistry::default())),
            root: CancellationToken::new(),
            runtime,
        }
    }

    pub(crate) fn execute<A: Send + 'static>(&self, effect: Effect<A>, sink: Sink<A>) {
        match effect {
            Effect::None => {}
            Effect::Cancel(id) => self.cancel(&id),
            Effect::Batch(effects) | Effect::Merge(effects) => {
                for effect in effects {
                    self.execute(effect, Arc::clone(&sink));
                }
            }
            Effect::Map(mapped) => mapped.execute(self, sink),
            Effect::Run(task) => {
                let (id, work) = task.into_parts();
                self.spawn(id, "run", move |token| {
                    work(Sender::new(sink, token.clone()), token)
                });
            }
            Effect::FireAndForget(task) => {
                let (id, work) = task.into_parts();
                self.spawn(id, "fire_and_forget", work);
            }
        }
    }

    fn cancel(&self, id: &CancelId) {
        let cancelled = self.registry.lock().cancel(id);
        tracing::debug!(id = %id, cancelled, "Cancelled effect tasks");
    }

    fn spawn<F>(&self, id: Option<CancelId>, kind: &'static str, start: F)
    where
        F: FnOnce(CancellationToken) -> TaskFuture + Send + 'static,
    {
        if self.root.is_cancelled() {
            tracing::trace!(kind, "Store shut down, effect task not started");
            return;
        }

        let token = self.root.child_token();
        let key = self.registry.lock().register(id.as_ref(), token.clone());

        let worker = self.runtime.spawn(async move {
            // Cancelled between hand-off and first poll: never start.
            if token.is_cancelled() {
                return Ok(());
            }
            start(token).await
        });

        let registry = Arc::clone(&self.registry);
        self.runtime.spawn(async move {
            match worker.await {
                Ok(Ok(())) => {}
                Ok(Err(err)) => {
                    tracing::warn!(kind, id = ?id, error = %err, "Effect task failed");
                }
                Err(err) if err.is_panic() => {
                    tracing::error!(kind, id = ?id, "Effect task panicked");
                }
                Err(_) => {
                    tracing::trace!(kind, id = ?id, "Effect task aborted");
                }
            }
            registry.lock().release(key, id.as_ref());
        });
    }

    pub(crate) fn live_tasks(&self) -> usize {
        self.registry.lock().len()
    }

    /// Cancel every live task and refuse to start new ones.
    pub(crate) fn shutdown(&self) {
        self.root.cancel();
        self.registry.lock().clear();
    }
}

impl Drop for Interpreter {
    fn drop(&mut self) {
        self.root.cancel();
    }
}
