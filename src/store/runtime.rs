//! The store: single owner of a state value and its dispatch loop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::thread::{self, ThreadId};

use parking_lot::{Mutex, RwLock};
use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;

use super::builder::StoreBuilder;
use super::error::StoreError;
use super::subscription::Subscription;
use crate::effect::{Interpreter, Sink};
use crate::mvi::Reducer;

type Listener<S> = Arc<dyn Fn(&S) + Send + Sync>;

struct Listeners<S> {
    next_key: u64,
    entries: Vec<(u64, Listener<S>)>,
}

impl<S> Listeners<S> {
    fn insert(&mut self, listener: Listener<S>) -> u64 {
        let key = self.next_key;
        self.next_key += 1;
        self.entries.push((key, listener));
        key
    }

    fn remove(&mut self, key: u64) {
        self.entries.retain(|(k, _)| *k != key);
    }

    fn snapshot(&self) -> Vec<Listener<S>> {
        self.entries.iter().map(|(_, l)| Arc::clone(l)).collect()
    }
}

struct StoreInner<R: Reducer> {
    reducer: R,
    dependencies: R::Dependencies,
    state: RwLock<R::State>,
    /// Serializes dispatches coming from the caller and from effect tasks.
    dispatch_lock: Mutex<()>,
    /// Thread currently inside `dispatch`, used to reject re-entrant calls.
    dispatching_on: Mutex<Option<ThreadId>>,
    listeners: Mutex<Listeners<R::State>>,
    interpreter: Interpreter,
    shut_down: AtomicBool,
}

/// Owns one state value, runs the reducer, and executes the resulting effects.
///
/// `Store` is a cheap handle; clones share the same state. Any number of
/// independent stores may exist. Dropping the last handle cancels every
/// task the store started.
pub struct Store<R: Reducer> {
    inner: Arc<StoreInner<R>>,
}

impl<R: Reducer> Clone for Store<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<R: Reducer> Store<R> {
    /// Create a store on the current tokio runtime.
    pub fn new(
        reducer: R,
        initial_state: R::State,
        dependencies: R::Dependencies,
    ) -> Result<Self, StoreError> {
        StoreBuilder::new()
            .reducer(reducer)
            .initial_state(initial_state)
            .dependencies(dependencies)
            .build()
    }

    pub fn builder() -> StoreBuilder<R> {
        StoreBuilder::new()
    }

    pub(crate) fn from_parts(
        reducer: R,
        initial_state: R::State,
        dependencies: R::Dependencies,
        runtime: Handle,
    ) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                reducer,
                dependencies,
                state: RwLock::new(initial_state),
                dispatch_lock: Mutex::new(()),
                dispatching_on: Mutex::new(None),
                listeners: Mutex::new(Listeners {
                    next_key: 0,
                    entries: Vec::new(),
                }),
                interpreter: Interpreter::new(runtime),
                shut_down: AtomicBool::new(false),
            }),
        }
    }

    /// Run the reducer for `action` and commit the result.
    ///
    /// The new state is committed, and listeners notified, before this
    /// returns. The returned effect is then handed to the interpreter; its
    /// tasks run asynchronously and feed actions back through this method.
    ///
    /// Calling `dispatch` from inside a listener on the same thread is
    /// rejected with [`StoreError::ReentrantDispatch`].
    pub fn dispatch(&self, action: R::Action) -> Result<(), StoreError> {
        self.dispatch_from(action, None)
    }

    /// Shared by callers and effect tasks. `origin` is the token of the task
    /// that sent the action, if any.
    fn dispatch_from(
        &self,
        action: R::Action,
        origin: Option<&CancellationToken>,
    ) -> Result<(), StoreError> {
        let inner = &*self.inner;
        let action_type = std::any::type_name::<R::Action>();

        if inner.shut_down.load(Ordering::SeqCst) {
            return Err(StoreError::ShutDown);
        }

        let current = thread::current().id();
        if *inner.dispatching_on.lock() == Some(current) {
            tracing::error!(action = action_type, "Re-entrant dispatch rejected");
            return Err(StoreError::ReentrantDispatch);
        }

        let _serial = inner.dispatch_lock.lock();
        if inner.shut_down.load(Ordering::SeqCst) {
            return Err(StoreError::ShutDown);
        }
        // A Cancel processed while this action waited for the lock wins.
        if origin.is_some_and(CancellationToken::is_cancelled) {
            tracing::trace!(action = action_type, "Dropped action from cancelled task");
            return Ok(());
        }

        *inner.dispatching_on.lock() = Some(current);
        let _owner = scopeguard::guard((), |_| {
            *inner.dispatching_on.lock() = None;
        });

        let previous = inner.state.read().clone();
        let (next, effect) = inner
            .reducer
            .reduce(previous, action, &inner.dependencies);

        let changed = *inner.state.read() != next;
        if changed {
            *inner.state.write() = next;
            self.notify();
        }
        tracing::trace!(action = action_type, changed, effect = ?effect.kind(), "Dispatched");

        inner.interpreter.execute(effect, self.sink());
        Ok(())
    }

    fn notify(&self) {
        let listeners = self.inner.listeners.lock().snapshot();
        if listeners.is_empty() {
            return;
        }
        // Writers only run under `dispatch_lock`, which the caller holds, so
        // listeners may take further read locks through `state()`.
        let state = self.inner.state.read();
        for listener in &listeners {
            listener(&state);
        }
    }

    /// Entry point for actions produced by effect tasks.
    fn sink(&self) -> Sink<R::Action> {
        let weak: Weak<StoreInner<R>> = Arc::downgrade(&self.inner);
        Arc::new(move |action, origin: &CancellationToken| {
            let Some(inner) = weak.upgrade() else {
                tracing::trace!("Store dropped, effect action discarded");
                return;
            };
            if let Err(err) = (Store { inner }).dispatch_from(action, Some(origin)) {
                tracing::debug!(error = %err, "Effect action not dispatched");
            }
        })
    }

    /// Register `listener`, called after every committed state change.
    ///
    /// The listener stays registered until the returned [`Subscription`] is
    /// dropped or [`Subscription::unsubscribe`] is called.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&R::State) + Send + Sync + 'static,
    {
        let key = self.inner.listeners.lock().insert(Arc::new(listener));
        let weak = Arc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.listeners.lock().remove(key);
            }
        })
    }

    /// Clone of the current state.
    pub fn state(&self) -> R::State {
        self.inner.state.read().clone()
    }

    /// Read the current state without cloning it.
    pub fn with_state<T>(&self, read: impl FnOnce(&R::State) -> T) -> T {
        read(&self.inner.state.read())
    }

    pub fn dependencies(&self) -> &R::Dependencies {
        &self.inner.dependencies
    }

    /// Number of effect tasks started by this store that have not finished.
    pub fn live_tasks(&self) -> usize {
        self.inner.interpreter.live_tasks()
    }

    /// Cancel every live task and reject further dispatches.
    pub fn shutdown(&self) {
        if !self.inner.shut_down.swap(true, Ordering::SeqCst) {
            tracing::debug!("Store shutting down");
            self.inner.interpreter.shutdown();
        }
    }

    pub fn is_shut_down(&self) -> bool {
        self.inner.shut_down.load(Ordering::SeqCst)
    }
}
