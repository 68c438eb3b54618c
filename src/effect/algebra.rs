//! The `Effect` description type and its constructors.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use super::cancel::CancelId;
use super::interpreter::Interpreter;
use super::sender::{Sender, Sink};

/// Error a task may fail with. Logged by the interpreter, never propagated.
pub type TaskError = anyhow::Error;

/// Future returned by an effect task.
pub type TaskFuture = Pin<Box<dyn Future<Output = Result<(), TaskError>> + Send + 'static>>;

type RunWork<A> = Box<dyn FnOnce(Sender<A>, CancellationToken) -> TaskFuture + Send>;
type FireWork = Box<dyn FnOnce(CancellationToken) -> TaskFuture + Send>;

/// Inert description of work to perform after a state transition.
///
/// Building an `Effect` does nothing. Only a [`Store`](crate::store::Store)
/// executes one, exactly once, after the reducer that returned it.
#[must_use = "an effect does nothing unless returned to a store"]
pub enum Effect<A> {
    /// No work.
    None,
    /// A task that may send any number of actions back.
    Run(RunTask<A>),
    /// A task whose outcome never feeds back into the store.
    FireAndForget(FireTask),
    /// Sub-effects that all start immediately and independently.
    Batch(Vec<Effect<A>>),
    /// Like `Batch`, for callers that do not care about action order.
    Merge(Vec<Effect<A>>),
    /// Cancel every live task registered under the id.
    Cancel(CancelId),
    /// A child effect whose actions are transformed into this action type.
    Map(Mapped<A>),
}

/// Payload of [`Effect::Run`].
pub struct RunTask<A> {
    id: Option<CancelId>,
    work: RunWork<A>,
}

impl<A> RunTask<A> {
    pub fn id(&self) -> Option<&CancelId> {
        self.id.as_ref()
    }

    pub(crate) fn into_parts(self) -> (Option<CancelId>, RunWork<A>) {
        (self.id, self.work)
    }
}

/// Payload of [`Effect::FireAndForget`].
pub struct FireTask {
    id: Option<CancelId>,
    work: FireWork,
}

impl FireTask {
    pub fn id(&self) -> Option<&CancelId> {
        self.id.as_ref()
    }

    pub(crate) fn into_parts(self) -> (Option<CancelId>, FireWork) {
        (self.id, self.work)
    }
}

/// Payload of [`Effect::Map`]: a child effect of some other action type.
pub struct Mapped<A>(Box<dyn ErasedMap<A>>);

impl<A> Mapped<A> {
    pub(crate) fn execute(self, interpreter: &Interpreter, sink: Sink<A>) {
        self.0.execute(interpreter, sink)
    }
}

trait ErasedMap<A>: Send {
    fn execute(self: Box<Self>, interpreter: &Interpreter, sink: Sink<A>);
    fn tag(self: Box<Self>, id: &CancelId) -> Box<dyn ErasedMap<A>>;
    fn kind(&self) -> EffectKind;
}

struct MapEffect<B, A> {
    inner: Effect<B>,
    transform: Arc<dyn Fn(B) -> A + Send + Sync>,
}

impl<B: Send + 'static, A: Send + 'static> ErasedMap<A> for MapEffect<B, A> {
    fn execute(self: Box<Self>, interpreter: &Interpreter, sink: Sink<A>) {
        let MapEffect { inner, transform } = *self;
        interpreter.execute(
            inner,
            Arc::new(move |action, token: &CancellationToken| sink(transform(action), token)),
        );
    }

    fn tag(self: Box<Self>, id: &CancelId) -> Box<dyn ErasedMap<A>> {
        let MapEffect { inner, transform } = *self;
        Box::new(MapEffect {
            inner: inner.cancellable(id.clone()),
            transform,
        })
    }

    fn kind(&self) -> EffectKind {
        EffectKind::Map(Box::new(self.inner.kind()))
    }
}

/// Structural summary of an effect, for assertions and logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EffectKind {
    None,
    Run { id: Option<CancelId> },
    FireAndForget { id: Option<CancelId> },
    Batch(Vec<EffectKind>),
    Merge(Vec<EffectKind>),
    Cancel(CancelId),
    Map(Box<EffectKind>),
}

impl<A> Effect<A> {
    /// No work. Usable in `const` position.
    pub const NONE: Self = Effect::None;

    pub fn none() -> Self {
        Effect::None
    }

    pub fn cancel(id: impl Into<CancelId>) -> Self {
        Effect::Cancel(id.into())
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Effect::None)
    }

    pub fn kind(&self) -> EffectKind {
        match self {
            Effect::None => EffectKind::None,
            Effect::Run(task) => EffectKind::Run {
                id: task.id.clone(),
            },
            Effect::FireAndForget(task) => EffectKind::FireAndForget {
                id: task.id.clone(),
            },
            Effect::Batch(effects) => EffectKind::Batch(effects.iter().map(Effect::kind).collect()),
            Effect::Merge(effects) => EffectKind::Merge(effects.iter().map(Effect::kind).collect()),
            Effect::Cancel(id) => EffectKind::Cancel(id.clone()),
            Effect::Map(mapped) => mapped.0.kind(),
        }
    }

    /// Concurrent composition. `None` entries are dropped; an empty batch is `None`.
    pub fn batch(effects: impl IntoIterator<Item = Effect<A>>) -> Self {
        let effects: Vec<_> = effects.into_iter().filter(|e| !e.is_none()).collect();
        if effects.is_empty() {
            Effect::None
        } else {
            Effect::Batch(effects)
        }
    }

    /// Concurrent composition where the caller does not depend on action order.
    ///
    /// Executes exactly like [`Effect::batch`] today.
    pub fn merge(effects: impl IntoIterator<Item = Effect<A>>) -> Self {
        let effects: Vec<_> = effects.into_iter().filter(|e| !e.is_none()).collect();
        if effects.is_empty() {
            Effect::None
        } else {
            Effect::Merge(effects)
        }
    }

    /// Register every task in this effect under `id`.
    ///
    /// An id set here replaces any id the tasks were already tagged with.
    pub fn cancellable(self, id: impl Into<CancelId>) -> Self {
        let id = id.into();
        match self {
            Effect::Run(task) => Effect::Run(RunTask {
                id: Some(id),
                work: task.work,
            }),
            Effect::FireAndForget(task) => Effect::FireAndForget(FireTask {
                id: Some(id),
                work: task.work,
            }),
            Effect::Batch(effects) => Effect::Batch(
                effects
                    .into_iter()
                    .map(|e| e.cancellable(id.clone()))
                    .collect(),
            ),
            Effect::Merge(effects) => Effect::Merge(
                effects
                    .into_iter()
                    .map(|e| e.cancellable(id.clone()))
                    .collect(),
            ),
            Effect::Map(mapped) => Effect::Map(Mapped(mapped.0.tag(&id))),
            other @ (Effect::None | Effect::Cancel(_)) => other,
        }
    }

    /// Like [`Effect::cancellable`], but first cancels tasks already live under `id`.
    pub fn cancellable_in_flight(self, id: impl Into<CancelId>) -> Self {
        let id = id.into();
        if self.is_none() {
            return Effect::None;
        }
        Effect::Batch(vec![Effect::Cancel(id.clone()), self.cancellable(id)])
    }
}

impl<A: Send + 'static> Effect<A> {
    /// A task that receives a [`Sender`] and a cancellation token.
    ///
    /// ```
    /// use navistore::effect::Effect;
    ///
    /// let effect: Effect<u32> = Effect::run(|send, _token| async move {
    ///     send.send(42);
    ///     Ok(())
    /// });
    /// assert!(!effect.is_none());
    /// ```
    pub fn run<F, Fut>(task: F) -> Self
    where
        F: FnOnce(Sender<A>, CancellationToken) -> Fut + Send + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        Effect::Run(RunTask {
            id: None,
            work: Box::new(move |sender, token| Box::pin(task(sender, token))),
        })
    }

    /// A task that produces no actions.
    pub fn fire_and_forget<F, Fut>(task: F) -> Self
    where
        F: FnOnce(CancellationToken) -> Fut + Send + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        Effect::FireAndForget(FireTask {
            id: None,
            work: Box::new(move |token| Box::pin(task(token))),
        })
    }

    /// Dispatch `action` from a task, after the current dispatch has returned.
    pub fn action(action: A) -> Self {
        Effect::run(move |send, _| async move {
            send.send(action);
            Ok(())
        })
    }

    /// Await `future` and dispatch its output mapped through `to_action`.
    pub fn future<T, Fut, F>(future: Fut, to_action: F) -> Self
    where
        Fut: Future<Output = T> + Send + 'static,
        T: Send + 'static,
        F: FnOnce(T) -> A + Send + 'static,
    {
        Effect::run(move |send, token| async move {
            tokio::select! {
                _ = token.cancelled() => {}
                output = future => {
                    send.send(to_action(output));
                }
            }
            Ok(())
        })
    }

    /// Dispatch `action` once `delay` has elapsed, unless cancelled first.
    pub fn after_delay(delay: Duration, action: A) -> Self {
        Effect::run(move |send, token| async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = tokio::time::sleep(delay) => {
                    send.send(action);
                }
            }
            Ok(())
        })
    }

    /// Lift this effect into another action space.
    ///
    /// Every action the effect produces is passed through `transform`.
    pub fn map<B, F>(self, transform: F) -> Effect<B>
    where
        B: Send + 'static,
        F: Fn(A) -> B + Send + Sync + 'static,
    {
        match self {
            Effect::None => Effect::None,
            Effect::Cancel(id) => Effect::Cancel(id),
            inner => Effect::Map(Mapped(Box::new(MapEffect {
                inner,
                transform: Arc::new(transform),
            }))),
        }
    }
}

impl<A> Default for Effect<A> {
    fn default() -> Self {
        Effect::None
    }
}

impl<A> fmt::Debug for Effect<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.kind(), f)
    }
}
