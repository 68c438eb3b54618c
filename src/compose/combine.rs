//! Run several reducers over the same state and action.

use crate::effect::Effect;
use crate::mvi::{Action, Reducer, State};

/// A type-erased reducer entry of a [`Combine`].
pub type BoxedReducer<S, A, D> = Box<dyn Reducer<State = S, Action = A, Dependencies = D>>;

/// Threads each action through every entry in declaration order.
///
/// Entry effects are collected into one `Batch`. Entries are independent;
/// an action reaches every entry whose extractor accepts it.
pub struct Combine<S, A, D> {
    entries: Vec<BoxedReducer<S, A, D>>,
}

impl<S, A, D> Default for Combine<S, A, D> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<S, A, D> Combine<S, A, D>
where
    S: State,
    A: Action + Clone,
    D: Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a reducer, typically a [`Scope`](super::Scope) or [`IfLet`](super::IfLet).
    pub fn with<R>(mut self, reducer: R) -> Self
    where
        R: Reducer<State = S, Action = A, Dependencies = D>,
    {
        self.entries.push(Box::new(reducer));
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Build a [`Combine`] from already boxed entries.
pub fn combine_reducers<S, A, D>(entries: Vec<BoxedReducer<S, A, D>>) -> Combine<S, A, D>
where
    S: State,
    A: Action + Clone,
    D: Send + Sync + 'static,
{
    Combine { entries }
}

impl<S, A, D> Reducer for Combine<S, A, D>
where
    S: State,
    A: Action + Clone,
    D: Send + Sync + 'static,
{
    type State = S;
    type Action = A;
    type Dependencies = D;

    fn reduce(&self, state: S, action: A, dependencies: &D) -> (S, Effect<A>) {
        let mut effects = Vec::with_capacity(self.entries.len());
        let state = self.entries.iter().fold(state, |state, entry| {
            let (state, effect) = entry.reduce(state, action.clone(), dependencies);
            effects.push(effect);
            state
        });
        (state, Effect::batch(effects))
    }
}
