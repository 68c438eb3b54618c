//! Reducer trait for the MVI architecture.

use std::marker::PhantomData;
use std::sync::Arc;

use super::action::Action;
use super::state::State;
use crate::effect::Effect;

/// Reducer transforms state based on actions.
///
/// The reducer is the only place where state transitions happen.
/// It must be a pure function: `(State, Action, Dependencies) -> (State, Effect)`.
/// Side effects are described by the returned [`Effect`] and executed by the
/// store, never performed inline.
pub trait Reducer: Send + Sync + 'static {
    /// The state type this reducer operates on.
    type State: State;

    /// The action type this reducer handles.
    type Action: Action;

    /// Injected capabilities passed unchanged through every call.
    type Dependencies: Send + Sync + 'static;

    /// Process an action and return the new state plus the work to run next.
    ///
    /// Given equal inputs this must return equal outputs. It must not block,
    /// perform I/O, or mutate `dependencies`.
    fn reduce(
        &self,
        state: Self::State,
        action: Self::Action,
        dependencies: &Self::Dependencies,
    ) -> (Self::State, Effect<Self::Action>);
}

impl<R: Reducer> Reducer for Arc<R> {
    type State = R::State;
    type Action = R::Action;
    type Dependencies = R::Dependencies;

    fn reduce(
        &self,
        state: Self::State,
        action: Self::Action,
        dependencies: &Self::Dependencies,
    ) -> (Self::State, Effect<Self::Action>) {
        (**self).reduce(state, action, dependencies)
    }
}

/// A reducer backed by a plain function or closure.
///
/// Built with [`reducer_fn`].
pub struct FnReducer<S, A, D, F> {
    reduce: F,
    _marker: PhantomData<fn(S, A, &D) -> S>,
}

/// Wrap a function `(state, action, dependencies) -> (state, effect)` as a [`Reducer`].
pub fn reducer_fn<S, A, D, F>(reduce: F) -> FnReducer<S, A, D, F>
where
    S: State,
    A: Action,
    D: Send + Sync + 'static,
    F: Fn(S, A, &D) -> (S, Effect<A>) + Send + Sync + 'static,
{
    FnReducer {
        reduce,
        _marker: PhantomData,
    }
}

impl<S, A, D, F> Reducer for FnReducer<S, A, D, F>
where
    S: State,
    A: Action,
    D: Send + Sync + 'static,
    F: Fn(S, A, &D) -> (S, Effect<A>) + Send + Sync + 'static,
{
    type State = S;
    type Action = A;
    type Dependencies = D;

    fn reduce(&self, state: S, action: A, dependencies: &D) -> (S, Effect<A>) {
        (self.reduce)(state, action, dependencies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone)]
    enum CounterAction {
        Increment,
        Decrement,
    }

    impl Action for CounterAction {}

    fn counter() -> impl Reducer<State = i64, Action = CounterAction, Dependencies = i64> {
        reducer_fn(|state: i64, action: CounterAction, step: &i64| match action {
            CounterAction::Increment => (state + step, Effect::none()),
            CounterAction::Decrement => (state - step, Effect::none()),
        })
    }

    impl State for i64 {}

    #[test]
    fn fn_reducer_applies_closure() {
        let reducer = counter();
        let (state, effect) = reducer.reduce(1, CounterAction::Increment, &5);
        assert_eq!(state, 6);
        assert!(effect.is_none());

        let (state, _) = reducer.reduce(state, CounterAction::Decrement, &2);
        assert_eq!(state, 4);
    }

    #[test]
    fn arc_reducer_delegates() {
        let reducer = Arc::new(counter());
        let (state, _) = reducer.reduce(0, CounterAction::Increment, &3);
        assert_eq!(state, 3);
    }
}
