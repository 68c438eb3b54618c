//! Embed an optional child reducer, active only while its state is present.

use std::sync::Arc;

use super::scope::{Embed, Extract, Set};
use crate::effect::Effect;
use crate::mvi::{Action, Reducer, State};

type GetOptional<P, C> = Box<dyn Fn(&P) -> Option<C> + Send + Sync>;

/// Like [`Scope`](super::Scope), for a child that may be absent.
///
/// - Child absent: every routed action is a no-op, so actions that arrive
///   after dismissal are harmless.
/// - Dismiss actions ([`Action::is_dismiss`]) are never forwarded and the
///   field is left untouched. The parent observes the dismiss and clears
///   the field itself.
pub struct IfLet<P, PA, R: Reducer> {
    get: GetOptional<P, R::State>,
    set: Set<P, R::State>,
    extract: Extract<PA, R::Action>,
    embed: Embed<PA, R::Action>,
    child: R,
}

impl<P, PA, R> IfLet<P, PA, R>
where
    P: State,
    PA: Action,
    R: Reducer,
{
    /// `set` only ever receives a present child; this operator never clears.
    pub fn new(
        get: impl Fn(&P) -> Option<R::State> + Send + Sync + 'static,
        set: impl Fn(&mut P, R::State) + Send + Sync + 'static,
        extract: impl Fn(&PA) -> Option<R::Action> + Send + Sync + 'static,
        embed: impl Fn(R::Action) -> PA + Send + Sync + 'static,
        child: R,
    ) -> Self {
        Self {
            get: Box::new(get),
            set: Box::new(set),
            extract: Box::new(extract),
            embed: Arc::new(embed),
            child,
        }
    }
}

impl<P, PA, R> Reducer for IfLet<P, PA, R>
where
    P: State,
    PA: Action,
    R: Reducer,
{
    type State = P;
    type Action = PA;
    type Dependencies = R::Dependencies;

    fn reduce(&self, mut state: P, action: PA, dependencies: &R::Dependencies) -> (P, Effect<PA>) {
        let Some(child_action) = (self.extract)(&action) else {
            return (state, Effect::none());
        };

        let Some(child) = (self.get)(&state) else {
            tracing::trace!(
                action = std::any::type_name::<R::Action>(),
                "Child absent, action ignored"
            );
            return (state, Effect::none());
        };

        if child_action.is_dismiss() {
            return (state, Effect::none());
        }

        let (child, effect) = self.child.reduce(child, child_action, dependencies);
        (self.set)(&mut state, child);

        let embed = Arc::clone(&self.embed);
        (state, effect.map(move |action| embed(action)))
    }
}
