//! Embed an always-present child reducer in a parent.

use std::sync::Arc;

use crate::effect::Effect;
use crate::mvi::{Action, Reducer, State};

pub(crate) type Get<P, C> = Box<dyn Fn(&P) -> C + Send + Sync>;
pub(crate) type Set<P, C> = Box<dyn Fn(&mut P, C) + Send + Sync>;
pub(crate) type Extract<PA, CA> = Box<dyn Fn(&PA) -> Option<CA> + Send + Sync>;
pub(crate) type Embed<PA, CA> = Arc<dyn Fn(CA) -> PA + Send + Sync>;

/// Runs `child` on the part of the parent state it owns.
///
/// Parent actions that `extract` does not recognise are no-ops. Child
/// effects are mapped through `embed`, so the child never learns the parent
/// action type.
pub struct Scope<P, PA, R: Reducer> {
    get: Get<P, R::State>,
    set: Set<P, R::State>,
    extract: Extract<PA, R::Action>,
    embed: Embed<PA, R::Action>,
    child: R,
}

impl<P, PA, R> Scope<P, PA, R>
where
    P: State,
    PA: Action,
    R: Reducer,
{
    pub fn new(
        get: impl Fn(&P) -> R::State + Send + Sync + 'static,
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

impl<P, PA, R> Reducer for Scope<P, PA, R>
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

        let (child, effect) = self
            .child
            .reduce((self.get)(&state), child_action, dependencies);
        (self.set)(&mut state, child);

        let embed = Arc::clone(&self.embed);
        (state, effect.map(move |action| embed(action)))
    }
}
