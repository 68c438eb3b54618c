//! Shared test utilities: small features and virtual-clock helpers.

#![allow(dead_code, unused_imports)]

use std::sync::Arc;
use std::time::Duration;

use navistore::mvi::reducer_fn;
use navistore::{Action, Effect, Reducer, State, Store, Subscription};
use parking_lot::Mutex;

/// Let spawned tasks run until they block (on a timer, usually).
///
/// Must be called before `tokio::time::advance` so that timers created by
/// freshly spawned tasks exist when the clock moves.
pub async fn settle() {
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
}

/// Advance the paused clock by `ms`, letting tasks run on both sides.
pub async fn advance(ms: u64) {
    settle().await;
    tokio::time::advance(Duration::from_millis(ms)).await;
    settle().await;
}

/// Collects every state a store commits.
pub struct Recorder<S> {
    seen: Arc<Mutex<Vec<S>>>,
    _subscription: Subscription,
}

impl<S: State> Recorder<S> {
    pub fn attach<R: Reducer<State = S>>(store: &Store<R>) -> Self {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let subscription = store.subscribe(move |state: &S| sink.lock().push(state.clone()));
        Self {
            seen,
            _subscription: subscription,
        }
    }

    pub fn states(&self) -> Vec<S> {
        self.seen.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.seen.lock().len()
    }
}

// ---------------------------------------------------------------------------
// Counter feature
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Counter(pub i64);

impl State for Counter {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CounterAction {
    Increment,
    Decrement,
    Set(i64),
    /// Asks an effect to set the counter to 42.
    Reload,
}

impl Action for CounterAction {}

pub struct CounterReducer;

impl Reducer for CounterReducer {
    type State = Counter;
    type Action = CounterAction;
    type Dependencies = ();

    fn reduce(&self, state: Counter, action: CounterAction, _: &()) -> (Counter, Effect<CounterAction>) {
        match action {
            CounterAction::Increment => (Counter(state.0 + 1), Effect::none()),
            CounterAction::Decrement => (Counter(state.0 - 1), Effect::none()),
            CounterAction::Set(value) => (Counter(value), Effect::none()),
            CounterAction::Reload => (state, Effect::action(CounterAction::Set(42))),
        }
    }
}

pub fn counter_store() -> Store<CounterReducer> {
    Store::new(CounterReducer, Counter::default(), ()).expect("store")
}

// ---------------------------------------------------------------------------
// Log feature: records actions produced by scripted effects
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Log(pub Vec<String>);

impl State for Log {}

impl Log {
    pub fn entries(&self) -> Vec<&str> {
        self.0.iter().map(String::as_str).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogAction {
    /// Run the effect the script returns for this name.
    Start(&'static str),
    Record(String),
}

impl Action for LogAction {}

pub fn record(entry: &str) -> LogAction {
    LogAction::Record(entry.to_string())
}

/// A reducer that appends `Record` entries and answers `Start(name)` with `script(name)`.
pub fn scripted<F>(script: F) -> impl Reducer<State = Log, Action = LogAction, Dependencies = ()>
where
    F: Fn(&'static str) -> Effect<LogAction> + Send + Sync + 'static,
{
    reducer_fn(move |mut log: Log, action: LogAction, _: &()| match action {
        LogAction::Start(name) => (log, script(name)),
        LogAction::Record(entry) => {
            log.0.push(entry);
            (log, Effect::none())
        }
    })
}

/// Record `entry` after `ms` of virtual time.
pub fn delayed(ms: u64, entry: &str) -> Effect<LogAction> {
    Effect::after_delay(Duration::from_millis(ms), record(entry))
}
