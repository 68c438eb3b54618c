use thiserror::Error;

/// Errors reported by [`Store`](super::Store) construction and dispatch.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Store requires a reducer")]
    MissingReducer,

    #[error("Store requires an initial state")]
    MissingInitialState,

    #[error("Store requires dependencies")]
    MissingDependencies,

    #[error("Store must be created inside a tokio runtime or given a runtime handle")]
    NoRuntime,

    /// `dispatch` was called while this thread was already reducing or
    /// notifying listeners for the same store.
    #[error("Re-entrant dispatch is not allowed; feed results back through an effect")]
    ReentrantDispatch,

    #[error("Store has been shut down")]
    ShutDown,
}
