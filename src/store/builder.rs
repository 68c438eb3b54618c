//! Fail-fast construction of a [`Store`].

use tokio::runtime::Handle;

use super::error::StoreError;
use super::runtime::Store;
use crate::mvi::Reducer;

/// Collects the parts of a store and validates them in [`StoreBuilder::build`].
pub struct StoreBuilder<R: Reducer> {
    reducer: Option<R>,
    initial_state: Option<R::State>,
    dependencies: Option<R::Dependencies>,
    runtime: Option<Handle>,
}

impl<R: Reducer> Default for StoreBuilder<R> {
    fn default() -> Self {
        Self {
            reducer: None,
            initial_state: None,
            dependencies: None,
            runtime: None,
        }
    }
}

impl<R: Reducer> StoreBuilder<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reducer(mut self, reducer: R) -> Self {
        self.reducer = Some(reducer);
        self
    }

    pub fn initial_state(mut self, state: R::State) -> Self {
        self.initial_state = Some(state);
        self
    }

    pub fn dependencies(mut self, dependencies: R::Dependencies) -> Self {
        self.dependencies = Some(dependencies);
        self
    }

    /// Run effects on `runtime` instead of the runtime current at build time.
    pub fn runtime(mut self, runtime: Handle) -> Self {
        self.runtime = Some(runtime);
        self
    }

    /// Validate the configuration and create the store.
    ///
    /// Fails before any dispatch if a part is missing or no runtime is available.
    pub fn build(self) -> Result<Store<R>, StoreError> {
        let reducer = self.reducer.ok_or(StoreError::MissingReducer)?;
        let initial_state = self.initial_state.ok_or(StoreError::MissingInitialState)?;
        let dependencies = self.dependencies.ok_or(StoreError::MissingDependencies)?;
        let runtime = match self.runtime {
            Some(runtime) => runtime,
            None => Handle::try_current().map_err(|_| StoreError::NoRuntime)?,
        };
        Ok(Store::from_parts(reducer, initial_state, dependencies, runtime))
    }
}
