//! Identifiers for cancellable effect tasks.

use std::fmt;
use std::sync::Arc;

use uuid::Uuid;

/// Identifies a group of in-flight tasks that can be cancelled together.
///
/// Several tasks may share an id; `Effect::cancel(id)` stops all of them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CancelId(Arc<str>);

impl CancelId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(Arc::from(id.into()))
    }

    /// A fresh id that collides with nothing else in the process.
    pub fn unique() -> Self {
        Self::new(Uuid::new_v4().to_string())
    }

    /// Derive a namespaced id, e.g. `sheet` → `sheet/presenting`.
    pub fn child(&self, suffix: &str) -> Self {
        Self::new(format!("{}/{}", self.0, suffix))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CancelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CancelId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for CancelId {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}
