use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::effect::CancelId;
use crate::presentation::{LifecycleConfig, DEFAULT_TIMEOUT_MULTIPLIER};

/// Root configuration container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct RuntimeConfig {
    #[serde(default)]
    pub presentation: PresentationConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Defaults for presentation lifecycles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresentationConfig {
    /// Enter animation duration in milliseconds (default: 300).
    #[serde(default = "default_duration_ms")]
    pub default_duration_ms: u64,
    /// Timeout fallback as a multiple of the animation duration (default: 2.5).
    #[serde(default = "default_timeout_multiplier")]
    pub timeout_multiplier: f64,
    /// Exit animation duration in milliseconds. Falls back to the enter duration.
    #[serde(default)]
    pub dismiss_duration_ms: Option<u64>,
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset (default: "info").
    #[serde(default = "default_log_filter")]
    pub filter: String,
    /// Log file. When unset, the `NAVISTORE_LOG` env var decides.
    #[serde(default)]
    pub file: Option<PathBuf>,
}

fn default_duration_ms() -> u64 {
    300
}

fn default_timeout_multiplier() -> f64 {
    DEFAULT_TIMEOUT_MULTIPLIER
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for PresentationConfig {
    fn default() -> Self {
        Self {
            default_duration_ms: default_duration_ms(),
            timeout_multiplier: default_timeout_multiplier(),
            dismiss_duration_ms: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            file: None,
        }
    }
}

impl PresentationConfig {
    pub fn default_duration(&self) -> Duration {
        Duration::from_millis(self.default_duration_ms)
    }

    /// Lifecycle settings for a lifecycle whose timers are namespaced by `id`.
    pub fn lifecycle(&self, id: impl Into<CancelId>) -> LifecycleConfig {
        let config = LifecycleConfig::new(id).with_timeout_multiplier(self.timeout_multiplier);
        match self.dismiss_duration_ms {
            Some(ms) => config.with_dismiss_duration(Duration::from_millis(ms)),
            None => config,
        }
    }
}
