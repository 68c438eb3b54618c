use std::path::PathBuf;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingConfig;

/// Env var naming the log file. Takes precedence over `[logging] file`.
pub const LOG_ENV: &str = "NAVISTORE_LOG";

/// Initialize tracing with optional file output.
///
/// Logging is disabled unless `NAVISTORE_LOG` or `[logging] file` names a
/// path, so hosts that own stdout are never written to.
///
/// Log files are created with unique names to prevent conflicts when
/// multiple instances run simultaneously: `{path}.{timestamp}.{pid}`
pub fn init_tracing(config: &LoggingConfig) {
    let Some(log_path) = log_path(config) else {
        return;
    };

    let pid = std::process::id();
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let unique_path = format!("{}.{}.{}", log_path.display(), timestamp, pid);

    let Ok(file) = std::fs::File::create(&unique_path) else {
        eprintln!("Warning: Failed to create log file: {}", unique_path);
        return;
    };

    let file_layer = fmt::layer()
        .with_writer(file)
        .with_ansi(false)
        .with_target(true)
        .with_level(true);

    let installed = tracing_subscriber::registry()
        .with(env_filter(config))
        .with(file_layer)
        .try_init();
    if installed.is_err() {
        eprintln!("Warning: A tracing subscriber is already installed");
    }
}

fn log_path(config: &LoggingConfig) -> Option<PathBuf> {
    std::env::var_os(LOG_ENV)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .or_else(|| config.file.clone())
}

/// `RUST_LOG` when set, otherwise the configured directive.
fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.filter))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}
