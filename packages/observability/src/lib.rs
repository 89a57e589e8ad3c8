//! # Observability
//!
//! Structured logging for the WeRead autoreader.
//!
//! Binaries call [`init_with_config`] once at startup and use the standard
//! `tracing` macros everywhere else. Library crates never install a
//! subscriber.
//!
//! Every event is appended as one JSON object per line to
//! `~/.weread/logs/autoread.jsonl` (or [`LogConfig::log_path`]):
//!
//! - `tail -f ~/.weread/logs/autoread.jsonl | jq` for pretty JSON
//! - `lnav ~/.weread/logs/autoread.jsonl` for interactive exploration
//!
//! Fields whose names look like credentials (cookies, session keys, push
//! tokens) are replaced with `[REDACTED]` before they reach the file.
//!
//! ## Usage
//!
//! ```rust,ignore
//! observability::init_with_config(observability::LogConfig {
//!     service_name: "weread-autoread".into(),
//!     default_level: "debug".into(),
//!     also_stderr: true,
//!     ..Default::default()
//! })?;
//! tracing::info!("ready");
//! ```

mod file_sink;
mod json_layer;
mod redact;

use std::io;
use std::path::PathBuf;

pub use file_sink::{default_log_path, CentralLogWriter};
pub use json_layer::{JsonLayer, LogEntry};
pub use redact::{is_sensitive_key, REDACTED};

/// Configuration for the logging system.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Name of the service, included in every log line.
    pub service_name: String,

    /// Default level filter (e.g. "debug", "info", "warn").
    /// Overridden by `RUST_LOG` when set.
    pub default_level: String,

    /// Custom log file path. Defaults to `~/.weread/logs/autoread.jsonl`.
    pub log_path: Option<PathBuf>,

    /// Also emit human-readable logs to stderr.
    pub also_stderr: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            service_name: "weread-autoread".into(),
            default_level: "info".into(),
            log_path: None,
            also_stderr: true,
        }
    }
}

/// Initialize logging and return the path of the JSONL file in use.
///
/// Fails if the log file cannot be opened or a global subscriber is already
/// installed.
pub fn init_with_config(config: LogConfig) -> io::Result<PathBuf> {
    file_sink::init_subscriber(&config)
}

/// Re-export tracing macros for convenience.
pub use tracing::{debug, error, info, instrument, trace, warn};

/// Re-export Level for advanced filtering.
pub use tracing::Level;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LogConfig::default();
        assert_eq!(config.service_name, "weread-autoread");
        assert_eq!(config.default_level, "info");
        assert!(config.log_path.is_none());
        assert!(config.also_stderr);
    }
}
