//! Logging initialization.
//!
//! Structured JSONL goes to `~/.weread/logs/autoread.jsonl` through the
//! observability package, with a compact copy on stderr.

use crate::CoreResult;
use std::path::PathBuf;

/// Service name written on every log line.
pub const SERVICE_NAME: &str = "weread-autoread";

/// Install the global subscriber.
///
/// `RUST_LOG` takes precedence over `level` when set.
pub fn init_logging(level: &str, log_path: PathBuf) -> CoreResult<PathBuf> {
    let path = observability::init_with_config(observability::LogConfig {
        service_name: SERVICE_NAME.into(),
        default_level: level.into(),
        log_path: Some(log_path),
        also_stderr: true,
    })?;
    Ok(path)
}

/// Whether `level` is a bare level directive `EnvFilter` understands.
pub(crate) fn is_known_level(level: &str) -> bool {
    matches!(
        level.to_ascii_lowercase().as_str(),
        "trace" | "debug" | "info" | "warn" | "error" | "off"
    )
}
