//! File system paths for the autoreader.

use crate::{CoreError, CoreResult};
use std::path::PathBuf;

const CONFIG_FILE_NAME: &str = "config.json";
const LOG_FILE_NAME: &str = "autoread.jsonl";

/// Manages file system paths under `~/.weread`.
#[derive(Debug, Clone)]
pub struct Paths {
    base_dir: PathBuf,
}

impl Paths {
    /// Uses `~/.weread`.
    pub fn new() -> CoreResult<Self> {
        let home = dirs::home_dir()
            .ok_or_else(|| CoreError::Path("Could not determine home directory".to_string()))?;

        Ok(Self {
            base_dir: home.join(".weread"),
        })
    }

    /// Create a Paths instance rooted elsewhere (tests, `--base-dir`).
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    pub fn config_file(&self) -> PathBuf {
        self.base_dir.join(CONFIG_FILE_NAME)
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.base_dir.join("logs")
    }

    pub fn log_file(&self) -> PathBuf {
        self.logs_dir().join(LOG_FILE_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout() {
        let paths = Paths::with_base_dir(PathBuf::from("/tmp/weread"));
        assert_eq!(paths.config_file(), PathBuf::from("/tmp/weread/config.json"));
        assert_eq!(
            paths.log_file(),
            PathBuf::from("/tmp/weread/logs/autoread.jsonl")
        );
    }
}
