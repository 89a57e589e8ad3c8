//! Configuration management for the autoreader.

use crate::curl::parse_curl_command;
use crate::logging::is_known_level;
use crate::{CoreError, CoreResult, Paths};
use push_notifier::PushMethod;
use read_signature::{RequestPayload, DEFAULT_SIGNING_SALT};
use read_simulator::{DEFAULT_FIX_SYNCKEY_URL, DEFAULT_READ_URL};
use serde::{Deserialize, Serialize};
use session_renewal::{parse_bool_flag, DEFAULT_RENEW_URL};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";
/// Default number of confirmed reads per run.
pub const DEFAULT_READ_NUM: u32 = 40;
/// Default timeout for read and repair calls.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
/// Default pause after a confirmed read.
pub const DEFAULT_PACE_SECS: u64 = 30;

/// Cookie that must be present for the session to be renewable.
const REQUIRED_COOKIE: &str = "wr_vid";
/// Book id used for sync-cursor repair when none is configured.
const DEFAULT_FIX_SYNCKEY_BOOK_ID: &str = "3300060341";

const ENV_CURL_BASH: &str = "WEREAD_CURL_BASH";
/// Name used by existing deployments; read when `WEREAD_CURL_BASH` is unset.
const ENV_CURL_BASH_COMPAT: &str = "WXREAD_CURL_BASH";
const ENV_READ_NUM: &str = "READ_NUM";
const ENV_PUSH_METHOD: &str = "PUSH_METHOD";
const ENV_LOG_LEVEL: &str = "WEREAD_LOG_LEVEL";
const ENV_RENEWAL_QL: &str = "HACK_COOKIE_REFRESH_QL";

/// Remote endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub read_url: String,
    pub renew_url: String,
    pub fix_synckey_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            read_url: DEFAULT_READ_URL.to_string(),
            renew_url: DEFAULT_RENEW_URL.to_string(),
            fix_synckey_url: DEFAULT_FIX_SYNCKEY_URL.to_string(),
        }
    }
}

/// Main autoreader configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Confirmed reads to accumulate.
    #[serde(default = "default_read_num")]
    pub read_num: u32,
    /// Book ids chosen uniformly per attempt.
    #[serde(default)]
    pub books: Vec<String>,
    /// Chapter ids chosen uniformly per attempt.
    #[serde(default)]
    pub chapters: Vec<String>,
    #[serde(default)]
    pub cookies: BTreeMap<String, String>,
    /// Browser headers sent on every request. `Cookie` is ignored here.
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    /// Fixed payload fields; per-attempt fields are overwritten.
    #[serde(default = "default_payload_template")]
    pub payload_template: RequestPayload,
    #[serde(default)]
    pub push_method: Option<PushMethod>,
    #[serde(default)]
    pub endpoints: Endpoints,
    #[serde(default = "default_signing_salt")]
    pub signing_salt: String,
    #[serde(default = "default_fix_synckey_book_ids")]
    pub fix_synckey_book_ids: Vec<String>,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_pace_secs")]
    pub pace_secs: u64,
    /// Renewal-mode override; falls back to the `wr_ql` cookie when unset.
    #[serde(default)]
    pub renewal_ql: Option<bool>,
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

fn default_read_num() -> u32 {
    DEFAULT_READ_NUM
}

fn default_signing_salt() -> String {
    DEFAULT_SIGNING_SALT.to_string()
}

fn default_fix_synckey_book_ids() -> Vec<String> {
    vec![DEFAULT_FIX_SYNCKEY_BOOK_ID.to_string()]
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

fn default_pace_secs() -> u64 {
    DEFAULT_PACE_SECS
}

/// Fixed fields the web reader sends with every progress report.
fn default_payload_template() -> RequestPayload {
    let mut template = RequestPayload::new();
    template.set("appId", "wb182564874663h776775553");
    template.set("ci", 27);
    template.set("co", 389);
    template.set("sm", "");
    template.set("pr", 74);
    template.set("ps", "b1d32a307a4c3259g016b67");
    template.set("pc", "080327b07a4c3259g018787");
    template
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            read_num: DEFAULT_READ_NUM,
            books: Vec::new(),
            chapters: Vec::new(),
            cookies: BTreeMap::new(),
            headers: BTreeMap::new(),
            payload_template: default_payload_template(),
            push_method: None,
            endpoints: Endpoints::default(),
            signing_salt: default_signing_salt(),
            fix_synckey_book_ids: default_fix_synckey_book_ids(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            pace_secs: DEFAULT_PACE_SECS,
            renewal_ql: None,
        }
    }
}

impl Config {
    /// Load `config_path` (or the default location), then apply the
    /// environment. A missing file means defaults.
    pub fn load(paths: &Paths, config_path: Option<&Path>) -> CoreResult<Self> {
        let default_path = paths.config_file();
        let path = config_path.unwrap_or(default_path.as_path());

        let mut config = if path.exists() {
            info!(path = %path.display(), "Loading configuration");
            Self::load_from_file(path)?
        } else if config_path.is_some() {
            return Err(CoreError::Config(format!(
                "config file not found: {}",
                path.display()
            )));
        } else {
            info!(path = %path.display(), "No configuration file, using defaults");
            Self::default()
        };

        config.apply_env(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Override fields from variables resolved through `lookup`.
    /// Blank values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F) -> CoreResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| {
            let value = lookup(name)
                .map(|raw| raw.trim().to_string())
                .filter(|raw| !raw.is_empty());
            if value.is_some() {
                debug!(variable = name, "Applying environment override");
            }
            value
        };

        if let Some(command) = var(ENV_CURL_BASH).or_else(|| var(ENV_CURL_BASH_COMPAT)) {
            let capture = parse_curl_command(&command)?;
            self.headers = capture.headers;
            self.cookies = capture.cookies;
        }

        if let Some(raw) = var(ENV_READ_NUM) {
            self.read_num = raw.parse().map_err(|_| {
                CoreError::Config(format!("{ENV_READ_NUM} must be a positive integer, got {raw:?}"))
            })?;
        }

        if let Some(raw) = var(ENV_PUSH_METHOD) {
            self.push_method = PushMethod::parse_optional(&raw)
                .map_err(|e| CoreError::Config(e.to_string()))?;
        }

        if let Some(level) = var(ENV_LOG_LEVEL) {
            self.log_level = level;
        }

        if let Some(raw) = var(ENV_RENEWAL_QL) {
            self.renewal_ql = Some(parse_bool_flag(&raw));
        }

        Ok(())
    }

    /// Check everything a run depends on.
    pub fn validate(&self) -> CoreResult<()> {
        if self.books.is_empty() {
            return Err(CoreError::Config("books must not be empty".to_string()));
        }
        if self.chapters.is_empty() {
            return Err(CoreError::Config("chapters must not be empty".to_string()));
        }
        if !self.cookies.contains_key(REQUIRED_COOKIE) {
            return Err(CoreError::Config(format!(
                "cookies must include {REQUIRED_COOKIE}; set {ENV_CURL_BASH} or the cookies field"
            )));
        }
        if self.read_num == 0 {
            return Err(CoreError::Config("read_num must be greater than 0".to_string()));
        }
        if self.request_timeout_secs == 0 {
            return Err(CoreError::Config(
                "request_timeout_secs must be greater than 0".to_string(),
            ));
        }
        if !is_known_level(&self.log_level) {
            return Err(CoreError::Config(format!(
                "unknown log level {:?}",
                self.log_level
            )));
        }
        self.read_url()?;
        self.renew_url()?;
        self.fix_synckey_url()?;
        Ok(())
    }

    pub fn read_url(&self) -> CoreResult<Url> {
        Url::parse(&self.endpoints.read_url).map_err(CoreError::from)
    }

    pub fn renew_url(&self) -> CoreResult<Url> {
        Url::parse(&self.endpoints.renew_url).map_err(CoreError::from)
    }

    pub fn fix_synckey_url(&self) -> CoreResult<Url> {
        Url::parse(&self.endpoints.fix_synckey_url).map_err(CoreError::from)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn pace(&self) -> Duration {
        Duration::from_secs(self.pace_secs)
    }
}
