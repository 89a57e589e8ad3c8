//! Configuration and startup utilities for the WeRead autoreader.
//!
//! - [`Config`]: JSON config file plus environment overrides
//! - [`parse_curl_command`]: headers and cookies from a browser-captured curl
//! - [`Paths`]: `~/.weread` layout
//! - [`init_logging`]: observability setup

mod config;
mod curl;
mod error;
mod logging;
mod paths;

pub use config::{
    Config, Endpoints, DEFAULT_LOG_LEVEL, DEFAULT_PACE_SECS, DEFAULT_READ_NUM,
    DEFAULT_REQUEST_TIMEOUT_SECS,
};
pub use curl::{parse_cookie_header, parse_curl_command, CurlCapture};
pub use error::{CoreError, CoreResult};
pub use logging::{init_logging, SERVICE_NAME};
pub use paths::Paths;
