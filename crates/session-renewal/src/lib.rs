//! Session handling for the reading client.
//!
//! This crate provides:
//! - `SessionStore`, the single in-memory cookie set used by every request
//! - `SessionRefresher`, which renews the `wr_skey` token against the
//!   renewal endpoint
//! - Helpers shared by the HTTP clients (default headers, cookie parsing)

mod client;
mod cookie;
mod error;
mod refresher;
mod store;

pub use client::{build_http_client, summarize_response_body};
pub use cookie::{parse_bool_flag, token_from_set_cookie};
pub use error::{RenewalError, RenewalResult};
pub use refresher::{
    RenewalConfig, RenewalRequest, SessionRefresher, SessionRenewer, DEFAULT_READ_ROUTE,
    DEFAULT_RENEW_URL, RENEWAL_TIMEOUT,
};
pub use store::{SessionStore, RENEWAL_MODE_COOKIE, SESSION_KEY_COOKIE};
