//! The in-memory session shared by every request of a run.

use crate::error::{RenewalError, RenewalResult};
use std::collections::BTreeMap;

/// Cookie holding the rotating primary session key.
pub const SESSION_KEY_COOKIE: &str = "wr_skey";

/// Cookie carrying the account's renewal-mode flag.
pub const RENEWAL_MODE_COOKIE: &str = "wr_ql";

/// Authentication cookies for the single live session.
///
/// The store is owned by the read loop and lent to each request; it is
/// never shared across threads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionStore {
    cookies: BTreeMap<String, String>,
}

impl SessionStore {
    /// Create a session from an initial cookie set.
    pub fn new(cookies: BTreeMap<String, String>) -> Self {
        Self { cookies }
    }

    /// Current primary session key, if any.
    pub fn skey(&self) -> Option<&str> {
        self.cookie(SESSION_KEY_COOKIE)
    }

    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    /// Swap in a freshly issued session key.
    ///
    /// An empty token is rejected and the old key stays in place.
    pub fn replace_skey(&mut self, token: impl Into<String>) -> RenewalResult<()> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(RenewalError::EmptyToken);
        }
        self.cookies.insert(SESSION_KEY_COOKIE.to_string(), token);
        Ok(())
    }

    /// `Cookie` request header value: `name=value; name2=value2`.
    pub fn cookie_header(&self) -> String {
        self.cookies
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// Session key with everything past the first 8 characters hidden.
    pub fn masked_skey(&self) -> String {
        match self.skey() {
            Some(skey) => format!("{}***", skey.chars().take(8).collect::<String>()),
            None => "<none>".to_string(),
        }
    }
}
