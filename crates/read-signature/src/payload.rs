//! The request payload submitted to the read endpoint.

use crate::error::SignatureResult;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Key under which the rolling-hash signature is stored.
pub const SIGNATURE_KEY: &str = "s";

/// A single payload value. The API only ever sees strings and integers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PayloadValue {
    Int(i64),
    Str(String),
}

impl fmt::Display for PayloadValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PayloadValue::Int(value) => write!(f, "{}", value),
            PayloadValue::Str(value) => f.write_str(value),
        }
    }
}

impl From<i64> for PayloadValue {
    fn from(value: i64) -> Self {
        PayloadValue::Int(value)
    }
}

impl From<i32> for PayloadValue {
    fn from(value: i32) -> Self {
        PayloadValue::Int(i64::from(value))
    }
}

impl From<u32> for PayloadValue {
    fn from(value: u32) -> Self {
        PayloadValue::Int(i64::from(value))
    }
}

impl From<&str> for PayloadValue {
    fn from(value: &str) -> Self {
        PayloadValue::Str(value.to_string())
    }
}

impl From<String> for PayloadValue {
    fn from(value: String) -> Self {
        PayloadValue::Str(value)
    }
}

/// Field map for one read submission.
///
/// Keys are kept sorted so iteration order is the canonical order the
/// remote signature check expects.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestPayload {
    fields: BTreeMap<String, PayloadValue>,
}

impl RequestPayload {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field, replacing any previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<PayloadValue>) {
        self.fields.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&PayloadValue> {
        self.fields.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<PayloadValue> {
        self.fields.remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate fields in canonical (sorted) key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PayloadValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// The signature field, if the payload has been sealed.
    pub fn signature(&self) -> Option<&PayloadValue> {
        self.fields.get(SIGNATURE_KEY)
    }

    /// Compact JSON body (no whitespace between tokens).
    pub fn to_json(&self) -> SignatureResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl<K, V> FromIterator<(K, V)> for RequestPayload
where
    K: Into<String>,
    V: Into<PayloadValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut payload = RequestPayload::new();
        for (key, value) in iter {
            payload.set(key, value);
        }
        payload
    }
}
