//! Signature engine: `sg` checksum and `s` signature derivation.

use crate::canonical::encode_payload;
use crate::error::{SignatureError, SignatureResult};
use crate::payload::{PayloadValue, RequestPayload, SIGNATURE_KEY};
use crate::rolling_hash::cal_hash;
use sha2::{Digest, Sha256};

/// Salt shared with the remote service for the `sg` checksum.
pub const DEFAULT_SIGNING_SALT: &str = "3c5c8717f3daf09iop3423zafeqoi";

/// Fields that must be present before a payload can be sealed.
pub const REQUIRED_FIELDS: [&str; 7] = ["b", "c", "ct", "rt", "ts", "rn", "sg"];

/// Derives the checksum and signature fields of a read payload.
#[derive(Debug, Clone)]
pub struct SignatureEngine {
    salt: String,
}

impl Default for SignatureEngine {
    fn default() -> Self {
        Self::new(DEFAULT_SIGNING_SALT)
    }
}

impl SignatureEngine {
    /// Create an engine with the given shared salt.
    pub fn new(salt: impl Into<String>) -> Self {
        Self { salt: salt.into() }
    }

    /// SHA-256 hex digest of `{ts}{rn}{salt}`.
    pub fn checksum(&self, ts: i64, rn: i64) -> String {
        let mut hasher = Sha256::new();
        hasher.update(format!("{}{}{}", ts, rn, self.salt).as_bytes());
        hasher
            .finalize()
            .iter()
            .map(|byte| format!("{:02x}", byte))
            .collect()
    }

    /// Rolling-hash signature of everything in the payload except `s`.
    pub fn signature(&self, payload: &RequestPayload) -> String {
        let mut unsigned = payload.clone();
        unsigned.remove(SIGNATURE_KEY);
        cal_hash(&encode_payload(&unsigned))
    }

    /// Seal a fully populated payload by inserting the `s` field.
    ///
    /// Any stale signature is discarded first; the result depends only on
    /// the remaining fields.
    pub fn sign(&self, mut payload: RequestPayload) -> SignatureResult<RequestPayload> {
        payload.remove(SIGNATURE_KEY);
        for field in REQUIRED_FIELDS {
            if !payload.contains(field) {
                return Err(SignatureError::MissingField(field));
            }
        }

        let signature = cal_hash(&encode_payload(&payload));
        payload.set(SIGNATURE_KEY, PayloadValue::Str(signature));
        Ok(payload)
    }
}
