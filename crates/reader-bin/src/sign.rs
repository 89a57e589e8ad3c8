//! The `sign` debugging command.

use std::fmt;
use std::path::Path;

use read_signature::{encode_payload, PayloadValue, RequestPayload, SignatureEngine, SIGNATURE_KEY};

/// Derived signing values for one payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignReport {
    /// Canonical string the signature is computed over.
    pub canonical: String,
    /// Expected `sg`, when `ts` and `rn` are integers.
    pub checksum: Option<String>,
    pub signature: String,
}

impl fmt::Display for SignReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "canonical: {}", self.canonical)?;
        match &self.checksum {
            Some(sg) => writeln!(f, "sg: {}", sg)?,
            None => writeln!(f, "sg: <ts and rn must be integers>")?,
        }
        write!(f, "s: {}", self.signature)
    }
}

fn int_field(payload: &RequestPayload, key: &str) -> Option<i64> {
    match payload.get(key) {
        Some(PayloadValue::Int(value)) => Some(*value),
        _ => None,
    }
}

pub fn sign_payload(payload: &RequestPayload, engine: &SignatureEngine) -> SignReport {
    let mut unsigned = payload.clone();
    unsigned.remove(SIGNATURE_KEY);

    let checksum = int_field(&unsigned, "ts")
        .zip(int_field(&unsigned, "rn"))
        .map(|(ts, rn)| engine.checksum(ts, rn));

    SignReport {
        canonical: encode_payload(&unsigned),
        checksum,
        signature: engine.signature(&unsigned),
    }
}

pub fn sign_file(path: &Path, salt: &str) -> Result<SignReport, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(path)?;
    let payload: RequestPayload = serde_json::from_str(&content)?;
    Ok(sign_payload(&payload, &SignatureEngine::new(salt)))
}
