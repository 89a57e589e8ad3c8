//! Request signing for the reading-progress API.
//!
//! This crate provides:
//! - `RequestPayload`, the sorted field map submitted with every read
//! - Canonical `key=value&...` encoding of a payload
//! - The protocol rolling hash that produces the `s` signature field
//! - `SignatureEngine`, which derives the `sg` checksum and seals payloads
//!
//! Everything here is pure: no I/O, no clocks, no randomness.

mod canonical;
mod engine;
mod error;
mod payload;
mod rolling_hash;

pub use canonical::{encode_payload, percent_encode};
pub use engine::{SignatureEngine, DEFAULT_SIGNING_SALT, REQUIRED_FIELDS};
pub use error::{SignatureError, SignatureResult};
pub use payload::{PayloadValue, RequestPayload, SIGNATURE_KEY};
pub use rolling_hash::{cal_hash, HASH_SEED};
