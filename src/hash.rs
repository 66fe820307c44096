//! Fingerprint hash finalization.
//!
//! A fingerprint is the first 32 hex characters of a digest over the
//! canonical string. With SHA-256 that keeps 128 of the 256 digest bits, so
//! collision resistance is that of a 128-bit identifier, not a full SHA-256.
//!
//! `Rolling32` exists for hosts that must match identifiers produced by the
//! legacy 32-bit rolling hash. Its output still has the 32-char shape but
//! carries roughly 32 bits of entropy; callers can tell which path ran from
//! [`crate::FingerprintResult::digest`].

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::FingerprintError;

/// Length of a fingerprint hash in hex characters.
pub const FINGERPRINT_HASH_LEN: usize = 32;

/// Width the rolling hash is padded to before truncation.
const ROLLING_PADDED_LEN: usize = 64;

/// Which digest produced a fingerprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DigestAlgorithm {
    /// SHA-256, truncated to 128 bits.
    #[default]
    Sha256,
    /// Non-cryptographic `h = h*31 + c` over UTF-16 code units.
    Rolling32,
}

impl DigestAlgorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            DigestAlgorithm::Sha256 => "sha256",
            DigestAlgorithm::Rolling32 => "rolling32",
        }
    }

    /// Whether this path has degraded collision resistance.
    pub fn is_degraded(&self) -> bool {
        matches!(self, DigestAlgorithm::Rolling32)
    }
}

impl FromStr for DigestAlgorithm {
    type Err = FingerprintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sha256" | "sha-256" => Ok(DigestAlgorithm::Sha256),
            "rolling32" => Ok(DigestAlgorithm::Rolling32),
            other => Err(FingerprintError::Config(format!("Unknown digest: {}", other))),
        }
    }
}

/// Full lowercase hex SHA-256 of the UTF-8 bytes of `input`.
pub fn sha256_hex(input: &str) -> String {
    hex::encode(Sha256::digest(input.as_bytes()))
}

/// The rolling hash rendered to 64 hex characters.
///
/// Arithmetic wraps like a JS `int32`; the magnitude is taken in 64 bits so
/// `i32::MIN` survives. The hex is right-padded with zeros.
pub fn rolling_hash_hex(input: &str) -> String {
    let mut h: i32 = 0;
    for unit in input.encode_utf16() {
        h = h.wrapping_mul(31).wrapping_add(i32::from(unit));
    }
    let magnitude = i64::from(h).unsigned_abs();
    let mut out = format!("{:x}", magnitude);
    while out.len() < ROLLING_PADDED_LEN {
        out.push('0');
    }
    out.truncate(ROLLING_PADDED_LEN);
    out
}

/// Hash a canonical string into a 32-character fingerprint.
pub fn finalize(canonical: &str, algorithm: DigestAlgorithm) -> String {
    let mut full = match algorithm {
        DigestAlgorithm::Sha256 => sha256_hex(canonical),
        DigestAlgorithm::Rolling32 => {
            log::warn!("⚠️ Using 32-bit rolling hash: fingerprint collision resistance is degraded");
            rolling_hash_hex(canonical)
        }
    };
    full.truncate(FINGERPRINT_HASH_LEN);
    full
}

/// Check that `hash` has the fingerprint shape `[0-9a-f]{32}`.
pub fn is_fingerprint_hash(hash: &str) -> bool {
    hash.len() == FINGERPRINT_HASH_LEN
        && hash.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}
