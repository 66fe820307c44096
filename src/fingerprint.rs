//! Fingerprint orchestration.
//!
//! ```text
//! collect_all(host) ──▶ SignalMap ──▶ canonical_string ──▶ finalize ──▶ FingerprintResult
//! ```
//!
//! There is no failure path: collectors are total, combining and hashing
//! cannot fail. There is also no timeout at this layer; async probes are
//! bounded by the host.

use serde::{Deserialize, Serialize};

use crate::collectors;
use crate::combiner::canonical_string;
use crate::config::FingerprintConfig;
use crate::hash::{self, DigestAlgorithm};
use crate::host::HostCapabilities;
use crate::signals::SignalMap;

/// Identifier plus the raw signals it was computed from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FingerprintResult {
    /// 32 lowercase hex characters.
    pub hash: String,
    pub components: SignalMap,
    /// Which digest produced `hash`.
    #[serde(default)]
    pub digest: DigestAlgorithm,
}

impl FingerprintResult {
    /// Canonical string the hash was computed over.
    pub fn canonical(&self) -> String {
        canonical_string(&self.components)
    }
}

/// Combine and hash an already collected signal map.
pub fn fingerprint_from_components(
    components: SignalMap,
    digest: DigestAlgorithm,
) -> FingerprintResult {
    let canonical = canonical_string(&components);
    let hash = hash::finalize(&canonical, digest);
    FingerprintResult {
        hash,
        components,
        digest,
    }
}

/// Collect every signal from `host` and compute its fingerprint.
pub async fn generate_fingerprint(
    host: &dyn HostCapabilities,
    config: &FingerprintConfig,
) -> FingerprintResult {
    log::info!("🖐️ Collecting browser signals...");
    let components = collectors::collect_all(host).await;
    debug_assert!(components.is_complete());

    let result = fingerprint_from_components(components, config.digest);
    log::info!(
        "✅ Fingerprint {} ({} signals, {})",
        result.hash,
        result.components.len(),
        result.digest.as_str()
    );
    result
}
