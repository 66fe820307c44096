//! Fingerprint and reporting configuration.
//!
//! Both structs deserialize from an optional JS options object. Missing
//! fields take their defaults, and a malformed object falls back to the
//! defaults as a whole.

use serde::{Deserialize, Serialize};

use crate::hash::DigestAlgorithm;

/// Default bound on each asynchronous browser probe.
pub const DEFAULT_ASYNC_PROBE_TIMEOUT_MS: u32 = 5_000;

/// Default risk scoring backend.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Options for a single fingerprint generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FingerprintConfig {
    /// Digest used to finalize the canonical string.
    pub digest: DigestAlgorithm,
    /// Upper bound for the battery and media probes; `0` disables it.
    pub async_probe_timeout_ms: u32,
}

impl Default for FingerprintConfig {
    fn default() -> Self {
        Self {
            digest: DigestAlgorithm::Sha256,
            async_probe_timeout_ms: DEFAULT_ASYNC_PROBE_TIMEOUT_MS,
        }
    }
}

/// Where and how fingerprints are reported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReporterConfig {
    /// Base URL of the risk scoring API, without a trailing slash.
    pub api_url: String,
    /// Sent as `X-API-Key` when present.
    pub api_key: Option<String>,
}

impl Default for ReporterConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: None,
        }
    }
}

impl ReporterConfig {
    /// Create config with a custom API base URL
    pub fn with_api_url(api_url: impl Into<String>) -> Self {
        let api_url = api_url.into();
        Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            ..Default::default()
        }
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Absolute URL for an API path such as `/api/fingerprint`.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.api_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}
