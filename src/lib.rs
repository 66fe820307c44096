//! # SixFinger WASM
//!
//! Browser fingerprinting compiled to WebAssembly.
//!
//! Fifteen independent probes read what the browser exposes (canvas
//! rendering, WebGL driver strings, audio stack, fonts, screen, locale,
//! devices...). Their string outputs are combined into a canonical string and
//! hashed into a stable 32-character identifier, which can then be reported to
//! a risk scoring backend.
//!
//! ## Architecture
//!
//! ```text
//! get_fingerprint (WASM)
//!   ↓
//! Collectors ──▶ HostCapabilities (BrowserHost | StaticHost)
//!   ↓
//! canonical_string ──▶ SHA-256 / Rolling32 ──▶ FingerprintResult
//!   ↓
//! FingerprintClient ──▶ RiskClient ──▶ HttpTransport (fetch)
//! ```
//!
//! ## Properties
//!
//! - **Total**: a probe that is missing or fails yields `"unsupported"` or
//!   `"error"`; generation itself never fails
//! - **Stable**: same host, same hash; insertion order never matters
//! - **Private by shape**: only derived strings leave the host (no device
//!   labels, no raw pixels)
//!
//! Rejected promises and thrown errors carry an [`ErrorInfo`] object:
//! `{ code, message, user_message, is_retryable }`.

use serde::Serialize;
use wasm_bindgen::prelude::*;

// Modules
pub mod collectors;
pub mod combiner;
pub mod config;
mod error;
pub mod fingerprint;
pub mod hash;
pub mod host;
pub mod report;
pub mod signals;

pub use combiner::canonical_string;
pub use config::{FingerprintConfig, ReporterConfig};
pub use error::{ErrorCode, ErrorInfo, FingerprintError, Result};
pub use fingerprint::{fingerprint_from_components, generate_fingerprint, FingerprintResult};
pub use hash::DigestAlgorithm;
pub use host::{BrowserHost, HostCapabilities, StaticHost};
pub use report::{RiskAssessment, RiskClient, RiskDetails, RiskLevel};
pub use signals::{SignalMap, SignalName};

/// Initialize the fingerprint module
///
/// Installs the `console_log` backend for the `log` facade.
#[wasm_bindgen(start)]
pub fn init() {
    // A second init (module re-instantiated) keeps the first logger.
    if console_log::init_with_level(log::Level::Info).is_ok() {
        log::info!("SixFinger WASM initialized");
    }
}

/// Serialize for JavaScript: maps become plain objects, not `Map`s.
fn to_js<T: Serialize>(value: &T) -> std::result::Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| FingerprintError::Internal(format!("Serialization failed: {}", e)).into())
}

/// Read an optional options object, falling back to defaults.
fn parse_options(options: JsValue) -> FingerprintConfig {
    if options.is_undefined() || options.is_null() {
        return FingerprintConfig::default();
    }
    serde_wasm_bindgen::from_value(options).unwrap_or_else(|e| {
        log::warn!("⚠️ Ignoring malformed fingerprint options: {}", e);
        FingerprintConfig::default()
    })
}

fn parse_components(components: JsValue) -> Result<SignalMap> {
    serde_wasm_bindgen::from_value(components)
        .map_err(|e| FingerprintError::Parse(format!("Invalid components: {}", e)))
}

async fn generate(config: &FingerprintConfig) -> FingerprintResult {
    let host = BrowserHost::with_timeout(config.async_probe_timeout_ms);
    generate_fingerprint(&host, config).await
}

/// Generate a fingerprint of the current browser.
///
/// `options` may be omitted. Recognized fields:
/// `{ digest: "sha256" | "rolling32", async_probe_timeout_ms: number }`.
///
/// Resolves to `{ hash, components, digest }`.
#[wasm_bindgen]
pub async fn get_fingerprint(options: JsValue) -> std::result::Result<JsValue, JsValue> {
    let config = parse_options(options);
    let result = generate(&config).await;
    to_js(&result)
}

/// Canonical string for a `{ signal: value }` object.
#[wasm_bindgen]
pub fn combine_components(components: JsValue) -> std::result::Result<String, JsValue> {
    let components = parse_components(components)?;
    Ok(canonical_string(&components))
}

/// Fingerprint hash for a `{ signal: value }` object.
#[wasm_bindgen]
pub fn hash_components(
    components: JsValue,
    digest: Option<String>,
) -> std::result::Result<String, JsValue> {
    let digest = match digest {
        Some(name) => name.parse::<DigestAlgorithm>()?,
        None => DigestAlgorithm::default(),
    };
    let components = parse_components(components)?;
    Ok(fingerprint_from_components(components, digest).hash)
}

/// Display label for a risk score ("Low Risk", "Medium Risk", ...).
#[wasm_bindgen]
pub fn risk_level_label(score: f64) -> String {
    RiskLevel::from_score(score).label().to_string()
}

#[derive(Serialize)]
struct Submission<'a> {
    fingerprint: &'a FingerprintResult,
    risk: Option<RiskAssessment>,
}

/// Reporting client exposed to JavaScript
#[wasm_bindgen]
pub struct FingerprintClient {
    client: RiskClient<report::FetchTransport>,
}

#[wasm_bindgen]
impl FingerprintClient {
    /// Create a client for the risk API at `api_url` (default `http://localhost:8000`).
    #[wasm_bindgen(constructor)]
    pub fn new(api_url: Option<String>, api_key: Option<String>) -> FingerprintClient {
        let mut config = match api_url {
            Some(url) => ReporterConfig::with_api_url(url),
            None => ReporterConfig::default(),
        };
        if let Some(key) = api_key {
            config = config.api_key(key);
        }
        Self {
            client: RiskClient::browser(config),
        }
    }

    /// Base URL this client reports to.
    #[wasm_bindgen(getter)]
    pub fn api_url(&self) -> String {
        self.client.config().api_url.clone()
    }

    /// Submit a `{ hash, components }` result. Resolves to the assessment, or
    /// `null` when the backend answered with a non-success status.
    #[wasm_bindgen]
    pub async fn submit(&self, result: JsValue) -> std::result::Result<JsValue, JsValue> {
        let result: FingerprintResult = serde_wasm_bindgen::from_value(result)
            .map_err(|e| FingerprintError::Parse(format!("Invalid fingerprint result: {}", e)))?;
        let assessment = self.client.submit(&result).await?;
        to_js(&assessment)
    }

    /// Generate a fingerprint and submit it.
    ///
    /// Resolves to `{ fingerprint, risk }`. Reporting failures do not lose the
    /// fingerprint: `risk` is `null` and the failure is logged.
    #[wasm_bindgen]
    pub async fn generate_and_submit(
        &self,
        options: JsValue,
    ) -> std::result::Result<JsValue, JsValue> {
        let config = parse_options(options);
        let fingerprint = generate(&config).await;

        let risk = match self.client.submit(&fingerprint).await {
            Ok(risk) => risk,
            Err(e) => {
                log::warn!("⚠️ Risk report failed: {}", e);
                None
            }
        };
        to_js(&Submission {
            fingerprint: &fingerprint,
            risk,
        })
    }

    /// Fetch the scoring breakdown for `hash`, or `null` if unavailable.
    #[wasm_bindgen]
    pub async fn risk_details(&self, hash: String) -> std::result::Result<JsValue, JsValue> {
        let details = self.client.risk_details(&hash).await?;
        to_js(&details)
    }
}
