//! Reporting client for the risk scoring backend.
//!
//! The backend is an external collaborator. A non-success status means "no
//! assessment available" and is returned as `Ok(None)`; only transport
//! failures and unparseable success bodies are errors. Nothing is retried,
//! and reporting never gates fingerprint generation.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::config::ReporterConfig;
use crate::error::{FingerprintError, Result};
use crate::fingerprint::FingerprintResult;
use crate::hash::is_fingerprint_hash;
use crate::signals::SignalMap;

mod transport;

pub use transport::{FetchTransport, HttpRequest, HttpResponse, HttpTransport, Method};

pub const SUBMIT_PATH: &str = "/api/fingerprint";
pub const RISK_SCORE_PATH: &str = "/api/risk-score";

/// Body of `POST /api/fingerprint`.
#[derive(Debug, Clone, Serialize)]
pub struct FingerprintReport<'a> {
    pub hash: &'a str,
    pub components: &'a SignalMap,
}

impl<'a> From<&'a FingerprintResult> for FingerprintReport<'a> {
    fn from(result: &'a FingerprintResult) -> Self {
        Self {
            hash: &result.hash,
            components: &result.components,
        }
    }
}

/// Backend verdict for a submitted fingerprint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub risk_score: f64,
    pub is_bot: bool,
    pub visit_count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_seen: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credits_used: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credits_remaining: Option<u64>,
}

impl RiskAssessment {
    pub fn level(&self) -> RiskLevel {
        RiskLevel::from_score(self.risk_score)
    }
}

/// Scoring breakdown from `GET /api/risk-score/<hash>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskDetails {
    pub hash: String,
    pub risk_score: f64,
    pub is_bot: bool,
    pub confidence: f64,
    #[serde(default)]
    pub factors: HashMap<String, bool>,
}

/// Display banding of a risk score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn from_score(score: f64) -> Self {
        if score < 30.0 {
            RiskLevel::Low
        } else if score < 60.0 {
            RiskLevel::Medium
        } else {
            RiskLevel::High
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low Risk",
            RiskLevel::Medium => "Medium Risk",
            RiskLevel::High => "High Risk (Bot Likely)",
        }
    }
}

/// Client for the risk scoring API.
pub struct RiskClient<T: HttpTransport> {
    config: ReporterConfig,
    transport: T,
}

impl RiskClient<FetchTransport> {
    /// Client over the browser `fetch` API.
    pub fn browser(config: ReporterConfig) -> Self {
        Self::with_transport(config, FetchTransport)
    }
}

impl<T: HttpTransport> RiskClient<T> {
    pub fn with_transport(config: ReporterConfig, transport: T) -> Self {
        log::info!("Creating RiskClient for {}", config.api_url);
        Self { config, transport }
    }

    pub fn config(&self) -> &ReporterConfig {
        &self.config
    }

    fn headers(&self, with_body: bool) -> Vec<(String, String)> {
        let mut headers = Vec::new();
        if with_body {
            headers.push(("Content-Type".to_string(), "application/json".to_string()));
        }
        if let Some(key) = &self.config.api_key {
            headers.push(("X-API-Key".to_string(), key.clone()));
        }
        headers
    }

    /// Send, then parse the body of a success response.
    async fn exchange<R: for<'de> Deserialize<'de>>(&self, request: HttpRequest) -> Result<Option<R>> {
        let url = request.url.clone();
        let response = self.transport.send(request).await?;
        if !response.is_success() {
            log::warn!(
                "⚠️ Risk API returned HTTP {} for {}; no assessment available",
                response.status,
                url
            );
            return Ok(None);
        }
        serde_json::from_str(&response.body)
            .map(Some)
            .map_err(|e| FingerprintError::Parse(format!("Risk API response: {}", e)))
    }

    /// Submit a fingerprint for scoring.
    pub async fn submit(&self, result: &FingerprintResult) -> Result<Option<RiskAssessment>> {
        if !is_fingerprint_hash(&result.hash) {
            return Err(FingerprintError::InvalidHash(result.hash.clone()));
        }
        let body = serde_json::to_string(&FingerprintReport::from(result))?;
        let request = HttpRequest {
            method: Method::Post,
            url: self.config.endpoint(SUBMIT_PATH),
            headers: self.headers(true),
            body: Some(body),
        };

        let assessment: Option<RiskAssessment> = self.exchange(request).await?;
        if let Some(a) = &assessment {
            log::info!(
                "📊 Risk score {:.1} ({}), visits {}",
                a.risk_score,
                a.level().label(),
                a.visit_count
            );
        }
        Ok(assessment)
    }

    /// Fetch the scoring breakdown for a previously submitted fingerprint.
    pub async fn risk_details(&self, hash: &str) -> Result<Option<RiskDetails>> {
        if !is_fingerprint_hash(hash) {
            return Err(FingerprintError::InvalidHash(hash.to_string()));
        }
        let request = HttpRequest {
            method: Method::Get,
            url: self.config.endpoint(&format!("{}/{}", RISK_SCORE_PATH, hash)),
            headers: self.headers(false),
            body: None,
        };
        self.exchange(request).await
    }
}
