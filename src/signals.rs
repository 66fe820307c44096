//! Signal names, values and the per-invocation signal map.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::error::FingerprintError;

/// Sentinel for a capability the host does not expose.
pub const UNSUPPORTED: &str = "unsupported";
/// Sentinel for a capability that failed while being probed.
pub const ERROR: &str = "error";
/// Placeholder for hardware fields and an unset Do Not Track flag.
pub const UNKNOWN: &str = "unknown";
/// How a missing property reads when interpolated into a JS template string.
pub const UNDEFINED: &str = "undefined";

/// The fifteen signals that make up a fingerprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SignalName {
    Canvas,
    Webgl,
    Audio,
    Fonts,
    Hardware,
    Screen,
    Browser,
    Timezone,
    Plugins,
    Touch,
    Battery,
    Network,
    Media,
    ColorDepth,
    DoNotTrack,
}

impl SignalName {
    pub const ALL: [SignalName; 15] = [
        SignalName::Canvas,
        SignalName::Webgl,
        SignalName::Audio,
        SignalName::Fonts,
        SignalName::Hardware,
        SignalName::Screen,
        SignalName::Browser,
        SignalName::Timezone,
        SignalName::Plugins,
        SignalName::Touch,
        SignalName::Battery,
        SignalName::Network,
        SignalName::Media,
        SignalName::ColorDepth,
        SignalName::DoNotTrack,
    ];

    /// Wire name used in the canonical string and in JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalName::Canvas => "canvas",
            SignalName::Webgl => "webgl",
            SignalName::Audio => "audio",
            SignalName::Fonts => "fonts",
            SignalName::Hardware => "hardware",
            SignalName::Screen => "screen",
            SignalName::Browser => "browser",
            SignalName::Timezone => "timezone",
            SignalName::Plugins => "plugins",
            SignalName::Touch => "touch",
            SignalName::Battery => "battery",
            SignalName::Network => "network",
            SignalName::Media => "media",
            SignalName::ColorDepth => "colorDepth",
            SignalName::DoNotTrack => "doNotTrack",
        }
    }
}

impl fmt::Display for SignalName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SignalName {
    type Err = FingerprintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SignalName::ALL
            .iter()
            .copied()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| FingerprintError::Parse(format!("unknown signal name: {}", s)))
    }
}

/// Collected signal values keyed by name.
///
/// Iteration order is unspecified; the combiner sorts before use.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SignalMap {
    entries: HashMap<SignalName, String>,
}

impl SignalMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: SignalName, value: impl Into<String>) -> Option<String> {
        self.entries.insert(name, value.into())
    }

    pub fn get(&self, name: SignalName) -> Option<&str> {
        self.entries.get(&name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True when every one of the fifteen signals has a value.
    pub fn is_complete(&self) -> bool {
        SignalName::ALL.iter().all(|name| self.entries.contains_key(name))
    }

    pub fn iter(&self) -> impl Iterator<Item = (SignalName, &str)> {
        self.entries.iter().map(|(name, value)| (*name, value.as_str()))
    }
}

impl FromIterator<(SignalName, String)> for SignalMap {
    fn from_iter<I: IntoIterator<Item = (SignalName, String)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Render a number the way `String(n)` does in JavaScript for the values
/// browser APIs hand back: integers lose the `.0`.
///
/// Matches JS for magnitudes in `[1e-6, 1e21)` and for zero. Outside that
/// range JS switches to exponent notation and this does not.
pub fn format_js_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        // -0 prints as 0 in JS
        return "0".to_string();
    }
    if value.fract() == 0.0 && value.abs() < 1e21 {
        return format!("{:.0}", value);
    }
    format!("{}", value)
}
