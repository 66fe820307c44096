//! Host capability layer
//!
//! Collectors never touch browser globals directly. Everything they read comes
//! through [`HostCapabilities`], so the same pipeline runs against the live
//! browser ([`BrowserHost`]) or against a fixed profile ([`StaticHost`]).
//!
//! Conventions for every probe:
//! - `Ok(None)`: the capability does not exist on this host
//! - `Err(_)`: the capability exists but reading it failed
//! - plain values: the capability is always present

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

mod browser;
mod static_host;

pub use browser::BrowserHost;
pub use static_host::{StaticAudio, StaticCanvas, StaticHost};

/// A 2D drawing surface (an offscreen `<canvas>` with its 2D context).
pub trait Canvas2d {
    fn set_size(&self, width: u32, height: u32);
    fn set_font(&self, font: &str);
    fn set_text_baseline(&self, baseline: &str);
    fn set_fill_style(&self, style: &str);
    fn fill_rect(&self, x: f64, y: f64, width: f64, height: f64);
    fn fill_text(&self, text: &str, x: f64, y: f64) -> Result<()>;
    /// Width in CSS pixels of `text` in the current font.
    fn measure_text(&self, text: &str) -> Result<f64>;
    fn to_data_url(&self) -> Result<String>;
}

/// A live audio processing graph built for probing.
///
/// The graph is oscillator → analyser → processor → gain(0) → destination,
/// already started. Holders must call [`AudioGraph::release`] exactly once.
pub trait AudioGraph {
    fn sample_rate(&self) -> Result<f64>;
    fn fft_size(&self) -> Result<u32>;
    /// Stop the oscillator and close the context.
    fn release(&mut self);
}

/// Unmasked GPU strings; `None` when `WEBGL_debug_renderer_info` is absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebGlInfo {
    pub vendor: Option<String>,
    pub renderer: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HardwareInfo {
    pub hardware_concurrency: Option<f64>,
    pub device_memory: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenInfo {
    pub width: i32,
    pub height: i32,
    pub avail_width: i32,
    pub avail_height: i32,
    pub color_depth: i32,
}

/// `None` marks a property the browser does not define.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigatorInfo {
    pub user_agent: Option<String>,
    pub language: Option<String>,
    pub platform: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimezoneInfo {
    /// Resolved IANA zone name, e.g. `Europe/Berlin`.
    pub name: Option<String>,
    /// `Date.prototype.getTimezoneOffset()`: minutes, positive west of UTC.
    pub offset_minutes: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TouchInfo {
    pub max_touch_points: i32,
    pub touch_events: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatteryStatus {
    pub charging: bool,
    /// Charge level in `0.0..=1.0`.
    pub level: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionInfo {
    pub effective_type: Option<String>,
    pub downlink: Option<f64>,
    pub rtt: Option<f64>,
}

/// Everything the collectors may read from the host environment.
#[async_trait(?Send)]
pub trait HostCapabilities {
    /// A fresh offscreen 2D surface.
    fn canvas_2d(&self) -> Result<Option<Box<dyn Canvas2d>>>;

    fn webgl(&self) -> Result<Option<WebGlInfo>>;

    /// Build and start the probing audio graph.
    fn audio_graph(&self) -> Result<Option<Box<dyn AudioGraph>>>;

    fn hardware(&self) -> HardwareInfo;

    fn screen(&self) -> ScreenInfo;

    fn navigator(&self) -> NavigatorInfo;

    fn timezone(&self) -> TimezoneInfo;

    /// Installed plugin names, in host order.
    fn plugins(&self) -> Result<Vec<String>>;

    fn touch(&self) -> TouchInfo;

    async fn battery(&self) -> Result<Option<BatteryStatus>>;

    /// Network information, checking vendor-prefixed fallbacks.
    fn connection(&self) -> Result<Option<ConnectionInfo>>;

    /// Kinds (`audioinput`, `videoinput`, ...) of enumerable media devices.
    async fn media_device_kinds(&self) -> Result<Option<Vec<String>>>;

    fn device_pixel_ratio(&self) -> Option<f64>;

    /// First non-empty Do Not Track flag across vendor locations.
    fn do_not_track(&self) -> Option<String>;
}
