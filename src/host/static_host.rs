//! Fixed host profile.
//!
//! `StaticHost` answers every probe from plain data. It is what a non-browser
//! embedding uses (everything absent by default) and how a recorded profile
//! is replayed, e.g. one loaded from JSON.

use std::cell::RefCell;
use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{
    AudioGraph, BatteryStatus, Canvas2d, ConnectionInfo, HardwareInfo, HostCapabilities,
    NavigatorInfo, ScreenInfo, TimezoneInfo, TouchInfo, WebGlInfo,
};
use crate::error::{FingerprintError, Result};
use crate::signals::SignalName;

/// Canned 2D surface behaviour.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StaticCanvas {
    /// Returned by `to_data_url`.
    pub data_url: String,
    /// Width returned for any font not listed in `font_widths`.
    pub text_width: f64,
    /// Width per exact CSS font string, e.g. `"72px 'Arial', monospace"`.
    pub font_widths: HashMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaticAudio {
    pub sample_rate: f64,
    pub fft_size: u32,
}

/// A host whose capabilities are plain data.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StaticHost {
    pub canvas: Option<StaticCanvas>,
    pub webgl: Option<WebGlInfo>,
    pub audio: Option<StaticAudio>,
    pub hardware: HardwareInfo,
    pub screen: ScreenInfo,
    pub navigator: NavigatorInfo,
    pub timezone: TimezoneInfo,
    pub plugins: Vec<String>,
    pub touch: TouchInfo,
    pub battery: Option<BatteryStatus>,
    pub connection: Option<ConnectionInfo>,
    pub media_device_kinds: Option<Vec<String>>,
    pub device_pixel_ratio: Option<f64>,
    pub do_not_track: Option<String>,
    /// Probes that throw when read.
    pub failing: Vec<SignalName>,
}

impl StaticHost {
    /// Parse a recorded profile.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    fn check(&self, signal: SignalName) -> Result<()> {
        if self.failing.contains(&signal) {
            return Err(FingerprintError::Host(format!("{} probe failed", signal)));
        }
        Ok(())
    }
}

struct StaticSurface {
    profile: StaticCanvas,
    font: RefCell<String>,
    fail: bool,
}

impl StaticSurface {
    fn check(&self) -> Result<()> {
        if self.fail {
            return Err(FingerprintError::Host("canvas rendering failed".into()));
        }
        Ok(())
    }
}

impl Canvas2d for StaticSurface {
    fn set_size(&self, _width: u32, _height: u32) {}

    fn set_font(&self, font: &str) {
        *self.font.borrow_mut() = font.to_string();
    }

    fn set_text_baseline(&self, _baseline: &str) {}

    fn set_fill_style(&self, _style: &str) {}

    fn fill_rect(&self, _x: f64, _y: f64, _width: f64, _height: f64) {}

    fn fill_text(&self, _text: &str, _x: f64, _y: f64) -> Result<()> {
        self.check()
    }

    fn measure_text(&self, _text: &str) -> Result<f64> {
        self.check()?;
        let font = self.font.borrow();
        Ok(self
            .profile
            .font_widths
            .get(font.as_str())
            .copied()
            .unwrap_or(self.profile.text_width))
    }

    fn to_data_url(&self) -> Result<String> {
        self.check()?;
        Ok(self.profile.data_url.clone())
    }
}

struct StaticAudioGraph {
    audio: StaticAudio,
    fail: bool,
}

impl AudioGraph for StaticAudioGraph {
    fn sample_rate(&self) -> Result<f64> {
        if self.fail {
            return Err(FingerprintError::Host("sampleRate unreadable".into()));
        }
        Ok(self.audio.sample_rate)
    }

    fn fft_size(&self) -> Result<u32> {
        Ok(self.audio.fft_size)
    }

    fn release(&mut self) {}
}

#[async_trait(?Send)]
impl HostCapabilities for StaticHost {
    fn canvas_2d(&self) -> Result<Option<Box<dyn Canvas2d>>> {
        Ok(self.canvas.clone().map(|profile| {
            Box::new(StaticSurface {
                profile,
                font: RefCell::new(String::new()),
                fail: self.failing.contains(&SignalName::Canvas),
            }) as Box<dyn Canvas2d>
        }))
    }

    fn webgl(&self) -> Result<Option<WebGlInfo>> {
        self.check(SignalName::Webgl)?;
        Ok(self.webgl.clone())
    }

    fn audio_graph(&self) -> Result<Option<Box<dyn AudioGraph>>> {
        Ok(self.audio.clone().map(|audio| {
            Box::new(StaticAudioGraph {
                audio,
                fail: self.failing.contains(&SignalName::Audio),
            }) as Box<dyn AudioGraph>
        }))
    }

    fn hardware(&self) -> HardwareInfo {
        self.hardware.clone()
    }

    fn screen(&self) -> ScreenInfo {
        self.screen.clone()
    }

    fn navigator(&self) -> NavigatorInfo {
        self.navigator.clone()
    }

    fn timezone(&self) -> TimezoneInfo {
        self.timezone.clone()
    }

    fn plugins(&self) -> Result<Vec<String>> {
        self.check(SignalName::Plugins)?;
        Ok(self.plugins.clone())
    }

    fn touch(&self) -> TouchInfo {
        self.touch.clone()
    }

    async fn battery(&self) -> Result<Option<BatteryStatus>> {
        self.check(SignalName::Battery)?;
        Ok(self.battery.clone())
    }

    fn connection(&self) -> Result<Option<ConnectionInfo>> {
        self.check(SignalName::Network)?;
        Ok(self.connection.clone())
    }

    async fn media_device_kinds(&self) -> Result<Option<Vec<String>>> {
        self.check(SignalName::Media)?;
        Ok(self.media_device_kinds.clone())
    }

    fn device_pixel_ratio(&self) -> Option<f64> {
        self.device_pixel_ratio
    }

    fn do_not_track(&self) -> Option<String> {
        self.do_not_track.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;

    #[test]
    fn test_default_host_has_nothing() {
        let host = StaticHost::default();
        assert!(host.canvas_2d().unwrap().is_none());
        assert!(host.webgl().unwrap().is_none());
        assert!(host.audio_graph().unwrap().is_none());
        assert!(host.plugins().unwrap().is_empty());
        assert!(block_on(host.battery()).unwrap().is_none());
        assert!(block_on(host.media_device_kinds()).unwrap().is_none());
        assert_eq!(host.timezone().name, None);
        assert_eq!(host.navigator().user_agent, None);
    }

    #[test]
    fn test_failing_probes() {
        let host = StaticHost {
            failing: vec![SignalName::Battery, SignalName::Plugins],
            ..Default::default()
        };
        assert!(block_on(host.battery()).is_err());
        assert!(host.plugins().is_err());
        assert!(host.connection().is_ok());
    }

    #[test]
    fn test_surface_measures_per_font() {
        let mut widths = HashMap::new();
        widths.insert("72px 'Impact', serif".to_string(), 140.5);
        let host = StaticHost {
            canvas: Some(StaticCanvas {
                data_url: "data:,".into(),
                text_width: 100.0,
                font_widths: widths,
            }),
            ..Default::default()
        };

        let surface = host.canvas_2d().unwrap().unwrap();
        surface.set_font("72px serif");
        assert_eq!(surface.measure_text("mmm").unwrap(), 100.0);
        surface.set_font("72px 'Impact', serif");
        assert_eq!(surface.measure_text("mmm").unwrap(), 140.5);
    }

    #[test]
    fn test_from_json_profile() {
        let host = StaticHost::from_json(
            r#"{
                "screen": { "width": 1920, "height": 1080, "avail_width": 1920, "avail_height": 1040, "color_depth": 24 },
                "navigator": { "user_agent": "Mozilla/5.0", "language": "en-US", "platform": "Win32" },
                "media_device_kinds": ["audioinput", "videoinput"],
                "failing": ["network"]
            }"#,
        )
        .unwrap();

        assert_eq!(host.screen().avail_height, 1040);
        assert_eq!(host.navigator().platform.as_deref(), Some("Win32"));
        assert_eq!(
            block_on(host.media_device_kinds()).unwrap().unwrap().len(),
            2
        );
        assert!(host.connection().is_err());
        assert!(StaticHost::from_json("{ \"screen\": 5 }").is_err());
    }
}
