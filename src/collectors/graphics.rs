//! Graphics collectors: canvas rendering, WebGL renderer, installed fonts.

use crate::error::Result;
use crate::host::{Canvas2d, HostCapabilities};
use crate::signals::{SignalName, UNKNOWN, UNSUPPORTED};

use super::degrade;

const CANVAS_WIDTH: u32 = 200;
const CANVAS_HEIGHT: u32 = 50;
const CANVAS_TEXT: &str = "SixFinger 🖐️";

const FONT_TEST_STRING: &str = "mmmmmmmmmmlli";
const FONT_TEST_SIZE: &str = "72px";
const BASE_FONTS: [&str; 3] = ["monospace", "sans-serif", "serif"];
const CANDIDATE_FONTS: [&str; 9] = [
    "Arial",
    "Verdana",
    "Times New Roman",
    "Courier New",
    "Georgia",
    "Comic Sans MS",
    "Trebuchet MS",
    "Arial Black",
    "Impact",
];

/// Draw the fixed scene and encode it.
fn render_scene(surface: &dyn Canvas2d) -> Result<String> {
    surface.set_size(CANVAS_WIDTH, CANVAS_HEIGHT);

    surface.set_text_baseline("top");
    surface.set_font("14px \"Arial\"");
    surface.set_text_baseline("alphabetic");
    surface.set_fill_style("#f60");
    surface.fill_rect(125.0, 1.0, 62.0, 20.0);
    surface.set_fill_style("#069");
    surface.fill_text(CANVAS_TEXT, 2.0, 15.0)?;
    surface.set_fill_style("rgba(102, 204, 0, 0.7)");
    surface.fill_text(CANVAS_TEXT, 4.0, 17.0)?;

    surface.to_data_url()
}

pub fn canvas(host: &dyn HostCapabilities) -> String {
    let probe = host
        .canvas_2d()
        .and_then(|surface| surface.map(|s| render_scene(s.as_ref())).transpose());
    degrade(SignalName::Canvas, probe, |data_url| data_url)
}

pub fn webgl(host: &dyn HostCapabilities) -> String {
    degrade(SignalName::Webgl, host.webgl(), |info| {
        format!(
            "{}~{}",
            info.vendor.as_deref().unwrap_or(UNKNOWN),
            info.renderer.as_deref().unwrap_or(UNKNOWN)
        )
    })
}

/// Fonts whose presence changes the measured width against at least one base family.
fn detect_fonts(surface: &dyn Canvas2d) -> Vec<&'static str> {
    let measure = |font: String| -> Option<f64> {
        surface.set_font(&font);
        match surface.measure_text(FONT_TEST_STRING) {
            Ok(width) => Some(width),
            Err(e) => {
                log::debug!("measureText failed for {}: {}", font, e);
                None
            }
        }
    };

    let baselines: Vec<(&str, Option<f64>)> = BASE_FONTS
        .iter()
        .map(|base| (*base, measure(format!("{} {}", FONT_TEST_SIZE, base))))
        .collect();

    let mut detected: Vec<&'static str> = CANDIDATE_FONTS
        .iter()
        .copied()
        .filter(|font| {
            baselines.iter().any(|(base, base_width)| {
                let Some(base_width) = base_width else {
                    return false;
                };
                measure(format!("{} '{}', {}", FONT_TEST_SIZE, font, base))
                    .is_some_and(|width| width != *base_width)
            })
        })
        .collect();
    detected.sort_unstable();
    detected.dedup();
    detected
}

pub fn fonts(host: &dyn HostCapabilities) -> String {
    match host.canvas_2d() {
        Ok(Some(surface)) => detect_fonts(surface.as_ref()).join(","),
        Ok(None) => UNSUPPORTED.to_string(),
        Err(e) => {
            log::debug!("fonts: no measurement surface: {}", e);
            UNSUPPORTED.to_string()
        }
    }
}
