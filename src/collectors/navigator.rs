//! Navigator collectors: hardware, browser identity, plugins, touch, DNT.

use crate::host::HostCapabilities;
use crate::signals::{format_js_number, SignalName, ERROR, UNDEFINED, UNKNOWN};

use super::graphics;

/// Falsy numbers (missing, zero, NaN) read as unknown.
fn number_or_unknown(value: Option<f64>) -> String {
    match value {
        Some(n) if n != 0.0 && !n.is_nan() => format_js_number(n),
        _ => UNKNOWN.to_string(),
    }
}

pub fn hardware(host: &dyn HostCapabilities) -> String {
    let info = host.hardware();
    format!(
        "cores:{}_mem:{}_gpu:{}",
        number_or_unknown(info.hardware_concurrency),
        number_or_unknown(info.device_memory),
        graphics::webgl(host)
    )
}

pub fn browser(host: &dyn HostCapabilities) -> String {
    let nav = host.navigator();
    format!(
        "{}_{}_{}",
        nav.user_agent.as_deref().unwrap_or(UNDEFINED),
        nav.language.as_deref().unwrap_or(UNDEFINED),
        nav.platform.as_deref().unwrap_or(UNDEFINED)
    )
}

pub fn plugins(host: &dyn HostCapabilities) -> String {
    match host.plugins() {
        Ok(mut names) => {
            names.sort();
            let joined = names.join(",");
            if joined.is_empty() {
                "none".to_string()
            } else {
                joined
            }
        }
        Err(e) => {
            log::debug!("{} probe failed: {}", SignalName::Plugins, e);
            ERROR.to_string()
        }
    }
}

pub fn touch(host: &dyn HostCapabilities) -> String {
    let touch = host.touch();
    format!("{}_{}", touch.max_touch_points, touch.touch_events)
}

pub fn do_not_track(host: &dyn HostCapabilities) -> String {
    host.do_not_track()
        .filter(|flag| !flag.is_empty())
        .unwrap_or_else(|| UNKNOWN.to_string())
}
