//! Device collectors: battery, network connection, media devices.
//!
//! Battery and media are the two probes that suspend. Their latency is
//! bounded by the host (see `BrowserHost`), not here.

use crate::host::HostCapabilities;
use crate::signals::{format_js_number, SignalName, UNDEFINED};

use super::degrade;

pub async fn battery(host: &dyn HostCapabilities) -> String {
    degrade(SignalName::Battery, host.battery().await, |status| {
        format!(
            "{}_{}",
            status.charging,
            format_js_number((status.level * 100.0).round())
        )
    })
}

pub fn network(host: &dyn HostCapabilities) -> String {
    degrade(SignalName::Network, host.connection(), |conn| {
        format!(
            "{}_{}_{}",
            conn.effective_type.as_deref().unwrap_or(UNDEFINED),
            conn.downlink.map_or_else(|| UNDEFINED.to_string(), format_js_number),
            conn.rtt.map_or_else(|| UNDEFINED.to_string(), format_js_number)
        )
    })
}

/// Only device kinds are used; labels and ids never leave the host.
pub async fn media(host: &dyn HostCapabilities) -> String {
    degrade(SignalName::Media, host.media_device_kinds().await, |mut kinds| {
        kinds.sort();
        kinds.join(",")
    })
}
