//! Signal collectors
//!
//! Fifteen probes, each a total function of the host: whatever happens, a
//! collector returns a string. Absent capabilities become `"unsupported"`,
//! failures become `"error"`, and both are hashed like any other value.
//!
//! Every collector is reached through the async [`collect_signal`], so the
//! orchestrator joins them uniformly whether or not they suspend.

use futures::future::join_all;

use crate::error::Result;
use crate::host::HostCapabilities;
use crate::signals::{SignalMap, SignalName, ERROR, UNSUPPORTED};

pub mod audio;
pub mod devices;
pub mod environment;
pub mod graphics;
pub mod navigator;

/// Collapse a probe outcome into a signal value.
pub(crate) fn degrade<T>(
    signal: SignalName,
    probe: Result<Option<T>>,
    render: impl FnOnce(T) -> String,
) -> String {
    match probe {
        Ok(Some(value)) => render(value),
        Ok(None) => {
            log::debug!("{} unsupported on this host", signal);
            UNSUPPORTED.to_string()
        }
        Err(e) => {
            log::debug!("{} probe failed: {}", signal, e);
            ERROR.to_string()
        }
    }
}

/// Run the collector for one signal.
pub async fn collect_signal(name: SignalName, host: &dyn HostCapabilities) -> String {
    match name {
        SignalName::Canvas => graphics::canvas(host),
        SignalName::Webgl => graphics::webgl(host),
        SignalName::Audio => audio::audio(host),
        SignalName::Fonts => graphics::fonts(host),
        SignalName::Hardware => navigator::hardware(host),
        SignalName::Screen => environment::screen(host),
        SignalName::Browser => navigator::browser(host),
        SignalName::Timezone => environment::timezone(host),
        SignalName::Plugins => navigator::plugins(host),
        SignalName::Touch => navigator::touch(host),
        SignalName::Battery => devices::battery(host).await,
        SignalName::Network => devices::network(host),
        SignalName::Media => devices::media(host).await,
        SignalName::ColorDepth => environment::color_depth(host),
        SignalName::DoNotTrack => navigator::do_not_track(host),
    }
}

/// Run all fifteen collectors and wait for every one of them.
pub async fn collect_all(host: &dyn HostCapabilities) -> SignalMap {
    let collected = join_all(
        SignalName::ALL
            .into_iter()
            .map(|name| async move { (name, collect_signal(name, host).await) }),
    )
    .await;
    collected.into_iter().collect()
}
