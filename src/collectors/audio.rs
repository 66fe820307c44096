//! Audio stack collector.
//!
//! Reads the sample rate and analyser FFT size off a muted probing graph.
//! The graph is released before the collector returns, whether or not the
//! reads succeed.

use crate::error::Result;
use crate::host::{AudioGraph, HostCapabilities};
use crate::signals::{format_js_number, SignalName};

use super::degrade;

/// Owns a probing graph and releases it on drop.
struct GraphGuard(Box<dyn AudioGraph>);

impl Drop for GraphGuard {
    fn drop(&mut self) {
        self.0.release();
    }
}

fn read_graph(graph: Box<dyn AudioGraph>) -> Result<String> {
    let guard = GraphGuard(graph);
    let sample_rate = guard.0.sample_rate()?;
    let fft_size = guard.0.fft_size()?;
    Ok(format!("{}_{}", format_js_number(sample_rate), fft_size))
}

pub fn audio(host: &dyn HostCapabilities) -> String {
    let probe = host
        .audio_graph()
        .and_then(|graph| graph.map(read_graph).transpose());
    degrade(SignalName::Audio, probe, |value| value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FingerprintError;
    use crate::host::{StaticAudio, StaticHost};
    use std::cell::Cell;
    use std::rc::Rc;

    struct CountingGraph {
        releases: Rc<Cell<u32>>,
        fail_fft: bool,
    }

    impl AudioGraph for CountingGraph {
        fn sample_rate(&self) -> Result<f64> {
            Ok(48_000.0)
        }
        fn fft_size(&self) -> Result<u32> {
            if self.fail_fft {
                return Err(FingerprintError::Host("analyser detached".into()));
            }
            Ok(2048)
        }
        fn release(&mut self) {
            self.releases.set(self.releases.get() + 1);
        }
    }

    #[test]
    fn test_graph_released_after_success() {
        let releases = Rc::new(Cell::new(0));
        let graph = CountingGraph {
            releases: Rc::clone(&releases),
            fail_fft: false,
        };
        assert_eq!(read_graph(Box::new(graph)).unwrap(), "48000_2048");
        assert_eq!(releases.get(), 1);
    }

    #[test]
    fn test_graph_released_after_failure() {
        let releases = Rc::new(Cell::new(0));
        let graph = CountingGraph {
            releases: Rc::clone(&releases),
            fail_fft: true,
        };
        assert!(read_graph(Box::new(graph)).is_err());
        assert_eq!(releases.get(), 1);
    }

    #[test]
    fn test_audio_signal_values() {
        let mut host = StaticHost::default();
        assert_eq!(audio(&host), "unsupported");

        host.audio = Some(StaticAudio {
            sample_rate: 44_100.0,
            fft_size: 2048,
        });
        assert_eq!(audio(&host), "44100_2048");

        host.failing.push(SignalName::Audio);
        assert_eq!(audio(&host), "error");
    }
}
