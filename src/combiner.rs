//! Canonical serialization of a signal map.
//!
//! Entries are sorted by wire name, rendered as `name:value` and joined with
//! `|`. Every fingerprint ever issued depends on this exact layout.

use crate::signals::SignalMap;

pub const ENTRY_SEPARATOR: char = '|';
pub const KEY_VALUE_SEPARATOR: char = ':';

/// Build the canonical string hashed into a fingerprint.
pub fn canonical_string(components: &SignalMap) -> String {
    let mut entries: Vec<(&str, &str)> = components
        .iter()
        .map(|(name, value)| (name.as_str(), value))
        .collect();
    entries.sort_unstable_by(|a, b| a.0.cmp(b.0));

    let mut out = String::new();
    for (i, (name, value)) in entries.iter().enumerate() {
        if i > 0 {
            out.push(ENTRY_SEPARATOR);
        }
        out.push_str(name);
        out.push(KEY_VALUE_SEPARATOR);
        out.push_str(value);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signals::SignalName;

    #[test]
    fn test_empty_map() {
        assert_eq!(canonical_string(&SignalMap::new()), "");
    }

    #[test]
    fn test_sorted_by_wire_name() {
        let mut map = SignalMap::new();
        map.insert(SignalName::Webgl, "unknown~unknown");
        map.insert(SignalName::ColorDepth, "24_1");
        map.insert(SignalName::Canvas, "c");
        map.insert(SignalName::Audio, "unsupported");

        assert_eq!(
            canonical_string(&map),
            "audio:unsupported|canvas:c|colorDepth:24_1|webgl:unknown~unknown"
        );
    }

    #[test]
    fn test_values_are_not_escaped() {
        let mut map = SignalMap::new();
        map.insert(SignalName::Hardware, "cores:8_mem:unknown_gpu:a~b");
        map.insert(SignalName::Fonts, "");
        assert_eq!(
            canonical_string(&map),
            "fonts:|hardware:cores:8_mem:unknown_gpu:a~b"
        );
    }
}
