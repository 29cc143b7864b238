// Error code descriptor catalog used for tooltip text
use std::collections::HashMap;

/// Returned for codes without a catalog entry.
pub const NO_DESCRIPTION: &str = "No description available";

const WRAP_WIDTH: usize = 40;
const LINE_BREAK: &str = "<br>";

const BUILTIN_DESCRIPTORS: &[(&str, &str)] = &[
    (
        "WA009",
        "Drivers: steeringTrackingLost\nSTARTUP_CHECKS_FAILED\nMay also work for other LLC errors.",
    ),
    (
        "WA041",
        "Cameras 19-22: camera_internal_state_error\nVision orchestration process aborted.\nMay also work for other camera errors.",
    ),
    (
        "WA042",
        "Cameras 1-18: camera_internal_state_error\nVision orchestration process aborted.\nMay also work for other camera errors.",
    ),
    (
        "WA043",
        "Logger Status: Chum Recorder is not recording to external drives.\nDisk is not connected at USB 3.0 speed.\nDisk is not mounted.",
    ),
    ("WA047", "Radar Communication Failure: Data_Invalid."),
    ("WA066", "Lidar: PTPTimeSyncFault."),
    ("WA070", "Drivers: LinkStabilityLow."),
    ("WA065", "Radar: RadarOutputSilent\nRadarDataMissing\nInvalidPtl."),
    ("WA050.a", "SideKick: DataDependency."),
    (
        "WA050.b",
        "SideKick: Unable to complete mic check with 'Say Hello Hero'.",
    ),
    (
        "WA050.c",
        "SideKick: Unable to start mic check with ADR button not responsive.",
    ),
];

/// Immutable code → wrapped description lookup.
#[derive(Debug, Clone, Default)]
pub struct DescriptorCatalog {
    entries: HashMap<String, String>,
}

impl DescriptorCatalog {
    pub fn builtin() -> Self {
        let entries = BUILTIN_DESCRIPTORS
            .iter()
            .map(|(code, text)| (code.to_string(), wrap_text(text, WRAP_WIDTH)))
            .collect();
        Self { entries }
    }

    /// Add or replace entries. Descriptions are wrapped like the built-in ones.
    pub fn with_overrides<I>(mut self, overrides: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (code, text) in overrides {
            self.entries.insert(code, wrap_text(&text, WRAP_WIDTH));
        }
        self
    }

    pub fn describe(&self, error_code: &str) -> &str {
        self.entries
            .get(error_code)
            .map(String::as_str)
            .unwrap_or(NO_DESCRIPTION)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Hard-wrap every line at `width` characters and join with `<br>`.
pub fn wrap_text(text: &str, width: usize) -> String {
    let mut wrapped = Vec::new();
    for line in text.lines() {
        let chars: Vec<char> = line.chars().collect();
        if chars.is_empty() {
            wrapped.push(String::new());
            continue;
        }
        for chunk in chars.chunks(width.max(1)) {
            wrapped.push(chunk.iter().collect::<String>());
        }
    }
    wrapped.join(LINE_BREAK)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_text_splits_long_lines() {
        let wrapped = wrap_text("abcdefghij\nxyz", 4);
        assert_eq!(wrapped, "abcd<br>efgh<br>ij<br>xyz");
    }

    #[test]
    fn test_wrap_text_keeps_exact_width_line() {
        assert_eq!(wrap_text("abcd", 4), "abcd");
    }

    #[test]
    fn test_builtin_lookup_is_wrapped() {
        let catalog = DescriptorCatalog::builtin();
        assert_eq!(catalog.len(), 11);
        assert_eq!(catalog.describe("WA066"), "Lidar: PTPTimeSyncFault.");
        assert_eq!(
            catalog.describe("WA043"),
            "Logger Status: Chum Recorder is not reco<br>rding to external drives.<br>Disk is not connected at USB 3.0 speed.<br>Disk is not mounted."
        );
    }

    #[test]
    fn test_unknown_code_yields_sentinel() {
        let catalog = DescriptorCatalog::builtin();
        assert_eq!(catalog.describe("WA099"), NO_DESCRIPTION);
    }

    #[test]
    fn test_overrides_replace_and_extend() {
        let catalog = DescriptorCatalog::builtin().with_overrides(vec![
            ("WA099".to_string(), "Brakes: pressure low".to_string()),
            ("WA066".to_string(), "Lidar: replaced".to_string()),
        ]);
        assert_eq!(catalog.describe("WA099"), "Brakes: pressure low");
        assert_eq!(catalog.describe("WA066"), "Lidar: replaced");
        assert_eq!(catalog.len(), 12);
    }
}
