//! Manufacturer inference heuristics.
//!
//! Two independent, best-effort rules:
//! - path-derived: walk backward from the library filename through its
//!   parent folders, skipping generic names, and take the first plausible
//!   vendor folder;
//! - name-pattern: match the plugin name against a fixed table of known
//!   vendor substrings.
//!
//! Both return `None` when nothing matches. The `"Unknown"` sentinel is
//! applied by the session when it commits a reference, never here.

/// Sentinel recorded for references no heuristic could attribute.
pub const UNKNOWN_MANUFACTURER: &str = "Unknown";

/// Generic path segments that never name a manufacturer. Compared
/// case-insensitively against trimmed folder names.
const PATH_STOPLIST: &[&str] = &[
    "vst",
    "vst2",
    "vst3",
    "_effects",
    "_effects 2",
    "effects",
    "mastering",
    "reverb",
    "distortion",
    "slowmo",
    "delay",
    "compression",
    "eq",
    "modulation",
    "d:",
    "c:",
    "program files",
    "program files (x86)",
    "x64",
    "x86",
    "plugins",
    "steinberg",
    "vstplugins",
    "64-bit",
    "32-bit",
];

/// Known vendor substrings, first match in table order wins. Extend by
/// adding rows; the containment test is always against the lowercased
/// plugin name.
const VENDOR_PATTERNS: &[(&str, &str)] = &[
    ("tal-", "TAL-Software"),
    ("labs", "Spitfire Audio"),
    ("ozone", "iZotope"),
    ("levels", "Mastering the Mix"),
    ("rc-20", "XLN Audio"),
    ("halftime", "Cable Guys"),
    ("blackhole", "Eventide"),
    ("decapitator", "Soundtoys"),
    ("waveshell", "Waves"),
    ("2getheraudio", "2getheraudio"),
    ("cherry", "Cherry Audio"),
];

/// Derives a manufacturer from a plugin library path.
///
/// Splits the path on both separator styles, finds the segment carrying the
/// library filename, then scans the preceding segments from the innermost
/// outward. The first segment that is non-empty, longer than two characters
/// and not stoplisted is taken as the manufacturer.
pub fn manufacturer_from_path(dll_path: &str) -> Option<String> {
    if dll_path.is_empty() {
        return None;
    }

    let normalized = dll_path.replace('\\', "/");
    let segments: Vec<&str> = normalized.split('/').collect();
    let library_index = segments
        .iter()
        .position(|segment| segment.to_ascii_lowercase().ends_with(".dll"))?;

    for segment in segments[..library_index].iter().rev() {
        let folder = segment.trim();
        if folder.is_empty() || folder.chars().count() <= 2 {
            continue;
        }
        if PATH_STOPLIST.contains(&folder.to_ascii_lowercase().as_str()) {
            continue;
        }
        return Some(folder.to_string());
    }

    None
}

/// Derives a manufacturer from a bare plugin name via the pattern table.
pub fn manufacturer_from_name(plugin_name: &str) -> Option<&'static str> {
    if plugin_name.is_empty() {
        return None;
    }

    let lowered = plugin_name.to_lowercase();
    VENDOR_PATTERNS
        .iter()
        .find(|(pattern, _)| lowered.contains(pattern))
        .map(|(_, vendor)| *vendor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_rule_skips_stoplisted_folders() {
        let path = r"D:\SomeVendor\vst\reverb\Plugin.dll";
        assert_eq!(manufacturer_from_path(path), Some("SomeVendor".to_string()));
    }

    #[test]
    fn path_rule_is_case_insensitive_about_the_stoplist() {
        let path = "C:/Program Files/VSTPlugins/Acme Audio/Thing.dll";
        assert_eq!(
            manufacturer_from_path(path),
            Some("Acme Audio".to_string())
        );
    }

    #[test]
    fn path_rule_rejects_short_segments() {
        assert_eq!(manufacturer_from_path("ab/Plugin.dll"), None);
    }

    #[test]
    fn path_rule_needs_a_library_segment() {
        assert_eq!(manufacturer_from_path("SomeVendor/Plugin.txt"), None);
    }

    #[test]
    fn path_rule_with_only_generic_folders_finds_nothing() {
        assert_eq!(
            manufacturer_from_path(r"C:\Program Files\VSTPlugins\x64\Thing.dll"),
            None
        );
    }

    #[test]
    fn bare_filename_has_no_manufacturer() {
        assert_eq!(manufacturer_from_path("Widget.dll"), None);
    }

    #[test]
    fn name_rule_matches_vendor_prefix() {
        assert_eq!(manufacturer_from_name("TAL-Reverb-4"), Some("TAL-Software"));
    }

    #[test]
    fn name_rule_matches_anywhere_in_the_name() {
        assert_eq!(manufacturer_from_name("Ozone 9 Elements"), Some("iZotope"));
        assert_eq!(manufacturer_from_name("WaveShell1-VST 14.0"), Some("Waves"));
    }

    #[test]
    fn name_rule_returns_none_for_unknown_names() {
        assert_eq!(manufacturer_from_name("Serum"), None);
        assert_eq!(manufacturer_from_name(""), None);
    }

    #[test]
    fn name_rule_prefers_earlier_table_rows() {
        // Contains both "tal-" and "labs"; the earlier row wins.
        assert_eq!(
            manufacturer_from_name("TAL-Labs Experiment"),
            Some("TAL-Software")
        );
    }
}
