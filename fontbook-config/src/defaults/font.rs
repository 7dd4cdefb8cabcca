//! Default values for font discovery and family matching.

pub fn load_system_fonts() -> bool {
    true
}

/// Families tried, in order, for the last-resort font when no explicit
/// last-resort file is configured.
pub fn last_resort_families() -> Vec<String> {
    [
        "DejaVu Sans Mono",
        "DejaVu Sans",
        "Noto Sans",
        "Liberation Sans",
        "Menlo",
        "Consolas",
        "Arial",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

pub fn max_fallback_hops() -> usize {
    16
}
