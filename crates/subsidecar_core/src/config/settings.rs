//! Per-family extraction settings.

use serde::{Deserialize, Serialize};

use super::languages::LanguageFilter;

/// User-facing settings for one subtitle family.
///
/// Mirrors the two knobs the host exposes: a free-text language list and an
/// unconditional re-extract switch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Comma-separated language codes to extract; empty extracts all.
    #[serde(default)]
    pub languages_to_extract: String,

    /// Re-extract even when a sidecar, record, or embedded tag says done.
    #[serde(default)]
    pub extract_regardless: bool,
}

impl Settings {
    /// Parse the configured language list into a filter.
    pub fn language_filter(&self) -> LanguageFilter {
        LanguageFilter::parse(&self.languages_to_extract)
    }
}
