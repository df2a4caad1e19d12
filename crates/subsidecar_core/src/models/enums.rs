//! Core enums and the per-family parameter block.

use serde::{Deserialize, Serialize};

/// Coarse stream classification from the prober.
///
/// The extraction logic only cares whether a stream is a subtitle; video,
/// audio, data, and attachment streams are all `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamKind {
    Subtitle,
    Other,
}

impl StreamKind {
    /// Map an ffprobe `codec_type` string onto the coarse classification.
    pub fn from_codec_type(codec_type: &str) -> Self {
        if codec_type.eq_ignore_ascii_case("subtitle") {
            StreamKind::Subtitle
        } else {
            StreamKind::Other
        }
    }
}

impl std::fmt::Display for StreamKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StreamKind::Subtitle => write!(f, "subtitle"),
            StreamKind::Other => write!(f, "other"),
        }
    }
}

/// Result of one orchestrator invocation for one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionOutcome {
    /// No qualifying subtitle streams; nothing was executed.
    NotNeeded,
    /// The oracle reported the file as already processed.
    AlreadyDone,
    /// Every requested stream was extracted.
    Completed,
    /// Some stream mappings were stale but the rest extracted.
    PartialFailure,
    /// The extraction command failed; no state was changed.
    FatalFailure,
}

impl ExtractionOutcome {
    /// Whether sidecar artifacts were produced this run.
    ///
    /// The host should persist its "already extracted" record for the file
    /// exactly when this returns true.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Completed | Self::PartialFailure)
    }
}

/// Marker value written to a family's tag key after a successful run.
pub const EXTRACTED_TAG_VALUE: &str = "extracted";

/// Parameter block for one subtitle codec family.
///
/// The ASS and SRT flavours share every piece of logic; only these
/// identifiers differ. Collapsing them into one parameter block keeps the
/// two from drifting apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubtitleKind {
    /// Record-store key for this family.
    pub name: &'static str,
    /// Codec names (ffprobe `codec_name`, lowercase) this family extracts.
    pub codecs: &'static [&'static str],
    /// Sidecar file extension, without the dot.
    pub extension: &'static str,
    /// Container-level metadata key marking a processed file.
    pub tag_key: &'static str,
    /// When set, files with a different extension are out of scope.
    pub container: Option<&'static str>,
}

/// Text-based vector subtitles (Advanced SubStation / SubStation Alpha).
pub const ASS_KIND: SubtitleKind = SubtitleKind {
    name: "extract_ass_subtitles",
    codecs: &["ass", "ssa"],
    extension: "ass",
    tag_key: "ASS_SUB",
    container: Some("mkv"),
};

/// Plain-text subtitles (SubRip and MOV text).
pub const SRT_KIND: SubtitleKind = SubtitleKind {
    name: "extract_srt_subtitles",
    codecs: &["srt", "subrip", "mov_text"],
    extension: "srt",
    tag_key: "SRT_SUB",
    container: None,
};

impl SubtitleKind {
    /// Whether a probed codec name belongs to this family.
    pub fn matches_codec(&self, codec_name: &str) -> bool {
        self.codecs.iter().any(|c| codec_name.eq_ignore_ascii_case(c))
    }

    /// Both built-in families.
    pub fn all() -> &'static [SubtitleKind] {
        &[ASS_KIND, SRT_KIND]
    }
}

impl std::fmt::Display for SubtitleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stream_kind_serializes_lowercase() {
        let json = serde_json::to_string(&StreamKind::Subtitle).unwrap();
        assert_eq!(json, "\"subtitle\"");
    }

    #[test]
    fn stream_kind_from_codec_type() {
        assert_eq!(StreamKind::from_codec_type("subtitle"), StreamKind::Subtitle);
        assert_eq!(StreamKind::from_codec_type("Subtitle"), StreamKind::Subtitle);
        assert_eq!(StreamKind::from_codec_type("video"), StreamKind::Other);
        assert_eq!(StreamKind::from_codec_type("audio"), StreamKind::Other);
        assert_eq!(StreamKind::from_codec_type(""), StreamKind::Other);
    }

    #[test]
    fn outcome_success_drives_record_persistence() {
        assert!(ExtractionOutcome::Completed.is_success());
        assert!(ExtractionOutcome::PartialFailure.is_success());
        assert!(!ExtractionOutcome::AlreadyDone.is_success());
        assert!(!ExtractionOutcome::NotNeeded.is_success());
        assert!(!ExtractionOutcome::FatalFailure.is_success());
    }

    #[test]
    fn kind_codec_matching_is_case_insensitive() {
        assert!(ASS_KIND.matches_codec("ass"));
        assert!(ASS_KIND.matches_codec("SSA"));
        assert!(!ASS_KIND.matches_codec("subrip"));
        assert!(SRT_KIND.matches_codec("mov_text"));
        assert!(SRT_KIND.matches_codec("subrip"));
        assert!(!SRT_KIND.matches_codec("hdmv_pgs_subtitle"));
    }

    #[test]
    fn kinds_differ_only_in_identifiers() {
        assert_eq!(SubtitleKind::all().len(), 2);
        assert_eq!(ASS_KIND.container, Some("mkv"));
        assert_eq!(SRT_KIND.container, None);
        assert_ne!(ASS_KIND.tag_key, SRT_KIND.tag_key);
    }
}
