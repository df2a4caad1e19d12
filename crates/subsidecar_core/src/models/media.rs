//! Stream and probe data structures.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::enums::{StreamKind, SubtitleKind};

/// Normalized snapshot of one stream from a single probe call.
///
/// Immutable once built; codec and language are stored lowercase so the
/// selection logic never has to normalize again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamDescriptor {
    /// Global stream index within the container.
    pub index: usize,
    /// Codec name (ffprobe `codec_name`), lowercase.
    #[serde(default)]
    pub codec_name: String,
    /// Language tag, lowercase; empty when the stream carries none.
    #[serde(default)]
    pub language: String,
    /// Coarse stream classification.
    pub kind: StreamKind,
}

impl StreamDescriptor {
    /// Create a subtitle stream descriptor.
    pub fn subtitle(index: usize, codec_name: &str, language: &str) -> Self {
        Self {
            index,
            codec_name: codec_name.to_lowercase(),
            language: language.to_lowercase(),
            kind: StreamKind::Subtitle,
        }
    }

    /// Create a non-subtitle stream descriptor.
    pub fn other(index: usize, codec_name: &str) -> Self {
        Self {
            index,
            codec_name: codec_name.to_lowercase(),
            language: String::new(),
            kind: StreamKind::Other,
        }
    }

    pub fn is_subtitle(&self) -> bool {
        self.kind == StreamKind::Subtitle
    }
}

/// Parsed result of probing one media file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProbeReport {
    /// File that was probed.
    pub path: PathBuf,
    /// Container format name (ffprobe `format.format_name`).
    #[serde(default)]
    pub format_name: String,
    /// Container-level metadata tags, keys as reported by the tool.
    #[serde(default)]
    pub format_tags: HashMap<String, String>,
    /// Container duration in seconds, when reported.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_secs: Option<f64>,
    /// All streams in container order.
    #[serde(default)]
    pub streams: Vec<StreamDescriptor>,
}

impl ProbeReport {
    /// Create an empty report for a path.
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            ..Default::default()
        }
    }

    /// Look up a format tag by key, case-insensitively, value lowercased.
    ///
    /// Muxers disagree on tag-key casing, so the lookup cannot be exact.
    pub fn format_tag(&self, key: &str) -> Option<String> {
        self.format_tags
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.to_lowercase())
    }

    /// Iterate subtitle streams in container order.
    pub fn subtitle_streams(&self) -> impl Iterator<Item = &StreamDescriptor> {
        self.streams.iter().filter(|s| s.is_subtitle())
    }

    /// Whether any subtitle stream matches the family's codec set.
    pub fn has_target_subtitles(&self, kind: &SubtitleKind) -> bool {
        self.subtitle_streams()
            .any(|s| kind.matches_codec(&s.codec_name))
    }
}
