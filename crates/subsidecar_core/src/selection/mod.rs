//! Stream selection and extraction-target mapping.
//!
//! Walks probed streams in container order and builds one extraction target
//! per qualifying subtitle stream. Targets carry the ffmpeg `0:s:N` subtitle
//! index, not the global stream index: `N` counts every subtitle stream in
//! the container, qualifying or not, so the specifier the command uses lines
//! up with what the tool sees.

use std::path::{Path, PathBuf};

use crate::config::LanguageFilter;
use crate::models::{StreamDescriptor, SubtitleKind};

/// One planned extraction, consumed once by the orchestrator.
///
/// Never mutated after creation; discarded after the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionTarget {
    /// Zero-based index among the container's subtitle streams.
    pub subtitle_index: usize,
    /// Normalized language tag; may be empty.
    pub subtitle_tag: String,
    /// Planned sidecar path.
    pub output_path: PathBuf,
}

/// Build the extraction plan for a file.
///
/// `original_path` anchors the sidecar filenames: extraction may read from a
/// working copy while the sidecars land next to the library file. The result
/// is deterministic and order-stable; an empty result means the extraction
/// command must not run.
pub fn plan_targets(
    original_path: &Path,
    streams: &[StreamDescriptor],
    filter: &LanguageFilter,
    kind: &SubtitleKind,
) -> Vec<ExtractionTarget> {
    let mut targets = Vec::new();
    let mut subtitle_index = 0usize;

    for stream in streams {
        if !stream.is_subtitle() {
            continue;
        }
        let index = subtitle_index;
        subtitle_index += 1;

        if !kind.matches_codec(&stream.codec_name) {
            tracing::debug!(
                "Stream {} skipped (codec: {})",
                stream.index,
                stream.codec_name
            );
            continue;
        }
        if !filter.matches(&stream.language) {
            tracing::debug!(
                "Stream {} skipped (language: '{}')",
                stream.index,
                stream.language
            );
            continue;
        }

        targets.push(ExtractionTarget {
            subtitle_index: index,
            subtitle_tag: stream.language.clone(),
            output_path: sidecar_path(original_path, &stream.language, index, kind.extension),
        });
    }

    targets
}

/// Sidecar naming: `{base}.unmanic.{tag}.{index}.{ext}`.
///
/// `(tag, index)` pairs are unique within one run because the index never
/// repeats, so names cannot collide even when language tags do.
pub fn sidecar_path(
    original_path: &Path,
    subtitle_tag: &str,
    subtitle_index: usize,
    extension: &str,
) -> PathBuf {
    let stem = original_path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let name = format!(
        "{}.unmanic.{}.{}.{}",
        stem, subtitle_tag, subtitle_index, extension
    );
    original_path.with_file_name(name)
}
