//! Extraction state oracle.
//!
//! Answers "has this file already been fully processed for this family?"
//! from two truth sources that can disagree: the host's sidecar record and
//! the container's embedded tag, cross-checked against the probed streams
//! and the sidecar artifacts already on disk. Short-circuit order: record
//! store, probe, container restriction, unconditional override, then the
//! tag/artifact/stream table.

use std::fs;
use std::path::{Path, PathBuf};

use crate::models::EXTRACTED_TAG_VALUE;
use crate::records::is_truthy;

use super::types::Context;

/// Whether the file is already done for the context's subtitle family.
pub fn already_extracted(ctx: &Context, path: &Path) -> bool {
    let basename = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let directory = path.parent().unwrap_or_else(|| Path::new("."));

    // Fast path: the host already recorded this file as done.
    match ctx.records.get(directory, ctx.kind.name, &basename) {
        Ok(Some(value)) if is_truthy(&value) => {
            ctx.logger.debug(&format!(
                "'{}' recorded as previously extracted: {}",
                basename, value
            ));
            return true;
        }
        Ok(_) => {}
        Err(e) => {
            // A missing or corrupt record file is not decisive either way.
            tracing::warn!("Record store read failed for '{}': {}", basename, e);
        }
    }

    let report = match ctx.prober.probe(path) {
        Ok(report) => report,
        Err(e) => {
            // Unprobeable files are left to the worker stage, which
            // re-probes and safely no-ops.
            ctx.logger.debug(&format!(
                "'{}' is not a probeable media file: {}",
                path.display(),
                e
            ));
            return false;
        }
    };

    let tag = report.format_tag(ctx.kind.tag_key).unwrap_or_default();
    let has_target = report.has_target_subtitles(ctx.kind);
    let artifacts = existing_sidecars(path, ctx.kind.extension);

    if let Some(container) = ctx.kind.container {
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        if !extension.is_empty() && extension != container {
            ctx.logger.error(&format!(
                "'{}' is not {} format",
                path.display(),
                container
            ));
            return true;
        }
    }

    if ctx.settings.extract_regardless {
        ctx.logger
            .debug("Configured to extract regardless of previous extraction");
        return false;
    }

    if tag == EXTRACTED_TAG_VALUE && !artifacts.is_empty() {
        ctx.logger.debug(&format!(
            "'{}' already extracted and tagged; skipping",
            basename
        ));
        return true;
    }

    if !artifacts.is_empty() {
        ctx.logger.debug(&format!(
            "{} sidecar file(s) already exist for '{}'; skipping",
            artifacts.len(),
            basename
        ));
        return true;
    }

    if tag != EXTRACTED_TAG_VALUE && has_target {
        ctx.logger.debug(&format!(
            "No sidecars or tag for '{}' but target streams found; extraction needed",
            basename
        ));
        return false;
    }

    ctx.logger.debug(&format!(
        "No {} subtitles to extract from '{}'; nothing to do",
        ctx.kind.extension, basename
    ));
    true
}

/// Sidecar artifacts on disk matching `{stem}.*.{ext}` next to the file.
///
/// The middle component may be empty, matching glob semantics; a bare
/// `{stem}.{ext}` does not count.
pub fn existing_sidecars(path: &Path, extension: &str) -> Vec<PathBuf> {
    let Some(parent) = path.parent() else {
        return Vec::new();
    };
    let Some(stem) = path.file_stem().map(|s| s.to_string_lossy().to_string()) else {
        return Vec::new();
    };

    let prefix = format!("{}.", stem);
    let suffix = format!(".{}", extension);

    let Ok(entries) = fs::read_dir(parent) else {
        return Vec::new();
    };

    let mut found: Vec<PathBuf> = entries
        .flatten()
        .filter(|entry| {
            let name = entry.file_name().to_string_lossy().to_string();
            name.starts_with(&prefix)
                && name.ends_with(&suffix)
                && name.len() >= prefix.len() + suffix.len()
        })
        .map(|entry| entry.path())
        .collect();
    found.sort();
    found
}
