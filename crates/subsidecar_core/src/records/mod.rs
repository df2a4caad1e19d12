//! Per-directory sidecar record store.
//!
//! The host keeps a small record file next to the media files it has
//! processed, keyed by subtitle family and file basename. The record is one
//! of the two idempotency truth sources; it can be deleted independently of
//! the media file, so its absence never means "not done" on its own.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Name of the per-directory record file.
pub const RECORD_FILE_NAME: &str = ".unmanic";

/// Errors from record store operations.
#[derive(Error, Debug)]
pub enum RecordError {
    #[error("Failed to read record file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse record file {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Failed to write record file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Result type for record operations.
pub type RecordResult<T> = Result<T, RecordError>;

/// Host-managed record store collaborator.
pub trait RecordStore: Send + Sync {
    /// Look up the record for `(kind, basename)` in a directory.
    fn get(&self, directory: &Path, kind: &str, basename: &str) -> RecordResult<Option<String>>;

    /// Persist a record. Hosts call this after a successful run.
    fn set(&self, directory: &Path, kind: &str, basename: &str, value: &str) -> RecordResult<()>;
}

/// Record file schema: one table per family, basename -> value.
#[derive(Debug, Default, Serialize, Deserialize)]
struct RecordFile {
    #[serde(flatten)]
    kinds: BTreeMap<String, BTreeMap<String, String>>,
}

/// TOML-file implementation of the record store.
#[derive(Debug, Default)]
pub struct DirectoryRecords;

impl DirectoryRecords {
    fn record_path(directory: &Path) -> PathBuf {
        directory.join(RECORD_FILE_NAME)
    }

    fn load(path: &Path) -> RecordResult<RecordFile> {
        if !path.exists() {
            return Ok(RecordFile::default());
        }
        let raw = fs::read_to_string(path).map_err(|source| RecordError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&raw).map_err(|e| RecordError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}

impl RecordStore for DirectoryRecords {
    fn get(&self, directory: &Path, kind: &str, basename: &str) -> RecordResult<Option<String>> {
        let path = Self::record_path(directory);
        let file = Self::load(&path)?;
        Ok(file.kinds.get(kind).and_then(|t| t.get(basename)).cloned())
    }

    fn set(&self, directory: &Path, kind: &str, basename: &str, value: &str) -> RecordResult<()> {
        let path = Self::record_path(directory);
        let mut file = Self::load(&path)?;
        file.kinds
            .entry(kind.to_string())
            .or_default()
            .insert(basename.to_string(), value.to_string());

        let raw = toml::to_string_pretty(&file).map_err(|e| RecordError::Parse {
            path: path.clone(),
            message: e.to_string(),
        })?;

        // Atomic write: temp file, then rename.
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, raw).map_err(|source| RecordError::Write {
            path: path.clone(),
            source,
        })?;
        fs::rename(&tmp, &path).map_err(|source| RecordError::Write { path, source })
    }
}

/// Whether a stored record value means "already extracted".
pub fn is_truthy(value: &str) -> bool {
    let v = value.trim().to_lowercase();
    !v.is_empty() && v != "false" && v != "0" && v != "no"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_file_yields_no_record() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirectoryRecords;
        let record = store
            .get(dir.path(), "extract_ass_subtitles", "movie.mkv")
            .unwrap();
        assert_eq!(record, None);
    }

    #[test]
    fn set_then_get_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirectoryRecords;

        store
            .set(dir.path(), "extract_ass_subtitles", "movie.mkv", "true")
            .unwrap();
        store
            .set(dir.path(), "extract_srt_subtitles", "movie.mkv", "true")
            .unwrap();

        let record = store
            .get(dir.path(), "extract_ass_subtitles", "movie.mkv")
            .unwrap();
        assert_eq!(record, Some("true".to_string()));

        // Families are independent entries under the same file.
        let other = store
            .get(dir.path(), "extract_srt_subtitles", "other.mkv")
            .unwrap();
        assert_eq!(other, None);
    }

    #[test]
    fn corrupt_record_file_reports_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(RECORD_FILE_NAME), "not [valid toml").unwrap();

        let store = DirectoryRecords;
        let result = store.get(dir.path(), "extract_ass_subtitles", "movie.mkv");
        assert!(matches!(result, Err(RecordError::Parse { .. })));
    }

    #[test]
    fn truthiness_mirrors_host_semantics() {
        assert!(is_truthy("true"));
        assert!(is_truthy("1"));
        assert!(is_truthy("yes"));
        assert!(!is_truthy(""));
        assert!(!is_truthy("  "));
        assert!(!is_truthy("false"));
        assert!(!is_truthy("0"));
        assert!(!is_truthy("no"));
    }
}
