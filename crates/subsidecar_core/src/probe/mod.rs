//! Media probing via ffprobe.
//!
//! The production prober shells out to `ffprobe` and normalizes its JSON
//! into a [`ProbeReport`]. Parsing is a pure function over the JSON value so
//! the decision logic can be tested without spawning anything.

use std::path::{Path, PathBuf};
use std::process::Command;

use serde_json::Value;
use thiserror::Error;

use crate::models::{ProbeReport, StreamDescriptor, StreamKind};

/// Errors from probing a file.
#[derive(Error, Debug)]
pub enum ProbeError {
    /// File not found.
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// Failed to execute ffprobe.
    #[error("Failed to run ffprobe: {0}")]
    Spawn(#[from] std::io::Error),

    /// ffprobe did not recognize the file as a media container.
    #[error("ffprobe failed with exit code {exit_code}: {message}")]
    ToolFailed { exit_code: i32, message: String },

    /// ffprobe produced output that is not valid JSON.
    #[error("Failed to parse ffprobe output: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Result type for probe operations.
pub type ProbeResult<T> = Result<T, ProbeError>;

/// Probing collaborator; hosts and tests supply their own.
pub trait Prober: Send + Sync {
    /// Probe a file, enumerating its streams and container metadata.
    fn probe(&self, path: &Path) -> ProbeResult<ProbeReport>;
}

/// Production prober backed by the ffprobe binary.
#[derive(Debug, Default)]
pub struct FfprobeProber;

impl Prober for FfprobeProber {
    fn probe(&self, path: &Path) -> ProbeResult<ProbeReport> {
        if !path.exists() {
            return Err(ProbeError::FileNotFound(path.to_path_buf()));
        }

        tracing::debug!("Probing file: {}", path.display());

        let output = Command::new("ffprobe")
            .args(["-v", "error", "-show_format", "-show_streams", "-of", "json"])
            .arg(path)
            .output()?;

        if !output.status.success() {
            return Err(ProbeError::ToolFailed {
                exit_code: output.status.code().unwrap_or(-1),
                message: String::from_utf8_lossy(&output.stderr).to_string(),
            });
        }

        let json: Value = serde_json::from_slice(&output.stdout)?;
        Ok(parse_probe_json(&json, path))
    }
}

/// Parse ffprobe JSON into a report.
///
/// Missing fields degrade to empty values rather than errors; a container
/// with no tags or no streams is still a valid probe result.
pub fn parse_probe_json(json: &Value, path: &Path) -> ProbeReport {
    let mut report = ProbeReport::new(path.to_path_buf());

    if let Some(format) = json.get("format") {
        report.format_name = format
            .get("format_name")
            .and_then(|v| v.as_str())
            .unwrap_or("")
            .to_string();

        report.duration_secs = format
            .get("duration")
            .and_then(|v| v.as_str())
            .and_then(|s| s.parse().ok());

        if let Some(tags) = format.get("tags").and_then(|t| t.as_object()) {
            for (key, value) in tags {
                if let Some(value) = value.as_str() {
                    report.format_tags.insert(key.clone(), value.to_string());
                }
            }
        }
    }

    if let Some(streams) = json.get("streams").and_then(|s| s.as_array()) {
        for stream in streams {
            report.streams.push(parse_stream(stream));
        }
    }

    report
}

/// Parse a single stream entry.
fn parse_stream(stream: &Value) -> StreamDescriptor {
    let index = stream.get("index").and_then(|v| v.as_u64()).unwrap_or(0) as usize;

    let codec_name = stream
        .get("codec_name")
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .to_lowercase();

    let codec_type = stream
        .get("codec_type")
        .and_then(|v| v.as_str())
        .unwrap_or("");

    let language = stream
        .get("tags")
        .and_then(|t| t.get("language"))
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .to_lowercase();

    StreamDescriptor {
        index,
        codec_name,
        language,
        kind: StreamKind::from_codec_type(codec_type),
    }
}
