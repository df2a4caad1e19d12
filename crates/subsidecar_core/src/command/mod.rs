//! External tool invocation: argv builders, result classification, progress.
//!
//! Commands are built as plain argv vectors and executed through the
//! [`ToolRunner`] collaborator, so every decision over tool output is a pure
//! function of a captured [`CommandResult`] and can be tested without
//! spawning anything.

use std::io;
use std::path::Path;
use std::process::{Command, Stdio};

use thiserror::Error;

use crate::models::EXTRACTED_TAG_VALUE;
use crate::selection::ExtractionTarget;

/// The transcoding tool binary.
pub const FFMPEG_BIN: &str = "ffmpeg";

/// Options prepended to every extraction command.
const GENERIC_OPTIONS: &[&str] = &["-hide_banner", "-loglevel", "info"];

/// Errors spawning an external command.
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("Failed to run {tool}: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: io::Error,
    },
}

/// Captured outcome of one external command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandResult {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandResult {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Last `n` diagnostic lines, joined, for compact failure logging.
    pub fn stderr_tail(&self, n: usize) -> String {
        let lines: Vec<&str> = self.stderr.lines().collect();
        let start = lines.len().saturating_sub(n);
        lines[start..].join("\n")
    }
}

/// Classification of an extraction command's outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Exit code zero.
    Success,
    /// One or more `0:s:N` specifiers matched nothing; the remaining streams
    /// extracted. A benign race between probing and extraction.
    BenignStreamMismatch,
    /// Any other non-zero exit.
    Failure,
}

/// Classify an extraction result from its exit code and diagnostics.
pub fn classify(result: &CommandResult) -> Classification {
    if result.success() {
        return Classification::Success;
    }
    if result.stderr.contains("Stream map '0:s:") && result.stderr.contains("matches no streams") {
        return Classification::BenignStreamMismatch;
    }
    Classification::Failure
}

/// Build the single extraction invocation covering every target.
///
/// Shape: generic options, input, then per target a map specifier, a
/// stream-copy directive, and the output path. The `?` suffix keeps ffmpeg
/// from aborting outright when a probed stream has since disappeared.
pub fn extract_args(input: &Path, targets: &[ExtractionTarget]) -> Vec<String> {
    let mut args: Vec<String> = GENERIC_OPTIONS.iter().map(|s| s.to_string()).collect();
    args.push("-i".to_string());
    args.push(input.display().to_string());

    for target in targets {
        args.push("-map".to_string());
        args.push(format!("0:s:{}?", target.subtitle_index));
        args.push(format!("-c:s:{}", target.subtitle_index));
        args.push("copy".to_string());
        args.push("-y".to_string());
        args.push(target.output_path.display().to_string());
    }

    args
}

/// Build the metadata rewrite invocation.
///
/// Copies every stream verbatim, preserves existing metadata, sets the
/// family marker, and writes to a temporary output path.
pub fn tag_args(input: &Path, tag_key: &str, temp_output: &Path) -> Vec<String> {
    vec![
        "-i".to_string(),
        input.display().to_string(),
        "-map_metadata".to_string(),
        "0".to_string(),
        "-metadata".to_string(),
        format!("{}={}", tag_key, EXTRACTED_TAG_VALUE),
        "-c".to_string(),
        "copy".to_string(),
        "-y".to_string(),
        temp_output.display().to_string(),
    ]
}

/// Command execution collaborator.
pub trait ToolRunner: Send + Sync {
    /// Run a command to completion, capturing stdout and stderr.
    fn run(&self, program: &str, args: &[String]) -> Result<CommandResult, CommandError>;
}

/// Production runner over std::process.
#[derive(Debug, Default)]
pub struct SystemRunner;

impl ToolRunner for SystemRunner {
    fn run(&self, program: &str, args: &[String]) -> Result<CommandResult, CommandError> {
        tracing::debug!("Running: {} {}", program, args.join(" "));

        let output = Command::new(program)
            .args(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|source| CommandError::Spawn {
                tool: program.to_string(),
                source,
            })?;

        Ok(CommandResult {
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}

/// Parse one ffmpeg diagnostic line into a progress percentage.
///
/// ffmpeg reports `time=HH:MM:SS.cc` on stderr while muxing; with the
/// container duration known this yields a 0-100 percentage. Lines without a
/// parseable time (including `time=N/A`) yield `None`.
pub fn parse_progress(line: &str, duration_secs: Option<f64>) -> Option<u32> {
    let duration = duration_secs.filter(|d| *d > 0.0)?;
    let start = line.find("time=")? + "time=".len();
    let token: String = line[start..]
        .chars()
        .take_while(|c| !c.is_whitespace())
        .collect();
    let secs = parse_timestamp(&token)?;
    Some((secs / duration * 100.0).clamp(0.0, 100.0).round() as u32)
}

/// Parse `HH:MM:SS.cc` into seconds.
fn parse_timestamp(token: &str) -> Option<f64> {
    let mut parts = token.split(':');
    let hours: f64 = parts.next()?.parse().ok()?;
    let minutes: f64 = parts.next()?.parse().ok()?;
    let seconds: f64 = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some(hours * 3600.0 + minutes * 60.0 + seconds)
}
