//! Worker-stage orchestration: plan, execute, classify, finalize.
//!
//! One invocation processes one file to completion. There are no retries
//! here; idempotency comes from the oracle re-evaluating from scratch on the
//! host's next pass, not from remembered attempt counts.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::command::{self, Classification, FFMPEG_BIN};
use crate::models::{ExtractionOutcome, EXTRACTED_TAG_VALUE};
use crate::selection;

use super::oracle;
use super::types::{Context, ExecutionPlan};

/// Errors from the metadata tag-write step.
///
/// Never propagated out of [`run`]: a failed tag write degrades idempotency
/// (a later pass may re-plan the extraction), it does not lose extracted
/// data.
#[derive(Error, Debug)]
pub enum TagWriteError {
    #[error("Failed to prepare cache directory {path}: {source}")]
    CacheDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to spawn tag write: {0}")]
    Spawn(#[from] command::CommandError),

    #[error("Tag write failed with exit code {exit_code}: {message}")]
    CommandFailed { exit_code: i32, message: String },

    #[error("Failed to replace {path}: {source}")]
    Replace {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Library file-test hook: does this file still need subtitle extraction?
pub fn needs_processing(ctx: &Context, path: &Path) -> bool {
    if oracle::already_extracted(ctx, path) {
        ctx.logger.debug(&format!(
            "'{}' needs no {} subtitle extraction",
            path.display(),
            ctx.kind.extension
        ));
        return false;
    }
    ctx.logger.info(&format!(
        "'{}' has {} subtitle streams to extract",
        path.display(),
        ctx.kind.extension
    ));
    true
}

/// Worker hook: build the extraction command for a file.
///
/// Returns `None` when the file cannot be probed, when no streams qualify,
/// or when the oracle reports the file done — in all three cases the host
/// must not execute anything.
pub fn build_plan(ctx: &Context, file_in: &Path, original_path: &Path) -> Option<ExecutionPlan> {
    let plan = plan_streams(ctx, file_in, original_path)?;
    if oracle::already_extracted(ctx, file_in) {
        ctx.logger.debug(&format!(
            "Skipping '{}': already extracted",
            file_in.display()
        ));
        return None;
    }
    Some(plan)
}

/// Probe and select, without consulting the oracle.
fn plan_streams(ctx: &Context, file_in: &Path, original_path: &Path) -> Option<ExecutionPlan> {
    let report = match ctx.prober.probe(file_in) {
        Ok(report) => report,
        Err(e) => {
            ctx.logger.debug(&format!(
                "'{}' is not a probeable media file: {}",
                file_in.display(),
                e
            ));
            return None;
        }
    };

    let filter = ctx.settings.language_filter();
    let targets = selection::plan_targets(original_path, &report.streams, &filter, ctx.kind);
    if targets.is_empty() {
        ctx.logger.debug(&format!(
            "No qualifying {} subtitle streams in '{}'",
            ctx.kind.extension,
            file_in.display()
        ));
        return None;
    }

    let args = command::extract_args(file_in, &targets);
    Some(ExecutionPlan {
        program: FFMPEG_BIN.to_string(),
        args,
        targets,
        duration_secs: report.duration_secs,
    })
}

/// Process one file to completion.
///
/// State machine: `NotNeeded` (nothing to extract) and `AlreadyDone` (oracle
/// gate) exit before any side effect; a running extraction ends in
/// `FatalFailure` (nothing mutated), `Completed`, or `PartialFailure`. The
/// host persists its sidecar record from the returned outcome.
pub fn run(ctx: &Context, file_in: &Path, original_path: &Path) -> ExtractionOutcome {
    let Some(plan) = plan_streams(ctx, file_in, original_path) else {
        return ExtractionOutcome::NotNeeded;
    };

    if oracle::already_extracted(ctx, file_in) {
        return ExtractionOutcome::AlreadyDone;
    }

    ctx.logger.command(&format!("{} {}", plan.program, plan.args.join(" ")));
    let result = match ctx.runner.run(&plan.program, &plan.args) {
        Ok(result) => result,
        Err(e) => {
            ctx.logger.error(&format!("{}", e));
            return ExtractionOutcome::FatalFailure;
        }
    };

    let partial = match command::classify(&result) {
        Classification::Success => false,
        Classification::BenignStreamMismatch => {
            ctx.logger.warn(
                "Some stream mappings matched no streams; continuing with metadata update",
            );
            true
        }
        Classification::Failure => {
            ctx.logger.error(&format!(
                "{} exited with code {}: {}",
                plan.program,
                result.exit_code,
                result.stderr_tail(10)
            ));
            return ExtractionOutcome::FatalFailure;
        }
    };

    // Sidecars are on disk now; tagging failures must not undo that.
    if let Err(e) = write_extracted_tag(ctx, file_in) {
        ctx.logger.warn(&format!(
            "Failed to tag '{}' as extracted: {}",
            file_in.display(),
            e
        ));
    }

    if partial {
        ExtractionOutcome::PartialFailure
    } else {
        ctx.logger.success(&format!(
            "Extracted {} subtitle stream(s) from '{}'",
            plan.targets.len(),
            file_in.display()
        ));
        ExtractionOutcome::Completed
    }
}

/// Write the family marker into the container's metadata, atomically.
///
/// ffmpeg stream-copies the file to a temporary output in the cache
/// directory; the original is replaced only after that command succeeds. A
/// stale temporary from an interrupted run is removed first, so crashes
/// between write and replace never accumulate garbage under the same name.
fn write_extracted_tag(ctx: &Context, path: &Path) -> Result<(), TagWriteError> {
    fs::create_dir_all(&ctx.cache_dir).map_err(|source| TagWriteError::CacheDir {
        path: ctx.cache_dir.clone(),
        source,
    })?;

    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "output".to_string());
    let temp_output = ctx.cache_dir.join(format!("{}_tagged.mkv", stem));
    if temp_output.exists() {
        tracing::debug!("Removing stale temporary {}", temp_output.display());
        let _ = fs::remove_file(&temp_output);
    }

    let args = command::tag_args(path, ctx.kind.tag_key, &temp_output);
    ctx.logger.command(&format!("{} {}", FFMPEG_BIN, args.join(" ")));

    let result = ctx.runner.run(FFMPEG_BIN, &args)?;
    if !result.success() {
        return Err(TagWriteError::CommandFailed {
            exit_code: result.exit_code,
            message: result.stderr_tail(5),
        });
    }

    replace_file(&temp_output, path).map_err(|source| TagWriteError::Replace {
        path: path.to_path_buf(),
        source,
    })?;

    ctx.logger.info(&format!(
        "Tagged '{}' with {}={}",
        path.display(),
        ctx.kind.tag_key,
        EXTRACTED_TAG_VALUE
    ));
    Ok(())
}

/// Rename, falling back to copy+remove when the cache directory sits on a
/// different filesystem.
fn replace_file(from: &Path, to: &Path) -> io::Result<()> {
    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(_) => {
            fs::copy(from, to)?;
            fs::remove_file(from)
        }
    }
}
