//! Orchestrator context and execution plan types.

use std::path::PathBuf;
use std::sync::Arc;

use crate::command::{SystemRunner, ToolRunner};
use crate::config::Settings;
use crate::logging::JobLogger;
use crate::models::SubtitleKind;
use crate::probe::{FfprobeProber, Prober};
use crate::records::{DirectoryRecords, RecordStore};
use crate::selection::ExtractionTarget;

/// Read-only context for one file's processing run.
///
/// Owns the per-family configuration and the injected collaborators. The
/// host builds one per invocation; tests swap the collaborators for mocks.
pub struct Context {
    /// Subtitle family being processed.
    pub kind: &'static SubtitleKind,
    /// User settings for this family.
    pub settings: Settings,
    /// Directory for temporary tag-write outputs.
    pub cache_dir: PathBuf,
    /// Per-file logger.
    pub logger: Arc<JobLogger>,
    /// Probing collaborator.
    pub prober: Box<dyn Prober>,
    /// Command execution collaborator.
    pub runner: Box<dyn ToolRunner>,
    /// Sidecar record store collaborator.
    pub records: Box<dyn RecordStore>,
}

impl Context {
    /// Create a context with production collaborators.
    pub fn new(
        kind: &'static SubtitleKind,
        settings: Settings,
        cache_dir: PathBuf,
        logger: Arc<JobLogger>,
    ) -> Self {
        Self {
            kind,
            settings,
            cache_dir,
            logger,
            prober: Box::new(FfprobeProber),
            runner: Box::new(SystemRunner),
            records: Box::new(DirectoryRecords),
        }
    }

    /// Replace the probing collaborator.
    pub fn with_prober(mut self, prober: Box<dyn Prober>) -> Self {
        self.prober = prober;
        self
    }

    /// Replace the command execution collaborator.
    pub fn with_runner(mut self, runner: Box<dyn ToolRunner>) -> Self {
        self.runner = runner;
        self
    }

    /// Replace the record store collaborator.
    pub fn with_records(mut self, records: Box<dyn RecordStore>) -> Self {
        self.records = records;
        self
    }
}

/// Worker-hook output: the command the host should execute, plus the plan
/// it was built from.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionPlan {
    /// Program to invoke.
    pub program: String,
    /// Full argument vector.
    pub args: Vec<String>,
    /// Targets the arguments map, in emission order.
    pub targets: Vec<ExtractionTarget>,
    /// Container duration for progress parsing, when known.
    pub duration_secs: Option<f64>,
}

impl ExecutionPlan {
    /// Parse one line of the tool's diagnostic stream into a percentage.
    ///
    /// Suitable for the host's command-progress callback.
    pub fn parse_progress(&self, line: &str) -> Option<u32> {
        crate::command::parse_progress(line, self.duration_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ASS_KIND;

    #[test]
    fn context_builder_swaps_collaborators() {
        struct NoProbe;
        impl Prober for NoProbe {
            fn probe(
                &self,
                path: &std::path::Path,
            ) -> crate::probe::ProbeResult<crate::models::ProbeReport> {
                Err(crate::probe::ProbeError::FileNotFound(path.to_path_buf()))
            }
        }

        let ctx = Context::new(
            &ASS_KIND,
            Settings::default(),
            PathBuf::from("/tmp/cache"),
            Arc::new(JobLogger::sink("test")),
        )
        .with_prober(Box::new(NoProbe));

        assert!(ctx.prober.probe(std::path::Path::new("/x.mkv")).is_err());
    }

    #[test]
    fn plan_progress_uses_probed_duration() {
        let plan = ExecutionPlan {
            program: "ffmpeg".to_string(),
            args: Vec::new(),
            targets: Vec::new(),
            duration_secs: Some(120.0),
        };
        assert_eq!(plan.parse_progress("time=00:01:00.00"), Some(50));
        assert_eq!(plan.parse_progress("garbage"), None);
    }
}
