//! Shared collaborator mocks for orchestrator tests.

use std::collections::{HashMap, VecDeque};
use std::path::Path;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::command::{CommandError, CommandResult, ToolRunner};
use crate::models::ProbeReport;
use crate::probe::{ProbeError, ProbeResult, Prober};
use crate::records::{RecordResult, RecordStore};

/// Prober returning a fixed report, or a tool failure when none is set.
pub struct FixedProber {
    report: Option<ProbeReport>,
}

impl FixedProber {
    pub fn returning(report: ProbeReport) -> Self {
        Self {
            report: Some(report),
        }
    }

    pub fn unprobeable() -> Self {
        Self { report: None }
    }
}

impl Prober for FixedProber {
    fn probe(&self, path: &Path) -> ProbeResult<ProbeReport> {
        match &self.report {
            Some(report) => Ok(report.clone()),
            None => Err(ProbeError::ToolFailed {
                exit_code: 1,
                message: format!("{}: Invalid data found when processing input", path.display()),
            }),
        }
    }
}

/// In-memory record store keyed by (kind, basename); ignores the directory.
#[derive(Default)]
pub struct MapRecords {
    entries: Mutex<HashMap<(String, String), String>>,
}

impl MapRecords {
    pub fn with_entry(kind: &str, basename: &str, value: &str) -> Self {
        let records = Self::default();
        records.entries.lock().insert(
            (kind.to_string(), basename.to_string()),
            value.to_string(),
        );
        records
    }
}

impl RecordStore for MapRecords {
    fn get(&self, _directory: &Path, kind: &str, basename: &str) -> RecordResult<Option<String>> {
        Ok(self
            .entries
            .lock()
            .get(&(kind.to_string(), basename.to_string()))
            .cloned())
    }

    fn set(&self, _directory: &Path, kind: &str, basename: &str, value: &str) -> RecordResult<()> {
        self.entries.lock().insert(
            (kind.to_string(), basename.to_string()),
            value.to_string(),
        );
        Ok(())
    }
}

/// Runner that replays scripted results and records every invocation.
///
/// When `create_outputs` is set, the file named by each command's final
/// argument is written, mimicking ffmpeg producing its `-y` output.
pub struct ScriptedRunner {
    calls: Mutex<Vec<Vec<String>>>,
    results: Mutex<VecDeque<CommandResult>>,
    create_outputs: bool,
}

impl ScriptedRunner {
    pub fn new(results: Vec<CommandResult>, create_outputs: bool) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            results: Mutex::new(results.into()),
            create_outputs,
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    pub fn call(&self, index: usize) -> Vec<String> {
        self.calls.lock()[index].clone()
    }
}

impl ToolRunner for Arc<ScriptedRunner> {
    fn run(&self, _program: &str, args: &[String]) -> Result<CommandResult, CommandError> {
        self.calls.lock().push(args.to_vec());
        if self.create_outputs {
            if let Some(out) = args.last() {
                let _ = std::fs::write(out, b"tool output");
            }
        }
        Ok(self.results.lock().pop_front().unwrap_or_default())
    }
}

/// A result with the given exit code and stderr.
pub fn command_result(exit_code: i32, stderr: &str) -> CommandResult {
    CommandResult {
        exit_code,
        stdout: String::new(),
        stderr: stderr.to_string(),
    }
}
