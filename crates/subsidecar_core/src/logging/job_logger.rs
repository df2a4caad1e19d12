//! Per-file logger with file and callback output.
//!
//! Each processed file gets its own logger that writes to a dedicated log
//! file, forwards lines to an optional host callback, and keeps a bounded
//! tail of external-tool output for diagnosis when a command fails.

use std::collections::VecDeque;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::Local;
use parking_lot::Mutex;

use super::types::{LogCallback, LogConfig, LogLevel, MessagePrefix};

/// Logger scoped to a single file's processing run.
pub struct JobLogger {
    /// Job name for identification.
    job_name: String,
    /// Path to the log file (empty for sink loggers).
    log_path: PathBuf,
    /// File writer (buffered).
    file_writer: Mutex<Option<BufWriter<File>>>,
    /// Host callback for forwarding lines.
    callback: Mutex<Option<LogCallback>>,
    /// Logging configuration.
    config: LogConfig,
    /// Tail buffer of recent tool output.
    tail_buffer: Mutex<VecDeque<String>>,
    /// Last progress value logged (for step filtering).
    last_progress: Mutex<u32>,
}

impl JobLogger {
    /// Create a new job logger writing to `{log_dir}/{job_name}.log`.
    pub fn new(
        job_name: impl Into<String>,
        log_dir: impl AsRef<Path>,
        config: LogConfig,
        callback: Option<LogCallback>,
    ) -> std::io::Result<Self> {
        let job_name = job_name.into();
        let log_dir = log_dir.as_ref();

        fs::create_dir_all(log_dir)?;
        let log_path = log_dir.join(format!("{}.log", sanitize_filename(&job_name)));
        let file = File::create(&log_path)?;
        let tail_capacity = config.error_tail.max(1);

        Ok(Self {
            job_name,
            log_path,
            file_writer: Mutex::new(Some(BufWriter::new(file))),
            callback: Mutex::new(callback),
            config,
            tail_buffer: Mutex::new(VecDeque::with_capacity(tail_capacity)),
            last_progress: Mutex::new(0),
        })
    }

    /// Create a logger that discards output.
    ///
    /// For tests and hosts that configure their own logging.
    pub fn sink(job_name: impl Into<String>) -> Self {
        Self {
            job_name: job_name.into(),
            log_path: PathBuf::new(),
            file_writer: Mutex::new(None),
            callback: Mutex::new(None),
            config: LogConfig::default(),
            tail_buffer: Mutex::new(VecDeque::new()),
            last_progress: Mutex::new(0),
        }
    }

    /// Get the job name.
    pub fn job_name(&self) -> &str {
        &self.job_name
    }

    /// Get the log file path.
    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    /// Log a message at the specified level.
    pub fn log(&self, level: LogLevel, message: &str) {
        if level < self.config.level {
            return;
        }
        let formatted = self.format_message(message);
        self.output(&formatted);
    }

    /// Log an info message.
    pub fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    /// Log a debug message.
    pub fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message);
    }

    /// Log a warning message.
    pub fn warn(&self, message: &str) {
        let msg = MessagePrefix::Warning.format(message);
        self.log(LogLevel::Warn, &msg);
    }

    /// Log an error message.
    pub fn error(&self, message: &str) {
        let msg = MessagePrefix::Error.format(message);
        self.log(LogLevel::Error, &msg);
    }

    /// Log a command being executed.
    pub fn command(&self, command: &str) {
        let msg = MessagePrefix::Command.format(command);
        self.log(LogLevel::Info, &msg);
    }

    /// Log a success message.
    pub fn success(&self, message: &str) {
        let msg = MessagePrefix::Success.format(message);
        self.log(LogLevel::Info, &msg);
    }

    /// Log a progress update, filtered to step intervals.
    ///
    /// Returns true if the progress was logged, false if filtered.
    pub fn progress(&self, percent: u32) -> bool {
        {
            let mut last = self.last_progress.lock();
            let step = self.config.progress_step.max(1);

            let current_step = (percent / step) * step;
            let last_step = (*last / step) * step;
            if current_step <= last_step && percent < 100 && percent != 0 {
                return false;
            }
            *last = percent;
        }

        self.log(LogLevel::Info, &format!("Progress: {}%", percent));
        true
    }

    /// Record a line of external-tool output in the tail buffer.
    pub fn output_line(&self, line: &str) {
        let mut buffer = self.tail_buffer.lock();
        if buffer.len() >= self.config.error_tail {
            buffer.pop_front();
        }
        buffer.push_back(line.to_string());
    }

    /// Show the tail buffer (typically after an error).
    pub fn show_tail(&self, header: &str) {
        let lines: Vec<String> = self.tail_buffer.lock().iter().cloned().collect();
        if lines.is_empty() {
            return;
        }
        self.output(&self.format_message(&format!("[{}/tail]", header)));
        for line in &lines {
            self.output(&self.format_message(line));
        }
    }

    /// Get the current tail buffer contents.
    pub fn tail(&self) -> Vec<String> {
        self.tail_buffer.lock().iter().cloned().collect()
    }

    /// Flush the log file.
    pub fn flush(&self) {
        if let Some(ref mut writer) = *self.file_writer.lock() {
            let _ = writer.flush();
        }
    }

    /// Format a message with timestamp (if enabled).
    fn format_message(&self, message: &str) -> String {
        if self.config.show_timestamps {
            let timestamp = Local::now().format("%H:%M:%S");
            format!("[{}] {}", timestamp, message)
        } else {
            message.to_string()
        }
    }

    /// Output a formatted line to file and callback.
    fn output(&self, formatted: &str) {
        if let Some(ref mut writer) = *self.file_writer.lock() {
            let _ = writeln!(writer, "{}", formatted);
        }
        if let Some(ref callback) = *self.callback.lock() {
            callback(formatted);
        }
    }
}

impl Drop for JobLogger {
    fn drop(&mut self) {
        self.flush();
    }
}

/// Replace filename-hostile characters so any job name maps to a log file.
fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_log_file() {
        let dir = tempfile::tempdir().unwrap();
        let logger = JobLogger::new("movie.mkv", dir.path(), LogConfig::default(), None).unwrap();

        logger.info("Starting extraction");
        logger.command("ffmpeg -i movie.mkv");
        logger.flush();

        let contents = fs::read_to_string(logger.log_path()).unwrap();
        assert!(contents.contains("Starting extraction"));
        assert!(contents.contains("$ ffmpeg -i movie.mkv"));
    }

    #[test]
    fn level_filtering_drops_debug_by_default() {
        let dir = tempfile::tempdir().unwrap();
        let logger = JobLogger::new("job", dir.path(), LogConfig::default(), None).unwrap();

        logger.debug("hidden");
        logger.info("visible");
        logger.flush();

        let contents = fs::read_to_string(logger.log_path()).unwrap();
        assert!(!contents.contains("hidden"));
        assert!(contents.contains("visible"));
    }

    #[test]
    fn progress_is_step_filtered() {
        let logger = JobLogger::sink("job");
        assert!(logger.progress(0));
        assert!(!logger.progress(5));
        assert!(!logger.progress(19));
        assert!(logger.progress(20));
        assert!(!logger.progress(21));
        assert!(logger.progress(100));
    }

    #[test]
    fn tail_buffer_is_bounded() {
        let logger = JobLogger::sink("job");
        for i in 0..50 {
            logger.output_line(&format!("line {}", i));
        }
        let tail = logger.tail();
        assert_eq!(tail.len(), LogConfig::default().error_tail);
        assert_eq!(tail.last().unwrap(), "line 49");
    }

    #[test]
    fn sanitizes_job_names() {
        assert_eq!(sanitize_filename("movie (2024).mkv"), "movie__2024_.mkv");
        assert_eq!(sanitize_filename("a/b\\c"), "a_b_c");
    }
}
