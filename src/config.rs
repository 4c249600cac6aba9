use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::{Error, Result, Severity};

/// How non-fatal entries reach their files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryMode {
    /// Write synchronously on the calling thread.
    #[default]
    Direct,
    /// Enqueue for the background consumer.
    Queued,
}

/// Configuration for logging
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Directory holding one `<SEVERITY>.log` file per severity
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Direct or queued delivery
    #[serde(default)]
    pub mode: DeliveryMode,
    /// Echo every line to stdout (and ERROR lines to stderr)
    #[serde(default = "default_console")]
    pub console: bool,
    /// Minimum severity written. FATAL is never filtered.
    #[serde(default)]
    pub level: Severity,
    /// Attach call sites and OS error annotations
    #[serde(default = "default_debug")]
    pub debug: bool,
}

impl LogConfig {
    /// Create a new LogConfig with defaults
    pub fn new() -> Self {
        Self {
            output_dir: default_output_dir(),
            mode: DeliveryMode::default(),
            console: default_console(),
            level: Severity::default(),
            debug: default_debug(),
        }
    }

    /// Set the output directory
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Set the delivery mode
    pub fn with_mode(mut self, mode: DeliveryMode) -> Self {
        self.mode = mode;
        self
    }

    /// Enable console logging
    pub fn with_console(mut self, console: bool) -> Self {
        self.console = console;
        self
    }

    /// Set minimum severity
    pub fn with_level(mut self, level: Severity) -> Self {
        self.level = level;
        self
    }

    /// Enable debug annotations
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Whether an entry of `severity` passes the minimum-level filter.
    pub fn enabled(&self, severity: Severity) -> bool {
        severity == Severity::Fatal || severity >= self.level
    }

    /// Reject configurations the logger can't work with.
    pub fn validate(&self) -> Result<()> {
        if self.output_dir.as_os_str().is_empty() {
            return Err(Error::Config("output_dir must not be empty".to_string()));
        }
        Ok(())
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./output")
}

fn default_console() -> bool {
    true
}

fn default_debug() -> bool {
    cfg!(debug_assertions)
}
