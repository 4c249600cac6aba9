//! Builder pattern for configuring a logger.
//!
//! This module provides a convenient builder API for configuring a
//! [`Logger`] and starting its background consumer in one chain of calls.
//!
//! # Example
//!
//! ```rust,no_run
//! use sevlog::{DeliveryMode, Severity};
//!
//! // Synchronous writes into ./output
//! let logger = sevlog::builder().with_console(true).logger();
//! logger.info("ready");
//!
//! // Background delivery; the guard flushes everything when dropped
//! let guard = sevlog::builder()
//!     .with_output_dir("/var/log/app")
//!     .with_mode(DeliveryMode::Queued)
//!     .with_level(Severity::Info)
//!     .start()
//!     .expect("Failed to start logging");
//! guard.logger().info("queued");
//! ```

use crate::tracing_init::init_logging;
use crate::{DeliveryMode, LifecycleGuard, LogConfig, Logger, Result, Severity};
use std::path::PathBuf;

/// A builder for configuring and initializing logging.
#[derive(Debug, Clone)]
pub struct LogBuilder {
    config: LogConfig,
}

impl LogBuilder {
    /// Create a new LogBuilder with default configuration.
    pub fn new() -> Self {
        Self {
            config: LogConfig::new(),
        }
    }

    /// Create a LogBuilder from an existing configuration.
    pub fn from_config(config: LogConfig) -> Self {
        Self { config }
    }

    /// Set the directory that receives the per-severity files.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config = self.config.with_output_dir(dir);
        self
    }

    /// Choose direct or queued delivery.
    pub fn with_mode(mut self, mode: DeliveryMode) -> Self {
        self.config = self.config.with_mode(mode);
        self
    }

    /// Enable or disable console echo.
    pub fn with_console(mut self, enabled: bool) -> Self {
        self.config = self.config.with_console(enabled);
        self
    }

    /// Set the minimum severity.
    pub fn with_level(mut self, level: Severity) -> Self {
        self.config = self.config.with_level(level);
        self
    }

    /// Attach call sites and OS error annotations to entries.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.config = self.config.with_debug(debug);
        self
    }

    /// Get the current configuration without initializing.
    pub fn build(self) -> LogConfig {
        self.config
    }

    /// Create a logger without starting its consumer.
    pub fn logger(self) -> Logger {
        Logger::new(self.config)
    }

    /// Create a logger and start its consumer.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the consumer
    /// thread can't be spawned.
    pub fn start(self) -> Result<LifecycleGuard> {
        self.config.validate()?;
        Logger::new(self.config).guard()
    }

    /// Start a logger and install it as the global `tracing` subscriber.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The tracing subscriber is already initialized
    /// - The consumer thread can't be spawned
    /// - Invalid configuration is provided
    pub fn init(self) -> Result<LifecycleGuard> {
        init_logging(&self.config, None)
    }
}

impl Default for LogBuilder {
    fn default() -> Self {
        Self::new()
    }
}
