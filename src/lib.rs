//! # Sevlog
//!
//! Thread-safe logging into one file per severity, with a synchronous
//! write path and a background delivery queue.
//!
//! ## Features
//!
//! - Six severities (`TRACE` .. `FATAL`), each appended to `<dir>/<SEVERITY>.log`
//! - Direct (synchronous) or queued (background thread) delivery
//! - Deterministic shutdown: a guard flushes every queued entry
//! - `FATAL` entries are written synchronously, then the process exits
//! - Integration with the `tracing` ecosystem
//!
//! ## Example
//!
//! ```rust,no_run
//! use sevlog::{DeliveryMode, LogConfig, Logger, log_error, log_info};
//!
//! let logger = Logger::new(LogConfig::new().with_mode(DeliveryMode::Queued));
//! let _guard = logger.guard()?;
//!
//! log_info!(logger, "start");
//! log_error!(logger, "boom");
//! # Ok::<(), sevlog::Error>(())
//! ```

pub mod macros;

pub mod backend;
pub mod builder;
pub mod config;
pub mod entry;
pub mod error;
pub mod guard;
pub mod logger;
pub mod queue;
pub mod router;
pub mod severity;
pub mod timestamp;
pub mod tracing_init;
pub mod writer;

pub use backend::{BackendCommand, BackendStatus, ModelBackend, ValidationOutcome, run_command};
pub use builder::LogBuilder;
pub use config::{DeliveryMode, LogConfig};
pub use entry::{LogEntry, MAX_BODY_BYTES, Origin, OsErrorContext};
pub use error::{Error, Result};
pub use guard::LifecycleGuard;
pub use logger::{FATAL_EXIT_CODE, Logger};
pub use queue::{LifecycleState, LogQueue};
pub use router::LevelRouter;
pub use severity::{Route, Severity};
pub use timestamp::TimestampFormatter;
pub use tracing_init::{SeverityLayer, init_logging};
pub use writer::DirectWriter;

/// Start configuring a logger.
pub fn builder() -> LogBuilder {
    LogBuilder::new()
}
