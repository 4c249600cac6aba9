use std::fmt;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::JoinHandle;

use crate::entry::{LogEntry, Origin, OsErrorContext, QueuedLine};
use crate::queue::{LifecycleState, LogQueue};
use crate::router::LevelRouter;
use crate::writer::DirectWriter;
use crate::{DeliveryMode, Error, LifecycleGuard, LogConfig, Result, Severity};

/// Name of the background consumer thread.
pub const CONSUMER_THREAD_NAME: &str = "sevlog-consumer";

/// Exit status used after a FATAL entry has been written.
pub const FATAL_EXIT_CODE: i32 = 1;

struct Shared {
    config: LogConfig,
    writer: DirectWriter,
    queue: LogQueue,
    consumer: Mutex<Option<JoinHandle<usize>>>,
    enabled: AtomicBool,
}

/// Handle to a logger instance. Cheap to clone; all clones share the same
/// queue, consumer and files.
///
/// Logging operations never return errors and never panic. Failures to
/// write a file only cost that file its line; console output still happens.
#[derive(Clone)]
pub struct Logger {
    shared: Arc<Shared>,
}

impl Logger {
    pub fn new(config: LogConfig) -> Self {
        let writer = DirectWriter::new(LevelRouter::new(&config.output_dir), config.console);
        Self {
            shared: Arc::new(Shared {
                config,
                writer,
                queue: LogQueue::new(),
                consumer: Mutex::new(None),
                enabled: AtomicBool::new(true),
            }),
        }
    }

    pub fn config(&self) -> &LogConfig {
        &self.shared.config
    }

    pub fn output_dir(&self) -> &Path {
        self.shared.writer.router().dir()
    }

    pub fn state(&self) -> LifecycleState {
        self.shared.queue.lifecycle()
    }

    /// Entries accepted by the queue but not yet written.
    pub fn pending(&self) -> usize {
        self.shared.queue.len()
    }

    /// Silence or resume logging at runtime, e.g. while a progress animation
    /// owns the terminal. FATAL entries are still written.
    pub fn set_enabled(&self, enabled: bool) {
        self.shared.enabled.store(enabled, Ordering::Relaxed);
    }

    pub fn is_enabled(&self) -> bool {
        self.shared.enabled.load(Ordering::Relaxed)
    }

    /// Turn the stdout/stderr echo on or off. File output is unaffected.
    pub fn set_console_enabled(&self, enabled: bool) {
        self.shared.writer.set_console(enabled);
    }

    pub fn console_enabled(&self) -> bool {
        self.shared.writer.console()
    }

    /// Start the background consumer and return a guard that shuts it down
    /// when dropped.
    pub fn guard(&self) -> Result<LifecycleGuard> {
        LifecycleGuard::new(self.clone())
    }

    /// Start the background consumer. Starting a running logger is a no-op;
    /// a logger that has been shut down can't be restarted.
    pub fn start(&self) -> Result<()> {
        let mut slot = self
            .shared
            .consumer
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        match self.shared.queue.mark_running() {
            LifecycleState::Uninitialized => {}
            LifecycleState::Running => return Ok(()),
            LifecycleState::Draining | LifecycleState::Stopped => {
                return Err(Error::Init("logger has already been shut down".to_string()));
            }
        }

        let shared = Arc::clone(&self.shared);
        let spawned = std::thread::Builder::new()
            .name(CONSUMER_THREAD_NAME.to_string())
            .spawn(move || shared.queue.run_consumer(&shared.writer));

        match spawned {
            Ok(handle) => {
                *slot = Some(handle);
                tracing::debug!(dir = %self.output_dir().display(), "log consumer started");
                Ok(())
            }
            Err(err) => {
                drop(slot);
                self.shutdown();
                Err(Error::Io(err))
            }
        }
    }

    /// Signal shutdown, join the consumer and flush anything still queued.
    ///
    /// Idempotent and safe to call from several threads. When any call
    /// returns, every entry ever accepted by the queue has been written, and
    /// later queued logging falls back to direct writes.
    pub fn shutdown(&self) {
        let previous = self.shared.queue.begin_shutdown();

        // Held until the consumer has exited, so a concurrent caller can't
        // drain and mark the logger stopped while a line is still in flight.
        let mut slot = self
            .shared
            .consumer
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = slot.take()
            && handle.thread().id() != std::thread::current().id()
        {
            match handle.join() {
                Ok(written) => tracing::debug!(written, "log consumer stopped"),
                Err(_) => tracing::warn!("log consumer panicked; flushing remaining entries"),
            }
        }

        let residual = self.shared.queue.drain(&self.shared.writer);
        if residual > 0 {
            tracing::debug!(residual, "flushed residual log entries");
        }
        self.shared.queue.mark_stopped();
        drop(slot);

        if previous != LifecycleState::Stopped {
            tracing::trace!(?previous, "logger stopped");
        }
    }

    /// Log a formatted message without call-site information.
    pub fn log(&self, severity: Severity, args: fmt::Arguments<'_>) {
        self.log_at(severity, None, args);
    }

    /// Log a formatted message. `origin` is kept only in debug configuration.
    ///
    /// Entries below the configured level, or logged while the logger is
    /// disabled, are discarded. FATAL entries are always written directly
    /// and terminate the process.
    pub fn log_at(&self, severity: Severity, origin: Option<Origin>, args: fmt::Arguments<'_>) {
        if !self.shared.config.enabled(severity) {
            return;
        }
        if severity != Severity::Fatal && !self.is_enabled() {
            return;
        }
        let entry = self.build_entry(severity, origin, args);
        self.dispatch(entry);
    }

    fn build_entry(
        &self,
        severity: Severity,
        origin: Option<Origin>,
        args: fmt::Arguments<'_>,
    ) -> LogEntry {
        let debug = self.shared.config.debug;
        // Read before formatting so nothing below can clobber it.
        let os_error = if debug && severity.wants_os_error() {
            OsErrorContext::last()
        } else {
            None
        };

        let mut entry = LogEntry::new(severity, fmt::format(args));
        if debug && let Some(origin) = origin {
            entry = entry.with_origin(origin);
        }
        if let Some(os_error) = os_error {
            entry = entry.with_os_error(os_error);
        }
        entry
    }

    /// Deliver an entry according to the configured mode.
    pub fn dispatch(&self, entry: LogEntry) {
        match self.shared.config.mode {
            DeliveryMode::Direct => self.write_direct(entry),
            DeliveryMode::Queued => self.enqueue(entry),
        }
    }

    /// Write an entry synchronously. A FATAL entry terminates the process
    /// after it has been written.
    pub fn write_direct(&self, entry: LogEntry) {
        let fatal = entry.severity() == Severity::Fatal;
        self.shared.writer.write(entry);
        if fatal {
            self.terminate();
        }
    }

    /// Hand an entry to the background consumer.
    ///
    /// When no consumer is running (not started, draining or stopped) the
    /// entry is written synchronously, after anything still queued. FATAL
    /// entries are always written directly.
    pub fn enqueue(&self, entry: LogEntry) {
        if entry.severity() == Severity::Fatal {
            return self.write_direct(entry);
        }
        self.shared
            .queue
            .push_or_write(entry.into_queued(), &self.shared.writer);
    }

    /// Enqueue a pre-rendered line. Its severity is read from the leading
    /// `[TOKEN]`; lines without a recognizable token go to `UNKNOWN.log`.
    pub fn enqueue_raw(&self, line: impl Into<String>) {
        self.shared
            .queue
            .push_or_write(QueuedLine::raw(line), &self.shared.writer);
    }

    fn terminate(&self) -> ! {
        self.shutdown();
        std::process::exit(FATAL_EXIT_CODE);
    }

    pub fn trace(&self, message: &str) {
        self.log(Severity::Trace, format_args!("{}", message));
    }

    pub fn debug(&self, message: &str) {
        self.log(Severity::Debug, format_args!("{}", message));
    }

    pub fn info(&self, message: &str) {
        self.log(Severity::Info, format_args!("{}", message));
    }

    pub fn warn(&self, message: &str) {
        self.log(Severity::Warn, format_args!("{}", message));
    }

    pub fn error(&self, message: &str) {
        self.log(Severity::Error, format_args!("{}", message));
    }

    /// Write a FATAL entry and exit with [`FATAL_EXIT_CODE`].
    pub fn fatal(&self, message: &str) -> ! {
        let entry = self.build_entry(Severity::Fatal, None, format_args!("{}", message));
        self.shared.writer.write(entry);
        self.terminate()
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("config", &self.shared.config)
            .field("enabled", &self.is_enabled())
            .field("state", &self.state())
            .field("pending", &self.pending())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiet(dir: &Path) -> LogConfig {
        LogConfig::new()
            .with_output_dir(dir)
            .with_console(false)
            .with_debug(false)
    }

    fn read(dir: &Path, stem: &str) -> String {
        std::fs::read_to_string(dir.join(format!("{}.log", stem))).unwrap_or_default()
    }

    #[test]
    fn test_direct_mode_writes_immediately() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let logger = Logger::new(quiet(tmp.path()));

        logger.info("start");
        logger.warn("careful");

        assert!(read(tmp.path(), "INFO").ends_with("- start\n"));
        assert!(read(tmp.path(), "WARN").ends_with("- careful\n"));
        assert_eq!(logger.state(), LifecycleState::Uninitialized);
    }

    #[test]
    fn test_level_filter_drops_lower_severities() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let logger = Logger::new(quiet(tmp.path()).with_level(Severity::Warn));

        logger.debug("hidden");
        logger.info("hidden");
        logger.error("shown");

        assert!(!tmp.path().join("DEBUG.log").exists());
        assert!(!tmp.path().join("INFO.log").exists());
        assert!(read(tmp.path(), "ERROR").contains("shown"));
    }

    #[test]
    fn test_origin_only_in_debug_configuration() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let origin = Some(Origin::new("app::main", 7));

        Logger::new(quiet(tmp.path())).log_at(Severity::Info, origin, format_args!("plain"));
        Logger::new(quiet(tmp.path()).with_debug(true)).log_at(
            Severity::Info,
            origin,
            format_args!("annotated"),
        );

        let content = read(tmp.path(), "INFO");
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(!lines[0].contains("(app::main:7)"));
        assert!(lines[1].contains("(app::main:7) - annotated"));
    }

    #[test]
    fn test_queued_mode_before_start_falls_back_to_direct() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let logger = Logger::new(quiet(tmp.path()).with_mode(DeliveryMode::Queued));

        logger.info("not started yet");

        assert_eq!(logger.pending(), 0);
        assert!(read(tmp.path(), "INFO").contains("not started yet"));
    }

    #[test]
    fn test_queued_mode_flushes_on_shutdown() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let logger = Logger::new(quiet(tmp.path()).with_mode(DeliveryMode::Queued));
        logger.start().unwrap();
        assert_eq!(logger.state(), LifecycleState::Running);

        for n in 0..200 {
            logger.log(Severity::Debug, format_args!("line {}", n));
        }
        logger.shutdown();

        assert_eq!(logger.state(), LifecycleState::Stopped);
        assert_eq!(logger.pending(), 0);
        let content = read(tmp.path(), "DEBUG");
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 200);
        for (n, line) in lines.iter().enumerate() {
            assert!(line.ends_with(&format!("- line {}", n)), "out of order: {}", line);
        }
    }

    #[test]
    fn test_logging_after_shutdown_falls_back_to_direct() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let logger = Logger::new(quiet(tmp.path()).with_mode(DeliveryMode::Queued));
        logger.start().unwrap();
        logger.shutdown();

        logger.info("late");
        logger.enqueue_raw("[WARN] late raw");

        assert_eq!(logger.pending(), 0);
        assert!(read(tmp.path(), "INFO").contains("late"));
        assert_eq!(read(tmp.path(), "WARN"), "[WARN] late raw\n");
    }

    #[test]
    fn test_line_logged_while_draining_follows_queued_lines() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let logger = Logger::new(quiet(tmp.path()).with_mode(DeliveryMode::Queued));
        // No consumer: the first line stays queued until shutdown is signaled.
        logger.shared.queue.mark_running();
        logger.info("first");
        assert_eq!(logger.pending(), 1);

        logger.shared.queue.begin_shutdown();
        logger.info("second");
        logger.shutdown();

        let content = read(tmp.path(), "INFO");
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("- first"));
        assert!(lines[1].ends_with("- second"));
    }

    #[test]
    fn test_start_is_idempotent_and_not_restartable() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let logger = Logger::new(quiet(tmp.path()));
        logger.start().unwrap();
        logger.start().unwrap();
        logger.shutdown();
        logger.shutdown();
        assert!(matches!(logger.start(), Err(Error::Init(_))));
    }

    #[test]
    fn test_enqueue_raw_malformed_goes_to_unknown() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let logger = Logger::new(quiet(tmp.path()));
        logger.start().unwrap();
        logger.enqueue_raw("no severity token");
        logger.enqueue_raw("[INFO] well formed");
        logger.shutdown();

        assert_eq!(read(tmp.path(), "UNKNOWN"), "no severity token\n");
        assert_eq!(read(tmp.path(), "INFO"), "[INFO] well formed\n");
    }

    #[test]
    fn test_disabled_logger_drops_entries_until_reenabled() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let logger = Logger::new(quiet(tmp.path()).with_mode(DeliveryMode::Queued));
        logger.start().unwrap();

        logger.info("before");
        logger.set_enabled(false);
        assert!(!logger.is_enabled());
        logger.info("silenced");
        logger.error("silenced too");
        logger.set_enabled(true);
        logger.info("after");
        logger.shutdown();

        let info = read(tmp.path(), "INFO");
        let lines: Vec<_> = info.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("- before"));
        assert!(lines[1].ends_with("- after"));
        assert!(!tmp.path().join("ERROR.log").exists());
    }

    #[test]
    fn test_console_toggle_keeps_file_output() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let logger = Logger::new(quiet(tmp.path()).with_console(true));
        assert!(logger.console_enabled());

        logger.set_console_enabled(false);
        assert!(!logger.console_enabled());
        logger.warn("file only");
        let clone = logger.clone();
        clone.set_console_enabled(true);

        assert!(logger.console_enabled());
        assert!(read(tmp.path(), "WARN").ends_with("- file only\n"));
    }

    #[test]
    fn test_debug_impl_mentions_state() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let logger = Logger::new(quiet(tmp.path()));
        let rendered = format!("{:?}", logger);
        assert!(rendered.contains("Uninitialized"));
    }
}
