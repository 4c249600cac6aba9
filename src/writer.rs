use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::entry::{LogEntry, QueuedLine};
use crate::router::LevelRouter;
use crate::severity::{Route, Severity};

/// Synchronous writer shared by the direct path and the queue drain.
///
/// All file and console output goes through one process-wide I/O lock, so
/// lines for the same file are totally ordered and never interleave.
#[derive(Debug)]
pub struct DirectWriter {
    router: LevelRouter,
    console: AtomicBool,
    io_lock: Mutex<()>,
}

impl DirectWriter {
    pub fn new(router: LevelRouter, console: bool) -> Self {
        Self {
            router,
            console: AtomicBool::new(console),
            io_lock: Mutex::new(()),
        }
    }

    pub fn router(&self) -> &LevelRouter {
        &self.router
    }

    pub fn console(&self) -> bool {
        self.console.load(Ordering::Relaxed)
    }

    /// Takes effect for the next line written.
    pub fn set_console(&self, enabled: bool) {
        self.console.store(enabled, Ordering::Relaxed);
    }

    /// Acquire the I/O lock. Poisoning is ignored: a panic elsewhere must
    /// not stop the logger.
    pub fn lock(&self) -> MutexGuard<'_, ()> {
        self.io_lock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Render and write an entry immediately.
    pub fn write(&self, entry: LogEntry) {
        let queued = entry.into_queued();
        let _io = self.lock();
        self.write_locked(&queued);
    }

    /// Write a queued line. The caller must hold [`DirectWriter::lock`].
    ///
    /// A file that can't be opened or written degrades to console-only
    /// output for this line.
    pub(crate) fn write_locked(&self, queued: &QueuedLine) {
        let path = self.router.path_for_route(queued.route);
        let _ = append_line(&path, &queued.line);

        if self.console() {
            let _ = io::stdout().lock().write_all(queued.line.as_bytes());
            if queued.route == Route::Level(Severity::Error) {
                let _ = io::stderr().lock().write_all(queued.line.as_bytes());
            }
        }
    }
}

/// Open `path` in append mode, write `line`, flush and close.
pub fn append_line(path: &Path, line: &str) -> io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(line.as_bytes())?;
    file.flush()
}
