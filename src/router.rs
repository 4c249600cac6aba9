use once_cell::sync::OnceCell;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::severity::{Route, Severity};

/// File name stem for lines whose severity can't be determined.
pub const UNKNOWN_STEM: &str = "UNKNOWN";

/// Maps severities to `<output-dir>/<SEVERITY>.log`.
#[derive(Debug)]
pub struct LevelRouter {
    dir: PathBuf,
    failure_reported: OnceCell<()>,
}

impl LevelRouter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            failure_reported: OnceCell::new(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the output directory (recursively) if it doesn't exist.
    ///
    /// Safe to call repeatedly and from many threads. The first failure is
    /// reported on stderr; later failures are silent. Returns whether the
    /// directory is usable.
    pub fn ensure_dir(&self) -> bool {
        match std::fs::create_dir_all(&self.dir) {
            Ok(()) => true,
            Err(err) => {
                self.failure_reported.get_or_init(|| {
                    let _ = writeln!(
                        std::io::stderr().lock(),
                        "[LOGGER] Directory create failed: {} - {}",
                        self.dir.display(),
                        err
                    );
                });
                false
            }
        }
    }

    /// Path of the log file for `severity`, after ensuring the directory.
    pub fn path_for(&self, severity: Severity) -> PathBuf {
        self.path_for_stem(severity.as_str())
    }

    /// Path of the fallback file for malformed lines.
    pub fn fallback_path(&self) -> PathBuf {
        self.path_for_stem(UNKNOWN_STEM)
    }

    pub fn path_for_route(&self, route: Route) -> PathBuf {
        match route {
            Route::Level(severity) => self.path_for(severity),
            Route::Unknown => self.fallback_path(),
        }
    }

    fn path_for_stem(&self, stem: &str) -> PathBuf {
        self.ensure_dir();
        self.dir.join(format!("{}.log", stem))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_for_creates_dir() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let dir = tmp.path().join("nested/output");
        let router = LevelRouter::new(&dir);

        assert!(!dir.exists());
        let path = router.path_for(Severity::Info);
        assert!(dir.is_dir());
        assert_eq!(path, dir.join("INFO.log"));
    }

    #[test]
    fn test_every_severity_has_own_file() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let router = LevelRouter::new(tmp.path());
        for severity in Severity::ALL {
            let path = router.path_for(severity);
            assert_eq!(
                path.file_name().unwrap().to_string_lossy(),
                format!("{}.log", severity.as_str())
            );
        }
        assert_eq!(
            router.path_for_route(Route::Unknown),
            tmp.path().join("UNKNOWN.log")
        );
    }

    #[test]
    fn test_ensure_dir_is_idempotent() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let router = LevelRouter::new(tmp.path().join("out"));
        assert!(router.ensure_dir());

        let existing = router.path_for(Severity::Warn);
        std::fs::write(&existing, "kept\n").unwrap();

        for _ in 0..5 {
            assert!(router.ensure_dir());
        }
        assert_eq!(std::fs::read_to_string(&existing).unwrap(), "kept\n");
    }

    #[test]
    fn test_ensure_dir_concurrently() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let router = std::sync::Arc::new(LevelRouter::new(tmp.path().join("a/b/c")));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let router = router.clone();
                std::thread::spawn(move || router.ensure_dir())
            })
            .collect();
        for handle in handles {
            assert!(handle.join().unwrap());
        }
    }

    #[test]
    fn test_ensure_dir_failure_is_not_fatal() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let blocker = tmp.path().join("file");
        std::fs::write(&blocker, "not a dir").unwrap();

        let router = LevelRouter::new(blocker.join("sub"));
        assert!(!router.ensure_dir());
        assert!(!router.ensure_dir());
        // Path is still produced; opening it will fail later.
        assert_eq!(router.path_for(Severity::Error), blocker.join("sub/ERROR.log"));
    }
}
