use std::fmt;

use crate::severity::{Route, Severity};
use crate::timestamp::TimestampFormatter;

/// Maximum size of a formatted message body in bytes. Longer bodies are
/// truncated on a character boundary.
pub const MAX_BODY_BYTES: usize = 4096;

/// Call site of a log statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Origin {
    /// Module path (or function name) of the caller.
    pub location: &'static str,
    /// Source line of the caller.
    pub line: u32,
}

impl Origin {
    pub const fn new(location: &'static str, line: u32) -> Self {
        Self { location, line }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.location, self.line)
    }
}

/// A pending OS error observed when an ERROR or FATAL entry was created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OsErrorContext {
    pub code: i32,
    pub description: String,
}

impl OsErrorContext {
    /// Capture the calling thread's last OS error, if one is set.
    pub fn last() -> Option<Self> {
        std::io::Error::last_os_error()
            .raw_os_error()
            .and_then(Self::from_code)
    }

    pub fn from_code(code: i32) -> Option<Self> {
        if code <= 0 {
            return None;
        }
        let rendered = std::io::Error::from_raw_os_error(code).to_string();
        let suffix = format!(" (os error {})", code);
        let description = rendered
            .strip_suffix(suffix.as_str())
            .unwrap_or(&rendered)
            .to_string();
        Some(Self { code, description })
    }
}

impl fmt::Display for OsErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, " | errno={} ({})", self.code, self.description)
    }
}

/// An immutable unit of logging work.
///
/// Entries are moved into exactly one writer: either the direct path or
/// the background queue.
#[derive(Debug, PartialEq, Eq)]
pub struct LogEntry {
    severity: Severity,
    timestamp: String,
    origin: Option<Origin>,
    body: String,
    os_error: Option<OsErrorContext>,
}

impl LogEntry {
    /// Create an entry stamped with the current local time.
    pub fn new(severity: Severity, body: impl Into<String>) -> Self {
        Self::with_timestamp(severity, TimestampFormatter.now(), body)
    }

    pub fn with_timestamp(
        severity: Severity,
        timestamp: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        let mut body = body.into();
        truncate_on_char_boundary(&mut body, MAX_BODY_BYTES);
        Self {
            severity,
            timestamp: timestamp.into(),
            origin: None,
            body,
            os_error: None,
        }
    }

    /// Attach the call site.
    pub fn with_origin(mut self, origin: Origin) -> Self {
        self.origin = Some(origin);
        self
    }

    /// Attach an OS error annotation. Ignored for severities below ERROR.
    pub fn with_os_error(mut self, os_error: OsErrorContext) -> Self {
        if self.severity.wants_os_error() {
            self.os_error = Some(os_error);
        }
        self
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn origin(&self) -> Option<Origin> {
        self.origin
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn os_error(&self) -> Option<&OsErrorContext> {
        self.os_error.as_ref()
    }

    /// Render the full line, newline included:
    /// `[SEVERITY] [timestamp] (origin) - body\n`.
    ///
    /// The origin segment is omitted when no origin is attached. The OS
    /// error annotation counts against the body limit.
    pub fn render(&self) -> String {
        let mut body = self.body.clone();
        if let Some(os_error) = &self.os_error {
            body.push_str(&os_error.to_string());
            truncate_on_char_boundary(&mut body, MAX_BODY_BYTES);
        }
        match self.origin {
            Some(origin) => format!(
                "[{}] [{}] ({}) - {}\n",
                self.severity, self.timestamp, origin, body
            ),
            None => format!("[{}] [{}] - {}\n", self.severity, self.timestamp, body),
        }
    }

    /// Consume the entry into the form carried by the queue.
    pub fn into_queued(self) -> QueuedLine {
        QueuedLine {
            route: Route::Level(self.severity),
            line: self.render(),
        }
    }
}

/// A rendered line together with its destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedLine {
    pub route: Route,
    pub line: String,
}

impl QueuedLine {
    /// Wrap a raw line that did not come from a [`LogEntry`]. The route is
    /// parsed once here; a trailing newline is added when missing.
    pub fn raw(line: impl Into<String>) -> Self {
        let mut line = line.into();
        if !line.ends_with('\n') {
            line.push('\n');
        }
        Self {
            route: Route::for_line(&line),
            line,
        }
    }
}

fn truncate_on_char_boundary(s: &mut String, max: usize) {
    if s.len() <= max {
        return;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    s.truncate(end);
}
