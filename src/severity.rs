use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use std::fmt;
use std::str::FromStr;

/// Criticality tier of a log entry, ordered by increasing criticality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Severity {
    /// Finest-grained tracing output.
    #[default]
    Trace,
    /// Diagnostic detail.
    Debug,
    /// Normal operational events.
    Info,
    /// Unusual but recoverable conditions.
    Warn,
    /// Failures that need attention. Also echoed to stderr.
    Error,
    /// Unrecoverable failures. The process exits after the entry is written.
    Fatal,
}

impl Severity {
    /// All severities, least critical first.
    pub const ALL: [Severity; 6] = [
        Severity::Trace,
        Severity::Debug,
        Severity::Info,
        Severity::Warn,
        Severity::Error,
        Severity::Fatal,
    ];

    /// The bracket token used in rendered lines and file names.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "TRACE",
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
            Self::Fatal => "FATAL",
        }
    }

    /// Whether debug builds attach the last OS error to entries of this severity.
    pub fn wants_os_error(&self) -> bool {
        matches!(self, Self::Error | Self::Fatal)
    }

    /// Parse the leading `[TOKEN]` of a rendered line.
    ///
    /// Returns `None` when the line has no leading bracket, no closing
    /// bracket, or an unknown token.
    pub fn from_line_prefix(line: &str) -> Option<Self> {
        let rest = line.strip_prefix('[')?;
        let end = rest.find(']')?;
        rest[..end].parse().ok()
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not one of the six severity tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseSeverityError(String);

impl fmt::Display for ParseSeverityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown severity: {}, supported: TRACE/DEBUG/INFO/WARN/ERROR/FATAL",
            self.0
        )
    }
}

impl std::error::Error for ParseSeverityError {}

/// Case-sensitive: only the exact uppercase tokens are accepted.
impl FromStr for Severity {
    type Err = ParseSeverityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "TRACE" => Ok(Self::Trace),
            "DEBUG" => Ok(Self::Debug),
            "INFO" => Ok(Self::Info),
            "WARN" => Ok(Self::Warn),
            "ERROR" => Ok(Self::Error),
            "FATAL" => Ok(Self::Fatal),
            other => Err(ParseSeverityError(other.to_string())),
        }
    }
}

impl From<tracing::Level> for Severity {
    fn from(level: tracing::Level) -> Self {
        match level {
            tracing::Level::TRACE => Self::Trace,
            tracing::Level::DEBUG => Self::Debug,
            tracing::Level::INFO => Self::Info,
            tracing::Level::WARN => Self::Warn,
            tracing::Level::ERROR => Self::Error,
        }
    }
}

impl Serialize for Severity {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

// Config files conventionally use lowercase levels ("info"), so the
// deserializer is lenient while `FromStr` stays strict for routing.
impl<'de> Deserialize<'de> for Severity {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        let upper = raw.trim().to_ascii_uppercase();
        let normalized = match upper.as_str() {
            "WARNING" => "WARN",
            other => other,
        };
        normalized.parse().map_err(de::Error::custom)
    }
}

/// Where a queued line is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// The file of a known severity.
    Level(Severity),
    /// The fallback file for lines without a recognizable severity token.
    Unknown,
}

impl Route {
    /// Route a raw, already-rendered line by its leading token.
    pub fn for_line(line: &str) -> Self {
        Severity::from_line_prefix(line).map_or(Route::Unknown, Route::Level)
    }

    pub fn severity(&self) -> Option<Severity> {
        match self {
            Self::Level(severity) => Some(*severity),
            Self::Unknown => None,
        }
    }
}
