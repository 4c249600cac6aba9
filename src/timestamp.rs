use time::OffsetDateTime;
use time::macros::format_description;

/// Width of every rendered timestamp, e.g. `2026-01-09 14:30:45`.
pub const TIMESTAMP_WIDTH: usize = 19;

/// Produces fixed-width, locale-independent local-time strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimestampFormatter;

impl TimestampFormatter {
    /// Current local time. Falls back to UTC when the local offset can't be
    /// determined (e.g. on multi-threaded Unix processes).
    pub fn now(&self) -> String {
        let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
        self.format(now)
    }

    pub fn format(&self, at: OffsetDateTime) -> String {
        at.format(format_description!(
            "[year]-[month]-[day] [hour]:[minute]:[second]"
        ))
        .unwrap_or_else(|_| "0000-00-00 00:00:00".to_string())
    }
}
