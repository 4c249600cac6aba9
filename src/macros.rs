//! Logging macros that capture the call site.
//!
//! The call site (`module_path!()` and `line!()`) is only rendered when the
//! logger runs in debug configuration.
//!
//! ```rust,no_run
//! use sevlog::{LogConfig, Logger, log_error, log_info};
//!
//! let logger = Logger::new(LogConfig::new());
//! log_info!(logger, "server started on port {}", 8080);
//! log_error!(logger, "failed to open {}", "models.json");
//! ```

/// Log at an explicit severity with call-site information.
#[macro_export]
macro_rules! log_at {
    ($logger:expr, $severity:expr, $($arg:tt)+) => {
        $logger.log_at(
            $severity,
            ::core::option::Option::Some($crate::Origin::new(module_path!(), line!())),
            format_args!($($arg)+),
        )
    };
}

/// Log at TRACE.
#[macro_export]
macro_rules! log_trace {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log_at!($logger, $crate::Severity::Trace, $($arg)+)
    };
}

/// Log at DEBUG.
#[macro_export]
macro_rules! log_debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log_at!($logger, $crate::Severity::Debug, $($arg)+)
    };
}

/// Log at INFO.
#[macro_export]
macro_rules! log_info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log_at!($logger, $crate::Severity::Info, $($arg)+)
    };
}

/// Log at WARN.
#[macro_export]
macro_rules! log_warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log_at!($logger, $crate::Severity::Warn, $($arg)+)
    };
}

/// Log at ERROR. Also echoed to stderr when console output is enabled.
#[macro_export]
macro_rules! log_error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log_at!($logger, $crate::Severity::Error, $($arg)+)
    };
}

/// Log at FATAL, then exit the process with a non-zero status.
#[macro_export]
macro_rules! log_fatal {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log_at!($logger, $crate::Severity::Fatal, $($arg)+)
    };
}
