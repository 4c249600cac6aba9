use std::fmt::{self, Write as _};

use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::{Error, LifecycleGuard, LogConfig, Logger, Origin, Result, Severity};

const CRATE_TARGET: &str = env!("CARGO_PKG_NAME");

/// A `tracing` layer that forwards events into a [`Logger`].
///
/// Events emitted by this crate itself are ignored so the logger's own
/// diagnostics can't feed back into it.
#[derive(Debug, Clone)]
pub struct SeverityLayer {
    logger: Logger,
}

impl SeverityLayer {
    pub fn new(logger: Logger) -> Self {
        Self { logger }
    }
}

impl<S: Subscriber> Layer<S> for SeverityLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if is_internal(metadata.target()) {
            return;
        }

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);

        let origin = match (metadata.module_path(), metadata.line()) {
            (Some(module), Some(line)) => Some(Origin::new(module, line)),
            _ => None,
        };
        let severity = Severity::from(*metadata.level());
        self.logger
            .log_at(severity, origin, format_args!("{}", visitor.finish()));
    }
}

fn is_internal(target: &str) -> bool {
    target == CRATE_TARGET
        || target
            .strip_prefix(CRATE_TARGET)
            .is_some_and(|rest| rest.starts_with("::"))
}

/// Collects the `message` field plus `key=value` pairs for other fields.
#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: String,
}

impl MessageVisitor {
    fn finish(self) -> String {
        let mut out = self.message;
        if !self.fields.is_empty() {
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(self.fields.trim_start());
        }
        out
    }
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            let _ = write!(self.fields, " {}={}", field.name(), value);
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{:?}", value);
        } else {
            let _ = write!(self.fields, " {}={:?}", field.name(), value);
        }
    }
}

/// Initialize logging with the given configuration and optional CLI verbosity override.
///
/// Installs a global `tracing` subscriber whose events are routed through a
/// new [`Logger`], starts its consumer, and returns the guard that shuts it
/// down. Keep the guard alive until the end of `main`.
pub fn init_logging(config: &LogConfig, cli_verbose: Option<u8>) -> Result<LifecycleGuard> {
    config.validate()?;

    let log_spec = effective_log_spec(config, cli_verbose);
    let env_filter = EnvFilter::try_new(&log_spec).map_err(|e| Error::Init(e.to_string()))?;

    let logger = Logger::new(config.clone());
    let guard = logger.guard()?;

    tracing_subscriber::registry()
        .with(env_filter)
        .with(SeverityLayer::new(logger))
        .try_init()
        .map_err(|e| Error::Init(e.to_string()))?;

    Ok(guard)
}

/// Determine the effective filter directive, considering config and CLI overrides.
fn effective_log_spec(config: &LogConfig, cli_verbose: Option<u8>) -> String {
    log_spec_from(std::env::var("RUST_LOG").ok(), config, cli_verbose)
}

fn log_spec_from(rust_log: Option<String>, config: &LogConfig, cli_verbose: Option<u8>) -> String {
    // RUST_LOG takes precedence over everything
    if let Some(rust_log) = rust_log
        && !rust_log.is_empty()
    {
        return rust_log;
    }

    match cli_verbose {
        None | Some(0) => filter_directive(config.level).to_string(),
        Some(1) => "debug".to_string(),
        Some(_) => "trace".to_string(),
    }
}

/// `tracing` has no FATAL level; the closest filter is `error`.
fn filter_directive(level: Severity) -> &'static str {
    match level {
        Severity::Trace => "trace",
        Severity::Debug => "debug",
        Severity::Info => "info",
        Severity::Warn => "warn",
        Severity::Error | Severity::Fatal => "error",
    }
}
