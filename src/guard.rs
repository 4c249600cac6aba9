use std::io::Write;
use std::panic::{AssertUnwindSafe, catch_unwind};

use crate::{Logger, Result};

/// Scope-bound owner of a logger's background consumer.
///
/// Creating the guard starts the consumer; dropping it signals shutdown,
/// joins the consumer and flushes whatever is still queued. Hold it in
/// `main` for the lifetime of the process:
///
/// ```rust,no_run
/// use sevlog::{DeliveryMode, LogConfig, Logger};
///
/// let logger = Logger::new(LogConfig::new().with_mode(DeliveryMode::Queued));
/// let _guard = logger.guard()?;
/// logger.info("running");
/// # Ok::<(), sevlog::Error>(())
/// ```
#[must_use = "dropping the guard shuts the logger down immediately"]
#[derive(Debug)]
pub struct LifecycleGuard {
    logger: Logger,
}

impl LifecycleGuard {
    /// Start `logger`'s consumer and take responsibility for shutting it down.
    pub fn new(logger: Logger) -> Result<Self> {
        logger.start()?;
        Ok(Self { logger })
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }
}

impl Drop for LifecycleGuard {
    fn drop(&mut self) {
        let logger = &self.logger;
        if catch_unwind(AssertUnwindSafe(|| logger.shutdown())).is_err() {
            let _ = writeln!(
                std::io::stderr().lock(),
                "[LOGGER] shutdown did not complete cleanly"
            );
        }
    }
}
