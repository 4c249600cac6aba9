//! Basic synchronous logging example.
//!
//! Every call appends one line to `./output/<SEVERITY>.log` before it
//! returns. ERROR lines are also echoed to stderr.
//!
//! Run with:
//! ```bash
//! cargo run --example basic
//! ```

use sevlog::{Severity, log_debug, log_error, log_info, log_warn};

fn main() {
    let logger = sevlog::builder()
        .with_console(true)
        .with_level(Severity::Debug)
        .logger();

    log_debug!(logger, "debug details are written to DEBUG.log");
    log_info!(logger, "server started on port {}", 8080);
    log_warn!(logger, "cache is {}% full", 91);

    // In debug builds the line also carries the errno annotation.
    if let Err(err) = std::fs::File::open("/definitely/not/here.json") {
        log_error!(logger, "failed to open config: {}", err);
    }

    println!("log files written to {}", logger.output_dir().display());
}
