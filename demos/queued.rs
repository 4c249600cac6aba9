//! Background delivery example.
//!
//! Producers only push onto a queue; a dedicated consumer thread writes
//! the files. Dropping the guard flushes everything that was queued.
//!
//! Run with:
//! ```bash
//! cargo run --example queued
//! ```

use sevlog::{DeliveryMode, log_info, log_warn};
use std::thread;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let guard = sevlog::builder()
        .with_mode(DeliveryMode::Queued)
        .with_console(false)
        .start()?;
    let logger = guard.logger().clone();

    let workers: Vec<_> = (0..4)
        .map(|id| {
            let logger = logger.clone();
            thread::spawn(move || {
                for step in 0..25 {
                    log_info!(logger, "worker {} step {}", id, step);
                }
                log_warn!(logger, "worker {} done", id);
            })
        })
        .collect();
    for worker in workers {
        worker.join().map_err(|_| "worker panicked")?;
    }

    println!("{} entries still queued", logger.pending());
    drop(guard);
    println!("flushed; state is {:?}", logger.state());

    Ok(())
}
