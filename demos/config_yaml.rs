//! Example of loading logging configuration from YAML and routing
//! `tracing` events into per-severity files.
//!
//! Run with:
//! ```bash
//! cargo run --example config_yaml
//! ```

use serde::Deserialize;

const CONFIG: &str = r#"
log:
  output_dir: ./output
  mode: queued
  console: true
  level: debug
  debug: true
"#;

#[derive(Deserialize)]
struct Config {
    log: sevlog::LogConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let root: Config = serde_yaml::from_str(CONFIG)?;

    // Installs the global subscriber; the guard flushes the queue on drop.
    let _guard = sevlog::init_logging(&root.log, None)?;

    tracing::trace!("filtered out by the configured level");
    tracing::debug!("visible because level is debug");
    tracing::info!(models = 3, "discovery finished");
    tracing::warn!(path = "models.json", "config has warnings");
    tracing::error!(code = 2, "inference engine exited");

    Ok(())
}
