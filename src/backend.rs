//! Boundary to the model-inference backend.
//!
//! The backend is an external component; this crate only drives its four
//! entry points and logs what happens. Calls are synchronous and may be
//! slow. Nothing here assumes anything about the backend's own threading.

use std::path::{Path, PathBuf};

use crate::{Logger, log_error, log_info, log_warn};

/// Config file used when a command doesn't name one.
pub const DEFAULT_CONFIG_PATH: &str = "models.json";

/// Outcome of a backend operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendStatus {
    Ok,
    /// The backend reported a failure with its own status code.
    Failed(i32),
}

/// Outcome of validating a model configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    /// The configuration is usable as-is.
    Ok,
    /// Usable, with the listed warnings.
    Warning(Vec<String>),
    /// Not usable, for the listed reasons.
    Error(Vec<String>),
}

/// Entry points consumed from the inference backend.
pub trait ModelBackend {
    /// Scan for available models and return how many were found.
    fn discover_models(&self) -> usize;

    /// Write a default configuration file.
    fn generate_config(&self) -> BackendStatus;

    /// Validate a configuration file, or the backend's default one.
    fn validate_config(&self, path: Option<&Path>) -> ValidationOutcome;

    /// Run the inference engine with the given configuration.
    fn run_inference_engine(&self, config_path: &Path) -> BackendStatus;
}

/// A single backend operation requested by the process entry point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCommand {
    DiscoverModels,
    GenerateConfig,
    ValidateConfig(Option<PathBuf>),
    RunEngine(Option<PathBuf>),
}

/// Run `command` against `backend`, logging progress through `logger`.
///
/// Returns the process exit code: 0 on success, 1 on failure.
pub fn run_command(logger: &Logger, backend: &dyn ModelBackend, command: &BackendCommand) -> i32 {
    match command {
        BackendCommand::DiscoverModels => {
            log_info!(logger, "Listing models");
            let count = backend.discover_models();
            log_info!(logger, "Found {} models", count);
            0
        }
        BackendCommand::GenerateConfig => {
            log_info!(logger, "Generating default configuration");
            match backend.generate_config() {
                BackendStatus::Ok => {
                    log_info!(logger, "Generated configuration file");
                    0
                }
                BackendStatus::Failed(code) => {
                    log_error!(logger, "Configuration generation failed (status {})", code);
                    1
                }
            }
        }
        BackendCommand::ValidateConfig(path) => {
            let shown = path
                .as_deref()
                .map_or_else(|| DEFAULT_CONFIG_PATH.to_string(), |p| p.display().to_string());
            log_info!(logger, "Validating configuration {}", shown);
            report_validation(logger, backend.validate_config(path.as_deref()))
        }
        BackendCommand::RunEngine(path) => {
            let path = path
                .clone()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
            log_info!(logger, "Starting inference engine with {}", path.display());
            match backend.run_inference_engine(&path) {
                BackendStatus::Ok => {
                    log_info!(logger, "Inference engine completed successfully");
                    0
                }
                BackendStatus::Failed(code) => {
                    log_error!(logger, "Inference engine failed (status {})", code);
                    1
                }
            }
        }
    }
}

fn report_validation(logger: &Logger, outcome: ValidationOutcome) -> i32 {
    match outcome {
        ValidationOutcome::Ok => {
            log_info!(logger, "Configuration is valid");
            0
        }
        ValidationOutcome::Warning(warnings) => {
            log_warn!(logger, "Configuration is valid with {} warning(s)", warnings.len());
            for warning in &warnings {
                log_warn!(logger, "  - {}", warning);
            }
            0
        }
        ValidationOutcome::Error(errors) => {
            log_error!(logger, "Configuration is invalid ({} error(s))", errors.len());
            for error in &errors {
                log_error!(logger, "  - {}", error);
            }
            1
        }
    }
}
