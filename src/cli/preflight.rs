//! Pre-flight checks before running the agent.
//!
//! Validates that credentials and the research log are usable before
//! starting operations that would otherwise fail midway.

use crate::config::Settings;
use crate::error::{InquestorError, Result};
use crate::openai::require_api_key;
use std::path::Path;

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// A single research query needs the API key.
    Research,
    /// The server needs the API key and a writable log location.
    Serve,
}

/// Run pre-flight checks for the given operation.
///
/// Returns Ok(()) if all checks pass, or an error describing what's missing.
pub fn check(operation: Operation, settings: &Settings) -> Result<()> {
    require_api_key(&settings.llm)?;
    if let Operation::Serve = operation {
        check_log_dir(&settings.log_path())?;
    }
    Ok(())
}

/// Check that the log file's directory exists or can be created.
pub fn check_log_dir(log_path: &Path) -> Result<()> {
    match log_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            std::fs::create_dir_all(parent).map_err(|e| {
                InquestorError::Config(format!(
                    "Cannot create log directory {}: {}",
                    parent.display(),
                    e
                ))
            })
        }
        _ => Ok(()),
    }
}
