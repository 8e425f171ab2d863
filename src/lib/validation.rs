//! Input validation utilities.
//!
//! Validation failures use the structured error types from [`crate::errors`]
//! so the CLI surfaces a consistent message before any parsing begins.

use crate::errors::{ConcordError, Result};
use std::path::Path;

/// Validate that an input file exists.
///
/// # Arguments
/// * `path` - Path to validate
/// * `description` - Human-readable description (e.g., "Baseline SAM")
///
/// # Errors
/// Returns [`ConcordError::MissingInput`] if the file does not exist.
///
/// # Example
/// ```
/// use samconcord_lib::validation::validate_file_exists;
///
/// let result = validate_file_exists("/nonexistent/run.sam", "Subject SAM");
/// assert!(result.is_err());
/// ```
pub fn validate_file_exists<P: AsRef<Path>>(path: P, description: &str) -> Result<()> {
    let path_ref = path.as_ref();
    if !path_ref.is_file() {
        return Err(ConcordError::MissingInput {
            description: description.to_string(),
            path: path_ref.display().to_string(),
        });
    }
    Ok(())
}

/// Validate that both comparison inputs exist, in argument order.
///
/// # Errors
/// Returns an error for the first file that doesn't exist.
pub fn validate_inputs_exist<P: AsRef<Path>>(files: &[(P, &str)]) -> Result<()> {
    for (path, desc) in files {
        validate_file_exists(path, desc)?;
    }
    Ok(())
}
