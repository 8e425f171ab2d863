//! Custom error types for samconcord operations.

use thiserror::Error;

/// Result type alias for samconcord operations
pub type Result<T> = std::result::Result<T, ConcordError>;

/// Error type for samconcord operations
#[derive(Error, Debug)]
pub enum ConcordError {
    /// A data line could not be parsed. Malformed mandatory columns are
    /// treated as corrupt upstream data: the whole run for that file is
    /// aborted, with no partial-result salvage.
    #[error("Malformed record in '{path}' at line {line}: {reason}")]
    MalformedRecord {
        /// Path of the offending file
        path: String,
        /// 1-based line number within the file
        line: u64,
        /// Explanation of what failed to parse
        reason: String,
    },

    /// A required input file does not exist
    #[error("{description} '{path}': file does not exist")]
    MissingInput {
        /// Human-readable description of the file (e.g., "Baseline SAM")
        description: String,
        /// Path that was checked
        path: String,
    },

    /// I/O failure while reading an input file
    #[error("Failed to read '{path}': {source}")]
    Io {
        /// Path of the file being read
        path: String,
        /// Underlying I/O error
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_record_message() {
        let error = ConcordError::MalformedRecord {
            path: "subject.sam".to_string(),
            line: 42,
            reason: "FLAG is not an integer: 'XY'".to_string(),
        };
        let msg = format!("{error}");
        assert!(msg.contains("subject.sam"));
        assert!(msg.contains("line 42"));
        assert!(msg.contains("FLAG is not an integer"));
    }

    #[test]
    fn test_missing_input_message() {
        let error = ConcordError::MissingInput {
            description: "Baseline SAM".to_string(),
            path: "/no/such/file.sam".to_string(),
        };
        let msg = format!("{error}");
        assert!(msg.contains("Baseline SAM"));
        assert!(msg.contains("does not exist"));
    }
}
