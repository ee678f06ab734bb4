//! Error types for the CNAI conversion pipeline.
//!
//! This module defines a hierarchy of error types:
//!
//! - [`FilterError`] - Parameter filter file errors
//! - [`InputError`] - Dump file read errors
//! - [`OutputError`] - Output directory and CSV table errors
//! - [`RunError`] - Top-level orchestration errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.
//!
//! A key/value line without `=` is not an error: it is reported through
//! [`crate::logs`] and counted in the run summary.

use std::path::PathBuf;
use thiserror::Error;

// =============================================================================
// Parameter Filter Errors
// =============================================================================

/// Errors while loading a parameter filter file.
#[derive(Debug, Error)]
pub enum FilterError {
    /// Failed to read the filter file.
    #[error("Failed to read parameter file: {0}")]
    Io(#[from] std::io::Error),

    /// A non-empty line has no `domain:` prefix.
    #[error("Line {line}: expected '<domain>:<param>,<param>...', got '{content}'")]
    MissingSeparator { line: usize, content: String },
}

// =============================================================================
// Input Errors
// =============================================================================

/// Errors while reading a dump file.
#[derive(Debug, Error)]
pub enum InputError {
    /// The dump could not be opened.
    #[error("Cannot open '{path}': {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Reading a line failed.
    #[error("Read error at line {line}: {source}")]
    Read {
        line: usize,
        #[source]
        source: std::io::Error,
    },
}

// =============================================================================
// Output Errors
// =============================================================================

/// Errors on the output side. All of them abort the run.
#[derive(Debug, Error)]
pub enum OutputError {
    /// Output directory is missing, not a directory, or read-only.
    #[error("Invalid output directory '{path}': {reason}")]
    InvalidDirectory { path: PathBuf, reason: String },

    /// A domain table could not be created.
    #[error("Cannot create table for domain '{domain}': {source}")]
    CreateTable {
        domain: String,
        #[source]
        source: std::io::Error,
    },

    /// Writing a row failed.
    #[error("CSV write error: {0}")]
    Write(#[from] csv::Error),

    /// Flushing or writing a plain file failed.
    #[error("Output IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Catalog serialisation failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// =============================================================================
// Run Errors (top-level)
// =============================================================================

/// Top-level run errors.
///
/// This is the error type returned by [`crate::pipeline::run`].
#[derive(Debug, Error)]
pub enum RunError {
    /// Parameter filter error.
    #[error("Configuration error: {0}")]
    Filter(#[from] FilterError),

    /// Input error on a single-file run.
    #[error("Input error: {0}")]
    Input(#[from] InputError),

    /// Output error.
    #[error("Output error: {0}")]
    Output(#[from] OutputError),

    /// Input path does not exist.
    #[error("Input not found: {0}")]
    InputNotFound(PathBuf),

    /// Output directory is required for conversion.
    #[error("An output directory is required unless extracting parameters")]
    MissingOutputDirectory,
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for filter loading.
pub type FilterResult<T> = Result<T, FilterError>;

/// Result type for dump reading.
pub type InputResult<T> = Result<T, InputError>;

/// Result type for output operations.
pub type OutputResult<T> = Result<T, OutputError>;

/// Result type for a whole run.
pub type RunResult<T> = Result<T, RunError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion_chain() {
        let filter_err = FilterError::MissingSeparator {
            line: 3,
            content: "UtranCell".into(),
        };
        let run_err: RunError = filter_err.into();
        let msg = run_err.to_string();
        assert!(msg.contains("Line 3"));
        assert!(msg.contains("UtranCell"));

        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let output_err = OutputError::CreateTable {
            domain: "RNC".into(),
            source: io,
        };
        let run_err: RunError = output_err.into();
        assert!(run_err.to_string().contains("RNC"));
    }

    #[test]
    fn test_invalid_directory_format() {
        let err = OutputError::InvalidDirectory {
            path: PathBuf::from("/nope"),
            reason: "not a directory".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("/nope"));
        assert!(msg.contains("not a directory"));
    }
}
