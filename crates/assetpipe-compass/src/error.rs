/*
 * error.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Error types for the compass filter.
 */

//! Error types for the compass filter.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Errors that can occur while invoking compass.
///
/// Failure is decided by exit status alone: compass writes a header to
/// stderr even on success, so stderr content is never inspected to detect
/// errors.
#[derive(Debug, Error)]
pub enum CompassError {
    /// The compass executable could not be resolved on the search path.
    #[error("compass executable not found: {bin}")]
    NotFound {
        /// The name or path that failed to resolve
        bin: String,
    },

    /// The compass process could not be started.
    #[error("failed to launch compass ({bin}): {source}")]
    Launch {
        /// The executable that failed to start
        bin: String,
        /// The spawn error
        #[source]
        source: std::io::Error,
    },

    /// Compass exited with a non-zero status.
    ///
    /// Carries the full captured diagnostics so the user can find the
    /// syntax error in their stylesheet.
    #[error(
        "compass exited with status {}: stderr: {stderr}; stdout: {stdout}",
        .status.map(|c| c.to_string()).unwrap_or_else(|| String::from("unknown (terminated by signal)"))
    )]
    CompilationFailed {
        /// Exit code, if the process exited normally
        status: Option<i32>,
        /// Captured standard output
        stdout: String,
        /// Captured standard error
        stderr: String,
    },

    /// Compass exited successfully but the expected output file is absent.
    ///
    /// This indicates a mismatch between the filename-derivation heuristic
    /// and compass's actual behavior, not a defect in the source file.
    #[error("compass reported success but produced no output at {}", .expected.display())]
    MissingOutput {
        /// The file that was expected to exist
        expected: PathBuf,
    },

    /// Compass did not finish within the configured deadline.
    ///
    /// The process has been killed and the scratch directory removed.
    #[error("compass did not finish within {timeout:?}; process killed")]
    TimedOut {
        /// The deadline that was exceeded
        timeout: Duration,
    },

    /// IO error while managing the scratch directory or streams.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CompassError {
    /// Create a "compilation failed" error from captured process output.
    pub fn compilation_failed(status: Option<i32>, stdout: &[u8], stderr: &[u8]) -> Self {
        Self::CompilationFailed {
            status,
            stdout: String::from_utf8_lossy(stdout).into_owned(),
            stderr: String::from_utf8_lossy(stderr).into_owned(),
        }
    }

    /// Create a "missing output" error.
    pub fn missing_output(expected: impl Into<PathBuf>) -> Self {
        Self::MissingOutput {
            expected: expected.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_error() {
        let err = CompassError::NotFound {
            bin: "compass".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("not found"));
        assert!(msg.contains("compass"));
    }

    #[test]
    fn test_compilation_failed_carries_diagnostics() {
        let err = CompassError::compilation_failed(Some(1), b"out", b"Syntax error on line 3");
        let msg = format!("{}", err);
        assert!(msg.contains("status 1"));
        assert!(msg.contains("Syntax error on line 3"));
        assert!(msg.contains("out"));
    }

    #[test]
    fn test_compilation_failed_signal_exit() {
        let err = CompassError::compilation_failed(None, b"", b"");
        let msg = format!("{}", err);
        assert!(msg.contains("terminated by signal"));
    }

    #[test]
    fn test_missing_output_names_expected_path() {
        let err = CompassError::missing_output("/tmp/scratch/screen.css");
        let msg = format!("{}", err);
        assert!(msg.contains("/tmp/scratch/screen.css"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: CompassError = io_err.into();
        assert!(matches!(err, CompassError::Io(_)));
    }
}
