//! Error types for the filter pipeline.
//!
//! Copyright (c) 2025 Posit, PBC

use thiserror::Error;

/// Errors that can occur while assembling or running a filter chain.
#[derive(Debug, Error)]
pub enum FilterError {
    /// A filter that must run first was added to a non-empty chain.
    #[error("filter '{filter}' reads its input from disk and must be first in the chain")]
    MisplacedFilter {
        /// Name of the offending filter
        filter: String,
    },

    /// A filter failed while transforming a file.
    #[error("filter '{filter}' failed: {source}")]
    Failed {
        /// Name of the filter that failed
        filter: String,
        /// The filter's own error
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// File I/O error while reading the source or writing the sink.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl FilterError {
    /// Create a "misplaced filter" error.
    pub fn misplaced(filter: impl Into<String>) -> Self {
        Self::MisplacedFilter {
            filter: filter.into(),
        }
    }

    /// Wrap a filter's own error with the filter's name.
    pub fn failed(
        filter: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Failed {
            filter: filter.into(),
            source: Box::new(source),
        }
    }
}
