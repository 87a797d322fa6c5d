/*
 * filter.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Filter trait and per-file transform context.
 */

//! Filter trait and per-file transform context.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use crate::error::FilterError;

/// Where a filter may appear in a chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// The filter must be the first transformation applied to a file.
    ///
    /// Filters that re-read the original file from disk (because the tool
    /// they wrap cannot accept piped input) use this placement: anything
    /// that ran before them would be silently discarded.
    First,

    /// The filter consumes its input stream and may appear anywhere.
    Anywhere,
}

/// Per-file metadata passed to each filter in a chain.
///
/// Both paths describe the file being processed, not the intermediate
/// streams: `source_path` is where the original bytes live on disk, and
/// `output_path` is where the pipeline will eventually place the result
/// (advisory - filters use it only for naming expectations).
#[derive(Debug, Clone)]
pub struct TransformContext {
    /// Absolute path of the source file on disk.
    pub source_path: PathBuf,
    /// Eventual output path of the processed file.
    pub output_path: PathBuf,
}

impl TransformContext {
    /// Create a context for one source file.
    pub fn new(source_path: impl Into<PathBuf>, output_path: impl Into<PathBuf>) -> Self {
        Self {
            source_path: source_path.into(),
            output_path: output_path.into(),
        }
    }

    /// The directory containing the source file.
    pub fn source_dir(&self) -> &Path {
        self.source_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
    }
}

/// A single source-file transformation.
///
/// Filters are stream-in/stream-out: they read the previous stage's bytes
/// and write the transformed bytes. The transformation is applied once per
/// source file.
///
/// # Thread Safety
///
/// Filters must be `Send + Sync` so a host pipeline can process multiple
/// files on multiple threads with one shared filter instance.
pub trait Filter: Send + Sync {
    /// Human-readable name for this filter.
    ///
    /// Used for log messages, diagnostics, and error reporting.
    fn name(&self) -> &str;

    /// Where this filter may appear in a chain.
    ///
    /// Default: [`Placement::Anywhere`].
    fn placement(&self) -> Placement {
        Placement::Anywhere
    }

    /// Transform one file's content.
    ///
    /// # Arguments
    ///
    /// * `input` - The previous stage's output (the source file's bytes for
    ///   the first filter)
    /// * `output` - Where this stage's result must be written
    /// * `ctx` - Paths of the file being processed
    ///
    /// # Errors
    ///
    /// Returns [`FilterError`] if the transformation fails. On failure the
    /// filter must not have written partial output.
    fn transform(
        &self,
        input: &mut dyn Read,
        output: &mut dyn Write,
        ctx: &TransformContext,
    ) -> Result<(), FilterError>;
}
