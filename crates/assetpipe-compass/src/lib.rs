//! Compass bridge filter for assetpipe.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! Compass only compiles directory-to-directory: it takes a `--sass-dir`
//! and a `--css-dir` and derives each output filename from the input
//! filename relative to the sass dir. This crate bridges that convention
//! into the pipeline's single-file, stream-to-stream contract:
//!
//! 1. Tell compass the source file's parent directory is the sass dir,
//!    so the output filename is the flat `<basename>.css`.
//! 2. Point `--css-dir` at a fresh scratch directory owned by this call.
//! 3. Run compass, read the expected file back, stream it to the output.
//! 4. Remove the scratch directory on every exit path.
//!
//! Compass cannot read from stdin either, so [`CompassFilter`] re-reads
//! the original file from disk and must be the first filter in a chain
//! (it declares [`Placement::First`][assetpipe_core::Placement]).

mod config;
mod error;
mod filter;
mod invocation;

pub use config::CompassConfig;
pub use error::CompassError;
pub use filter::CompassFilter;
pub use invocation::derive_output_filename;
