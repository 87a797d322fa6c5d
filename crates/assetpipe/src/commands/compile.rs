/*
 * compile.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Compile command implementation
 */

//! Compile command implementation.
//!
//! This module implements `assetpipe compile`, which runs a single-filter
//! chain (the compass filter) over one source file and writes the
//! resulting CSS to stdout or a file.

use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::debug;

use assetpipe_compass::{CompassConfig, CompassFilter};
use assetpipe_core::FilterChain;

/// Arguments for the compile command
#[derive(Debug)]
pub struct CompileArgs {
    /// Input file
    pub input: String,
    /// Output file path (stdout when `None`)
    pub output: Option<String>,
    /// Compass plugins, in command-line order
    pub require: Vec<String>,
    /// Compass executable override
    pub compass_bin: Option<String>,
    /// Process deadline in seconds
    pub timeout: Option<u64>,
}

/// Execute the compile command
pub fn execute(args: CompileArgs) -> Result<()> {
    let source = fs::canonicalize(&args.input)
        .with_context(|| format!("input file not found: {}", args.input))?;

    // Environment configuration first, command-line flags on top.
    let mut config = CompassConfig::from_env();
    if let Some(bin) = args.compass_bin {
        config.bin = Some(PathBuf::from(bin));
    }
    if !args.require.is_empty() {
        config.plugins = args.require;
    }
    if let Some(secs) = args.timeout {
        config.timeout = Some(Duration::from_secs(secs));
    }
    debug!(?config, source = %source.display(), "compiling");

    let output_path = args
        .output
        .as_ref()
        .map(PathBuf::from)
        .unwrap_or_else(|| source.with_extension("css"));

    let mut chain = FilterChain::new();
    chain.push(Box::new(CompassFilter::new(config)))?;

    let mut css = Vec::new();
    chain.run(&source, &output_path, &mut css)?;

    match args.output {
        Some(path) => {
            fs::write(&path, &css).with_context(|| format!("failed to write {}", path))?
        }
        None => std::io::stdout().write_all(&css)?,
    }

    Ok(())
}
