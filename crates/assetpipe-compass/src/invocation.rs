/*
 * invocation.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Compass command-line construction and output filename derivation.
 */

//! Compass command-line construction and output filename derivation.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Derive the filename compass will produce for a source file.
///
/// Compass derives each output filename by cutting the sass dir prefix off
/// the input path and swapping the extension. Because the filter always
/// passes the source file's immediate parent as `--sass-dir`, the output
/// is the flat `<basename without extension>.css`.
///
/// This assumption is the heart of the directory bridge; keeping it in one
/// pure function makes it testable without running compass.
pub fn derive_output_filename(source_path: &Path) -> PathBuf {
    let stem = source_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    PathBuf::from(format!("{stem}.css"))
}

/// Build the argument vector for one compass invocation.
///
/// The layout must match compass's CLI exactly:
/// `compile [--require <plugin>]* --sass-dir <dir> --css-dir <dir>
/// --quiet --boring --output-style expanded <source>`.
pub(crate) fn build_args(
    plugins: &[String],
    sass_dir: &Path,
    css_dir: &Path,
    source_path: &Path,
) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![OsString::from("compile")];

    // One --require pair per plugin, order preserved. Compass does not
    // accept a combined list.
    for plugin in plugins {
        args.push(OsString::from("--require"));
        args.push(OsString::from(plugin));
    }

    args.push(OsString::from("--sass-dir"));
    args.push(sass_dir.into());
    args.push(OsString::from("--css-dir"));
    args.push(css_dir.into());
    args.push(OsString::from("--quiet"));
    args.push(OsString::from("--boring"));
    args.push(OsString::from("--output-style"));
    args.push(OsString::from("expanded"));
    args.push(source_path.into());

    args
}
