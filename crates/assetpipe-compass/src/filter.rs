/*
 * filter.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * The compass filter: subprocess invocation and directory bridging.
 */

//! The compass filter: subprocess invocation and directory bridging.

use std::io::{Read, Write};
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use tempfile::TempDir;
use tracing::debug;

use assetpipe_core::{Filter, FilterError, Placement, TransformContext};

use crate::config::CompassConfig;
use crate::error::CompassError;
use crate::invocation::{build_args, derive_output_filename};

/// Poll interval while waiting on the compass process under a deadline.
const WAIT_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Converts Compass `.sass`/`.scss` files to CSS by invoking the compass
/// CLI.
///
/// Requires compass 0.10 or later (the first release that compiles
/// individual files).
///
/// For a standard compass project, only the top-level `screen.sass`,
/// `print.sass` and `ie.sass` files need to pass through this filter; the
/// partials they include are handled by compass itself.
///
/// Because compass reads the source from disk rather than from the input
/// stream, this filter declares [`Placement::First`]: output of any filter
/// chained before it would be lost.
pub struct CompassFilter {
    config: CompassConfig,
}

impl CompassFilter {
    /// Create a filter with an explicit configuration.
    pub fn new(config: CompassConfig) -> Self {
        Self { config }
    }

    /// Create a filter configured from `COMPASS_BIN` / `COMPASS_PLUGINS`.
    pub fn from_env() -> Self {
        Self::new(CompassConfig::from_env())
    }

    /// Compile one source file and write the resulting CSS to `output`.
    ///
    /// `source_path` must exist on disk. Its parent directory is passed to
    /// compass as the sass dir, which pins the output filename to the flat
    /// `<basename>.css` inside a scratch directory owned by this call. The
    /// scratch directory is removed before this function returns, on every
    /// exit path.
    ///
    /// Either the full CSS text is written to `output` or nothing is.
    ///
    /// # Errors
    ///
    /// - [`CompassError::NotFound`] / [`CompassError::Launch`] if the
    ///   executable cannot be resolved or started
    /// - [`CompassError::CompilationFailed`] on a non-zero exit, carrying
    ///   the captured stdout, stderr, and exit code
    /// - [`CompassError::MissingOutput`] if compass exits zero but the
    ///   expected file is absent
    /// - [`CompassError::TimedOut`] if a configured deadline expires
    pub fn compile(&self, source_path: &Path, output: &mut dyn Write) -> Result<(), CompassError> {
        // Resolve the executable before creating any temporary state, so a
        // missing binary cannot leave a directory behind.
        let bin = self.config.resolve_bin()?;

        let sass_dir = source_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        let scratch = match &self.config.scratch_root {
            Some(root) => TempDir::with_prefix_in("compass-css-", root)?,
            None => TempDir::with_prefix("compass-css-")?,
        };

        let args = build_args(&self.config.plugins, sass_dir, scratch.path(), source_path);
        debug!(bin = %bin.display(), ?args, "invoking compass");

        let mut cmd = Command::new(&bin);
        cmd.args(&args)
            // Run from the sass dir so compass picks up a config.rb
            // colocated with the sources, if any.
            .current_dir(sass_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = cmd.spawn().map_err(|source| CompassError::Launch {
            bin: bin.display().to_string(),
            source,
        })?;

        let captured = wait_with_deadline(&mut child, self.config.timeout)?;
        debug!(status = %captured.status, "compass exited");

        if !captured.status.success() {
            return Err(CompassError::compilation_failed(
                captured.status.code(),
                &captured.stdout,
                &captured.stderr,
            ));
        }

        // Compass writes a header to stderr even on success; the exit
        // status alone decides failure.
        if !captured.stderr.is_empty() {
            debug!(
                stderr = %String::from_utf8_lossy(&captured.stderr),
                "compass wrote to stderr on success"
            );
        }

        let expected = scratch.path().join(derive_output_filename(source_path));
        if !expected.is_file() {
            return Err(CompassError::missing_output(expected));
        }

        // Read fully before writing anything, so the output stream sees
        // either the whole CSS text or no bytes at all.
        let css = std::fs::read(&expected)?;
        output.write_all(&css)?;

        // `scratch` drops here, removing the directory. The error paths
        // above drop it the same way.
        Ok(())
    }
}

impl Filter for CompassFilter {
    fn name(&self) -> &str {
        "compass"
    }

    fn placement(&self) -> Placement {
        Placement::First
    }

    fn transform(
        &self,
        _input: &mut dyn Read,
        output: &mut dyn Write,
        ctx: &TransformContext,
    ) -> Result<(), FilterError> {
        // The input stream is intentionally unused: compass cannot accept
        // piped input, so the original file is read back from disk.
        self.compile(&ctx.source_path, output)
            .map_err(|e| FilterError::failed("compass", e))
    }
}

/// Fully captured output of a finished child process.
struct Captured {
    status: ExitStatus,
    stdout: Vec<u8>,
    stderr: Vec<u8>,
}

/// Wait for the child, draining stdout and stderr on dedicated threads.
///
/// Draining concurrently with the wait is required for correctness: a
/// child that fills an unread pipe buffer would otherwise block forever.
///
/// With a deadline, the child is polled and killed once the deadline
/// passes; without one, this blocks until the child exits.
fn wait_with_deadline(
    child: &mut Child,
    deadline: Option<Duration>,
) -> Result<Captured, CompassError> {
    let stdout_handle = child.stdout.take().map(|mut stream| {
        thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = stream.read_to_end(&mut buf);
            buf
        })
    });
    let stderr_handle = child.stderr.take().map(|mut stream| {
        thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = stream.read_to_end(&mut buf);
            buf
        })
    });

    let started = Instant::now();
    let status = loop {
        match child.try_wait()? {
            Some(status) => break status,
            None => {
                if let Some(limit) = deadline {
                    if started.elapsed() > limit {
                        let _ = child.kill();
                        let _ = child.wait();
                        // The reader threads are not joined: a grandchild
                        // of the killed process can keep the pipes open.
                        // They exit on their own once the pipe ends close.
                        return Err(CompassError::TimedOut { timeout: limit });
                    }
                }
                thread::sleep(WAIT_POLL_INTERVAL);
            }
        }
    };

    let stdout = stdout_handle
        .map(|handle| handle.join().unwrap_or_default())
        .unwrap_or_default();
    let stderr = stderr_handle
        .map(|handle| handle.join().unwrap_or_default())
        .unwrap_or_default();

    Ok(Captured {
        status,
        stdout,
        stderr,
    })
}
