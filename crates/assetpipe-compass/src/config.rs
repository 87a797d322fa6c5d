/*
 * config.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Compass filter configuration.
 */

//! Compass filter configuration.
//!
//! Configuration is an explicit struct handed to [`CompassFilter`] at
//! construction, read once and immutable afterwards. Host pipelines that
//! configure filters through the environment can use
//! [`CompassConfig::from_env`], which recognizes:
//!
//! - `COMPASS_BIN` - name or path of the compass executable
//! - `COMPASS_PLUGINS` - comma-separated plugin names, order preserved
//!
//! [`CompassFilter`]: crate::CompassFilter

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::CompassError;

/// Configuration for the compass filter.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CompassConfig {
    /// Name or path of the compass executable.
    ///
    /// `None` means the well-known name (`compass`, or `compass.bat` on
    /// Windows) resolved via the process environment's search path.
    pub bin: Option<PathBuf>,

    /// Plugin names passed to compass, one `--require` flag per plugin,
    /// in this order.
    pub plugins: Vec<String>,

    /// Hard deadline on the compass process. `None` waits indefinitely.
    ///
    /// On expiry the process is killed and the call fails with
    /// [`CompassError::TimedOut`]; the scratch directory is still removed.
    pub timeout: Option<Duration>,

    /// Parent directory for per-call scratch directories.
    ///
    /// `None` uses the system temporary directory.
    pub scratch_root: Option<PathBuf>,
}

impl CompassConfig {
    /// Build a configuration from the process environment.
    ///
    /// Reads `COMPASS_BIN` and `COMPASS_PLUGINS` (comma-separated; empty
    /// segments and surrounding whitespace are ignored). Unset variables
    /// leave the defaults in place.
    pub fn from_env() -> Self {
        let bin = std::env::var_os("COMPASS_BIN")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        let plugins = std::env::var("COMPASS_PLUGINS")
            .unwrap_or_default()
            .split(',')
            .filter(|s| !s.trim().is_empty())
            .map(|s| s.trim().to_string())
            .collect();

        Self {
            bin,
            plugins,
            ..Default::default()
        }
    }

    /// Resolve the configured executable to a launchable path.
    ///
    /// A bare name is looked up on the search path; an explicit path is
    /// returned as-is and any problem with it surfaces as a launch error
    /// when the process is spawned.
    ///
    /// # Errors
    ///
    /// Returns [`CompassError::NotFound`] if a bare name does not resolve
    /// to an executable.
    pub(crate) fn resolve_bin(&self) -> Result<PathBuf, CompassError> {
        let bin = self
            .bin
            .clone()
            .unwrap_or_else(|| PathBuf::from(compass_name()));

        if bin.components().count() > 1 {
            return Ok(bin);
        }

        which::which(&bin).map_err(|_| CompassError::NotFound {
            bin: bin.display().to_string(),
        })
    }
}

/// Get the platform-appropriate compass executable name.
fn compass_name() -> &'static str {
    #[cfg(windows)]
    {
        // Compass installs as a batch wrapper on Windows.
        "compass.bat"
    }
    #[cfg(not(windows))]
    {
        "compass"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CompassConfig::default();
        assert!(config.bin.is_none());
        assert!(config.plugins.is_empty());
        assert!(config.timeout.is_none());
        assert!(config.scratch_root.is_none());
    }

    #[test]
    fn test_compass_name_unix() {
        #[cfg(not(windows))]
        assert_eq!(compass_name(), "compass");
    }

    #[test]
    fn test_compass_name_windows() {
        #[cfg(windows)]
        assert_eq!(compass_name(), "compass.bat");
    }

    #[test]
    fn test_resolve_explicit_path_passes_through() {
        let config = CompassConfig {
            bin: Some(PathBuf::from("/opt/compass/bin/compass")),
            ..Default::default()
        };
        // Explicit paths are not validated here; spawn reports problems.
        let resolved = config.resolve_bin().unwrap();
        assert_eq!(resolved, PathBuf::from("/opt/compass/bin/compass"));
    }

    #[test]
    fn test_resolve_unknown_bare_name_fails() {
        let config = CompassConfig {
            bin: Some(PathBuf::from("definitely-not-a-real-compass")),
            ..Default::default()
        };
        let err = config.resolve_bin().unwrap_err();
        assert!(matches!(err, CompassError::NotFound { .. }));
    }

    #[test]
    fn test_from_env() {
        // One sequential test so the variables are not mutated concurrently.
        // SAFETY: no other thread in this test binary touches these vars.
        unsafe {
            std::env::remove_var("COMPASS_BIN");
            std::env::remove_var("COMPASS_PLUGINS");
        }
        let config = CompassConfig::from_env();
        assert!(config.bin.is_none());
        assert!(config.plugins.is_empty());

        // SAFETY: as above.
        unsafe {
            std::env::set_var("COMPASS_BIN", "/usr/local/bin/compass");
            std::env::set_var("COMPASS_PLUGINS", " ninesixty , susy ,,");
        }
        let config = CompassConfig::from_env();
        assert_eq!(config.bin, Some(PathBuf::from("/usr/local/bin/compass")));
        assert_eq!(config.plugins, vec!["ninesixty", "susy"]);

        // SAFETY: as above.
        unsafe {
            std::env::remove_var("COMPASS_BIN");
            std::env::remove_var("COMPASS_PLUGINS");
        }
    }
}
