//! Command implementations for the assetpipe CLI
//!
//! Each command module handles the CLI interface and delegates to the
//! library crates for actual implementation.

pub mod compile;
