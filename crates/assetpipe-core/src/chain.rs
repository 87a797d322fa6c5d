/*
 * chain.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Ordered filter chain for one source file.
 */

//! Ordered filter chain for one source file.

use std::io::{Cursor, Write};
use std::path::Path;

use tracing::debug;

use crate::error::FilterError;
use crate::filter::{Filter, Placement, TransformContext};

/// An ordered chain of filters applied to one source file.
///
/// Filters run in insertion order. Each filter's output becomes the next
/// filter's input; the last filter's output is written to the caller's
/// sink in a single write.
///
/// Placement is validated when a filter is added: a [`Placement::First`]
/// filter is rejected unless the chain is still empty, so an ordering that
/// would discard upstream output is an error at assembly time rather than
/// silent data loss at run time.
#[derive(Default)]
pub struct FilterChain {
    filters: Vec<Box<dyn Filter>>,
}

impl FilterChain {
    /// Create a new empty chain.
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
        }
    }

    /// Add a filter to the end of the chain.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::MisplacedFilter`] if the filter declares
    /// [`Placement::First`] and the chain already contains filters.
    pub fn push(&mut self, filter: Box<dyn Filter>) -> Result<(), FilterError> {
        if filter.placement() == Placement::First && !self.filters.is_empty() {
            return Err(FilterError::misplaced(filter.name()));
        }
        self.filters.push(filter);
        Ok(())
    }

    /// Get the number of filters in the chain.
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Check if the chain is empty.
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Run the chain on one source file, writing the result to `sink`.
    ///
    /// The source file is read once; intermediate results are held in
    /// memory between filters. Nothing is written to `sink` unless every
    /// filter succeeds.
    ///
    /// # Arguments
    ///
    /// * `source_path` - The file to process (must exist on disk)
    /// * `output_path` - Eventual destination of the result (advisory,
    ///   passed through to filters)
    /// * `sink` - Where the final output is written
    ///
    /// # Errors
    ///
    /// Returns the first filter's error, or an IO error from reading the
    /// source or writing the sink.
    pub fn run(
        &self,
        source_path: &Path,
        output_path: &Path,
        sink: &mut dyn Write,
    ) -> Result<(), FilterError> {
        let ctx = TransformContext::new(source_path, output_path);
        let mut current = std::fs::read(source_path)?;

        for filter in &self.filters {
            debug!(filter = filter.name(), source = %source_path.display(), "applying filter");
            let mut next = Vec::new();
            let mut reader = Cursor::new(current);
            filter.transform(&mut reader, &mut next, &ctx)?;
            current = next;
        }

        sink.write_all(&current)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    /// Appends a fixed tag to whatever it reads.
    struct Tag(&'static str);

    impl Filter for Tag {
        fn name(&self) -> &str {
            self.0
        }

        fn transform(
            &self,
            input: &mut dyn Read,
            output: &mut dyn Write,
            _ctx: &TransformContext,
        ) -> Result<(), FilterError> {
            let mut buf = Vec::new();
            input.read_to_end(&mut buf)?;
            output.write_all(&buf)?;
            output.write_all(self.0.as_bytes())?;
            Ok(())
        }
    }

    /// A filter that claims it must run first.
    struct MustBeFirst;

    impl Filter for MustBeFirst {
        fn name(&self) -> &str {
            "must-be-first"
        }

        fn placement(&self) -> Placement {
            Placement::First
        }

        fn transform(
            &self,
            input: &mut dyn Read,
            output: &mut dyn Write,
            _ctx: &TransformContext,
        ) -> Result<(), FilterError> {
            std::io::copy(input, output)?;
            Ok(())
        }
    }

    fn source_file(content: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("input.css");
        std::fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn test_empty_chain_passes_source_through() {
        let (_dir, path) = source_file("body { color: red; }");
        let chain = FilterChain::new();
        let mut out = Vec::new();
        chain.run(&path, Path::new("out.css"), &mut out).unwrap();
        assert_eq!(out, b"body { color: red; }");
    }

    #[test]
    fn test_filters_run_in_insertion_order() {
        let (_dir, path) = source_file("x");
        let mut chain = FilterChain::new();
        chain.push(Box::new(Tag("-a"))).unwrap();
        chain.push(Box::new(Tag("-b"))).unwrap();
        assert_eq!(chain.len(), 2);

        let mut out = Vec::new();
        chain.run(&path, Path::new("out.css"), &mut out).unwrap();
        assert_eq!(out, b"x-a-b");
    }

    #[test]
    fn test_first_placement_accepted_at_front() {
        let mut chain = FilterChain::new();
        chain.push(Box::new(MustBeFirst)).unwrap();
        chain.push(Box::new(Tag("-a"))).unwrap();
        assert_eq!(chain.len(), 2);
    }

    #[test]
    fn test_first_placement_rejected_elsewhere() {
        let mut chain = FilterChain::new();
        chain.push(Box::new(Tag("-a"))).unwrap();
        let err = chain.push(Box::new(MustBeFirst)).unwrap_err();
        assert!(matches!(err, FilterError::MisplacedFilter { .. }));
        // The rejected filter was not added.
        assert_eq!(chain.len(), 1);
    }

    #[test]
    fn test_missing_source_is_io_error() {
        let chain = FilterChain::new();
        let mut out = Vec::new();
        let err = chain
            .run(Path::new("/no/such/file.sass"), Path::new("out.css"), &mut out)
            .unwrap_err();
        assert!(matches!(err, FilterError::Io(_)));
        assert!(out.is_empty());
    }
}
