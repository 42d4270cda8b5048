//! Run-scoped state shared by the orchestrator and the output-directory
//! manager.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Absolute paths of source files already handed to the pipeline this run.
///
/// Only grows. Besides de-duplicating files reached twice (overlapping roots,
/// a file given explicitly and again through its directory), it tells the
/// output-directory manager which base directories already received output.
#[derive(Debug, Clone, Default)]
pub struct ProcessedSet {
    paths: BTreeSet<PathBuf>,
}

impl ProcessedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `path`. Returns false if it was already present.
    pub fn insert(&mut self, path: impl Into<PathBuf>) -> bool {
        self.paths.insert(path.into())
    }

    /// Whether any recorded file sits directly inside `dir`.
    pub fn has_entry_in(&self, dir: &Path) -> bool {
        self.paths.iter().any(|p| p.parent() == Some(dir))
    }
}

/// Everything the run remembers between roots.
#[derive(Debug, Clone, Default)]
pub struct RunState {
    pub processed: ProcessedSet,
    /// Output directories created or cleared by this run.
    pub prepared: BTreeSet<PathBuf>,
}

impl RunState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the output directory of `base_dir` belongs to this run and so
    /// must not be cleared again.
    pub fn is_fresh(&self, base_dir: &Path, output_dir: &Path) -> bool {
        self.prepared.contains(output_dir) || self.processed.has_entry_in(base_dir)
    }
}
