//! Artifact materialization
//!
//! Generators never touch the file system. A [`FileSink`] receives every
//! artifact of a [`GeneratedSet`]; [`FsSink`] writes it to disk, creating
//! parent directories first and overwriting existing files, while
//! [`DryRunSink`] only records what would have been written.

use crate::artifact::GeneratedSet;
use datapoints_core::{ScaffoldError, ScaffoldResult};
use std::path::{Path, PathBuf};

/// Destination for rendered artifacts
pub trait FileSink {
    /// Create or overwrite `path` with `content`
    fn write(&mut self, path: &Path, content: &str) -> ScaffoldResult<()>;
}

/// Writes artifacts to the file system
#[derive(Debug, Clone, Copy, Default)]
pub struct FsSink;

impl FileSink for FsSink {
    fn write(&mut self, path: &Path, content: &str) -> ScaffoldResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| ScaffoldError::DirectoryCreate {
                path: parent.to_path_buf(),
                message: e.to_string(),
            })?;
        }

        std::fs::write(path, content).map_err(|e| ScaffoldError::FileWrite {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}

/// Records writes without performing them
#[derive(Debug, Clone, Default)]
pub struct DryRunSink {
    /// Path and byte length of every write, in order
    pub writes: Vec<(PathBuf, usize)>,
}

impl DryRunSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.writes.iter().map(|(path, _)| path.as_path())
    }

    pub fn total_bytes(&self) -> usize {
        self.writes.iter().map(|(_, bytes)| bytes).sum()
    }
}

impl FileSink for DryRunSink {
    fn write(&mut self, path: &Path, content: &str) -> ScaffoldResult<()> {
        self.writes.push((path.to_path_buf(), content.len()));
        Ok(())
    }
}

impl GeneratedSet {
    /// Hand every artifact to `sink`, in generation order
    ///
    /// Stops at the first failure; artifacts already written stay written.
    pub fn persist(&self, sink: &mut dyn FileSink) -> ScaffoldResult<usize> {
        for artifact in &self.artifacts {
            sink.write(artifact.path(), artifact.content())?;
            tracing::debug!(path = %artifact.path().display(), "artifact written");
        }
        tracing::info!(files = self.artifacts.len(), "artifacts persisted");
        Ok(self.artifacts.len())
    }
}

// ============================================================================
// Tests
// ============================================================================
