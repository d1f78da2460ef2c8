//! Generated artifacts
//!
//! A [`GeneratedArtifact`] pairs an output path with file content. Content
//! may be deferred: a generator assembles its structured representation and
//! hands over a closure that renders it, which runs at most once, the first
//! time the content is read.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

type Render = Box<dyn FnOnce() -> String + Send>;

// ============================================================================
// ArtifactKind
// ============================================================================

/// The kind of file an artifact holds; one per generator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ArtifactKind {
    Model,
    Migration,
    Factory,
    Seeder,
    Request,
    Resource,
    Controller,
    Policy,
    Provider,
}

impl ArtifactKind {
    /// Stable tag identifying the artifact kind
    pub fn tag(&self) -> &'static str {
        match self {
            ArtifactKind::Model => "model",
            ArtifactKind::Migration => "migration",
            ArtifactKind::Factory => "factory",
            ArtifactKind::Seeder => "seeder",
            ArtifactKind::Request => "request",
            ArtifactKind::Resource => "resource",
            ArtifactKind::Controller => "controller",
            ArtifactKind::Policy => "policy",
            ArtifactKind::Provider => "provider",
        }
    }

    /// Look up a kind by tag (case-insensitive, plural accepted)
    pub fn from_tag(tag: &str) -> Option<Self> {
        let tag = tag.trim().to_ascii_lowercase();
        let tag = match tag.as_str() {
            "factories" => "factory",
            "policies" => "policy",
            other => other.strip_suffix('s').unwrap_or(other),
        };
        ArtifactKind::all().iter().copied().find(|k| k.tag() == tag)
    }

    /// Get all artifact kinds, in pipeline order
    pub fn all() -> &'static [ArtifactKind] {
        &[
            ArtifactKind::Model,
            ArtifactKind::Migration,
            ArtifactKind::Factory,
            ArtifactKind::Seeder,
            ArtifactKind::Request,
            ArtifactKind::Resource,
            ArtifactKind::Controller,
            ArtifactKind::Policy,
            ArtifactKind::Provider,
        ]
    }
}

impl std::fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tag())
    }
}

// ============================================================================
// GeneratedArtifact
// ============================================================================

/// One output file: a path and (possibly deferred) content
pub struct GeneratedArtifact {
    path: PathBuf,
    kind: ArtifactKind,
    content: LazyLock<String, Render>,
}

impl GeneratedArtifact {
    /// Create an artifact whose content is already rendered
    pub fn new(path: impl Into<PathBuf>, kind: ArtifactKind, content: impl Into<String>) -> Self {
        let content = content.into();
        Self::deferred(path, kind, move || content)
    }

    /// Create an artifact rendered on first access
    pub fn deferred(
        path: impl Into<PathBuf>,
        kind: ArtifactKind,
        render: impl FnOnce() -> String + Send + 'static,
    ) -> Self {
        let render: Render = Box::new(render);
        Self {
            path: path.into(),
            kind,
            content: LazyLock::new(render),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn kind(&self) -> ArtifactKind {
        self.kind
    }

    /// The file content, rendering it if this is the first access
    pub fn content(&self) -> &str {
        LazyLock::force(&self.content).as_str()
    }

    /// File name without directories
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

impl std::fmt::Debug for GeneratedArtifact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeneratedArtifact")
            .field("path", &self.path)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

impl std::fmt::Display for GeneratedArtifact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.content())
    }
}

// ============================================================================
// GeneratedSet
// ============================================================================

/// Every artifact produced by one pipeline run, in generation order
#[derive(Debug, Default)]
pub struct GeneratedSet {
    /// All generated artifacts
    pub artifacts: Vec<GeneratedArtifact>,

    /// Recovered conditions worth reporting (cycles, skipped wiring, ...)
    pub warnings: Vec<String>,
}

impl GeneratedSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extend(&mut self, artifacts: impl IntoIterator<Item = GeneratedArtifact>) {
        self.artifacts.extend(artifacts);
    }

    pub fn add_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn by_kind(&self, kind: ArtifactKind) -> Vec<&GeneratedArtifact> {
        self.artifacts.iter().filter(|a| a.kind() == kind).collect()
    }

    /// Find an artifact by file name
    pub fn find(&self, file_name: &str) -> Option<&GeneratedArtifact> {
        self.artifacts.iter().find(|a| a.file_name() == file_name)
    }

    pub fn paths(&self) -> Vec<&Path> {
        self.artifacts.iter().map(|a| a.path()).collect()
    }
}

// ============================================================================
// Tests
// ============================================================================
