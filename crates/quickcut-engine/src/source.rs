//! Probed media sources and the catalog boundary.
//!
//! Sources are produced by the host's probing stage and owned by the host;
//! the engine only ever looks them up by id. Nothing here reads bytes.

use quickcut_core::Seconds;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A probed media file reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Source {
    /// Unique source ID
    pub id: Uuid,
    /// Path to the media file
    pub path: String,
    /// Display name
    pub name: String,
    /// Total duration of the file
    pub duration: Seconds,
    /// File has at least one video stream
    pub has_video: bool,
    /// File has at least one audio stream
    pub has_audio: bool,
}

impl Source {
    /// Create a new source reference with a fresh id.
    pub fn new(
        path: impl Into<String>,
        name: impl Into<String>,
        duration: Seconds,
        has_video: bool,
        has_audio: bool,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            path: path.into(),
            name: name.into(),
            duration,
            has_video,
            has_audio,
        }
    }
}

/// Read-only lookup into the host's source catalog.
pub trait SourceCatalog {
    /// Look up a source by id.
    fn source(&self, id: Uuid) -> Option<&Source>;
}

/// Simple in-memory catalog, enough for tests and small hosts.
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    sources: Vec<Source>,
}

impl MemoryCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a source, returning its id.
    pub fn add(&mut self, source: Source) -> Uuid {
        let id = source.id;
        self.sources.push(source);
        id
    }

    /// Number of sources in the catalog.
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Check if the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl SourceCatalog for MemoryCatalog {
    fn source(&self, id: Uuid) -> Option<&Source> {
        self.sources.iter().find(|s| s.id == id)
    }
}
