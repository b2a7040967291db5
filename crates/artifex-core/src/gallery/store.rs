//! Gallery persistence
//!
//! The persisted layout is a single JSON document holding the serialized
//! result sequence, most-recent-first. Persistence is an explicit service
//! owned by the session, so storage is swappable and testable.

use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing::debug;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::studio::GenerationResult;

/// File name of the persisted gallery under the config directory
const GALLERY_FILE: &str = "gallery.json";

/// Persistence backend for the gallery
pub trait GalleryStore: Send + Sync {
    /// Load the persisted sequence; an absent record yields an empty one
    fn load(&self) -> Result<Vec<GenerationResult>>;

    /// Replace the persisted sequence
    fn save(&self, items: &[GenerationResult]) -> Result<()>;

    /// Persist the empty sequence
    fn clear(&self) -> Result<()> {
        self.save(&[])
    }
}

/// JSON-file-backed gallery store
#[derive(Debug, Clone)]
pub struct JsonGalleryStore {
    path: PathBuf,
}

impl JsonGalleryStore {
    /// Create a store at an explicit path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Create a store at the default location under the config directory
    pub fn at_default_path() -> Result<Self> {
        let dir = Config::config_dir().map_err(|e| Error::Config(e.to_string()))?;
        Ok(Self::new(dir.join(GALLERY_FILE)))
    }

    /// Path of the persisted document
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl GalleryStore for JsonGalleryStore {
    fn load(&self) -> Result<Vec<GenerationResult>> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "No persisted gallery, starting empty");
            return Ok(Vec::new());
        }

        let contents = fs::read_to_string(&self.path)
            .map_err(|e| Error::Persistence(format!("{}: {}", self.path.display(), e)))?;

        serde_json::from_str(&contents)
            .map_err(|e| Error::Persistence(format!("{}: {}", self.path.display(), e)))
    }

    fn save(&self, items: &[GenerationResult]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| Error::Persistence(format!("{}: {}", parent.display(), e)))?;
        }

        let contents = serde_json::to_string_pretty(items)
            .map_err(|e| Error::Persistence(e.to_string()))?;

        fs::write(&self.path, contents)
            .map_err(|e| Error::Persistence(format!("{}: {}", self.path.display(), e)))?;

        debug!(path = %self.path.display(), count = items.len(), "Gallery persisted");
        Ok(())
    }
}

/// In-memory gallery store, useful for testing
#[derive(Debug, Default)]
pub struct MemoryGalleryStore {
    items: Mutex<Vec<GenerationResult>>,
}

impl MemoryGalleryStore {
    /// Create an empty in-memory store
    pub fn new() -> Self {
        Self::default()
    }
}

impl GalleryStore for MemoryGalleryStore {
    fn load(&self) -> Result<Vec<GenerationResult>> {
        Ok(self.items.lock().expect("store poisoned").clone())
    }

    fn save(&self, items: &[GenerationResult]) -> Result<()> {
        *self.items.lock().expect("store poisoned") = items.to_vec();
        Ok(())
    }
}
