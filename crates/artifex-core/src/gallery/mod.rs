//! Result gallery
//!
//! An ordered, bounded, deduplicated collection of past generation results,
//! most-recent-first, persisted through a [`GalleryStore`].

mod store;

use tracing::debug;

use crate::studio::GenerationResult;

pub use store::{GalleryStore, JsonGalleryStore, MemoryGalleryStore};

/// Maximum number of results the gallery retains
pub const GALLERY_CAPACITY: usize = 20;

/// In-memory gallery of past results, most-recent-first
#[derive(Debug, Clone, Default)]
pub struct Gallery {
    items: Vec<GenerationResult>,
}

impl Gallery {
    /// Create an empty gallery
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a gallery from previously persisted items
    ///
    /// Order is preserved; anything past the capacity is dropped.
    pub fn from_items(mut items: Vec<GenerationResult>) -> Self {
        items.truncate(GALLERY_CAPACITY);
        Self { items }
    }

    /// Insert a result at the front
    ///
    /// Idempotent by id: inserting an already-present result is a no-op.
    /// Returns whether the gallery changed.
    pub fn add(&mut self, result: GenerationResult) -> bool {
        if self.items.iter().any(|item| item.id == result.id) {
            debug!(result_id = %result.id, "Gallery already holds result, skipping");
            return false;
        }

        self.items.insert(0, result);
        self.items.truncate(GALLERY_CAPACITY);
        true
    }

    /// Drop all results
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// The retained results, most-recent-first
    pub fn items(&self) -> &[GenerationResult] {
        &self.items
    }

    /// Number of retained results
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the gallery holds no results
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
