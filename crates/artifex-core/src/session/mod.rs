//! Session state
//!
//! Tracks login/logout (a local placeholder with no real verification) and
//! the currently displayed result, and exclusively owns the gallery. The
//! gallery is only loaded and persisted while logged in; logging out clears
//! the in-memory view but leaves persisted storage untouched, so a later
//! login reloads it.

use std::sync::Arc;

use tracing::{info, warn};

use crate::gallery::{Gallery, GalleryStore};
use crate::studio::{GenerationOutcome, GenerationResult};

/// Per-user session owning the gallery
pub struct Session {
    logged_in: bool,
    current_result: Option<GenerationResult>,
    gallery: Gallery,
    store: Arc<dyn GalleryStore>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("logged_in", &self.logged_in)
            .field("has_current_result", &self.current_result.is_some())
            .field("gallery_len", &self.gallery.len())
            .finish()
    }
}

impl Session {
    /// Create a logged-out session over the given store
    pub fn new(store: Arc<dyn GalleryStore>) -> Self {
        Self {
            logged_in: false,
            current_result: None,
            gallery: Gallery::new(),
            store,
        }
    }

    /// Whether the session is logged in
    pub fn is_logged_in(&self) -> bool {
        self.logged_in
    }

    /// The currently displayed result, if any
    pub fn current_result(&self) -> Option<&GenerationResult> {
        self.current_result.as_ref()
    }

    /// The gallery view; empty while logged out
    pub fn gallery(&self) -> &Gallery {
        &self.gallery
    }

    /// Log in (placeholder, always succeeds) and load the persisted gallery
    ///
    /// A load failure is logged and the session starts with an empty gallery.
    pub fn login(&mut self) {
        if self.logged_in {
            return;
        }
        self.logged_in = true;

        match self.store.load() {
            Ok(items) => {
                info!(count = items.len(), "Loaded persisted gallery");
                self.gallery = Gallery::from_items(items);
            }
            Err(e) => {
                warn!(error = %e, "Failed to load gallery, starting empty");
                self.gallery = Gallery::new();
            }
        }
    }

    /// Log out, clearing the current result and the in-memory gallery
    ///
    /// Persisted storage is left untouched.
    pub fn logout(&mut self) {
        self.logged_in = false;
        self.current_result = None;
        self.gallery = Gallery::new();
    }

    /// Record a completed result as current and, while logged in, add it to
    /// the gallery and persist
    pub fn record(&mut self, result: GenerationResult) {
        self.current_result = Some(result.clone());

        if self.logged_in && self.gallery.add(result) {
            self.persist();
        }
    }

    /// Record a generation outcome
    ///
    /// The result becomes current either way so the user always sees
    /// something, but placeholder results from failed attempts stay out of
    /// the gallery.
    pub fn record_outcome(&mut self, outcome: &GenerationOutcome) {
        if outcome.is_success() {
            self.record(outcome.result.clone());
        } else {
            self.current_result = Some(outcome.result.clone());
        }
    }

    /// Empty the gallery and persist the empty state immediately
    pub fn clear_gallery(&mut self) {
        self.gallery.clear();
        if self.logged_in {
            if let Err(e) = self.store.clear() {
                warn!(error = %e, code = e.code(), "Failed to persist cleared gallery");
            }
        }
    }

    /// Persist the gallery, swallowing failures
    ///
    /// Storage trouble never interrupts the generation flow.
    fn persist(&self) {
        if let Err(e) = self.store.save(self.gallery.items()) {
            warn!(error = %e, code = e.code(), "Failed to persist gallery");
        }
    }
}
