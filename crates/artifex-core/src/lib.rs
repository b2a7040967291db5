//! Artifex Core Library
//!
//! Headless core of an AI art studio:
//! - Generation pipeline (augment -> synthesize -> optional enhance)
//! - Directional outpainting via local canvas compositing
//! - Remote generation gateway (OpenRouter API)
//! - Persisted result gallery with session-gated storage
//! - Style pack catalog
//!
//! The presentation layer and any real authentication live elsewhere; login
//! here is a placeholder that only gates gallery persistence.

pub mod config;
pub mod error;
pub mod gallery;
pub mod gateway;
pub mod outpaint;
pub mod session;
pub mod studio;
pub mod styles;

pub use error::{Error, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::error::{Error, Result};
    pub use crate::gallery::{Gallery, GalleryStore, JsonGalleryStore, MemoryGalleryStore};
    pub use crate::gateway::{AspectRatio, EncodedImage, GenerationGateway, RemoteGateway};
    pub use crate::outpaint::Direction;
    pub use crate::session::Session;
    pub use crate::studio::{
        BoostedPrompt, GenerationOutcome, GenerationRequest, GenerationResult, Studio,
    };
    pub use crate::styles::{STYLE_PACKS, StylePack};
}
