//! Remote generation gateway
//!
//! Abstraction over the four remote operations the studio depends on:
//! prompt augmentation, image synthesis, 4K enhancement, and directional
//! extension. The remote service is an opaque, possibly-failing network
//! dependency; everything behind the [`GenerationGateway`] trait is
//! replaceable, and tests substitute scripted mocks.

mod client;
mod models;
mod types;

use async_trait::async_trait;

use crate::error::Result;
use crate::outpaint::Direction;

pub use client::{RemoteGateway, RemoteGatewayBuilder};
pub use models::{ModelCapabilities, REMOTE_MODELS, RemoteModel};
pub use types::{AspectRatio, EncodedImage, is_valid_image_data, sniff_mime_type};

/// The four remote operations the generation pipeline is built on
///
/// Implementations must be cheap to share; the studio holds one behind an
/// `Arc` and never calls two operations concurrently.
#[async_trait]
pub trait GenerationGateway: Send + Sync {
    /// Expand a user prompt into a richer, more detailed one
    ///
    /// Fails with [`Error::Augmentation`](crate::Error::Augmentation); callers
    /// are expected to recover with a local fallback.
    async fn augment(&self, prompt: &str, style_prefix: &str) -> Result<String>;

    /// Generate an image from a prompt at the requested aspect ratio
    ///
    /// Fails with [`Error::Synthesis`](crate::Error::Synthesis) when the
    /// remote model returns no image payload.
    async fn synthesize(&self, prompt: &str, aspect_ratio: AspectRatio) -> Result<EncodedImage>;

    /// Upscale an image to 4K quality
    ///
    /// Fails with [`Error::Enhancement`](crate::Error::Enhancement) when the
    /// remote model returns no image payload.
    async fn enhance(&self, image: &EncodedImage) -> Result<EncodedImage>;

    /// Fill the transparent region of an extension composite
    ///
    /// `guidance` is optional free text from the user; `direction` tells the
    /// remote model where the original content sits. Fails with
    /// [`Error::Extension`](crate::Error::Extension).
    async fn extend(
        &self,
        image: &EncodedImage,
        guidance: &str,
        direction: Direction,
    ) -> Result<EncodedImage>;
}
