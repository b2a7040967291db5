//! Generation pipeline
//!
//! Sequences augment -> synthesize -> (optional) enhance into one logical
//! generate operation, enforces single-flight, and always hands the caller a
//! fully-formed result record.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::gateway::{AspectRatio, EncodedImage, GenerationGateway};
use crate::outpaint::{self, Direction};

use super::types::{BoostedPrompt, GenerationOutcome, GenerationRequest, GenerationResult};

/// Quality suffix appended by the local augmentation fallback
const FALLBACK_QUALITY_SUFFIX: &str = ", high quality, detailed";

/// Boosted-prompt text recorded on placeholder results
const FAILED_BOOST_TEXT: &str = "Error during generation. Please try regenerating.";

/// Maps an aspect ratio to a placeholder image reference
pub type PlaceholderFn = dyn Fn(AspectRatio) -> String + Send + Sync;

/// Default placeholder mapping, keyed by the ratio's dimensions
pub fn default_placeholder(aspect_ratio: AspectRatio) -> String {
    let (width, height) = aspect_ratio.placeholder_dimensions();
    format!("https://picsum.photos/seed/error/{}/{}", width, height)
}

/// The generation orchestrator
///
/// Holds the remote gateway and the single-flight flag. All methods take
/// `&self`; share the studio behind an `Arc` across tasks.
pub struct Studio {
    gateway: Arc<dyn GenerationGateway>,
    placeholder: Box<PlaceholderFn>,
    in_flight: AtomicBool,
}

impl std::fmt::Debug for Studio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Studio")
            .field("in_flight", &self.in_flight.load(Ordering::Acquire))
            .finish()
    }
}

impl Studio {
    /// Create a studio over the given gateway with the default placeholder
    /// mapping
    pub fn new(gateway: Arc<dyn GenerationGateway>) -> Self {
        Self {
            gateway,
            placeholder: Box::new(default_placeholder),
            in_flight: AtomicBool::new(false),
        }
    }

    /// Replace the placeholder mapping
    pub fn with_placeholder(
        mut self,
        placeholder: impl Fn(AspectRatio) -> String + Send + Sync + 'static,
    ) -> Self {
        self.placeholder = Box::new(placeholder);
        self
    }

    /// Whether a generation or extension is currently in flight
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Run the full generation pipeline
    ///
    /// Rejects empty prompts before any remote call, and rejects concurrent
    /// invocations outright. Fatal pipeline failures still produce a
    /// fully-formed (placeholder) result, with the human-readable message
    /// surfaced separately on the outcome.
    pub async fn generate(&self, request: &GenerationRequest) -> Result<GenerationOutcome> {
        let prompt = request.prompt.trim();
        if prompt.is_empty() {
            return Err(Error::EmptyPrompt);
        }

        let _guard = self.begin()?;

        info!(
            style = %request.style.id,
            aspect_ratio = %request.aspect_ratio,
            enhance = request.enhance,
            "Starting generation"
        );

        // Augmentation failure is not fatal: fall back to a locally
        // assembled prompt.
        let boosted = match self
            .gateway
            .augment(prompt, &request.style.prompt_prefix)
            .await
        {
            Ok(text) => BoostedPrompt::Augmented(text),
            Err(e) => {
                warn!(error = %e, "Augmentation failed, using local fallback prompt");
                BoostedPrompt::Fallback(format!(
                    "{}{}{}",
                    request.style.prompt_prefix, prompt, FALLBACK_QUALITY_SUFFIX
                ))
            }
        };

        let base_image = match self
            .gateway
            .synthesize(boosted.text(), request.aspect_ratio)
            .await
        {
            Ok(image) => image,
            Err(e) => return Ok(self.failure_outcome(request, prompt, boosted, &e)),
        };

        debug!(size_bytes = base_image.size_bytes(), "Base image synthesized");

        let (image, is_enhanced) = if request.enhance {
            // The unenhanced base image is not substituted on failure.
            match self.gateway.enhance(&base_image).await {
                Ok(enhanced) => (enhanced, true),
                Err(e) => return Ok(self.failure_outcome(request, prompt, boosted, &e)),
            }
        } else {
            (base_image, false)
        };

        let result = GenerationResult::new(
            prompt,
            boosted.text(),
            image.to_data_url(),
            request.style.clone(),
            is_enhanced,
            request.aspect_ratio,
        );

        info!(result_id = %result.id, is_enhanced, "Generation completed");

        Ok(GenerationOutcome {
            result,
            error: None,
            boosted,
        })
    }

    /// Rerun the full pipeline from a prior result
    ///
    /// Augmentation is redone from scratch, so the boosted prompt and image
    /// can legitimately differ from the original.
    pub async fn regenerate(&self, prior: &GenerationResult) -> Result<GenerationOutcome> {
        let request = GenerationRequest {
            prompt: prior.original_prompt.clone(),
            style: prior.style_pack.clone(),
            aspect_ratio: prior.aspect_ratio,
            enhance: prior.is_enhanced,
        };
        self.generate(&request).await
    }

    /// Extend a prior result's canvas in the given direction
    ///
    /// Composites locally first; a compositing failure aborts before any
    /// remote call. Remote failure propagates without placeholder
    /// substitution - the prior image remains the current one.
    pub async fn extend(
        &self,
        prior: &GenerationResult,
        direction: Direction,
        guidance: &str,
    ) -> Result<GenerationResult> {
        let _guard = self.begin()?;

        let source = EncodedImage::from_data_url(&prior.image_url)?;
        let canvas = outpaint::prepare_extension(&source, direction)?;

        info!(
            result_id = %prior.id,
            %direction,
            position = canvas.position_description,
            "Requesting extension"
        );

        let extended = self
            .gateway
            .extend(&canvas.composite, guidance, direction)
            .await?;

        let result = prior.derive_with_image(extended.to_data_url());
        info!(result_id = %result.id, "Extension completed");

        Ok(result)
    }

    /// Claim the single-flight slot
    fn begin(&self) -> Result<FlightGuard<'_>> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(Error::GenerationInFlight);
        }
        Ok(FlightGuard { flag: &self.in_flight })
    }

    /// Build the placeholder outcome for a fatal pipeline failure
    fn failure_outcome(
        &self,
        request: &GenerationRequest,
        prompt: &str,
        boosted: BoostedPrompt,
        error: &Error,
    ) -> GenerationOutcome {
        warn!(error = %error, code = error.code(), "Generation failed");

        let result = GenerationResult::new(
            prompt,
            FAILED_BOOST_TEXT,
            (self.placeholder)(request.aspect_ratio),
            request.style.clone(),
            false,
            request.aspect_ratio,
        );

        GenerationOutcome {
            result,
            error: Some(format!("Generation failed: {}", error)),
            boosted,
        }
    }
}

/// Clears the single-flight flag when the pipeline finishes, success or not
struct FlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
