//! Generation request and result types

use chrono::Local;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::gateway::AspectRatio;
use crate::styles::StylePack;

/// A generation request
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// The user's prompt, as typed
    pub prompt: String,
    /// Style pack biasing the output
    pub style: StylePack,
    /// Requested aspect ratio
    pub aspect_ratio: AspectRatio,
    /// Whether to run the 4K enhancement step
    pub enhance: bool,
}

impl GenerationRequest {
    /// Create a request with enhancement off
    pub fn new(prompt: impl Into<String>, style: StylePack, aspect_ratio: AspectRatio) -> Self {
        Self {
            prompt: prompt.into(),
            style,
            aspect_ratio,
            enhance: false,
        }
    }

    /// Enable the 4K enhancement step
    pub fn with_enhancement(mut self) -> Self {
        self.enhance = true;
        self
    }
}

/// Outcome of prompt augmentation
///
/// Distinguishes a remotely augmented prompt from the local fallback so
/// callers don't have to inspect the text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoostedPrompt {
    /// The remote augmentation succeeded
    Augmented(String),
    /// Augmentation failed; the prompt was assembled locally
    Fallback(String),
}

impl BoostedPrompt {
    /// The prompt text, whichever path produced it
    pub fn text(&self) -> &str {
        match self {
            Self::Augmented(text) | Self::Fallback(text) => text,
        }
    }

    /// Whether the local fallback was used
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback(_))
    }
}

/// The unit of output and of gallery storage
///
/// Every result handed to a caller is fully formed, success or failure;
/// there is no partial state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationResult {
    /// Unique identifier, minted at creation time
    pub id: String,
    /// The user's prompt, as typed
    pub original_prompt: String,
    /// The prompt actually sent to synthesis, or an explanatory
    /// placeholder when generation failed
    pub boosted_prompt: String,
    /// Inline-encoded image, or a placeholder reference on failure
    pub image_url: String,
    /// The style pack used, embedded by value
    pub style_pack: StylePack,
    /// Human-readable creation time
    pub timestamp: String,
    /// Whether the 4K enhancement step ran successfully
    #[serde(default)]
    pub is_enhanced: bool,
    /// The aspect ratio used
    pub aspect_ratio: AspectRatio,
}

impl GenerationResult {
    /// Construct a result with a freshly minted id and timestamp
    pub fn new(
        original_prompt: impl Into<String>,
        boosted_prompt: impl Into<String>,
        image_url: impl Into<String>,
        style_pack: StylePack,
        is_enhanced: bool,
        aspect_ratio: AspectRatio,
    ) -> Self {
        Self {
            id: mint_id(),
            original_prompt: original_prompt.into(),
            boosted_prompt: boosted_prompt.into(),
            image_url: image_url.into(),
            style_pack,
            timestamp: current_timestamp(),
            is_enhanced,
            aspect_ratio,
        }
    }

    /// Derive a new result from this one with a replacement image
    ///
    /// Used after extension: prompts, style, and ratio carry over; id and
    /// timestamp are fresh.
    pub fn derive_with_image(&self, image_url: impl Into<String>) -> Self {
        Self {
            id: mint_id(),
            image_url: image_url.into(),
            timestamp: current_timestamp(),
            ..self.clone()
        }
    }
}

/// Result of a `generate` call
///
/// Carries a fully-formed result record either way; `error` is set when the
/// pipeline failed and `result` holds the placeholder record.
#[derive(Debug, Clone)]
pub struct GenerationOutcome {
    /// The result record (placeholder on failure)
    pub result: GenerationResult,
    /// Surfaced error message, if the pipeline failed
    pub error: Option<String>,
    /// How the boosted prompt was produced
    pub boosted: BoostedPrompt,
}

impl GenerationOutcome {
    /// Whether the pipeline completed without a fatal error
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

fn mint_id() -> String {
    Uuid::new_v4().to_string()
}

fn current_timestamp() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::styles::StylePack;

    fn sample_result() -> GenerationResult {
        GenerationResult::new(
            "a red fox",
            "anime style red fox",
            "data:image/png;base64,AAAA",
            StylePack::by_id("anime").unwrap().clone(),
            false,
            AspectRatio::Square,
        )
    }

    #[test]
    fn test_boosted_prompt_paths() {
        let augmented = BoostedPrompt::Augmented("rich text".to_string());
        assert_eq!(augmented.text(), "rich text");
        assert!(!augmented.is_fallback());

        let fallback = BoostedPrompt::Fallback("prefix prompt".to_string());
        assert!(fallback.is_fallback());
    }

    #[test]
    fn test_result_ids_are_unique() {
        let a = sample_result();
        let b = sample_result();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_result_serde_roundtrip() {
        let result = sample_result();
        let json = serde_json::to_string(&result).unwrap();
        let back: GenerationResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, result);
    }

    #[test]
    fn test_derive_with_image_keeps_prompts() {
        let original = sample_result();
        let derived = original.derive_with_image("data:image/png;base64,BBBB");

        assert_ne!(derived.id, original.id);
        assert_eq!(derived.image_url, "data:image/png;base64,BBBB");
        assert_eq!(derived.original_prompt, original.original_prompt);
        assert_eq!(derived.boosted_prompt, original.boosted_prompt);
        assert_eq!(derived.style_pack, original.style_pack);
        assert_eq!(derived.aspect_ratio, original.aspect_ratio);
    }
}
