//! Remote model definitions
//!
//! Defines the remote models the gateway can address, and which of the four
//! operations each one covers.

use serde::Serialize;

/// Information about a remote generation model
#[derive(Debug, Clone, Serialize)]
pub struct RemoteModel {
    /// Model identifier (OpenRouter format)
    pub id: &'static str,
    /// Human-readable name
    pub name: &'static str,
    /// Brief description of the model
    pub description: &'static str,
    /// Supported capabilities
    pub capabilities: ModelCapabilities,
}

/// Capabilities supported by a model
#[derive(Debug, Clone, Copy, Serialize, Default)]
pub struct ModelCapabilities {
    /// Can expand a text prompt into a richer one
    pub augmentation: bool,
    /// Can generate images from text
    pub text_to_image: bool,
    /// Can transform existing images (enhancement, extension)
    pub image_to_image: bool,
}

impl ModelCapabilities {
    /// Text-only model used for prompt work
    pub const fn text_only() -> Self {
        Self {
            augmentation: true,
            text_to_image: false,
            image_to_image: false,
        }
    }

    /// Full image suite
    pub const fn image_full() -> Self {
        Self {
            augmentation: false,
            text_to_image: true,
            image_to_image: true,
        }
    }
}

/// Available remote models
pub static REMOTE_MODELS: &[RemoteModel] = &[
    RemoteModel {
        id: "google/gemini-2.5-flash",
        name: "Gemini 2.5 Flash",
        description: "Fast text model used to expand user prompts into detailed ones.",
        capabilities: ModelCapabilities::text_only(),
    },
    RemoteModel {
        id: "google/gemini-2.5-flash-image",
        name: "Gemini 2.5 Flash (Image)",
        description: "Image generation and editing with good quality and quick turnaround.",
        capabilities: ModelCapabilities::image_full(),
    },
    RemoteModel {
        id: "openai/dall-e-3",
        name: "DALL-E 3",
        description: "Strong prompt adherence for text-to-image, no image input support.",
        capabilities: ModelCapabilities {
            augmentation: false,
            text_to_image: true,
            image_to_image: false,
        },
    },
    RemoteModel {
        id: "stabilityai/stable-diffusion-xl",
        name: "Stable Diffusion XL",
        description: "Open-source generation with image-to-image support.",
        capabilities: ModelCapabilities::image_full(),
    },
];

impl RemoteModel {
    /// Get a model by ID
    pub fn by_id(id: &str) -> Option<&'static RemoteModel> {
        REMOTE_MODELS.iter().find(|m| m.id == id)
    }

    /// Default model for prompt augmentation
    pub fn default_augmentation() -> &'static RemoteModel {
        REMOTE_MODELS
            .iter()
            .find(|m| m.capabilities.augmentation)
            .unwrap_or(&REMOTE_MODELS[0])
    }

    /// Default model for image operations
    pub fn default_image() -> &'static RemoteModel {
        REMOTE_MODELS
            .iter()
            .find(|m| m.capabilities.text_to_image && m.capabilities.image_to_image)
            .unwrap_or(&REMOTE_MODELS[1])
    }

    /// Check if this model can take an image as input
    pub fn supports_image_to_image(&self) -> bool {
        self.capabilities.image_to_image
    }
}
