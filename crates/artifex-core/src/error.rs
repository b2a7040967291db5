//! Error types for Artifex

use thiserror::Error;

/// Result type alias using Artifex's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Artifex error types with helpful messages
#[derive(Error, Debug)]
pub enum Error {
    // Request errors (E001-E099)
    #[error("Prompt is empty. Describe the image you want to generate.")]
    EmptyPrompt,

    #[error("A generation is already in progress. Wait for it to finish.")]
    GenerationInFlight,

    // Pipeline errors (E100-E199)
    #[error("Prompt augmentation failed: {0}")]
    Augmentation(String),

    #[error("Image synthesis failed: {0}")]
    Synthesis(String),

    #[error("Image enhancement failed: {0}")]
    Enhancement(String),

    #[error("Image extension failed: {0}")]
    Extension(String),

    // Compositing errors (E200-E299)
    #[error("Failed to decode image: {0}")]
    ImageDecode(String),

    #[error("Cannot allocate extension canvas: {0}")]
    CanvasAllocation(String),

    // Storage errors (E300-E399)
    #[error("Gallery persistence failed: {0}")]
    Persistence(String),

    // Gateway errors (E400-E499)
    #[error("API key not set. Export ARTIFEX_API_KEY or OPENROUTER_API_KEY.")]
    ApiKeyMissing,

    #[error("Network error: {0}. Check your internet connection.")]
    Network(#[from] reqwest::Error),

    // Config errors (E500-E599)
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Get error code for this error type
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyPrompt => "E001",
            Self::GenerationInFlight => "E002",
            Self::Augmentation(_) => "E100",
            Self::Synthesis(_) => "E101",
            Self::Enhancement(_) => "E102",
            Self::Extension(_) => "E103",
            Self::ImageDecode(_) => "E200",
            Self::CanvasAllocation(_) => "E201",
            Self::Persistence(_) => "E300",
            Self::ApiKeyMissing => "E400",
            Self::Network(_) => "E401",
            Self::Config(_) => "E500",
            Self::Parse(_) => "E501",
            Self::Io(_) => "E9999",
        }
    }

    /// Whether this error leaves the current attempt without a usable image
    /// (the caller substitutes a placeholder result for these).
    pub fn is_pipeline_fatal(&self) -> bool {
        matches!(self, Self::Synthesis(_) | Self::Enhancement(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_are_stable() {
        assert_eq!(Error::EmptyPrompt.code(), "E001");
        assert_eq!(Error::Synthesis("x".into()).code(), "E101");
        assert_eq!(Error::Persistence("x".into()).code(), "E300");
    }

    #[test]
    fn test_pipeline_fatal_classification() {
        assert!(Error::Synthesis("no image".into()).is_pipeline_fatal());
        assert!(Error::Enhancement("no image".into()).is_pipeline_fatal());
        assert!(!Error::Augmentation("timeout".into()).is_pipeline_fatal());
        assert!(!Error::Extension("no image".into()).is_pipeline_fatal());
    }
}
