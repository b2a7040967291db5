//! Generation orchestrator
//!
//! The studio owns the generate operation: prompt validation, augmentation
//! with local fallback, synthesis, optional enhancement, regeneration, and
//! canvas extension. At most one operation is in flight at a time.

mod pipeline;
mod types;

pub use pipeline::{PlaceholderFn, Studio, default_placeholder};
pub use types::{BoostedPrompt, GenerationOutcome, GenerationRequest, GenerationResult};
