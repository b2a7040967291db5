//! Remote gateway client for the OpenRouter API
//!
//! Uses the chat completions endpoint, with `modalities: ["text", "image"]`
//! for the image operations. Synthesis retries transient failures with
//! exponential backoff; the single-image operations are one-shot.

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::Client as HttpClient;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::outpaint::Direction;

use super::GenerationGateway;
use super::models::RemoteModel;
use super::types::{AspectRatio, EncodedImage, is_valid_image_data, sniff_mime_type};

/// OpenRouter API base URL
const OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Maximum retry attempts for transient synthesis failures
const MAX_RETRY_ATTEMPTS: u32 = 3;

/// Base delay for exponential backoff (milliseconds)
const BACKOFF_BASE_MS: u64 = 1000;

/// System instruction for the augmentation call
const AUGMENT_SYSTEM_PROMPT: &str = "You are a professional prompt engineer for an AI image generator. \
Your task is to take a user's simple prompt and a style prefix, and expand it into a detailed, \
professional, and creative prompt. Incorporate elements like quality (e.g., \"masterpiece\", \"8k\"), \
lighting (e.g., \"cinematic lighting\", \"soft shadows\"), camera angles (e.g., \"low angle shot\", \
\"wide angle\"), and specific details relevant to the style. Combine the style prefix with the user's \
idea seamlessly. ONLY output the final, boosted prompt text. Do not add any conversational text, \
explanations, or quotation marks around the prompt.";

/// Instruction for the enhancement call
const ENHANCE_INSTRUCTION: &str = "Perform an AI super-resolution upscale on this image to a crisp \
4K resolution. The final image must be extremely sharp, clean, and photorealistic. Eliminate any \
blur, pixelation, or compression artifacts from the original. Enhance fine details, textures, and \
lighting to a professional, hyper-realistic standard. Ensure the output has no digital noise or \
imperfections.";

/// Remote gateway over the OpenRouter API
#[derive(Clone)]
pub struct RemoteGateway {
    http_client: HttpClient,
    api_key: String,
    base_url: String,
    augment_model: String,
    image_model: String,
}

impl std::fmt::Debug for RemoteGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteGateway")
            .field("base_url", &self.base_url)
            .field("augment_model", &self.augment_model)
            .field("image_model", &self.image_model)
            .finish()
    }
}

/// Builder for RemoteGateway
pub struct RemoteGatewayBuilder {
    api_key: Option<String>,
    base_url: Option<String>,
    augment_model: Option<String>,
    image_model: Option<String>,
    timeout_secs: Option<u64>,
}

impl Default for RemoteGatewayBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RemoteGatewayBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self {
            api_key: None,
            base_url: None,
            augment_model: None,
            image_model: None,
            timeout_secs: None,
        }
    }

    /// Set the API key
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the base URL (defaults to OpenRouter)
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the model used for prompt augmentation
    pub fn augment_model(mut self, model: impl Into<String>) -> Self {
        self.augment_model = Some(model.into());
        self
    }

    /// Set the model used for image operations
    pub fn image_model(mut self, model: impl Into<String>) -> Self {
        self.image_model = Some(model.into());
        self
    }

    /// Set the request timeout in seconds
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    /// Build the RemoteGateway
    pub fn build(self) -> Result<RemoteGateway> {
        let api_key = self.api_key.ok_or(Error::ApiKeyMissing)?;

        let timeout = Duration::from_secs(self.timeout_secs.unwrap_or(120));

        let http_client = HttpClient::builder()
            .timeout(timeout)
            .build()
            .map_err(Error::Network)?;

        Ok(RemoteGateway {
            http_client,
            api_key,
            base_url: self
                .base_url
                .unwrap_or_else(|| OPENROUTER_BASE_URL.to_string()),
            augment_model: self
                .augment_model
                .unwrap_or_else(|| RemoteModel::default_augmentation().id.to_string()),
            image_model: self
                .image_model
                .unwrap_or_else(|| RemoteModel::default_image().id.to_string()),
        })
    }
}

impl RemoteGateway {
    /// Create a new builder
    pub fn builder() -> RemoteGatewayBuilder {
        RemoteGatewayBuilder::new()
    }

    /// Build a gateway from configuration, resolving the API key from the
    /// environment
    pub fn from_config(config: &Config) -> Result<Self> {
        let api_key = config
            .gateway
            .resolved_api_key()
            .map_err(|e| Error::Config(e.to_string()))?
            .ok_or(Error::ApiKeyMissing)?;

        RemoteGatewayBuilder::new()
            .api_key(api_key)
            .augment_model(config.gateway.augment_model.clone())
            .image_model(config.gateway.image_model.clone())
            .timeout_secs(config.gateway.timeout_secs)
            .build()
    }

    /// Send a chat completion request and parse the response envelope
    async fn post_chat(
        &self,
        body: &Value,
    ) -> std::result::Result<ChatCompletionResponse, ApiFailure> {
        let url = format!("{}/chat/completions", self.base_url);

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .header("HTTP-Referer", "https://github.com/artifex-studio/artifex")
            .header("X-Title", "Artifex")
            .json(body)
            .send()
            .await
            .map_err(|e| ApiFailure::transport(e.to_string()))?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiFailure::from_status(status.as_u16(), body));
        }

        response
            .json()
            .await
            .map_err(|e| ApiFailure::permanent(format!("Failed to parse response: {}", e)))
    }

    /// Run a text completion and return the model's reply text
    async fn text_completion(
        &self,
        system: &str,
        user: &str,
        temperature: f32,
    ) -> std::result::Result<String, ApiFailure> {
        let body = json!({
            "model": self.augment_model,
            "messages": [
                { "role": "system", "content": system },
                { "role": "user", "content": user }
            ],
            "temperature": temperature
        });

        debug!(model = %self.augment_model, "Sending text completion request");

        let response = self.post_chat(&body).await?;
        extract_text(&response)
    }

    /// Run an image completion for the given message content
    async fn image_completion(
        &self,
        content: Value,
    ) -> std::result::Result<EncodedImage, ApiFailure> {
        let body = json!({
            "model": self.image_model,
            "messages": [{ "role": "user", "content": content }],
            "modalities": ["text", "image"],
            "max_tokens": 4096
        });

        debug!(model = %self.image_model, "Sending image completion request");

        let response = self.post_chat(&body).await?;
        extract_image(&response)
    }

    /// Image completion with retry on transient failures
    async fn image_completion_with_retry(
        &self,
        content: Value,
    ) -> std::result::Result<EncodedImage, ApiFailure> {
        let mut attempts = 0;
        let mut last_failure = None;

        while attempts < MAX_RETRY_ATTEMPTS {
            attempts += 1;

            match self.image_completion(content.clone()).await {
                Ok(image) => return Ok(image),
                Err(failure) if failure.retryable => {
                    let delay = calculate_backoff(attempts);
                    warn!(
                        attempt = attempts,
                        delay_ms = delay,
                        error = %failure.message,
                        "Retrying image synthesis after transient error"
                    );
                    tokio::time::sleep(Duration::from_millis(delay)).await;
                    last_failure = Some(failure);
                }
                Err(failure) => return Err(failure),
            }
        }

        Err(last_failure
            .unwrap_or_else(|| ApiFailure::permanent("Max retries exceeded".to_string())))
    }

    /// Message content embedding an image plus an instruction
    fn image_with_instruction(image: &EncodedImage, instruction: &str) -> Value {
        json!([
            {
                "type": "image_url",
                "image_url": { "url": image.to_data_url() }
            },
            {
                "type": "text",
                "text": instruction
            }
        ])
    }
}

#[async_trait]
impl GenerationGateway for RemoteGateway {
    async fn augment(&self, prompt: &str, style_prefix: &str) -> Result<String> {
        let user = format!("{} {}", style_prefix, prompt);

        self.text_completion(AUGMENT_SYSTEM_PROMPT, &user, 0.8)
            .await
            .map(|text| text.trim().to_string())
            .map_err(|f| f.into_error(Error::Augmentation))
    }

    async fn synthesize(&self, prompt: &str, aspect_ratio: AspectRatio) -> Result<EncodedImage> {
        let content = json!(format!(
            "{}\n\nGenerate a single image with a {} aspect ratio.",
            prompt, aspect_ratio
        ));

        self.image_completion_with_retry(content)
            .await
            .map_err(|f| f.into_error(Error::Synthesis))
    }

    async fn enhance(&self, image: &EncodedImage) -> Result<EncodedImage> {
        let content = Self::image_with_instruction(image, ENHANCE_INSTRUCTION);

        self.image_completion(content)
            .await
            .map_err(|f| f.into_error(Error::Enhancement))
    }

    async fn extend(
        &self,
        image: &EncodedImage,
        guidance: &str,
        direction: Direction,
    ) -> Result<EncodedImage> {
        let instruction = extension_instruction(direction, guidance);
        let content = Self::image_with_instruction(image, &instruction);

        self.image_completion(content)
            .await
            .map_err(|f| f.into_error(Error::Extension))
    }
}

/// Build the outpaint instruction for the remote model
fn extension_instruction(direction: Direction, guidance: &str) -> String {
    let mut text = format!(
        "The original image sits {} of this larger canvas. Fill the transparent region with new \
         content that continues the scene seamlessly, matching its lighting, style, and perspective.",
        direction.position_description()
    );

    let guidance = guidance.trim();
    if !guidance.is_empty() {
        text.push_str(" Incorporate the following: ");
        text.push_str(guidance);
    }

    text
}

/// A failed API interaction (internal)
///
/// Carries enough classification for the retry loop and for mapping onto the
/// operation-specific error variants.
#[derive(Debug)]
struct ApiFailure {
    message: String,
    retryable: bool,
    unauthorized: bool,
}

impl ApiFailure {
    fn transport(message: String) -> Self {
        Self {
            message,
            retryable: true,
            unauthorized: false,
        }
    }

    fn permanent(message: String) -> Self {
        Self {
            message,
            retryable: false,
            unauthorized: false,
        }
    }

    fn from_status(status: u16, body: String) -> Self {
        match status {
            401 => Self {
                message: "Unauthorized".to_string(),
                retryable: false,
                unauthorized: true,
            },
            402 => Self::permanent("Payment required: insufficient credits".to_string()),
            404 => Self::permanent(format!("Model not found: {}", body)),
            429 => Self {
                message: format!("Rate limited: {}", body),
                retryable: true,
                unauthorized: false,
            },
            500..=599 => Self {
                message: format!("Server error ({}): {}", status, body),
                retryable: true,
                unauthorized: false,
            },
            _ => Self::permanent(format!("HTTP error {}: {}", status, body)),
        }
    }

    /// Convert into the operation-specific error variant
    fn into_error(self, variant: fn(String) -> Error) -> Error {
        if self.unauthorized {
            Error::ApiKeyMissing
        } else {
            variant(self.message)
        }
    }
}

/// Extract reply text from a chat completion response
fn extract_text(response: &ChatCompletionResponse) -> std::result::Result<String, ApiFailure> {
    let choice = response
        .choices
        .first()
        .ok_or_else(|| ApiFailure::permanent("No response choices".to_string()))?;

    match &choice.message.content {
        Some(ChatMessageContent::Simple(text)) => Ok(text.clone()),
        Some(ChatMessageContent::Parts(parts)) => {
            let text: String = parts
                .iter()
                .filter_map(|p| p.text.as_deref())
                .collect::<Vec<_>>()
                .join("");
            if text.is_empty() {
                Err(ApiFailure::permanent("No text in response".to_string()))
            } else {
                Ok(text)
            }
        }
        None => Err(ApiFailure::permanent("No text in response".to_string())),
    }
}

/// Extract image data from a chat completion response
fn extract_image(
    response: &ChatCompletionResponse,
) -> std::result::Result<EncodedImage, ApiFailure> {
    let choice = response
        .choices
        .first()
        .ok_or_else(|| ApiFailure::permanent("No response choices".to_string()))?;

    match &choice.message.content {
        Some(ChatMessageContent::Parts(parts)) => {
            for part in parts {
                if part.part_type == "image_url" || part.part_type == "image" {
                    if let Some(image_url) = &part.image_url {
                        return parse_image_payload(&image_url.url);
                    }
                    if let Some(data) = &part.data {
                        return parse_image_payload(data);
                    }
                }
            }
        }
        Some(ChatMessageContent::Simple(content)) => {
            if content.starts_with("data:image") {
                return parse_image_payload(content);
            }
            // Some models reply with bare base64
            if let Ok(bytes) = BASE64.decode(content.trim()) {
                if is_valid_image_data(&bytes) {
                    return Ok(EncodedImage::from_bytes(bytes));
                }
            }
        }
        None => {}
    }

    Err(ApiFailure::permanent(
        "No image data found in response".to_string(),
    ))
}

/// Parse image data from a data URL or raw base64 string
fn parse_image_payload(data: &str) -> std::result::Result<EncodedImage, ApiFailure> {
    if data.starts_with("data:image") {
        return EncodedImage::from_data_url(data)
            .map_err(|e| ApiFailure::permanent(e.to_string()));
    }

    let bytes = BASE64
        .decode(data.trim())
        .map_err(|e| ApiFailure::permanent(format!("Invalid base64: {}", e)))?;

    let mime_type = sniff_mime_type(&bytes).to_string();
    Ok(EncodedImage { data: bytes, mime_type })
}

/// Calculate exponential backoff delay with jitter
fn calculate_backoff(attempt: u32) -> u64 {
    let base = BACKOFF_BASE_MS * 2u64.pow(attempt - 1);
    let jitter = base / 10;
    base + (clock_jitter() % jitter.max(1))
}

fn clock_jitter() -> u64 {
    use std::time::SystemTime;
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64 % 1000)
        .unwrap_or(0)
}

/// Chat completion response envelope
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<ChatMessageContent>,
}

/// Chat message content - a plain string or structured content parts
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ChatMessageContent {
    Simple(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Deserialize)]
struct ContentPart {
    #[serde(rename = "type")]
    part_type: String,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    image_url: Option<ImageUrl>,
    #[serde(default)]
    data: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ImageUrl {
    url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_requires_api_key() {
        let result = RemoteGatewayBuilder::new().build();
        assert!(matches!(result, Err(Error::ApiKeyMissing)));
    }

    #[test]
    fn test_builder_defaults() {
        let gateway = RemoteGatewayBuilder::new().api_key("test-key").build().unwrap();
        assert_eq!(gateway.base_url, OPENROUTER_BASE_URL);
        assert_eq!(gateway.augment_model, RemoteModel::default_augmentation().id);
        assert_eq!(gateway.image_model, RemoteModel::default_image().id);
    }

    #[test]
    fn test_extension_instruction_mentions_position() {
        let instruction = extension_instruction(Direction::Top, "");
        assert!(instruction.contains("at the bottom half"));
        assert!(!instruction.contains("Incorporate"));

        let guided = extension_instruction(Direction::Left, "a calm lake");
        assert!(guided.contains("in the right half"));
        assert!(guided.contains("a calm lake"));
    }

    #[test]
    fn test_status_classification() {
        assert!(ApiFailure::from_status(429, String::new()).retryable);
        assert!(ApiFailure::from_status(503, String::new()).retryable);
        assert!(!ApiFailure::from_status(400, String::new()).retryable);
        assert!(ApiFailure::from_status(401, String::new()).unauthorized);
    }

    #[test]
    fn test_unauthorized_maps_to_api_key_missing() {
        let failure = ApiFailure::from_status(401, String::new());
        assert!(matches!(
            failure.into_error(Error::Synthesis),
            Error::ApiKeyMissing
        ));

        let failure = ApiFailure::from_status(500, "boom".to_string());
        assert!(matches!(
            failure.into_error(Error::Synthesis),
            Error::Synthesis(_)
        ));
    }

    #[test]
    fn test_extract_image_from_content_parts() {
        let raw = serde_json::json!({
            "choices": [{
                "message": {
                    "content": [{
                        "type": "image_url",
                        "image_url": { "url": "data:image/png;base64,iVBORw0KGgo=" }
                    }]
                }
            }]
        });
        let response: ChatCompletionResponse = serde_json::from_value(raw).unwrap();

        let image = extract_image(&response).unwrap();
        assert_eq!(image.mime_type, "image/png");
        assert!(!image.data.is_empty());
    }

    #[test]
    fn test_extract_image_without_payload_fails() {
        let raw = serde_json::json!({
            "choices": [{ "message": { "content": "I cannot draw that." } }]
        });
        let response: ChatCompletionResponse = serde_json::from_value(raw).unwrap();

        assert!(extract_image(&response).is_err());
    }

    #[test]
    fn test_extract_text() {
        let raw = serde_json::json!({
            "choices": [{ "message": { "content": "a boosted prompt" } }]
        });
        let response: ChatCompletionResponse = serde_json::from_value(raw).unwrap();

        assert_eq!(extract_text(&response).unwrap(), "a boosted prompt");
    }

    #[test]
    fn test_calculate_backoff_grows() {
        assert!(calculate_backoff(1) >= BACKOFF_BASE_MS);
        assert!(calculate_backoff(2) >= BACKOFF_BASE_MS * 2);
    }
}
