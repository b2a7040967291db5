//! Gateway request and payload types

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Aspect ratio presets for synthesis
///
/// The ratio is fixed at request time and also determines the dimensions of
/// the placeholder image substituted when generation fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AspectRatio {
    /// 1:1 square
    #[default]
    #[serde(rename = "1:1")]
    Square,
    /// 9:16 portrait
    #[serde(rename = "9:16")]
    Portrait,
    /// 16:9 landscape
    #[serde(rename = "16:9")]
    Landscape,
}

impl AspectRatio {
    /// The ratio label sent to the remote model
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Square => "1:1",
            Self::Portrait => "9:16",
            Self::Landscape => "16:9",
        }
    }

    /// Placeholder image dimensions for this ratio
    pub fn placeholder_dimensions(&self) -> (u32, u32) {
        match self {
            Self::Square => (1024, 1024),
            Self::Portrait => (1080, 1920),
            Self::Landscape => (1920, 1080),
        }
    }

    /// Parse from a ratio label
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "1:1" | "square" => Some(Self::Square),
            "9:16" | "portrait" => Some(Self::Portrait),
            "16:9" | "landscape" => Some(Self::Landscape),
            _ => None,
        }
    }
}

impl std::fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An inline-encoded image payload
///
/// Raw bytes plus MIME type, convertible to and from `data:` URLs. This is
/// the currency between the gateway, the compositor, and result records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    /// Raw image bytes
    pub data: Vec<u8>,
    /// MIME type (e.g. "image/png")
    pub mime_type: String,
}

impl EncodedImage {
    /// Create from raw bytes with an explicit MIME type
    pub fn new(data: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            data,
            mime_type: mime_type.into(),
        }
    }

    /// Create from raw bytes, sniffing the MIME type from magic bytes
    pub fn from_bytes(data: Vec<u8>) -> Self {
        let mime_type = sniff_mime_type(&data).to_string();
        Self { data, mime_type }
    }

    /// Decode a `data:<mime>;base64,<payload>` URL
    pub fn from_data_url(url: &str) -> Result<Self> {
        let rest = url
            .strip_prefix("data:")
            .ok_or_else(|| Error::ImageDecode("not an inline-encoded image".to_string()))?;

        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| Error::ImageDecode("malformed data URL".to_string()))?;

        let mime_type = header
            .strip_suffix(";base64")
            .filter(|m| !m.is_empty())
            .ok_or_else(|| Error::ImageDecode("data URL is not base64-encoded".to_string()))?;

        let data = BASE64
            .decode(payload)
            .map_err(|e| Error::ImageDecode(format!("invalid base64: {}", e)))?;

        Ok(Self {
            data,
            mime_type: mime_type.to_string(),
        })
    }

    /// Encode as a `data:` URL suitable for result records
    pub fn to_data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.mime_type,
            BASE64.encode(&self.data)
        )
    }

    /// Image payload size in bytes
    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }
}

/// Detect MIME type from image bytes
pub fn sniff_mime_type(data: &[u8]) -> &'static str {
    if data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
        "image/png"
    } else if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
        "image/jpeg"
    } else if data.starts_with(b"RIFF") && data.get(8..12) == Some(b"WEBP") {
        "image/webp"
    } else {
        "application/octet-stream"
    }
}

/// Check if bytes carry a recognized image signature
pub fn is_valid_image_data(data: &[u8]) -> bool {
    sniff_mime_type(data) != "application/octet-stream"
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn test_aspect_ratio_labels() {
        assert_eq!(AspectRatio::Square.as_str(), "1:1");
        assert_eq!(AspectRatio::Portrait.as_str(), "9:16");
        assert_eq!(AspectRatio::Landscape.as_str(), "16:9");
    }

    #[test]
    fn test_aspect_ratio_parse() {
        assert_eq!(AspectRatio::parse("1:1"), Some(AspectRatio::Square));
        assert_eq!(AspectRatio::parse("portrait"), Some(AspectRatio::Portrait));
        assert_eq!(AspectRatio::parse("4:3"), None);
    }

    #[test]
    fn test_aspect_ratio_serde_uses_labels() {
        let json = serde_json::to_string(&AspectRatio::Landscape).unwrap();
        assert_eq!(json, "\"16:9\"");
        let back: AspectRatio = serde_json::from_str("\"9:16\"").unwrap();
        assert_eq!(back, AspectRatio::Portrait);
    }

    #[test]
    fn test_placeholder_dimensions() {
        assert_eq!(AspectRatio::Square.placeholder_dimensions(), (1024, 1024));
        assert_eq!(AspectRatio::Portrait.placeholder_dimensions(), (1080, 1920));
        assert_eq!(AspectRatio::Landscape.placeholder_dimensions(), (1920, 1080));
    }

    #[test]
    fn test_sniff_mime_type() {
        assert_eq!(sniff_mime_type(&PNG_MAGIC), "image/png");
        assert_eq!(sniff_mime_type(&[0xFF, 0xD8, 0xFF, 0xE0]), "image/jpeg");

        let mut webp = vec![0u8; 12];
        webp[0..4].copy_from_slice(b"RIFF");
        webp[8..12].copy_from_slice(b"WEBP");
        assert_eq!(sniff_mime_type(&webp), "image/webp");

        assert_eq!(sniff_mime_type(&[0x00, 0x01]), "application/octet-stream");
    }

    #[test]
    fn test_data_url_roundtrip() {
        let image = EncodedImage::from_bytes(PNG_MAGIC.to_vec());
        assert_eq!(image.mime_type, "image/png");

        let url = image.to_data_url();
        assert!(url.starts_with("data:image/png;base64,"));

        let back = EncodedImage::from_data_url(&url).unwrap();
        assert_eq!(back, image);
    }

    #[test]
    fn test_data_url_rejects_plain_urls() {
        let err = EncodedImage::from_data_url("https://example.com/cat.png").unwrap_err();
        assert!(matches!(err, Error::ImageDecode(_)));
    }

    #[test]
    fn test_data_url_rejects_missing_base64_marker() {
        let err = EncodedImage::from_data_url("data:image/png,rawbytes").unwrap_err();
        assert!(matches!(err, Error::ImageDecode(_)));
    }
}
