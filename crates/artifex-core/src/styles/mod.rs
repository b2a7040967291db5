//! Style pack catalog
//!
//! Fixed set of named presets that bias the image model toward a visual genre
//! by prepending descriptive text to the user's prompt.

use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

/// A named visual preset contributing a prompt prefix
///
/// Packs are defined at startup and never mutated. Results embed the pack by
/// value so later catalog changes don't retroactively alter past results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StylePack {
    /// Stable identifier
    pub id: String,
    /// Human-readable name
    pub name: String,
    /// Brief description of the visual genre
    pub description: String,
    /// Text prepended to user prompts
    pub prompt_prefix: String,
    /// Preview image URL
    pub thumbnail: String,
}

impl StylePack {
    fn define(
        id: &str,
        name: &str,
        description: &str,
        prompt_prefix: &str,
        thumbnail: &str,
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            prompt_prefix: prompt_prefix.to_string(),
            thumbnail: thumbnail.to_string(),
        }
    }

    /// Get a pack from the catalog by id
    pub fn by_id(id: &str) -> Option<&'static StylePack> {
        STYLE_PACKS.iter().find(|p| p.id == id)
    }

    /// The catalog's default pack
    pub fn default_pack() -> &'static StylePack {
        &STYLE_PACKS[0]
    }
}

/// Built-in style packs
pub static STYLE_PACKS: LazyLock<Vec<StylePack>> = LazyLock::new(|| {
    vec![
        StylePack::define(
            "anime",
            "Anime Pack",
            "Vibrant and expressive Japanese anime style.",
            "masterpiece, best quality, anime style, vibrant colors, expressive characters, detailed background, ",
            "https://picsum.photos/seed/anime/300/200",
        ),
        StylePack::define(
            "realistic",
            "Realistic Human Pack",
            "Photorealistic portraits and scenes.",
            "photorealistic, hyperrealistic, 8k, ultra realistic, dramatic lighting, sharp focus, detailed skin texture, ",
            "https://picsum.photos/seed/realistic/300/200",
        ),
        StylePack::define(
            "fantasy",
            "Fantasy Pack",
            "Epic and magical fantasy worlds.",
            "fantasy art, epic, magical, ethereal, concept art, matte painting, trending on artstation, intricate details, ",
            "https://picsum.photos/seed/fantasy/300/200",
        ),
        StylePack::define(
            "cartoon",
            "Cartoon Pack",
            "Fun and friendly modern cartoon style.",
            "modern cartoon style, 3d render, pixar style, friendly characters, smooth shading, vibrant and cheerful, ",
            "https://picsum.photos/seed/cartoon/300/200",
        ),
        StylePack::define(
            "horror",
            "Horror Pack",
            "Dark, eerie, and atmospheric horror scenes.",
            "horror, dark, eerie, atmospheric, creepy, unsettling, cinematic lighting, style of stephen king, lovecraftian, ",
            "https://picsum.photos/seed/horror/300/200",
        ),
        StylePack::define(
            "logo",
            "Logo Generator Pack",
            "Clean, modern, and minimalist logo designs.",
            "minimalist logo design, vector art, clean lines, modern, flat design, for a brand about ",
            "https://picsum.photos/seed/logo/300/200",
        ),
        StylePack::define(
            "premium",
            "Premium Ultra HD",
            "Highest quality, cinematic, and detailed.",
            "ultra hd, cinematic 8k wallpaper, masterpiece, stunning visual, intricate detail, professional photography, bokeh, ",
            "https://picsum.photos/seed/premium/300/200",
        ),
    ]
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_contents() {
        assert_eq!(STYLE_PACKS.len(), 7);
        for pack in STYLE_PACKS.iter() {
            assert!(!pack.id.is_empty());
            assert!(!pack.prompt_prefix.is_empty());
        }
    }

    #[test]
    fn test_pack_lookup() {
        let pack = StylePack::by_id("anime");
        assert!(pack.is_some());
        assert_eq!(pack.unwrap().name, "Anime Pack");

        assert!(StylePack::by_id("nonexistent").is_none());
    }

    #[test]
    fn test_default_pack() {
        assert_eq!(StylePack::default_pack().id, "anime");
    }

    #[test]
    fn test_pack_roundtrip() {
        let pack = StylePack::by_id("fantasy").unwrap();
        let json = serde_json::to_string(pack).unwrap();
        let back: StylePack = serde_json::from_str(&json).unwrap();
        assert_eq!(&back, pack);
    }
}
