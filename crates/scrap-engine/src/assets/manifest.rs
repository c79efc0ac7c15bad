use std::collections::HashMap;
use serde::{Deserialize, Serialize};

use super::font::FontConfig;
use super::texture::TextureConfig;

/// Asset manifest listing the textures and fonts a game preloads.
/// Loaded from a JSON file at runtime.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssetManifest {
    /// Named textures: name → path + sampling config.
    #[serde(default)]
    pub textures: HashMap<String, TextureDescriptor>,
    /// Named bitmap fonts.
    #[serde(default)]
    pub fonts: HashMap<String, FontDescriptor>,
    /// Optional audio clips. Not loaded by the engine; see `AudioSource::from_descriptor`.
    #[serde(default)]
    pub sounds: HashMap<String, SoundDescriptor>,
}

/// Describes a single texture.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextureDescriptor {
    /// Relative path to the image file (e.g., "logo.png").
    pub path: String,
    #[serde(default)]
    pub config: TextureConfig,
}

/// Describes a bitmap font atlas.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FontDescriptor {
    pub path: String,
    #[serde(default)]
    pub grid: FontConfig,
}

/// Describes an audio asset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoundDescriptor {
    /// Relative path to the audio file.
    pub path: String,
    #[serde(default = "default_volume")]
    pub volume: f32,
}

fn default_volume() -> f32 {
    1.0
}

impl AssetManifest {
    /// Parse a manifest from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::texture::FilterMode;

    #[test]
    fn parse_manifest_with_sounds() {
        let json = r#"{
            "sounds": {
                "click": { "path": "click.wav", "volume": 0.5 },
                "bg_music": { "path": "music.ogg" }
            }
        }"#;
        let manifest = AssetManifest::from_json(json).unwrap();
        assert_eq!(manifest.sounds.len(), 2);
        assert_eq!(manifest.sounds["click"].volume, 0.5);
        assert_eq!(manifest.sounds["bg_music"].volume, 1.0);
        assert!(manifest.textures.is_empty());
    }

    #[test]
    fn parse_textures_and_fonts() {
        let json = r#"{
            "textures": {
                "logo": { "path": "logo.png", "config": { "min_filter": "nearest" } },
                "bg": { "path": "bg.png" }
            },
            "fonts": {
                "ui": { "path": "font.png", "grid": { "cols": 8, "rows": 12 } }
            }
        }"#;
        let manifest = AssetManifest::from_json(json).unwrap();
        assert_eq!(manifest.textures["logo"].config.min_filter, FilterMode::Nearest);
        assert_eq!(manifest.textures["bg"].config, TextureConfig::default());
        assert_eq!(manifest.fonts["ui"].grid.cols, 8);
        assert_eq!(manifest.fonts["ui"].grid.start_char, 32);
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(AssetManifest::from_json("{ \"textures\": 3 }").is_err());
    }
}
