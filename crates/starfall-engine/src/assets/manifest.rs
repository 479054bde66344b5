use std::collections::HashMap;
use serde::{Deserialize, Serialize};

/// Asset manifest describing every sprite, font and stage a game ships with.
/// Loaded from a JSON file at runtime.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssetManifest {
    /// Named sprite lookup.
    #[serde(default)]
    pub sprites: HashMap<String, SpriteDescriptor>,
    /// Font files by name.
    #[serde(default)]
    pub fonts: HashMap<String, String>,
    /// Stage descriptor paths, in play order.
    #[serde(default)]
    pub stages: Vec<String>,
}

/// Describes a named sprite strip.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpriteDescriptor {
    /// Relative path to the image.
    pub path: String,
    /// Number of frames in the strip (default: 1).
    #[serde(default = "default_frames")]
    pub frames: u32,
}

fn default_frames() -> u32 {
    1
}

impl AssetManifest {
    /// Parse a manifest from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn sprite(&self, name: &str) -> Option<&SpriteDescriptor> {
        self.sprites.get(name)
    }

    /// Frame count for a sprite, 1 for unknown names.
    pub fn frame_count(&self, name: &str) -> u32 {
        self.sprite(name).map(|s| s.frames).unwrap_or(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_manifest() {
        let json = r#"{
            "sprites": {
                "player": { "path": "ships/player.png", "frames": 8 },
                "laser": { "path": "shots/laser.png" }
            },
            "fonts": { "hud": "fonts/hud.ttf" },
            "stages": ["stages/stage1.json", "stages/stage2.json"]
        }"#;
        let manifest = AssetManifest::from_json(json).unwrap();
        assert_eq!(manifest.frame_count("player"), 8);
        assert_eq!(manifest.frame_count("laser"), 1);
        assert_eq!(manifest.frame_count("missing"), 1);
        assert_eq!(manifest.fonts["hud"], "fonts/hud.ttf");
        assert_eq!(manifest.stages.len(), 2);
    }

    #[test]
    fn parse_minimal_manifest() {
        let manifest = AssetManifest::from_json("{}").unwrap();
        assert!(manifest.sprites.is_empty());
        assert!(manifest.stages.is_empty());
    }
}
