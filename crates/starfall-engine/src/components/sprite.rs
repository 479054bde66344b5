use glam::Vec2;

/// Blend mode for sprite rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlendMode {
    /// Standard alpha blending.
    #[default]
    Alpha,
    /// Additive blending for glows and explosions.
    Additive,
}

/// How an entity appears: a named texture from the asset manifest, drawn as a
/// quad of `size` world units.
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    /// Key into the manifest's sprite table.
    pub name: String,
    /// Frame within the sprite's strip.
    pub frame: u32,
    /// Rendered size in meters.
    pub size: Vec2,
    /// Opacity (0.0 = invisible, 1.0 = opaque).
    pub alpha: f32,
    pub blend: BlendMode,
}

impl Sprite {
    pub fn new(name: impl Into<String>, size: Vec2) -> Self {
        Self {
            name: name.into(),
            frame: 0,
            size,
            alpha: 1.0,
            blend: BlendMode::Alpha,
        }
    }

    pub fn with_blend(mut self, blend: BlendMode) -> Self {
        self.blend = blend;
        self
    }
}
