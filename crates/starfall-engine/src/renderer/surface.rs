//! Draw-call collaborator.
//!
//! The simulation never touches pixels: once per frame it hands a `Surface`
//! textured quads, text and simple shapes in screen coordinates. Platform
//! backends (canvas, GPU) implement this trait.

use glam::Vec2;

use crate::components::sprite::Sprite;

pub trait Surface {
    /// Start a frame, filling the screen with a background image.
    fn begin(&mut self, background: &str);

    /// Draw a sprite frame centered at `center` (pixels), `size` pixels wide/tall.
    fn draw_sprite(&mut self, sprite: &Sprite, center: Vec2, size: Vec2, rotation: f32);

    /// Draw a line of text with its top-left corner at `at`.
    fn draw_text(&mut self, text: &str, at: Vec2, size: f32);

    /// Draw a filled rectangle.
    fn draw_rect(&mut self, min: Vec2, max: Vec2, rgba: [f32; 4]);
}

/// One recorded draw call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Begin { background: String },
    Sprite { name: String, frame: u32, center: Vec2, size: Vec2, rotation: f32 },
    Text { text: String, at: Vec2, size: f32 },
    Rect { min: Vec2, max: Vec2, rgba: [f32; 4] },
}

/// A surface that remembers what it was asked to draw.
/// Used by the headless runner and by tests.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub calls: Vec<DrawCall>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }

    pub fn sprite_count(&self) -> usize {
        self.calls.iter().filter(|c| matches!(c, DrawCall::Sprite { .. })).count()
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.calls.iter().filter_map(|c| match c {
            DrawCall::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

impl Surface for RecordingSurface {
    fn begin(&mut self, background: &str) {
        self.calls.clear();
        self.calls.push(DrawCall::Begin {
            background: background.to_string(),
        });
    }

    fn draw_sprite(&mut self, sprite: &Sprite, center: Vec2, size: Vec2, rotation: f32) {
        self.calls.push(DrawCall::Sprite {
            name: sprite.name.clone(),
            frame: sprite.frame,
            center,
            size,
            rotation,
        });
    }

    fn draw_text(&mut self, text: &str, at: Vec2, size: f32) {
        self.calls.push(DrawCall::Text {
            text: text.to_string(),
            at,
            size,
        });
    }

    fn draw_rect(&mut self, min: Vec2, max: Vec2, rgba: [f32; 4]) {
        self.calls.push(DrawCall::Rect { min, max, rgba });
    }
}
