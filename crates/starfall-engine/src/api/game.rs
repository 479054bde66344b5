use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::core::convert::CoordinateConverter;
use crate::input::queue::InputQueue;
use crate::renderer::surface::Surface;

/// Engine configuration, provided by the game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Fixed physics timestep in seconds (default: 1/60).
    pub fixed_dt: f32,
    /// Screen width in pixels.
    pub screen_width: f32,
    /// Screen height in pixels.
    pub screen_height: f32,
    /// Pixels per simulation meter.
    pub pixels_per_meter: f32,
    /// Gravity in meters/s². Default: zero (space).
    pub gravity: Vec2,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,
            screen_width: 480.0,
            screen_height: 800.0,
            pixels_per_meter: 32.0,
            gravity: Vec2::ZERO,
        }
    }
}

impl GameConfig {
    pub fn converter(&self) -> CoordinateConverter {
        CoordinateConverter::new(self.screen_width, self.screen_height, self.pixels_per_meter)
    }
}

/// The contract a game fulfils so a runner can drive it.
///
/// Per frame the runner calls `fixed_update` once per whole fixed step owed,
/// then `update` once with the real frame time, then `render`.
pub trait Game {
    type Error: std::error::Error;

    /// Engine configuration. Read once when the runner is built.
    fn config(&self) -> GameConfig {
        GameConfig::default()
    }

    /// One fixed simulation step: advance physics and resolve what it produced.
    fn fixed_update(&mut self, dt: f32) -> Result<(), Self::Error>;

    /// Per-frame work: input, entity updates, scripting, cleanup.
    fn update(&mut self, dt: f32, input: &InputQueue) -> Result<(), Self::Error>;

    /// Emit this frame's draw calls.
    fn render(&self, surface: &mut dyn Surface);
}
