//! Mapping between screen pixels (origin top-left, Y-down) and simulation
//! meters (origin bottom-left, Y-up).

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in world units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    /// Rectangle centered on `center` with the given half extents.
    pub fn from_center(center: Vec2, half_extents: Vec2) -> Self {
        Self::new(center - half_extents, center + half_extents)
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Grow the rectangle by `margin` on every side.
    pub fn expand(&self, margin: f32) -> Self {
        Self {
            min: self.min - Vec2::splat(margin),
            max: self.max + Vec2::splat(margin),
        }
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.y >= self.min.y && point.y <= self.max.y
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }
}

/// Stateless screen ↔ world conversion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateConverter {
    pixels_per_meter: f32,
    screen_width: f32,
    screen_height: f32,
}

impl CoordinateConverter {
    pub fn new(screen_width: f32, screen_height: f32, pixels_per_meter: f32) -> Self {
        Self {
            pixels_per_meter: pixels_per_meter.max(f32::EPSILON),
            screen_width,
            screen_height,
        }
    }

    pub fn pixels_per_meter(&self) -> f32 {
        self.pixels_per_meter
    }

    /// Screen size in pixels.
    pub fn screen_size(&self) -> Vec2 {
        Vec2::new(self.screen_width, self.screen_height)
    }

    /// The visible world, in meters.
    pub fn world_bounds(&self) -> Rect {
        Rect::new(Vec2::ZERO, self.screen_size() / self.pixels_per_meter)
    }

    pub fn to_world(&self, screen: Vec2) -> Vec2 {
        Vec2::new(
            screen.x / self.pixels_per_meter,
            (self.screen_height - screen.y) / self.pixels_per_meter,
        )
    }

    pub fn to_screen(&self, world: Vec2) -> Vec2 {
        Vec2::new(
            world.x * self.pixels_per_meter,
            self.screen_height - world.y * self.pixels_per_meter,
        )
    }

    /// Convert a screen-space velocity (pixels/s, Y-down) to meters/s (Y-up).
    pub fn velocity_to_world(&self, screen_velocity: Vec2) -> Vec2 {
        Vec2::new(screen_velocity.x, -screen_velocity.y) / self.pixels_per_meter
    }

    /// World rotation (counter-clockwise) to screen rotation (clockwise).
    pub fn rotation_to_screen(&self, radians: f32) -> f32 {
        -radians
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn converter() -> CoordinateConverter {
        CoordinateConverter::new(480.0, 800.0, 32.0)
    }

    #[test]
    fn screen_origin_is_world_top_left() {
        let c = converter();
        assert_eq!(c.to_world(Vec2::ZERO), Vec2::new(0.0, 25.0));
        assert_eq!(c.to_world(Vec2::new(480.0, 800.0)), Vec2::new(15.0, 0.0));
    }

    #[test]
    fn world_and_screen_round_trip() {
        let c = converter();
        let p = Vec2::new(123.0, 456.0);
        let back = c.to_screen(c.to_world(p));
        assert!((back - p).length() < 1e-3);
    }

    #[test]
    fn velocity_flips_y() {
        let c = converter();
        assert_eq!(c.velocity_to_world(Vec2::new(64.0, 32.0)), Vec2::new(2.0, -1.0));
    }

    #[test]
    fn world_bounds_match_screen() {
        let bounds = converter().world_bounds();
        assert_eq!(bounds.min, Vec2::ZERO);
        assert_eq!(bounds.max, Vec2::new(15.0, 25.0));
    }

    #[test]
    fn rect_expand_and_intersect() {
        let r = Rect::new(Vec2::ZERO, Vec2::new(10.0, 10.0));
        let outside = Rect::from_center(Vec2::new(11.5, 5.0), Vec2::splat(0.5));
        assert!(!r.intersects(&outside));
        assert!(r.expand(1.0).intersects(&outside));
        assert!(r.contains(Vec2::new(10.0, 0.0)));
    }
}
