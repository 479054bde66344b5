//! Boss pilot: timed fire and special attacks over a left/right patrol.

use glam::Vec2;
use starfall_engine::Rect;

use super::ship::ShipKind;

/// Distance at which a dive leg counts as done.
const ARRIVAL: f32 = 0.1;
/// Dives run faster than the patrol.
const DIVE_FACTOR: f32 = 2.5;
/// Patrol stays this far from the side walls.
const PATROL_INSET: f32 = 2.5;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Dive {
    target_y: f32,
    returning: bool,
}

/// What the boss wants this frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BossOrders {
    pub velocity: Vec2,
    pub fire: bool,
    pub special: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BossBrain {
    fire_interval: f32,
    special_interval: f32,
    fire_timer: f32,
    special_timer: f32,
    left: f32,
    right: f32,
    heading: f32,
    home_y: f32,
    floor_y: f32,
    dive: Option<Dive>,
}

impl BossBrain {
    pub fn new(kind: ShipKind, spawn: Vec2, bounds: Rect) -> Self {
        let (fire_interval, special_interval) = match kind {
            ShipKind::Dreadnought => (1.6, 8.0),
            _ => (1.2, 6.0),
        };
        let left = (bounds.min.x + PATROL_INSET).min(spawn.x);
        let right = (bounds.max.x - PATROL_INSET).max(spawn.x);
        Self {
            fire_interval,
            special_interval,
            fire_timer: 0.0,
            special_timer: 0.0,
            left,
            right,
            heading: 1.0,
            home_y: spawn.y,
            floor_y: bounds.min.y + PATROL_INSET,
            dive: None,
        }
    }

    /// Whether the patrol is running (no special maneuver in progress).
    pub fn normal(&self) -> bool {
        self.dive.is_none()
    }

    /// Dive toward `target_y` and come back. Refused while another maneuver runs.
    pub fn start_dive(&mut self, target_y: f32) -> bool {
        if self.dive.is_some() {
            return false;
        }
        self.dive = Some(Dive {
            target_y: target_y.max(self.floor_y),
            returning: false,
        });
        true
    }

    pub fn update(&mut self, dt: f32, pos: Vec2, speed: f32) -> BossOrders {
        let mut orders = BossOrders::default();

        self.fire_timer += dt;
        if self.fire_timer >= self.fire_interval {
            self.fire_timer = 0.0;
            orders.fire = true;
        }
        self.special_timer += dt;
        if self.special_timer >= self.special_interval {
            self.special_timer = 0.0;
            orders.special = true;
        }

        orders.velocity = match self.dive.as_mut() {
            Some(dive) => {
                let target = if dive.returning { self.home_y } else { dive.target_y };
                let dy = target - pos.y;
                if dy.abs() <= ARRIVAL {
                    if dive.returning {
                        self.dive = None;
                    } else {
                        dive.returning = true;
                    }
                    Vec2::ZERO
                } else {
                    let step = if dt > 0.0 { dy.abs() / dt } else { 0.0 };
                    Vec2::new(0.0, dy.signum() * (speed * DIVE_FACTOR).min(step))
                }
            }
            None => {
                if pos.x <= self.left {
                    self.heading = 1.0;
                } else if pos.x >= self.right {
                    self.heading = -1.0;
                }
                let drift = ((self.home_y - pos.y) * 2.0).clamp(-speed, speed);
                Vec2::new(self.heading * speed, drift)
            }
        };
        orders
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn brain() -> BossBrain {
        let bounds = Rect::new(Vec2::ZERO, Vec2::new(15.0, 25.0));
        BossBrain::new(ShipKind::Cruiser, Vec2::new(7.5, 20.0), bounds)
    }

    #[test]
    fn fire_and_special_have_independent_timers() {
        let mut boss = brain();
        let pos = Vec2::new(7.5, 20.0);
        let mut fires = 0;
        let mut specials = 0;
        for _ in 0..24 {
            let orders = boss.update(0.25, pos, 2.0);
            fires += orders.fire as u32;
            specials += orders.special as u32;
        }
        assert_eq!(fires, 4);
        assert_eq!(specials, 1);
    }

    #[test]
    fn patrol_bounces_between_bounds() {
        let mut boss = brain();
        let right = boss.update(0.016, Vec2::new(13.0, 20.0), 2.0);
        assert!(right.velocity.x < 0.0);
        let left = boss.update(0.016, Vec2::new(2.0, 20.0), 2.0);
        assert!(left.velocity.x > 0.0);
    }

    #[test]
    fn dive_suspends_patrol_until_back_home() {
        let mut boss = brain();
        assert!(boss.start_dive(5.0));
        assert!(!boss.start_dive(5.0));
        assert!(!boss.normal());

        let down = boss.update(0.016, Vec2::new(7.5, 20.0), 2.0);
        assert_eq!(down.velocity.x, 0.0);
        assert!(down.velocity.y < 0.0);

        boss.update(0.016, Vec2::new(7.5, 5.0), 2.0);
        let up = boss.update(0.016, Vec2::new(7.5, 5.0), 2.0);
        assert!(up.velocity.y > 0.0);

        boss.update(0.016, Vec2::new(7.5, 20.0), 2.0);
        assert!(boss.normal());
    }
}
