use glam::Vec2;
use starfall_engine::{EntityId, PhysicsWorld};

use super::shot::{Impact, ShotEvent};
use super::{Entity, Side};
use crate::error::{GameError, WeaponError};
use crate::factory::EntityFactory;

/// Ammunition never exceeds this.
pub const MAX_AMMUNITION: u32 = 99;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WeaponKind {
    Laser,
    Missile,
    Fireball,
    Shiboleet,
    Blackhole,
    BossOrb,
    BossFlame,
}

/// Fixed characteristics of the shots a weapon kind produces.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShotSpec {
    pub damage: i32,
    /// Meters per second.
    pub speed: f32,
    pub radius: f32,
    pub sprite: &'static str,
    pub impact: Impact,
}

impl WeaponKind {
    pub const fn spec(self) -> ShotSpec {
        match self {
            WeaponKind::Laser => ShotSpec {
                damage: 1,
                speed: 14.0,
                radius: 0.15,
                sprite: "laser",
                impact: Impact::Vanish,
            },
            WeaponKind::Missile => ShotSpec {
                damage: 2,
                speed: 10.0,
                radius: 0.25,
                sprite: "missile",
                impact: Impact::Vanish,
            },
            WeaponKind::Fireball => ShotSpec {
                damage: 3,
                speed: 8.0,
                radius: 0.35,
                sprite: "fireball",
                impact: Impact::Explode { seconds: 0.5, frames: 8 },
            },
            WeaponKind::Shiboleet => ShotSpec {
                damage: 2,
                speed: 16.0,
                radius: 0.2,
                sprite: "shiboleet",
                impact: Impact::Vanish,
            },
            WeaponKind::Blackhole => ShotSpec {
                damage: 1,
                speed: 5.0,
                radius: 0.4,
                sprite: "blackhole",
                impact: Impact::Collapse { seconds: 1.5, horizon: 2.5 },
            },
            WeaponKind::BossOrb => ShotSpec {
                damage: 2,
                speed: 7.0,
                radius: 0.4,
                sprite: "orb",
                impact: Impact::Vanish,
            },
            WeaponKind::BossFlame => ShotSpec {
                damage: 3,
                speed: 6.0,
                radius: 0.5,
                sprite: "flame",
                impact: Impact::Explode { seconds: 0.6, frames: 8 },
            },
        }
    }

    pub fn name(self) -> &'static str {
        self.spec().sprite
    }
}

/// A ship-mounted launcher. Holds at most one loaded shot, which lives
/// outside the entity container until fired.
#[derive(Debug)]
pub struct Weapon {
    kind: WeaponKind,
    side: Side,
    ammunition: u32,
    loaded: Option<Box<Entity>>,
}

impl Weapon {
    pub fn new(kind: WeaponKind, side: Side, ammunition: u32) -> Self {
        Self {
            kind,
            side,
            ammunition: ammunition.min(MAX_AMMUNITION),
            loaded: None,
        }
    }

    pub fn kind(&self) -> WeaponKind {
        self.kind
    }

    pub fn ammunition(&self) -> u32 {
        self.ammunition
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.is_some()
    }

    pub fn loaded(&self) -> Option<&Entity> {
        self.loaded.as_deref()
    }

    /// Create a shot at `at` and hold it, untouchable, until fired.
    pub fn load(
        &mut self,
        at: Vec2,
        rotation: f32,
        factory: &mut EntityFactory,
        physics: &mut PhysicsWorld,
    ) -> Result<EntityId, GameError> {
        if self.loaded.is_some() {
            return Err(WeaponError::AlreadyLoaded.into());
        }
        if self.ammunition == 0 {
            return Err(WeaponError::Empty.into());
        }

        let mut shot = factory.shot(self.kind, self.side, at, rotation, physics);
        shot.send(ShotEvent::Load, physics)?;
        let id = shot.id;
        self.loaded = Some(Box::new(shot));
        Ok(id)
    }

    /// Launch the loaded shot with `velocity` and hand it to the caller,
    /// who owns putting it into the world.
    pub fn fire(&mut self, velocity: Vec2, physics: &mut PhysicsWorld) -> Result<Entity, GameError> {
        let mut shot = *self.loaded.take().ok_or(WeaponError::NotLoaded)?;
        self.ammunition = self.ammunition.saturating_sub(1);

        let rotation = velocity.y.atan2(velocity.x);
        if let Some(body) = &shot.body {
            physics.set_transform(body, shot.pos, rotation);
            physics.set_velocity(body, velocity);
        }
        shot.rotation = rotation;
        shot.send(ShotEvent::Fire, physics)?;
        shot.send(ShotEvent::Cruise, physics)?;
        Ok(shot)
    }

    /// Drop the loaded shot, if any, and destroy its body.
    pub fn unload(&mut self, physics: &mut PhysicsWorld) -> bool {
        let Some(mut shot) = self.loaded.take() else {
            return false;
        };
        if let Err(err) = shot.send(ShotEvent::Destroy, physics) {
            log::warn!("unloading shot {}: {err}", shot.id);
        }
        if let Some(body) = shot.body.take() {
            physics.remove_body(&body);
        }
        true
    }

    /// Add ammunition, clamped to `MAX_AMMUNITION`. Non-positive amounts are refused.
    pub fn reload(&mut self, amount: i32) -> bool {
        if amount <= 0 {
            return false;
        }
        self.ammunition = self.ammunition.saturating_add(amount as u32).min(MAX_AMMUNITION);
        true
    }

    /// Keep the loaded shot at the muzzle.
    pub fn follow(&mut self, muzzle: Vec2, physics: &mut PhysicsWorld) {
        if let Some(shot) = self.loaded.as_deref_mut() {
            shot.pos = muzzle;
            if let Some(body) = &shot.body {
                physics.set_transform(body, muzzle, shot.rotation);
                physics.set_velocity(body, Vec2::ZERO);
            }
        }
    }
}
