//! Simulated objects: ships, shots and bonuses.
//!
//! One `Entity` struct carries what every object has (id, category, body,
//! sprite, destroy flag); `EntityKind` carries the per-variant state chosen by
//! the factory at construction time.

pub mod bonus;
pub mod boss;
pub mod ship;
pub mod shot;
pub mod weapon;

use glam::Vec2;
use starfall_engine::{ActionQueue, CollisionFilter, EntityId, PhysicsBody, PhysicsWorld, Rect, Sprite};

use crate::action::Action;
use crate::error::GameError;

use self::bonus::Bonus;
use self::ship::{Pilot, Ship};
use self::shot::{Shot, ShotEvent, ShotState};

/// Collision categories. The bit values are opaque ids shared with the physics filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Wall,
    Player,
    Npc,
    Shot,
    Bonus,
}

impl Category {
    pub const WALL_BITS: u32 = 0x0001;
    pub const PLAYER_BITS: u32 = 0x0002;
    pub const NPC_BITS: u32 = 0x0004;
    pub const SHOT_BITS: u32 = 0x0008;
    pub const BONUS_BITS: u32 = 0x0010;

    pub const fn bits(self) -> u32 {
        match self {
            Category::Wall => Self::WALL_BITS,
            Category::Player => Self::PLAYER_BITS,
            Category::Npc => Self::NPC_BITS,
            Category::Shot => Self::SHOT_BITS,
            Category::Bonus => Self::BONUS_BITS,
        }
    }

    pub fn from_bits(bits: u32) -> Option<Self> {
        match bits {
            Self::WALL_BITS => Some(Category::Wall),
            Self::PLAYER_BITS => Some(Category::Player),
            Self::NPC_BITS => Some(Category::Npc),
            Self::SHOT_BITS => Some(Category::Shot),
            Self::BONUS_BITS => Some(Category::Bonus),
            _ => None,
        }
    }
}

/// Which side fired a shot or flies a ship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Player,
    Enemy,
}

pub mod filters {
    use super::{Category, Side};
    use starfall_engine::CollisionFilter;

    pub const WALL: CollisionFilter = CollisionFilter::new(Category::WALL_BITS, Category::PLAYER_BITS);
    pub const PLAYER: CollisionFilter = CollisionFilter::new(
        Category::PLAYER_BITS,
        Category::WALL_BITS | Category::NPC_BITS | Category::SHOT_BITS | Category::BONUS_BITS,
    );
    pub const NPC: CollisionFilter =
        CollisionFilter::new(Category::NPC_BITS, Category::PLAYER_BITS | Category::SHOT_BITS);
    pub const PLAYER_SHOT: CollisionFilter = CollisionFilter::new(Category::SHOT_BITS, Category::NPC_BITS);
    pub const ENEMY_SHOT: CollisionFilter = CollisionFilter::new(Category::SHOT_BITS, Category::PLAYER_BITS);
    pub const BONUS: CollisionFilter = CollisionFilter::new(Category::BONUS_BITS, Category::PLAYER_BITS);

    /// Player filter during the loop maneuver: walls and bonuses only.
    pub const PLAYER_LOOPING: CollisionFilter = CollisionFilter::new(
        Category::PLAYER_BITS,
        Category::WALL_BITS | Category::BONUS_BITS,
    );

    pub fn ship(side: Side) -> CollisionFilter {
        match side {
            Side::Player => PLAYER,
            Side::Enemy => NPC,
        }
    }

    pub fn shot(side: Side) -> CollisionFilter {
        match side {
            Side::Player => PLAYER_SHOT,
            Side::Enemy => ENEMY_SHOT,
        }
    }
}

#[derive(Debug)]
pub enum EntityKind {
    Ship(Ship),
    Shot(Shot),
    Bonus(Bonus),
}

/// Per-frame services an entity may use while updating.
pub struct FrameContext<'a> {
    pub physics: &'a mut PhysicsWorld,
    pub actions: &'a mut ActionQueue<Action>,
}

#[derive(Debug)]
pub struct Entity {
    pub id: EntityId,
    pub category: Category,
    /// The filter the body normally carries; restored after untouchable phases.
    pub filter: CollisionFilter,
    pub pos: Vec2,
    pub rotation: f32,
    pub sprite: Sprite,
    pub body: Option<PhysicsBody>,
    pub kind: EntityKind,
    destroy_requested: bool,
}

impl Entity {
    pub fn new(id: EntityId, category: Category, filter: CollisionFilter, sprite: Sprite, kind: EntityKind) -> Self {
        Self {
            id,
            category,
            filter,
            pos: Vec2::ZERO,
            rotation: 0.0,
            sprite,
            body: None,
            kind,
            destroy_requested: false,
        }
    }

    pub fn with_pos(mut self, pos: Vec2) -> Self {
        self.pos = pos;
        self
    }

    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_body(mut self, body: PhysicsBody) -> Self {
        self.body = Some(body);
        self
    }

    pub fn ship(&self) -> Option<&Ship> {
        match &self.kind {
            EntityKind::Ship(ship) => Some(ship),
            _ => None,
        }
    }

    pub fn ship_mut(&mut self) -> Option<&mut Ship> {
        match &mut self.kind {
            EntityKind::Ship(ship) => Some(ship),
            _ => None,
        }
    }

    pub fn shot(&self) -> Option<&Shot> {
        match &self.kind {
            EntityKind::Shot(shot) => Some(shot),
            _ => None,
        }
    }

    pub fn shot_mut(&mut self) -> Option<&mut Shot> {
        match &mut self.kind {
            EntityKind::Shot(shot) => Some(shot),
            _ => None,
        }
    }

    pub fn bonus(&self) -> Option<&Bonus> {
        match &self.kind {
            EntityKind::Bonus(bonus) => Some(bonus),
            _ => None,
        }
    }

    pub fn is_boss(&self) -> bool {
        matches!(self.ship(), Some(ship) if matches!(ship.pilot, Pilot::Boss(_)))
    }

    pub fn is_destroy_requested(&self) -> bool {
        self.destroy_requested
    }

    pub(crate) fn mark_destroy_requested(&mut self) {
        self.destroy_requested = true;
    }

    /// Bounding box in world units.
    pub fn aabb(&self) -> Rect {
        Rect::from_center(self.pos, self.sprite.size * 0.5)
    }

    /// Whether leaving the world removes this entity. Players and bosses stay;
    /// loaded shots are never in the container.
    pub fn checks_edges(&self) -> bool {
        match &self.kind {
            EntityKind::Ship(ship) => matches!(ship.pilot, Pilot::Npc(_)),
            EntityKind::Shot(shot) => matches!(shot.state(), ShotState::Fired | ShotState::Cruising),
            EntityKind::Bonus(_) => true,
        }
    }

    /// Pull position and rotation from the physics body.
    pub fn sync(&mut self, physics: &PhysicsWorld) {
        if let Some(body) = &self.body {
            let (pos, rot) = physics.body_position(body);
            self.pos = pos;
            self.rotation = rot;
        }
    }

    /// Make the body ignore (or resume) contacts, keeping its category.
    pub fn set_touchable(&self, physics: &mut PhysicsWorld, touchable: bool) {
        if let Some(body) = &self.body {
            let filter = if touchable { self.filter } else { self.filter.untouchable() };
            physics.set_filter(body, filter);
        }
    }

    /// Deliver a shot message and apply its physical side effects.
    /// Returns true when the shot asks to be removed from its container.
    pub fn send(&mut self, event: ShotEvent, physics: &mut PhysicsWorld) -> Result<bool, GameError> {
        let id = self.id;
        let Some(shot) = self.shot_mut() else {
            return Ok(false);
        };
        let transition = shot.transition(id, event)?;

        if let Some(touchable) = transition.touchable {
            self.set_touchable(physics, touchable);
        }
        if transition.freeze {
            if let Some(body) = &self.body {
                physics.freeze(body);
            }
        }
        Ok(transition.remove)
    }

    /// Per-frame behavior. Returns true when the entity asks to be destroyed.
    pub fn update(&mut self, dt: f32, cx: &mut FrameContext) -> Result<bool, GameError> {
        self.sync(cx.physics);
        let id = self.id;
        let pos = self.pos;

        match &mut self.kind {
            EntityKind::Ship(ship) => {
                let outcome = ship.update(id, pos, dt, cx);
                if let Some(filter) = outcome.filter {
                    if let Some(body) = &self.body {
                        cx.physics.set_filter(body, filter);
                    }
                }
                if let Some(velocity) = outcome.velocity {
                    if let Some(body) = &self.body {
                        cx.physics.set_velocity(body, velocity);
                    }
                }
                self.sprite.frame = outcome.frame;
                ship.follow_muzzle(pos, cx.physics);
                Ok(false)
            }
            EntityKind::Shot(shot) => {
                let tick = shot.update(dt);
                if let Some(radius) = tick.radius {
                    if let Some(body) = &self.body {
                        cx.physics.set_ball_radius(body, radius);
                    }
                    self.sprite.size = Vec2::splat(radius * 2.0);
                }
                if let Some(frame) = tick.frame {
                    self.sprite.frame = frame;
                }
                if tick.finished {
                    return self.send(ShotEvent::Destroy, cx.physics);
                }
                Ok(false)
            }
            EntityKind::Bonus(_) => Ok(false),
        }
    }
}
