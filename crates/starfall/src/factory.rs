//! Entity construction: each function builds the body, sprite and behavior
//! wiring for one kind of object.

use glam::Vec2;
use starfall_engine::{
    BlendMode, BodyDesc, ColliderDesc, ColliderMaterial, EntityId, PhysicsBody, PhysicsWorld, Rect, Sprite,
};

use crate::entity::boss::BossBrain;
use crate::entity::bonus::Bonus;
use crate::entity::ship::{Pilot, PlayerState, Ship, ShipKind, Steering};
use crate::entity::shot::Shot;
use crate::entity::weapon::WeaponKind;
use crate::entity::{filters, Category, Entity, EntityKind, Side};

pub const BONUS_RADIUS: f32 = 0.4;
const WALL_THICKNESS: f32 = 0.5;

#[derive(Debug)]
pub struct EntityFactory {
    next_id: u32,
}

impl Default for EntityFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityFactory {
    pub fn new() -> Self {
        // 0 is reserved for walls
        Self { next_id: 1 }
    }

    pub fn next_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn player(&mut self, pos: Vec2, physics: &mut PhysicsWorld) -> Entity {
        self.ship(ShipKind::Player, Pilot::Player(PlayerState::default()), pos, physics)
    }

    pub fn npc(&mut self, kind: ShipKind, pos: Vec2, physics: &mut PhysicsWorld) -> Entity {
        self.ship(kind, Pilot::Npc(Steering::default()), pos, physics)
    }

    pub fn boss(&mut self, kind: ShipKind, pos: Vec2, bounds: Rect, physics: &mut PhysicsWorld) -> Entity {
        let brain = BossBrain::new(kind, pos, bounds);
        self.ship(kind, Pilot::Boss(brain), pos, physics)
    }

    fn ship(&mut self, kind: ShipKind, pilot: Pilot, pos: Vec2, physics: &mut PhysicsWorld) -> Entity {
        let id = self.next_id();
        let ship = Ship::new(kind, pilot);
        let side = ship.side();
        let (category, filter) = match side {
            Side::Player => (Category::Player, filters::ship(side)),
            Side::Enemy => (Category::Npc, filters::ship(side)),
        };
        let radius = ship.radius();
        let rotation = ship.facing();

        let desc = BodyDesc::dynamic(ColliderDesc::Ball { radius })
            .with_position(pos)
            .with_rotation(rotation)
            .with_filter(filter);
        let body = physics.create_body(id, &desc, ColliderMaterial::default());
        log::debug!("created {:?} ship {id} at {pos}", kind);

        Entity::new(
            id,
            category,
            filter,
            Sprite::new(kind.name(), Vec2::splat(radius * 2.0)),
            EntityKind::Ship(ship),
        )
        .with_pos(pos)
        .with_rotation(rotation)
        .with_body(body)
    }

    pub fn shot(
        &mut self,
        kind: WeaponKind,
        side: Side,
        pos: Vec2,
        rotation: f32,
        physics: &mut PhysicsWorld,
    ) -> Entity {
        let id = self.next_id();
        let spec = kind.spec();
        let filter = filters::shot(side);

        let desc = BodyDesc::dynamic(ColliderDesc::Ball { radius: spec.radius })
            .with_position(pos)
            .with_rotation(rotation)
            .with_sensor(true)
            .with_ccd(true)
            .with_filter(filter);
        let body = physics.create_body(id, &desc, ColliderMaterial::default());

        let blend = match kind {
            WeaponKind::Fireball | WeaponKind::BossFlame => BlendMode::Additive,
            _ => BlendMode::Alpha,
        };
        Entity::new(
            id,
            Category::Shot,
            filter,
            Sprite::new(spec.sprite, Vec2::splat(spec.radius * 2.0)).with_blend(blend),
            EntityKind::Shot(Shot::new(kind, side)),
        )
        .with_pos(pos)
        .with_rotation(rotation)
        .with_body(body)
    }

    pub fn bonus(&mut self, weapon: WeaponKind, pos: Vec2, velocity: Vec2, physics: &mut PhysicsWorld) -> Entity {
        let id = self.next_id();
        let desc = BodyDesc::dynamic(ColliderDesc::Ball { radius: BONUS_RADIUS })
            .with_position(pos)
            .with_velocity(velocity)
            .with_sensor(true)
            .with_filter(filters::BONUS);
        let body = physics.create_body(id, &desc, ColliderMaterial::default());
        log::debug!("dropped {} bonus {id} at {pos}", weapon.name());

        Entity::new(
            id,
            Category::Bonus,
            filters::BONUS,
            Sprite::new(format!("bonus_{}", weapon.name()), Vec2::splat(BONUS_RADIUS * 2.0)),
            EntityKind::Bonus(Bonus::new(weapon)),
        )
        .with_pos(pos)
        .with_body(body)
    }

    /// Static walls around `bounds` that keep the player below `ceiling` (world y).
    /// Walls are not entities; their bodies carry `EntityId::NONE`.
    pub fn walls(bounds: Rect, ceiling: f32, physics: &mut PhysicsWorld) -> Vec<PhysicsBody> {
        let half = WALL_THICKNESS * 0.5;
        let width = bounds.width();
        let height = ceiling - bounds.min.y;
        let center_x = bounds.center().x;
        let center_y = bounds.min.y + height * 0.5;

        let pieces = [
            // floor and ceiling
            (Vec2::new(center_x, bounds.min.y - half), Vec2::new(width * 0.5, half)),
            (Vec2::new(center_x, ceiling + half), Vec2::new(width * 0.5, half)),
            // sides
            (Vec2::new(bounds.min.x - half, center_y), Vec2::new(half, height * 0.5)),
            (Vec2::new(bounds.max.x + half, center_y), Vec2::new(half, height * 0.5)),
        ];

        pieces
            .into_iter()
            .map(|(center, extents)| {
                let desc = BodyDesc::fixed(ColliderDesc::Cuboid {
                    half_width: extents.x,
                    half_height: extents.y,
                })
                .with_position(center)
                .with_filter(filters::WALL);
                physics.create_body(EntityId::NONE, &desc, ColliderMaterial::default())
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique_and_skip_zero() {
        let mut factory = EntityFactory::new();
        let a = factory.next_id();
        let b = factory.next_id();
        assert_ne!(a, EntityId::NONE);
        assert_ne!(a, b);
    }

    #[test]
    fn ships_get_side_filters() {
        let mut physics = PhysicsWorld::new(Vec2::ZERO);
        let mut factory = EntityFactory::new();
        let player = factory.player(Vec2::new(7.0, 2.0), &mut physics);
        let npc = factory.npc(ShipKind::Scout, Vec2::new(7.0, 20.0), &mut physics);

        assert_eq!(player.category, Category::Player);
        assert_eq!(npc.category, Category::Npc);
        assert_eq!(physics.filter(player.body.as_ref().unwrap()), Some(filters::PLAYER));
        assert_eq!(physics.filter(npc.body.as_ref().unwrap()), Some(filters::NPC));
        assert!(filters::PLAYER.accepts(&filters::NPC));
        assert!(!filters::NPC.accepts(&filters::NPC));
    }

    #[test]
    fn shot_filters_only_touch_the_other_side() {
        assert!(filters::PLAYER_SHOT.accepts(&filters::NPC));
        assert!(!filters::PLAYER_SHOT.accepts(&filters::PLAYER));
        assert!(filters::ENEMY_SHOT.accepts(&filters::PLAYER));
        assert!(!filters::ENEMY_SHOT.accepts(&filters::NPC));
        assert!(!filters::WALL.accepts(&filters::NPC));
        assert!(!filters::PLAYER_LOOPING.accepts(&filters::ENEMY_SHOT));
        assert!(filters::PLAYER_LOOPING.accepts(&filters::BONUS));
    }

    #[test]
    fn four_walls() {
        let mut physics = PhysicsWorld::new(Vec2::ZERO);
        let bounds = Rect::new(Vec2::ZERO, Vec2::new(15.0, 25.0));
        let walls = EntityFactory::walls(bounds, 11.0, &mut physics);
        assert_eq!(walls.len(), 4);
        assert_eq!(physics.body_count(), 4);
    }
}
