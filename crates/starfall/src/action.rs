use glam::Vec2;
use starfall_engine::EntityId;

/// Effects deferred out of the physics step and out of entity updates.
/// Drained in posting order by the world.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    ShotHitsPlayer { shot: EntityId, player: EntityId },
    ShotHitsNpc { shot: EntityId, npc: EntityId },
    /// Player and NPC collided.
    Ram { player: EntityId, npc: EntityId },
    PickUp { bonus: EntityId, player: EntityId },
    /// Scripted fire order for an NPC.
    Fire { ship: EntityId },
    BossFire { boss: EntityId },
    BossSpecial { boss: EntityId },
    DropBonus { at: Vec2 },
}
