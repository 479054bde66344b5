//! Contact dispatch.
//!
//! A contact is handled by the behavior of its receiving entity (side A);
//! the behavior turns it into a deferred `Action`, never applying it in place.

use starfall_engine::{Contact, EntityId};

use crate::action::Action;
use crate::container::EntityContainer;
use crate::entity::Category;
use crate::error::GameError;

/// Collision response bound to a receiving category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionBehavior {
    PlayerShip,
    NpcShip,
    Shot,
    Bonus,
}

impl CollisionBehavior {
    /// Walls have no behavior.
    pub fn for_category(category: Category) -> Option<Self> {
        match category {
            Category::Wall => None,
            Category::Player => Some(CollisionBehavior::PlayerShip),
            Category::Npc => Some(CollisionBehavior::NpcShip),
            Category::Shot => Some(CollisionBehavior::Shot),
            Category::Bonus => Some(CollisionBehavior::Bonus),
        }
    }

    fn receiver(self) -> Category {
        match self {
            CollisionBehavior::PlayerShip => Category::Player,
            CollisionBehavior::NpcShip => Category::Npc,
            CollisionBehavior::Shot => Category::Shot,
            CollisionBehavior::Bonus => Category::Bonus,
        }
    }

    /// The deferred effect of `receiver` touching `partner`.
    pub fn resolve(
        self,
        receiver: EntityId,
        partner: EntityId,
        partner_category: Category,
    ) -> Result<Action, GameError> {
        use CollisionBehavior::*;

        let action = match (self, partner_category) {
            (PlayerShip, Category::Shot) => Action::ShotHitsPlayer {
                shot: partner,
                player: receiver,
            },
            (PlayerShip, Category::Bonus) => Action::PickUp {
                bonus: partner,
                player: receiver,
            },
            (PlayerShip, Category::Npc) => Action::Ram {
                player: receiver,
                npc: partner,
            },
            (NpcShip, Category::Shot) => Action::ShotHitsNpc {
                shot: partner,
                npc: receiver,
            },
            (NpcShip, Category::Player) => Action::Ram {
                player: partner,
                npc: receiver,
            },
            (Shot, Category::Player) => Action::ShotHitsPlayer {
                shot: receiver,
                player: partner,
            },
            (Shot, Category::Npc) => Action::ShotHitsNpc {
                shot: receiver,
                npc: partner,
            },
            (Bonus, Category::Player) => Action::PickUp {
                bonus: receiver,
                player: partner,
            },
            _ => {
                return Err(GameError::UnhandledCollision {
                    receiver: self.receiver(),
                    partner: partner_category,
                })
            }
        };
        Ok(action)
    }
}

fn category(bits: u32) -> Result<Category, GameError> {
    Category::from_bits(bits).ok_or(GameError::UnknownCategory(bits))
}

/// Turn one begin-contact into at most one action.
///
/// Wall contacts and contacts with entities already pending destruction
/// produce nothing. Unknown pairings are fatal.
pub fn dispatch(contact: &Contact, container: &EntityContainer) -> Result<Option<Action>, GameError> {
    let receiver_category = category(contact.category_a)?;
    let partner_category = category(contact.category_b)?;
    if receiver_category == Category::Wall || partner_category == Category::Wall {
        return Ok(None);
    }

    for id in [contact.entity_a, contact.entity_b] {
        match container.get(id) {
            None => {
                log::trace!("contact with entity {id} outside the container");
                return Ok(None);
            }
            Some(entity) if entity.is_destroy_requested() => return Ok(None),
            Some(_) => {}
        }
    }

    let Some(behavior) = CollisionBehavior::for_category(receiver_category) else {
        return Ok(None);
    };
    behavior
        .resolve(contact.entity_a, contact.entity_b, partner_category)
        .map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: EntityId = EntityId(1);
    const B: EntityId = EntityId(2);

    #[test]
    fn receiver_decides_the_action() {
        assert_eq!(
            CollisionBehavior::NpcShip.resolve(A, B, Category::Shot).unwrap(),
            Action::ShotHitsNpc { shot: B, npc: A }
        );
        assert_eq!(
            CollisionBehavior::Shot.resolve(B, A, Category::Npc).unwrap(),
            Action::ShotHitsNpc { shot: B, npc: A }
        );
        assert_eq!(
            CollisionBehavior::Bonus.resolve(A, B, Category::Player).unwrap(),
            Action::PickUp { bonus: A, player: B }
        );
        assert_eq!(
            CollisionBehavior::PlayerShip.resolve(A, B, Category::Npc).unwrap(),
            Action::Ram { player: A, npc: B }
        );
    }

    #[test]
    fn unhandled_pairs_are_fatal() {
        for (behavior, partner) in [
            (CollisionBehavior::NpcShip, Category::Npc),
            (CollisionBehavior::Bonus, Category::Npc),
            (CollisionBehavior::Shot, Category::Shot),
            (CollisionBehavior::PlayerShip, Category::Player),
        ] {
            let err = behavior.resolve(A, B, partner).unwrap_err();
            assert!(err.is_fatal(), "{behavior:?} vs {partner:?}");
        }
    }

    #[test]
    fn walls_have_no_behavior() {
        assert_eq!(CollisionBehavior::for_category(Category::Wall), None);
    }
}
