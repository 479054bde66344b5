use starfall_engine::{AssetError, EntityId};
use thiserror::Error;

use crate::entity::shot::{ShotEvent, ShotState};
use crate::entity::Category;

/// Why a weapon refused to load or fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum WeaponError {
    #[error("out of ammunition")]
    Empty,
    #[error("a shot is already loaded")]
    AlreadyLoaded,
    #[error("no shot is loaded")]
    NotLoaded,
}

/// A problem with one scenario script line or section.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScriptError {
    #[error("expected 5 `%%` sections, found {0}")]
    Sections(usize),
    #[error("line {line}: {message}")]
    Malformed { line: usize, message: String },
    #[error("line {line}: unknown command `{command}`")]
    UnknownCommand { line: usize, command: String },
    #[error("line {line}: ship {ship} is not declared")]
    UnknownShip { line: usize, ship: u32 },
    #[error("line {line}: ship {ship} has not been spawned")]
    NotSpawned { line: usize, ship: u32 },
    #[error("line {line}: ship {ship} was already spawned")]
    AlreadySpawned { line: usize, ship: u32 },
}

#[derive(Debug, Error)]
pub enum GameError {
    // -- invariant violations: wiring bugs, never retried --
    #[error("no collision behavior for {receiver:?} touching {partner:?}")]
    UnhandledCollision { receiver: Category, partner: Category },

    #[error("shot {shot} cannot handle {event:?} while {state:?}")]
    InvalidShotTransition {
        shot: EntityId,
        state: ShotState,
        event: ShotEvent,
    },

    #[error("weapon index {index} out of range ({count} weapons)")]
    WeaponIndex { index: usize, count: usize },

    #[error("entity {0} is not a ship")]
    NotAShip(EntityId),

    #[error("entity {0} is not a shot")]
    NotAShot(EntityId),

    #[error("entity {0} is not a bonus")]
    NotABonus(EntityId),

    #[error("unknown ship type `{0}`")]
    UnknownShipType(String),

    #[error("unknown collision category bits {0:#06x}")]
    UnknownCategory(u32),

    // -- recoverable runtime conditions --
    #[error("entity {0} is no longer in the container")]
    UnknownEntity(EntityId),

    #[error(transparent)]
    Weapon(#[from] WeaponError),

    #[error(transparent)]
    Script(#[from] ScriptError),

    #[error(transparent)]
    Asset(#[from] AssetError),

    #[error("invalid stage: {0}")]
    InvalidStage(String),

    #[error("malformed {what}: {source}")]
    Config {
        what: String,
        #[source]
        source: serde_json::Error,
    },
}

impl GameError {
    /// Fatal errors signal corrupted state; the session stops on them.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            GameError::UnhandledCollision { .. }
                | GameError::InvalidShotTransition { .. }
                | GameError::WeaponIndex { .. }
                | GameError::NotAShip(_)
                | GameError::NotAShot(_)
                | GameError::NotABonus(_)
                | GameError::UnknownShipType(_)
                | GameError::UnknownCategory(_)
        )
    }

    /// Log and drop a recoverable error; hand a fatal one back.
    pub fn escalate(self, context: &dyn std::fmt::Display) -> Option<GameError> {
        if self.is_fatal() {
            log::error!("{context}: {self}");
            Some(self)
        } else {
            log::warn!("{context}: {self}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invariant_errors_are_fatal() {
        let err = GameError::UnhandledCollision {
            receiver: Category::Bonus,
            partner: Category::Npc,
        };
        assert!(err.is_fatal());
        assert!(GameError::WeaponIndex { index: 4, count: 2 }.is_fatal());
    }

    #[test]
    fn runtime_errors_are_recoverable() {
        assert!(!GameError::UnknownEntity(EntityId(3)).is_fatal());
        assert!(!GameError::from(WeaponError::Empty).is_fatal());
        assert!(!GameError::from(ScriptError::Sections(2)).is_fatal());
        assert!(!GameError::from(AssetError::NotFound("x".into())).is_fatal());
    }

    #[test]
    fn escalate_keeps_only_fatal_errors() {
        let fatal = GameError::UnknownCategory(0x40).escalate(&"contact");
        assert!(matches!(fatal, Some(GameError::UnknownCategory(0x40))));
        assert!(GameError::UnknownEntity(EntityId(9)).escalate(&"fire").is_none());
    }

    #[test]
    fn script_errors_name_the_line() {
        let err = ScriptError::UnknownCommand { line: 7, command: "warp".into() };
        assert_eq!(err.to_string(), "line 7: unknown command `warp`");
    }
}
