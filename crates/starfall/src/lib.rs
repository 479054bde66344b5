//! Starfall: a vertical space shooter built on `starfall-engine`.
//!
//! The simulation core lives here: ships, weapons, shots and bonuses; the
//! collision behaviors that turn contacts into deferred actions; the entity
//! container with its two-phase destruction; and the timed stage scripts that
//! spawn, move and fire enemy ships before the boss arrives.

pub mod action;
pub mod collision;
pub mod config;
pub mod container;
pub mod entity;
pub mod error;
pub mod factory;
pub mod scenario;
pub mod session;
pub mod stage;
pub mod user;
pub mod world;

pub use action::Action;
pub use config::{Rules, Settings, HIT_SCORE, RAM_DAMAGE};
pub use container::EntityContainer;
pub use entity::ship::ShipKind;
pub use entity::weapon::{WeaponKind, MAX_AMMUNITION};
pub use entity::{Category, Entity};
pub use error::{GameError, ScriptError, WeaponError};
pub use scenario::{BossSpawn, Scenario, ScenarioDriver};
pub use session::{Session, SessionState};
pub use stage::{Stage, StageDescriptor};
pub use user::User;
pub use world::World;
