//! Starfall engine: the game-agnostic half of the shooter.
//!
//! Rapier2D physics behind a small wrapper, a fixed-step clock, a deferred-action
//! queue, screen/world conversion, asset loading and a draw-call surface.

pub mod api;
pub mod assets;
pub mod components;
pub mod core;
pub mod input;
pub mod renderer;
pub mod systems;

// Re-export key types at crate root for convenience
pub use api::game::{Game, GameConfig};
pub use api::types::{CollisionFilter, EntityId};
pub use assets::manifest::{AssetManifest, SpriteDescriptor};
pub use assets::source::{AssetError, AssetSource, DirAssets, MemoryAssets};
pub use components::animation::{Animation, AnimationDef};
pub use components::sprite::{BlendMode, Sprite};
pub use core::actions::ActionQueue;
pub use core::convert::{CoordinateConverter, Rect};
pub use core::time::FixedTimestep;
pub use input::queue::{InputEvent, InputQueue};
pub use renderer::surface::{DrawCall, RecordingSurface, Surface};
pub use systems::rng::Rng;

#[cfg(feature = "physics")]
pub use core::physics::{
    BodyDesc, BodyType, ColliderDesc, ColliderMaterial, Contact, PhysicsBody, PhysicsWorld,
};
