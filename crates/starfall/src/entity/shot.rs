//! Shot lifecycle.
//!
//! Every shot walks the same message sequence (LOAD, FIRE, CRUISE, then HIT
//! and/or DESTROY); what a HIT does depends on the weapon that made it.

use starfall_engine::{Animation, AnimationDef, EntityId};

use super::weapon::WeaponKind;
use super::Side;
use crate::error::GameError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShotState {
    Idle,
    Loaded,
    Fired,
    Cruising,
    /// Hit something and is playing out its impact.
    Impact,
    Destroyed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShotEvent {
    Load,
    Fire,
    Cruise,
    Hit,
    Destroy,
}

/// What happens when a shot hits something.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Impact {
    /// Gone at once.
    Vanish,
    /// Stops, stops touching, plays an explosion, then goes.
    Explode { seconds: f32, frames: u32 },
    /// Stops but keeps touching while its event horizon grows to `horizon`.
    Collapse { seconds: f32, horizon: f32 },
}

/// Side effects a transition asks the owning entity to perform.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Transition {
    pub touchable: Option<bool>,
    pub freeze: bool,
    /// Ask the container to remove the shot.
    pub remove: bool,
}

/// Result of one frame of impact playback.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ShotTick {
    pub frame: Option<u32>,
    pub radius: Option<f32>,
    pub finished: bool,
}

#[derive(Debug)]
pub struct Shot {
    kind: WeaponKind,
    side: Side,
    damage: i32,
    radius: f32,
    state: ShotState,
    impact: Option<Animation>,
}

impl Shot {
    pub fn new(kind: WeaponKind, side: Side) -> Self {
        let spec = kind.spec();
        Self {
            kind,
            side,
            damage: spec.damage,
            radius: spec.radius,
            state: ShotState::Idle,
            impact: None,
        }
    }

    pub fn kind(&self) -> WeaponKind {
        self.kind
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn damage(&self) -> i32 {
        self.damage
    }

    pub fn state(&self) -> ShotState {
        self.state
    }

    pub fn is_in_flight(&self) -> bool {
        matches!(self.state, ShotState::Fired | ShotState::Cruising)
    }

    /// Whether touching this shot still does damage. Collapsing shots keep
    /// hurting whatever their horizon reaches.
    pub fn is_harmful(&self) -> bool {
        match self.state {
            ShotState::Fired | ShotState::Cruising => true,
            ShotState::Impact => matches!(self.kind.spec().impact, Impact::Collapse { .. }),
            _ => false,
        }
    }

    /// Apply one lifecycle message.
    pub fn transition(&mut self, id: EntityId, event: ShotEvent) -> Result<Transition, GameError> {
        use ShotEvent::*;
        use ShotState::*;

        let invalid = GameError::InvalidShotTransition {
            shot: id,
            state: self.state,
            event,
        };

        let transition = match (self.state, event) {
            (Idle, Load) => {
                self.state = Loaded;
                Transition {
                    touchable: Some(false),
                    ..Transition::default()
                }
            }
            (Loaded, Fire) => {
                self.state = Fired;
                Transition {
                    touchable: Some(true),
                    ..Transition::default()
                }
            }
            (Fired, Cruise) => {
                self.state = Cruising;
                Transition::default()
            }
            (Fired | Cruising, Hit) => self.hit(),
            // Repeated hits during impact, or after the shot is gone, are no-ops.
            (Impact | Destroyed, Hit) => Transition::default(),
            (Destroyed, Destroy) => Transition::default(),
            (_, Destroy) => {
                self.state = Destroyed;
                self.impact = None;
                Transition {
                    remove: true,
                    ..Transition::default()
                }
            }
            _ => return Err(invalid),
        };

        log::trace!("shot {id} {event:?} -> {:?}", self.state);
        Ok(transition)
    }

    fn hit(&mut self) -> Transition {
        match self.kind.spec().impact {
            Impact::Vanish => {
                self.state = ShotState::Destroyed;
                Transition {
                    remove: true,
                    ..Transition::default()
                }
            }
            Impact::Explode { seconds, frames } => {
                self.state = ShotState::Impact;
                self.impact = Some(Animation::new(AnimationDef::timed(frames, seconds)));
                Transition {
                    touchable: Some(false),
                    freeze: true,
                    remove: false,
                }
            }
            Impact::Collapse { seconds, .. } => {
                self.state = ShotState::Impact;
                self.impact = Some(Animation::new(AnimationDef::timed(1, seconds)));
                Transition {
                    touchable: None,
                    freeze: true,
                    remove: false,
                }
            }
        }
    }

    /// Advance impact playback. `finished` means the shot should now be destroyed.
    pub fn update(&mut self, dt: f32) -> ShotTick {
        let Some(animation) = self.impact.as_mut() else {
            return ShotTick::default();
        };
        animation.tick(dt);

        let mut tick = ShotTick {
            finished: animation.is_finished(),
            ..ShotTick::default()
        };
        match self.kind.spec().impact {
            Impact::Explode { .. } => tick.frame = Some(animation.frame()),
            Impact::Collapse { horizon, .. } => {
                tick.radius = Some(self.radius + (horizon - self.radius) * animation.progress());
            }
            Impact::Vanish => {}
        }
        tick
    }
}
