use std::f32::consts::FRAC_PI_2;
use std::str::FromStr;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use starfall_engine::{Animation, AnimationDef, CollisionFilter, EntityId, PhysicsWorld};

use super::boss::BossBrain;
use super::weapon::{Weapon, WeaponKind, MAX_AMMUNITION};
use super::{filters, FrameContext, Side};
use crate::action::Action;
use crate::error::GameError;

/// Frames in the player's loop animation strip.
pub const LOOP_FRAMES: u32 = 12;
/// Steering stops within this distance of the destination.
const ARRIVAL: f32 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShipKind {
    Player,
    Scout,
    Fighter,
    Bomber,
    Cruiser,
    Dreadnought,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShipSpec {
    pub life: i32,
    /// Meters per second.
    pub speed: f32,
    pub radius: f32,
    pub sprite: &'static str,
    pub weapons: &'static [(WeaponKind, u32)],
}

impl ShipKind {
    pub const fn spec(self) -> ShipSpec {
        match self {
            ShipKind::Player => ShipSpec {
                life: 5,
                speed: 8.0,
                radius: 0.6,
                sprite: "player",
                weapons: &[
                    (WeaponKind::Missile, 40),
                    (WeaponKind::Fireball, 0),
                    (WeaponKind::Shiboleet, 0),
                    (WeaponKind::Blackhole, 0),
                ],
            },
            ShipKind::Scout => ShipSpec {
                life: 1,
                speed: 4.0,
                radius: 0.5,
                sprite: "scout",
                weapons: &[(WeaponKind::Laser, MAX_AMMUNITION)],
            },
            ShipKind::Fighter => ShipSpec {
                life: 2,
                speed: 3.0,
                radius: 0.6,
                sprite: "fighter",
                weapons: &[(WeaponKind::Laser, MAX_AMMUNITION)],
            },
            ShipKind::Bomber => ShipSpec {
                life: 4,
                speed: 2.0,
                radius: 0.8,
                sprite: "bomber",
                weapons: &[(WeaponKind::Missile, 20)],
            },
            ShipKind::Cruiser => ShipSpec {
                life: 40,
                speed: 2.0,
                radius: 1.8,
                sprite: "cruiser",
                weapons: &[(WeaponKind::BossOrb, MAX_AMMUNITION), (WeaponKind::Laser, MAX_AMMUNITION)],
            },
            ShipKind::Dreadnought => ShipSpec {
                life: 60,
                speed: 1.5,
                radius: 2.2,
                sprite: "dreadnought",
                weapons: &[(WeaponKind::BossFlame, MAX_AMMUNITION), (WeaponKind::BossOrb, MAX_AMMUNITION)],
            },
        }
    }

    pub fn is_boss(self) -> bool {
        matches!(self, ShipKind::Cruiser | ShipKind::Dreadnought)
    }

    pub fn name(self) -> &'static str {
        self.spec().sprite
    }
}

impl FromStr for ShipKind {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "player" => Ok(ShipKind::Player),
            "scout" => Ok(ShipKind::Scout),
            "fighter" => Ok(ShipKind::Fighter),
            "bomber" => Ok(ShipKind::Bomber),
            "cruiser" => Ok(ShipKind::Cruiser),
            "dreadnought" => Ok(ShipKind::Dreadnought),
            other => Err(GameError::UnknownShipType(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PlayerState {
    maneuver: Option<Animation>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Steering {
    pub destination: Option<Vec2>,
}

/// Who flies the ship.
#[derive(Debug, Clone)]
pub enum Pilot {
    Player(PlayerState),
    Npc(Steering),
    Boss(BossBrain),
}

/// Body changes a ship asks for after its update.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ShipOutcome {
    pub velocity: Option<Vec2>,
    pub filter: Option<CollisionFilter>,
    pub frame: u32,
}

#[derive(Debug)]
pub struct Ship {
    kind: ShipKind,
    weapons: Vec<Weapon>,
    active: usize,
    life: i32,
    initial_life: i32,
    facing: f32,
    pub pilot: Pilot,
}

impl Ship {
    pub fn new(kind: ShipKind, pilot: Pilot) -> Self {
        let spec = kind.spec();
        let side = if matches!(pilot, Pilot::Player(_)) { Side::Player } else { Side::Enemy };
        let facing = match side {
            Side::Player => FRAC_PI_2,
            Side::Enemy => -FRAC_PI_2,
        };
        Self {
            kind,
            weapons: spec
                .weapons
                .iter()
                .map(|&(weapon, ammunition)| Weapon::new(weapon, side, ammunition))
                .collect(),
            active: 0,
            life: spec.life,
            initial_life: spec.life,
            facing,
            pilot,
        }
    }

    pub fn kind(&self) -> ShipKind {
        self.kind
    }

    pub fn side(&self) -> Side {
        match self.pilot {
            Pilot::Player(_) => Side::Player,
            _ => Side::Enemy,
        }
    }

    pub fn life(&self) -> i32 {
        self.life
    }

    pub fn initial_life(&self) -> i32 {
        self.initial_life
    }

    pub fn is_dead(&self) -> bool {
        self.life <= 0
    }

    /// Subtract `amount` and return the remaining life.
    pub fn damage(&mut self, amount: i32) -> i32 {
        self.life -= amount;
        self.life
    }

    pub fn restore(&mut self) {
        self.life = self.initial_life;
    }

    pub fn facing(&self) -> f32 {
        self.facing
    }

    pub fn direction(&self) -> Vec2 {
        Vec2::from_angle(self.facing)
    }

    pub fn speed(&self) -> f32 {
        self.kind.spec().speed
    }

    pub fn radius(&self) -> f32 {
        self.kind.spec().radius
    }

    /// Where shots are held before firing.
    pub fn muzzle(&self, pos: Vec2) -> Vec2 {
        pos + self.direction() * (self.radius() + 0.3)
    }

    pub fn weapons(&self) -> &[Weapon] {
        &self.weapons
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active_weapon(&self) -> Option<&Weapon> {
        self.weapons.get(self.active)
    }

    pub fn active_weapon_mut(&mut self) -> Option<&mut Weapon> {
        self.weapons.get_mut(self.active)
    }

    pub fn weapon_mut(&mut self, kind: WeaponKind) -> Option<&mut Weapon> {
        self.weapons.iter_mut().find(|w| w.kind() == kind)
    }

    /// Switch the active weapon, unloading the previous one.
    pub fn select_weapon(&mut self, index: usize, physics: &mut PhysicsWorld) -> Result<(), GameError> {
        if index >= self.weapons.len() {
            return Err(GameError::WeaponIndex {
                index,
                count: self.weapons.len(),
            });
        }
        if index != self.active {
            self.weapons[self.active].unload(physics);
            self.active = index;
        }
        Ok(())
    }

    /// Rotate to the next weapon.
    pub fn cycle_weapon(&mut self, physics: &mut PhysicsWorld) -> Result<(), GameError> {
        if self.weapons.is_empty() {
            return Ok(());
        }
        self.select_weapon((self.active + 1) % self.weapons.len(), physics)
    }

    pub fn unload_all(&mut self, physics: &mut PhysicsWorld) {
        for weapon in &mut self.weapons {
            weapon.unload(physics);
        }
    }

    pub fn follow_muzzle(&mut self, pos: Vec2, physics: &mut PhysicsWorld) {
        let muzzle = self.muzzle(pos);
        for weapon in &mut self.weapons {
            weapon.follow(muzzle, physics);
        }
    }

    pub fn is_looping(&self) -> bool {
        matches!(&self.pilot, Pilot::Player(state) if state.maneuver.is_some())
    }

    /// Begin the loop maneuver. Only the player can loop, and not twice at once.
    pub fn start_loop(&mut self, duration: f32) -> bool {
        match &mut self.pilot {
            Pilot::Player(state) if state.maneuver.is_none() => {
                state.maneuver = Some(Animation::new(AnimationDef::timed(LOOP_FRAMES, duration)));
                true
            }
            _ => false,
        }
    }

    /// Steer toward `destination`. Only NPC ships accept move orders.
    pub fn move_to(&mut self, destination: Vec2) -> bool {
        match &mut self.pilot {
            Pilot::Npc(steering) => {
                steering.destination = Some(destination);
                true
            }
            _ => false,
        }
    }

    pub(crate) fn update(&mut self, id: EntityId, pos: Vec2, dt: f32, cx: &mut FrameContext) -> ShipOutcome {
        let speed = self.speed();
        let mut outcome = ShipOutcome::default();

        match &mut self.pilot {
            Pilot::Player(state) => {
                if let Some(maneuver) = state.maneuver.as_mut() {
                    maneuver.tick(dt);
                    outcome.frame = maneuver.frame();
                    if maneuver.is_finished() {
                        state.maneuver = None;
                        outcome.frame = 0;
                        outcome.filter = Some(filters::PLAYER);
                        log::debug!("ship {id} loop finished");
                    }
                }
            }
            Pilot::Npc(steering) => {
                if let Some(destination) = steering.destination {
                    let delta = destination - pos;
                    let distance = delta.length();
                    if distance <= ARRIVAL || dt <= 0.0 {
                        steering.destination = None;
                        outcome.velocity = Some(Vec2::ZERO);
                    } else {
                        outcome.velocity = Some(delta / distance * speed.min(distance / dt));
                    }
                }
            }
            Pilot::Boss(brain) => {
                let orders = brain.update(dt, pos, speed);
                outcome.velocity = Some(orders.velocity);
                if orders.fire {
                    cx.actions.post(Action::BossFire { boss: id });
                }
                if orders.special {
                    cx.actions.post(Action::BossSpecial { boss: id });
                }
            }
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::EntityFactory;

    #[test]
    fn kinds_parse_from_script_names() {
        assert_eq!("bomber".parse::<ShipKind>().unwrap(), ShipKind::Bomber);
        assert!(matches!(
            "frigate".parse::<ShipKind>(),
            Err(GameError::UnknownShipType(name)) if name == "frigate"
        ));
        assert!(ShipKind::Cruiser.is_boss());
        assert!(!ShipKind::Scout.is_boss());
    }

    #[test]
    fn damage_and_restore() {
        let mut ship = Ship::new(ShipKind::Fighter, Pilot::Npc(Steering::default()));
        assert_eq!(ship.damage(3), -1);
        assert!(ship.is_dead());
        ship.restore();
        assert_eq!(ship.life(), 2);
    }

    #[test]
    fn select_out_of_range_is_fatal() {
        let mut physics = PhysicsWorld::new(Vec2::ZERO);
        let mut ship = Ship::new(ShipKind::Player, Pilot::Player(PlayerState::default()));
        let err = ship.select_weapon(4, &mut physics).unwrap_err();
        assert!(err.is_fatal());
        assert_eq!(ship.active_index(), 0);
    }

    #[test]
    fn switching_weapon_unloads_the_old_one() {
        let mut physics = PhysicsWorld::new(Vec2::ZERO);
        let mut factory = EntityFactory::new();
        let mut ship = Ship::new(ShipKind::Player, Pilot::Player(PlayerState::default()));
        let muzzle = ship.muzzle(Vec2::ZERO);
        let facing = ship.facing();
        ship.active_weapon_mut()
            .unwrap()
            .load(muzzle, facing, &mut factory, &mut physics)
            .unwrap();
        assert_eq!(physics.body_count(), 1);

        ship.select_weapon(1, &mut physics).unwrap();
        assert_eq!(physics.body_count(), 0);
        assert!(!ship.weapons()[0].is_loaded());
        assert_eq!(ship.active_weapon().unwrap().kind(), WeaponKind::Fireball);
    }

    #[test]
    fn only_players_loop_once_at_a_time() {
        let mut player = Ship::new(ShipKind::Player, Pilot::Player(PlayerState::default()));
        assert!(player.start_loop(1.0));
        assert!(player.is_looping());
        assert!(!player.start_loop(1.0));

        let mut npc = Ship::new(ShipKind::Scout, Pilot::Npc(Steering::default()));
        assert!(!npc.start_loop(1.0));
    }

    #[test]
    fn npc_faces_down_and_player_up() {
        let npc = Ship::new(ShipKind::Scout, Pilot::Npc(Steering::default()));
        assert!(npc.direction().y < -0.99);
        let player = Ship::new(ShipKind::Player, Pilot::Player(PlayerState::default()));
        assert!(player.muzzle(Vec2::ZERO).y > 0.0);
    }
}
