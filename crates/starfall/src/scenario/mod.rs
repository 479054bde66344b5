//! Timed stage scripts: a cursor over script lines plus the boss spawn.

pub mod script;

use std::collections::HashMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use starfall_engine::EntityId;

use crate::entity::ship::ShipKind;
use crate::error::{GameError, ScriptError};

pub use self::script::{Command, Script, ScriptLine, ShipDecl};

/// Where and what the stage boss is.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BossSpawn {
    pub kind: ShipKind,
    pub x: f32,
    pub y: f32,
}

impl BossSpawn {
    pub fn pos(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

/// What a scenario needs from the world it runs in.
pub trait ScenarioDriver {
    fn spawn_ship(&mut self, kind: ShipKind, pos: Vec2) -> Result<EntityId, GameError>;
    fn move_ship(&mut self, ship: EntityId, to: Vec2) -> Result<(), GameError>;
    fn fire_ship(&mut self, ship: EntityId) -> Result<(), GameError>;
    fn spawn_boss(&mut self, boss: &BossSpawn) -> Result<EntityId, GameError>;
    /// Whether the entity is still in the container.
    fn is_present(&self, id: EntityId) -> bool;
}

#[derive(Debug, Clone)]
pub struct Scenario {
    script: Script,
    boss: BossSpawn,
    /// Scenario-relative time at which the boss appears.
    duration: f32,
    cursor: usize,
    spawned: HashMap<u32, EntityId>,
    boss_spawned: bool,
    boss_id: Option<EntityId>,
}

impl Scenario {
    pub fn new(script: Script, boss: BossSpawn, duration: f32) -> Self {
        Self {
            script,
            boss,
            duration,
            cursor: 0,
            spawned: HashMap::new(),
            boss_spawned: false,
            boss_id: None,
        }
    }

    pub fn id(&self) -> u32 {
        self.script.id
    }

    pub fn script(&self) -> &Script {
        &self.script
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn boss_id(&self) -> Option<EntityId> {
        self.boss_id
    }

    /// Entity spawned for script ship `ship`, if any.
    pub fn spawned(&self, ship: u32) -> Option<EntityId> {
        self.spawned.get(&ship).copied()
    }

    /// Run every line that is due at `elapsed` seconds since the stage began,
    /// then spawn the boss once its time has come.
    ///
    /// Script faults are logged and skipped; only fatal errors are returned.
    pub fn action(&mut self, elapsed: f32, driver: &mut dyn ScenarioDriver) -> Result<(), GameError> {
        let now = elapsed - self.script.start_time;

        while let Some(line) = self.script.lines.get(self.cursor) {
            if line.time > now {
                break;
            }
            let line = line.clone();
            self.cursor += 1;

            match self.run(&line, driver) {
                Ok(()) => {}
                Err(err) if err.is_fatal() => {
                    log::error!("scenario {} line {}: {err}", self.script.id, line.number);
                    return Err(err);
                }
                Err(err) => log::warn!("scenario {}: skipping line {}: {err}", self.script.id, line.number),
            }
        }

        if !self.boss_spawned && now >= self.duration {
            self.boss_spawned = true;
            match driver.spawn_boss(&self.boss) {
                Ok(id) => {
                    log::info!("scenario {}: boss {:?} spawned as {id}", self.script.id, self.boss.kind);
                    self.boss_id = Some(id);
                }
                Err(err) if err.is_fatal() => return Err(err),
                Err(err) => log::warn!("scenario {}: boss spawn failed: {err}", self.script.id),
            }
        }
        Ok(())
    }

    fn run(&mut self, line: &ScriptLine, driver: &mut dyn ScenarioDriver) -> Result<(), GameError> {
        let number = line.number;
        match line.command()? {
            Command::Spawn(ship) => {
                if self.spawned.contains_key(&ship) {
                    return Err(ScriptError::AlreadySpawned { line: number, ship }.into());
                }
                let decl = self
                    .script
                    .ships
                    .get(&ship)
                    .copied()
                    .ok_or(ScriptError::UnknownShip { line: number, ship })?;
                let id = driver.spawn_ship(decl.kind, decl.pos)?;
                self.spawned.insert(ship, id);
            }
            Command::Move(ship, to) => driver.move_ship(self.entity(number, ship)?, to)?,
            Command::Fire(ship) => driver.fire_ship(self.entity(number, ship)?)?,
        }
        Ok(())
    }

    fn entity(&self, line: usize, ship: u32) -> Result<EntityId, ScriptError> {
        self.spawned
            .get(&ship)
            .copied()
            .ok_or(ScriptError::NotSpawned { line, ship })
    }

    /// True once every line ran, every spawned ship is gone, and the boss
    /// came and went.
    pub fn has_finished(&self, driver: &dyn ScenarioDriver) -> bool {
        self.cursor >= self.script.lines.len()
            && self.spawned.values().all(|&id| !driver.is_present(id))
            && self.boss_id.is_some_and(|id| !driver.is_present(id))
    }

    /// Rewind to the first line and forget spawned ships and the boss.
    pub fn reset(&mut self) {
        self.cursor = 0;
        self.spawned.clear();
        self.boss_spawned = false;
        self.boss_id = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Log {
        next: u32,
        calls: Vec<String>,
        present: Vec<EntityId>,
    }

    impl ScenarioDriver for Log {
        fn spawn_ship(&mut self, kind: ShipKind, pos: Vec2) -> Result<EntityId, GameError> {
            self.next += 1;
            let id = EntityId(self.next);
            self.present.push(id);
            self.calls.push(format!("spawn {kind:?} {pos}"));
            Ok(id)
        }

        fn move_ship(&mut self, ship: EntityId, to: Vec2) -> Result<(), GameError> {
            self.calls.push(format!("move {ship} {to}"));
            Ok(())
        }

        fn fire_ship(&mut self, ship: EntityId) -> Result<(), GameError> {
            self.calls.push(format!("fire {ship}"));
            Ok(())
        }

        fn spawn_boss(&mut self, boss: &BossSpawn) -> Result<EntityId, GameError> {
            self.next += 1;
            let id = EntityId(self.next);
            self.present.push(id);
            self.calls.push(format!("boss {:?}", boss.kind));
            Ok(id)
        }

        fn is_present(&self, id: EntityId) -> bool {
            self.present.contains(&id)
        }
    }

    fn scenario(lines: &str) -> Scenario {
        let text = format!("1\n%%\n0\n%%\n1 scout 3 20\n%%\n%%\n{lines}");
        let script = Script::parse(&text).unwrap();
        let boss = BossSpawn {
            kind: ShipKind::Cruiser,
            x: 7.5,
            y: 20.0,
        };
        Scenario::new(script, boss, 10.0)
    }

    #[test]
    fn lines_run_only_when_due() {
        let mut scenario = scenario("0 spawn 1\n2 fire 1\n");
        let mut driver = Log::default();
        scenario.action(1.0, &mut driver).unwrap();
        assert_eq!(driver.calls.len(), 1);
        assert_eq!(scenario.cursor(), 1);
        scenario.action(2.0, &mut driver).unwrap();
        assert_eq!(driver.calls, vec!["spawn Scout [3, 20]", "fire #1"]);
    }

    #[test]
    fn bad_lines_are_skipped() {
        let mut scenario = scenario("0 fire 1\n0 spawn 9\n0 warp 1\n1 spawn 1\n1 spawn 1\n2 move 1 4 4\n");
        let mut driver = Log::default();
        scenario.action(5.0, &mut driver).unwrap();
        assert_eq!(driver.calls, vec!["spawn Scout [3, 20]", "move #1 [4, 4]"]);
        assert_eq!(scenario.cursor(), 6);
    }

    #[test]
    fn boss_spawns_exactly_once() {
        let mut scenario = scenario("0 spawn 1\n");
        let mut driver = Log::default();
        scenario.action(9.9, &mut driver).unwrap();
        assert!(scenario.boss_id().is_none());
        scenario.action(10.0, &mut driver).unwrap();
        scenario.action(11.0, &mut driver).unwrap();
        let bosses = driver.calls.iter().filter(|c| c.starts_with("boss")).count();
        assert_eq!(bosses, 1);
    }

    #[test]
    fn finishes_after_boss_leaves() {
        let mut scenario = scenario("0 spawn 1\n");
        let mut driver = Log::default();
        scenario.action(0.0, &mut driver).unwrap();
        driver.present.clear();
        assert!(!scenario.has_finished(&driver));

        scenario.action(10.0, &mut driver).unwrap();
        assert!(!scenario.has_finished(&driver));
        driver.present.clear();
        assert!(scenario.has_finished(&driver));
    }

    #[test]
    fn start_time_offsets_lines() {
        let text = "1\n%%\n5\n%%\n1 scout 3 20\n%%\n%%\n0 spawn 1\n";
        let boss = BossSpawn {
            kind: ShipKind::Cruiser,
            x: 7.5,
            y: 20.0,
        };
        let mut scenario = Scenario::new(Script::parse(text).unwrap(), boss, 10.0);
        let mut driver = Log::default();
        scenario.action(4.0, &mut driver).unwrap();
        assert!(driver.calls.is_empty());
        scenario.action(5.0, &mut driver).unwrap();
        assert_eq!(driver.calls.len(), 1);
    }
}
