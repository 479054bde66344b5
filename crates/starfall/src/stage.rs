//! Stage descriptors: one level's background, scenario script and boss.

use serde::{Deserialize, Serialize};
use starfall_engine::AssetSource;

use crate::config::Rules;
use crate::error::GameError;
use crate::scenario::{BossSpawn, Scenario, Script};

/// JSON description of a stage, as listed in the asset manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageDescriptor {
    pub number: u32,
    pub name: String,
    pub background: String,
    /// Asset path of the scenario script.
    pub scenario: String,
    pub boss: BossSpawn,
    /// Seconds until the boss appears. Estimated from the script when absent.
    #[serde(default)]
    pub duration: Option<f32>,
}

impl StageDescriptor {
    pub fn from_json(json: &str) -> Result<Self, GameError> {
        serde_json::from_str(json).map_err(|source| GameError::Config {
            what: "stage descriptor".to_string(),
            source,
        })
    }
}

#[derive(Debug, Clone)]
pub struct Stage {
    pub descriptor: StageDescriptor,
    pub scenario: Scenario,
}

impl Stage {
    /// Load the descriptor at `path` and the scenario it names.
    pub fn load(path: &str, assets: &dyn AssetSource, rules: &Rules) -> Result<Self, GameError> {
        let descriptor = StageDescriptor::from_json(&assets.read_text(path)?)?;
        let script_text = assets.read_text(&descriptor.scenario)?;
        let stage = Self::build(descriptor, &script_text, rules)?;
        log::info!(
            "loaded stage {} \"{}\" ({} lines, boss at {:.1}s)",
            stage.descriptor.number,
            stage.descriptor.name,
            stage.scenario.script().lines.len(),
            stage.scenario.duration()
        );
        Ok(stage)
    }

    pub fn build(descriptor: StageDescriptor, script_text: &str, rules: &Rules) -> Result<Self, GameError> {
        if !descriptor.boss.kind.is_boss() {
            return Err(GameError::InvalidStage(format!(
                "stage {}: {:?} is not a boss",
                descriptor.number, descriptor.boss.kind
            )));
        }
        let script = Script::parse(script_text)?;
        let duration = descriptor
            .duration
            .unwrap_or_else(|| script.last_time() + rules.boss_delay);
        let scenario = Scenario::new(script, descriptor.boss, duration);
        Ok(Self { descriptor, scenario })
    }

    pub fn number(&self) -> u32 {
        self.descriptor.number
    }

    pub fn background(&self) -> &str {
        &self.descriptor.background
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::ship::ShipKind;
    use starfall_engine::{AssetError, MemoryAssets};

    const DESCRIPTOR: &str = r#"{
        "number": 1,
        "name": "Outer Rim",
        "background": "space",
        "scenario": "stages/stage1.scn",
        "boss": { "kind": "cruiser", "x": 7.5, "y": 21.0 }
    }"#;

    const SCRIPT: &str = "%%\n1\n%%\n0\n%%\n1 scout 3 24\n%%\n%%\n0 spawn 1\n4 fire 1\n";

    #[test]
    fn loads_descriptor_and_script() {
        let assets = MemoryAssets::new()
            .with("stages/stage1.json", DESCRIPTOR)
            .with("stages/stage1.scn", SCRIPT);
        let stage = Stage::load("stages/stage1.json", &assets, &Rules::default()).unwrap();
        assert_eq!(stage.number(), 1);
        assert_eq!(stage.background(), "space");
        assert_eq!(stage.descriptor.boss.kind, ShipKind::Cruiser);
        // last line at 4s plus the default boss delay
        assert_eq!(stage.scenario.duration(), 9.0);
    }

    #[test]
    fn explicit_duration_wins() {
        let mut descriptor = StageDescriptor::from_json(DESCRIPTOR).unwrap();
        descriptor.duration = Some(30.0);
        let stage = Stage::build(descriptor, SCRIPT, &Rules::default()).unwrap();
        assert_eq!(stage.scenario.duration(), 30.0);
    }

    #[test]
    fn missing_script_is_not_found() {
        let assets = MemoryAssets::new().with("stages/stage1.json", DESCRIPTOR);
        let err = Stage::load("stages/stage1.json", &assets, &Rules::default()).unwrap_err();
        assert!(matches!(&err, GameError::Asset(AssetError::NotFound(path)) if path == "stages/stage1.scn"));
        assert!(!err.is_fatal());
    }

    #[test]
    fn non_boss_is_rejected() {
        let json = DESCRIPTOR.replace("cruiser", "scout");
        let descriptor = StageDescriptor::from_json(&json).unwrap();
        assert!(Stage::build(descriptor, SCRIPT, &Rules::default()).is_err());
    }
}
