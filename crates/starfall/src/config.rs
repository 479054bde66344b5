//! Game settings and balance constants.

use serde::{Deserialize, Serialize};
use starfall_engine::GameConfig;

use crate::error::GameError;

/// Score for destroying-class hits (shot on NPC). Rams award half.
pub const HIT_SCORE: u32 = 100;

/// Damage both sides take when the player rams an NPC.
pub const RAM_DAMAGE: i32 = 1;

/// Gameplay rules that are safe to tune from a config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    /// Lives the user starts with.
    pub starting_lives: u32,
    /// How far (meters) an entity may leave the world before it is removed.
    pub edge_margin: f32,
    /// Length of the player's loop maneuver in seconds.
    pub loop_duration: f32,
    /// Top of the player's flight area as a fraction of world height.
    pub player_ceiling: f32,
    /// Seed for bonus drops.
    pub bonus_seed: u64,
    /// Seconds after the last script line before the boss shows up,
    /// when a stage does not give an explicit duration.
    pub boss_delay: f32,
    /// Drift speed of bonuses (meters/s, downward).
    pub bonus_speed: f32,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            starting_lives: 3,
            edge_margin: 2.0,
            loop_duration: 1.2,
            player_ceiling: 0.45,
            bonus_seed: 0x5EED,
            boss_delay: 5.0,
            bonus_speed: 2.5,
        }
    }
}

/// Everything read from `config.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub engine: GameConfig,
    pub rules: Rules,
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self, GameError> {
        let settings: Self = serde_json::from_str(json).map_err(|source| GameError::Config {
            what: "settings".to_string(),
            source,
        })?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), GameError> {
        let engine = &self.engine;
        let positive = |value: f32| value.is_finite() && value > 0.0;
        let problem = if !positive(engine.fixed_dt) {
            Some(format!("fixed_dt must be a positive number of seconds, got {}", engine.fixed_dt))
        } else if !positive(engine.pixels_per_meter) {
            Some(format!("pixels_per_meter must be positive, got {}", engine.pixels_per_meter))
        } else {
            None
        };
        match problem {
            Some(message) => Err(GameError::Config {
                what: "settings".to_string(),
                source: serde::de::Error::custom(message),
            }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_settings_keep_defaults() {
        let settings = Settings::from_json(r#"{ "rules": { "starting_lives": 5 } }"#).unwrap();
        assert_eq!(settings.rules.starting_lives, 5);
        assert_eq!(settings.rules.edge_margin, 2.0);
        assert_eq!(settings.engine, GameConfig::default());
    }

    #[test]
    fn unusable_fixed_step_is_rejected() {
        for dt in ["-0.016", "0.0"] {
            let json = format!(r#"{{ "engine": {{ "fixed_dt": {dt} }} }}"#);
            let err = Settings::from_json(&json).unwrap_err();
            assert!(matches!(&err, GameError::Config { .. }));
            assert!(err.to_string().contains("fixed_dt"), "{err}");
        }
    }

    #[test]
    fn malformed_settings_are_config_errors() {
        let err = Settings::from_json("[").unwrap_err();
        assert!(matches!(err, GameError::Config { .. }));
    }
}
