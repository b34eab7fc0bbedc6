//! Unit configuration
//!
//! Единая структура вместо длинного списка позиционных параметров:
//! все поля именованные, у всех есть defaults, `validate()` проверяет
//! инварианты до того как unit попадёт в мир.
//!
//! Unit definitions хранятся в RON (`from_ron_str`).

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::unit::{Facing, FrameDurations};

/// Errors raised while building a unit from its config.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("hp must be positive, got {0}")]
    InvalidHp(f32),

    #[error("kb_limit must be at least 1")]
    ZeroKnockbackLimit,

    #[error("kb_threshold must be positive, got {0}")]
    InvalidKnockbackThreshold(f32),

    #[error("{name} must not be negative, got {value}")]
    NegativeStat { name: &'static str, value: f32 },

    #[error("unit size must be positive, got {width}x{height}")]
    InvalidSize { width: f32, height: f32 },

    #[error("status effect `{effect}`: chance must be within [0, 1], got {chance}")]
    InvalidChance { effect: String, chance: f32 },

    #[error("status effect `{effect}`: duration must be finite and non-negative, got {duration_secs}")]
    InvalidDuration { effect: String, duration_secs: f32 },

    #[error("failed to parse unit config: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

/// Default parameters of one status effect a unit inflicts on hit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusEffectSpec {
    /// Seconds the effect lasts on the target
    pub duration_secs: f32,
    /// Probability of applying the effect per hit
    pub chance: f32,
}

impl Default for StatusEffectSpec {
    fn default() -> Self {
        Self {
            duration_secs: 3.0,
            chance: 0.3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatEntityConfig {
    // === Spawn placement ===
    pub x: f32,
    /// Ground line; the unit's top edge rests at `y - height + delta_y`
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub delta_y: f32,
    /// Advance direction; `Left` = toward −x
    pub facing: Facing,

    // === Combat stats ===
    pub hp: f32,
    pub atk: f32,
    /// World units per `move_step`
    pub speed: f32,
    pub attack_range: f32,
    pub is_aoe: bool,
    /// Damage type of this unit's hits (`kinetic`, `physical`, `elemental`, `chemical`)
    pub attack_type: String,
    pub attack_interval_ms: u64,

    // === Knockback ===
    /// Max knockbacks over the unit's lifetime
    pub kb_limit: u32,
    /// HP lost per knockback trigger; `None` → `hp / kb_limit`
    pub kb_threshold: Option<f32>,
    /// Displacement magnitude, pushed against `facing`
    pub kb_distance: f32,
    pub kb_duration_ms: u64,

    pub frame_durations: FrameDurations,

    // === Tags & modifiers ===
    /// Own tags (what this unit *is*)
    pub attributes: BTreeSet<String>,
    /// Tags this unit's attacks affect (empty = everything)
    pub target_attributes: BTreeSet<String>,
    /// target attribute → status effects blocked against it
    pub immunities: BTreeMap<String, BTreeSet<String>>,
    /// target attribute → damage multiplier
    pub boosts: BTreeMap<String, f32>,
    pub status_effects_config: BTreeMap<String, StatusEffectSpec>,
}

impl Default for CombatEntityConfig {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: 50.0,
            height: 50.0,
            delta_y: 0.0,
            facing: Facing::Left,
            hp: 100.0,
            atk: 10.0,
            speed: 1.0,
            attack_range: 50.0,
            is_aoe: false,
            attack_type: "kinetic".to_string(),
            attack_interval_ms: 1000,
            kb_limit: 1,
            kb_threshold: None,
            kb_distance: 50.0,
            kb_duration_ms: 300,
            frame_durations: FrameDurations::default(),
            attributes: BTreeSet::new(),
            target_attributes: BTreeSet::new(),
            immunities: BTreeMap::new(),
            boosts: BTreeMap::new(),
            status_effects_config: BTreeMap::new(),
        }
    }
}

impl CombatEntityConfig {
    /// Parse and validate a RON unit definition.
    pub fn from_ron_str(source: &str) -> Result<Self, ConfigError> {
        let config: CombatEntityConfig = ron::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.hp > 0.0) {
            return Err(ConfigError::InvalidHp(self.hp));
        }
        if self.kb_limit == 0 {
            return Err(ConfigError::ZeroKnockbackLimit);
        }
        let threshold = self.effective_kb_threshold();
        if !(threshold > 0.0) {
            return Err(ConfigError::InvalidKnockbackThreshold(threshold));
        }
        if !(self.width > 0.0 && self.height > 0.0) {
            return Err(ConfigError::InvalidSize {
                width: self.width,
                height: self.height,
            });
        }

        for (name, value) in [
            ("atk", self.atk),
            ("speed", self.speed),
            ("attack_range", self.attack_range),
        ] {
            if value < 0.0 {
                return Err(ConfigError::NegativeStat { name, value });
            }
        }

        for (effect, spec) in &self.status_effects_config {
            if !(0.0..=1.0).contains(&spec.chance) {
                return Err(ConfigError::InvalidChance {
                    effect: effect.clone(),
                    chance: spec.chance,
                });
            }
            if !spec.duration_secs.is_finite() || spec.duration_secs < 0.0 {
                return Err(ConfigError::InvalidDuration {
                    effect: effect.clone(),
                    duration_secs: spec.duration_secs,
                });
            }
        }

        Ok(())
    }

    pub fn effective_kb_threshold(&self) -> f32 {
        self.kb_threshold
            .unwrap_or(self.hp / self.kb_limit.max(1) as f32)
    }

    /// Resting top-edge y coordinate (`y0`).
    pub fn baseline_y(&self) -> f32 {
        self.y - self.height + self.delta_y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = CombatEntityConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.effective_kb_threshold(), 100.0);
    }

    #[test]
    fn test_threshold_derived_from_limit() {
        let config = CombatEntityConfig {
            hp: 100.0,
            kb_limit: 4,
            ..Default::default()
        };
        assert_eq!(config.effective_kb_threshold(), 25.0);
    }

    #[test]
    fn test_baseline_y() {
        let config = CombatEntityConfig {
            y: 400.0,
            height: 50.0,
            delta_y: 10.0,
            ..Default::default()
        };
        assert_eq!(config.baseline_y(), 360.0);
    }

    #[test]
    fn test_validation_errors() {
        let zero_hp = CombatEntityConfig {
            hp: 0.0,
            ..Default::default()
        };
        assert!(matches!(zero_hp.validate(), Err(ConfigError::InvalidHp(_))));

        let no_kb = CombatEntityConfig {
            kb_limit: 0,
            ..Default::default()
        };
        assert!(matches!(no_kb.validate(), Err(ConfigError::ZeroKnockbackLimit)));

        let bad_threshold = CombatEntityConfig {
            kb_threshold: Some(-1.0),
            ..Default::default()
        };
        assert!(matches!(
            bad_threshold.validate(),
            Err(ConfigError::InvalidKnockbackThreshold(_))
        ));

        let negative_speed = CombatEntityConfig {
            speed: -2.0,
            ..Default::default()
        };
        assert!(matches!(
            negative_speed.validate(),
            Err(ConfigError::NegativeStat { name: "speed", .. })
        ));

        let mut bad_chance = CombatEntityConfig::default();
        bad_chance.status_effects_config.insert(
            "Burn".to_string(),
            StatusEffectSpec {
                duration_secs: 3.0,
                chance: 1.5,
            },
        );
        assert!(matches!(
            bad_chance.validate(),
            Err(ConfigError::InvalidChance { .. })
        ));

        for duration_secs in [-1.0, f32::INFINITY, f32::NAN] {
            let mut bad_duration = CombatEntityConfig::default();
            bad_duration.status_effects_config.insert(
                "Slow".to_string(),
                StatusEffectSpec {
                    duration_secs,
                    chance: 1.0,
                },
            );
            assert!(
                matches!(
                    bad_duration.validate(),
                    Err(ConfigError::InvalidDuration { .. })
                ),
                "duration {} accepted",
                duration_secs
            );
        }
    }

    #[test]
    fn test_from_ron_str() {
        let source = r#"(
            x: 800.0,
            y: 400.0,
            hp: 120.0,
            atk: 15.0,
            kb_limit: 3,
            attributes: ["fire_immune"],
            immunities: { "fire_immune": ["Burn"] },
            status_effects_config: {
                "Slow": (duration_secs: 2.0, chance: 0.5),
            },
        )"#;

        let config = CombatEntityConfig::from_ron_str(source).expect("valid config");
        assert_eq!(config.hp, 120.0);
        assert_eq!(config.kb_limit, 3);
        assert_eq!(config.effective_kb_threshold(), 40.0);
        assert!(config.attributes.contains("fire_immune"));
        assert!(config.immunities["fire_immune"].contains("Burn"));
        assert_eq!(config.status_effects_config["Slow"].chance, 0.5);
        // незаданные поля берутся из defaults
        assert_eq!(config.width, 50.0);
        assert_eq!(config.kb_duration_ms, 300);
    }

    #[test]
    fn test_from_ron_str_rejects_garbage_and_invalid() {
        assert!(matches!(
            CombatEntityConfig::from_ron_str("(hp: )"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            CombatEntityConfig::from_ron_str("(hp: -5.0)"),
            Err(ConfigError::InvalidHp(_))
        ));
    }
}
