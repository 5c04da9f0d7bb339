//! Game configuration schema.
//!
//! Every section has defaults matching the standard ruleset, so an empty YAML
//! document (or no file at all) yields a playable configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration loading errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Roster limits and vessel preset.
    #[serde(default)]
    pub game: GameConfig,
    /// Disqualification tolerance.
    #[serde(default)]
    pub elimination: EliminationConfig,
    /// Target band offsets and the auto-target threshold.
    #[serde(default)]
    pub range: RangeRules,
    /// Penalty categories.
    #[serde(default)]
    pub scoring: ScoringRules,
}

/// Vessel-size preset. Decides how far the lightest weight must fall before the
/// final round is played.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VesselSize {
    #[default]
    Large,
    Small,
}

impl VesselSize {
    /// Drop in grams below the lightest start weight that triggers the final round.
    pub fn final_round_drop(self) -> i32 {
        match self {
            VesselSize::Large => 445,
            VesselSize::Small => 278,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct GameConfig {
    #[serde(default)]
    pub vessel: VesselSize,
    #[serde(default = "default_min_players")]
    pub min_players: usize,
    #[serde(default = "default_max_players")]
    pub max_players: usize,
}

fn default_min_players() -> usize {
    2
}

fn default_max_players() -> usize {
    10
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            vessel: VesselSize::default(),
            min_players: default_min_players(),
            max_players: default_max_players(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct EliminationConfig {
    /// A player is out once |result - target| exceeds this many grams.
    #[serde(default = "default_tolerance")]
    pub tolerance: u32,
}

fn default_tolerance() -> u32 {
    50
}

impl Default for EliminationConfig {
    fn default() -> Self {
        Self {
            tolerance: default_tolerance(),
        }
    }
}

/// Offsets for the next-target band.
///
/// The band is `[highest - below_highest, lowest - below_lowest]`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RangeRules {
    #[serde(default = "default_below_lowest")]
    pub below_lowest: i32,
    #[serde(default = "default_below_highest")]
    pub below_highest: i32,
    /// Spread (highest - lowest) at which the target is assigned automatically.
    #[serde(default = "default_auto_target_spread")]
    pub auto_target_spread: i32,
}

fn default_below_lowest() -> i32 {
    10
}

fn default_below_highest() -> i32 {
    100
}

fn default_auto_target_spread() -> i32 {
    90
}

impl Default for RangeRules {
    fn default() -> Self {
        Self {
            below_lowest: default_below_lowest(),
            below_highest: default_below_highest(),
            auto_target_spread: default_auto_target_spread(),
        }
    }
}

/// Which categories award a penalty point, and how they combine.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ScoringRules {
    /// Schnapszahlen: raw weights that always cost a point in normal rounds.
    #[serde(default = "default_special_numbers")]
    pub special_numbers: Vec<i32>,
    /// If true, a player earns one point per qualifying category in a round.
    /// If false, a player earns at most one point per round.
    #[serde(default = "default_true")]
    pub stack_categories: bool,
    /// Apply the special-number category in the final round too.
    #[serde(default)]
    pub final_round_special_numbers: bool,
    /// Apply the duplicate-weight category in the final round too.
    #[serde(default)]
    pub final_round_duplicates: bool,
}

fn default_special_numbers() -> Vec<i32> {
    vec![444, 333, 222, 111, 99, 88, 77, 66, 55, 44, 33]
}

fn default_true() -> bool {
    true
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            special_numbers: default_special_numbers(),
            stack_categories: true,
            final_round_special_numbers: false,
            final_round_duplicates: false,
        }
    }
}

impl ScoringRules {
    pub fn is_special(&self, grams: i32) -> bool {
        self.special_numbers.contains(&grams)
    }
}

impl Config {
    /// Load configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Load configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        // serde_yaml rejects an empty document; treat it as "all defaults".
        if yaml.trim().is_empty() {
            return Ok(Config::default());
        }
        let config: Config = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Reject configurations the session cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: &str| Err(ConfigError::Invalid(msg.to_string()));

        // game
        if self.game.min_players < 1 {
            return invalid("game.min_players must be >= 1");
        }
        if self.game.max_players < self.game.min_players {
            return invalid("game.max_players must be >= game.min_players");
        }

        // elimination
        if self.elimination.tolerance < 1 {
            return invalid("elimination.tolerance must be >= 1");
        }

        // range
        if self.range.below_lowest < 0 {
            return invalid("range.below_lowest must be >= 0");
        }
        if self.range.below_highest < self.range.below_lowest {
            return invalid("range.below_highest must be >= range.below_lowest");
        }
        if self.range.auto_target_spread < 0 {
            return invalid("range.auto_target_spread must be >= 0");
        }

        // scoring
        if self.scoring.special_numbers.iter().any(|&n| n <= 0) {
            return invalid("scoring.special_numbers must all be > 0");
        }
        Ok(())
    }
}
