//! Runtime configuration loaded from TOML
//!
//! Everything tunable from outside the build lives here: the RNG seed that
//! makes a run reproducible, the candidate name list, and the colony the
//! runner places at startup.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{ColonyError, Result};
use crate::core::types::Tick;
use crate::event::ColonyPlacement;
use crate::organism::attributes::{Frequency, Preference};
use crate::world::GridPosition;

/// Configuration for one initial colony.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColonyConfig {
    pub name: String,
    /// Number of organisms placed at startup
    pub organism_count: u32,
    /// Starting cell, row then column
    pub row: usize,
    pub column: usize,
    /// Starting health of each organism
    pub health: f64,
    /// Nominal maximum age in ticks (jittered per organism)
    pub max_age: Tick,
    pub heat_preference: Preference,
    pub crowd_preference: Preference,
    pub reproductive_frequency: Frequency,
}

impl ColonyConfig {
    /// Converts this config into a validated placement request at `tick`.
    pub fn to_placement(&self, tick: Tick) -> Result<ColonyPlacement> {
        ColonyPlacement::new(
            self.name.clone(),
            self.organism_count,
            GridPosition::new(self.row, self.column)?,
            self.health,
            self.max_age,
            self.heat_preference,
            self.crowd_preference,
            self.reproductive_frequency,
            tick,
        )
    }
}

impl Default for ColonyConfig {
    fn default() -> Self {
        Self {
            name: "amoeba".to_string(),
            organism_count: 5,
            row: 4,
            column: 3,
            health: 100.0,
            max_age: 18_000,
            heat_preference: Preference::None,
            crowd_preference: Preference::Like,
            reproductive_frequency: Frequency::Frequent,
        }
    }
}

/// Top-level configuration for a simulation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Seed for all simulation RNG streams
    pub seed: u64,
    /// Candidate organism names; an empty list falls back to numeric names
    pub organism_names: Vec<String>,
    pub colony: ColonyConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            organism_names: vec![
                "Ada".to_string(),
                "Bix".to_string(),
                "Cleo".to_string(),
                "Dot".to_string(),
                "Eli".to_string(),
                "Fern".to_string(),
                "Gus".to_string(),
                "Hazel".to_string(),
            ],
            colony: ColonyConfig::default(),
        }
    }
}

impl GameConfig {
    /// Loads and validates a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: GameConfig = toml::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the values for internal consistency.
    pub fn validate(&self) -> Result<()> {
        if self.colony.name.trim().is_empty() {
            return Err(ColonyError::Config("colony name must not be empty".into()));
        }
        if self.colony.organism_count < 2 {
            return Err(ColonyError::Config(format!(
                "colony organism_count must be at least 2, got {}",
                self.colony.organism_count
            )));
        }
        if self.colony.health <= 0.0 {
            return Err(ColonyError::Config(format!(
                "colony health must be positive, got {}",
                self.colony.health
            )));
        }
        if self.colony.max_age == 0 {
            return Err(ColonyError::Config("colony max_age must be positive".into()));
        }
        GridPosition::new(self.colony.row, self.colony.column)?;
        Ok(())
    }
}
