//! Configuration types for the simulation.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Board dimensions and population size
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Grid height, including the wall border
    pub n_rows: usize,
    /// Grid width, including the wall border
    pub n_cols: usize,
    /// Number of founders the starting-state generator is expected to place
    pub starting_organism_count: usize,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            n_rows: 20,
            n_cols: 15,
            starting_organism_count: 10,
        }
    }
}

/// Rates and amounts driving actor transitions
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DynamicsConfig {
    /// Chance per epoch that an empty ground cell sprouts food
    pub food_chance: f64,
    /// Epochs a sprouted food item lasts before spoiling
    pub food_lifespan: u32,
    /// Health gained from eating one food item
    pub food_value: i32,
    /// Epochs between laying an egg and hatching
    pub egg_lifespan: u32,
    /// Chance that two meeting organisms ignore each other
    pub ignore_chance: f64,
    /// Chance that two meeting organisms mate, given they did not ignore each other
    pub mate_chance: f64,
}

impl Default for DynamicsConfig {
    fn default() -> Self {
        Self {
            food_chance: 0.01,
            food_lifespan: 10,
            food_value: 5,
            egg_lifespan: 5,
            ignore_chance: 0.5,
            mate_chance: 0.3,
        }
    }
}

/// Offspring mutation parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MutationConfig {
    /// Probability that an inherited gene mutates
    pub mutation_chance: f64,
    /// Largest absolute change applied to a mutated modifier
    pub max_delta: i32,
}

impl Default for MutationConfig {
    fn default() -> Self {
        Self {
            mutation_chance: 0.05,
            max_delta: 2,
        }
    }
}

/// Complete simulation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Random seed for reproducibility
    pub seed: u64,
    /// Number of epochs to run
    pub num_epochs: u64,
    /// Epochs between census log lines
    pub census_interval: u64,
    pub board: BoardConfig,
    pub dynamics: DynamicsConfig,
    pub mutation: MutationConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            num_epochs: 100,
            census_interval: 10,
            board: BoardConfig::default(),
            dynamics: DynamicsConfig::default(),
            mutation: MutationConfig::default(),
        }
    }
}

impl SimulationConfig {
    /// Load a JSON configuration file; absent fields take their defaults
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let config: SimulationConfig = serde_json::from_str(&raw)?;
        config.validate()?;
        debug!(path = %path.display(), "Loaded simulation config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let probabilities = [
            ("food_chance", self.dynamics.food_chance),
            ("ignore_chance", self.dynamics.ignore_chance),
            ("mate_chance", self.dynamics.mate_chance),
            ("mutation_chance", self.mutation.mutation_chance),
        ];
        for (name, value) in probabilities {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::Config(format!(
                    "{} must lie in [0, 1], got {}",
                    name, value
                )));
            }
        }

        if self.dynamics.ignore_chance + self.dynamics.mate_chance > 1.0 {
            return Err(Error::Config(
                "ignore_chance + mate_chance must not exceed 1".to_string(),
            ));
        }

        if self.board.n_rows < 3 || self.board.n_cols < 3 {
            return Err(Error::Config(format!(
                "board must be at least 3x3 to hold a wall border, got {}x{}",
                self.board.n_rows, self.board.n_cols
            )));
        }

        if self.mutation.max_delta < 1 {
            return Err(Error::Config("max_delta must be at least 1".to_string()));
        }

        Ok(())
    }
}
