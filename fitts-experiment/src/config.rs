use fitts_core::Direction;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

pub const DIAMETERS: [f64; 4] = [20.0, 30.0, 40.0, 60.0];
pub const DISTANCES: [f64; 4] = [100.0, 200.0, 300.0, 400.0];
pub const DIRECTIONS: [Direction; 2] = [Direction::Left, Direction::Right];
pub const BLOCKS: usize = 10;
pub const HOME_DIAMETER: f64 = 40.0;
pub const BANNER_RESET_MS: u64 = 600;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("no target diameters configured")]
    NoDiameters,
    #[error("no target distances configured")]
    NoDistances,
    #[error("no target directions configured")]
    NoDirections,
    #[error("block count must be at least 1")]
    NoBlocks,
    #[error("target diameter must be positive, got {0}")]
    NonPositiveDiameter(f64),
    #[error("target distance must be positive, got {0}")]
    NonPositiveDistance(f64),
    #[error("home diameter must be positive, got {0}")]
    NonPositiveHome(f64),
}

/// Condition universe and session length. `Default` is the reference
/// configuration: 4 diameters x 4 distances x 2 directions, 10 blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentConfig {
    pub diameters: Vec<f64>,
    pub distances: Vec<f64>,
    pub directions: Vec<Direction>,
    pub blocks: usize,
    pub home_diameter_px: f64,
    pub banner_reset_ms: u64,
    /// Pointer-sample intervals kept for per-trial sampling statistics.
    pub max_pointer_samples: usize,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            diameters: DIAMETERS.to_vec(),
            distances: DISTANCES.to_vec(),
            directions: DIRECTIONS.to_vec(),
            blocks: BLOCKS,
            home_diameter_px: HOME_DIAMETER,
            banner_reset_ms: BANNER_RESET_MS,
            max_pointer_samples: 1000,
        }
    }
}

impl ExperimentConfig {
    /// One trial per (diameter, distance, direction) combination.
    pub fn trials_per_block(&self) -> usize {
        self.diameters.len() * self.distances.len() * self.directions.len()
    }

    pub fn total_trials(&self) -> usize {
        self.blocks * self.trials_per_block()
    }

    pub fn banner_reset(&self) -> Duration {
        Duration::from_millis(self.banner_reset_ms)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.diameters.is_empty() {
            return Err(ConfigError::NoDiameters);
        }
        if self.distances.is_empty() {
            return Err(ConfigError::NoDistances);
        }
        if self.directions.is_empty() {
            return Err(ConfigError::NoDirections);
        }
        if self.blocks == 0 {
            return Err(ConfigError::NoBlocks);
        }
        // `!(x > 0.0)` also rejects NaN.
        if let Some(&d) = self.diameters.iter().find(|d| !(**d > 0.0)) {
            return Err(ConfigError::NonPositiveDiameter(d));
        }
        if let Some(&d) = self.distances.iter().find(|d| !(**d > 0.0)) {
            return Err(ConfigError::NonPositiveDistance(d));
        }
        if !(self.home_diameter_px > 0.0) {
            return Err(ConfigError::NonPositiveHome(self.home_diameter_px));
        }
        Ok(())
    }
}
