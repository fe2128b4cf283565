use fitts_core::Condition;
use rand::Rng;

use crate::config::ExperimentConfig;

/// Every (diameter, distance, direction) combination, in nested config order.
pub fn condition_universe(config: &ExperimentConfig) -> Vec<Condition> {
    let mut combos = Vec::with_capacity(config.trials_per_block());
    for &diameter in &config.diameters {
        for &distance in &config.distances {
            for &direction in &config.directions {
                combos.push(Condition::new(diameter, distance, direction));
            }
        }
    }
    combos
}

/// In-place Fisher-Yates shuffle.
pub fn shuffle<T, R: Rng>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.random_range(0..=i);
        items.swap(i, j);
    }
}

/// The trial order for one block: each combination exactly once.
#[derive(Debug, Clone, PartialEq)]
pub struct Schedule {
    conditions: Vec<Condition>,
}

impl Schedule {
    pub fn generate<R: Rng>(config: &ExperimentConfig, rng: &mut R) -> Self {
        let mut conditions = condition_universe(config);
        shuffle(&mut conditions, rng);
        Self { conditions }
    }

    pub fn get(&self, index: usize) -> Option<&Condition> {
        self.conditions.get(index)
    }

    pub fn as_slice(&self) -> &[Condition] {
        &self.conditions
    }
}
