use serde::{Deserialize, Serialize};
use std::fmt;

use crate::geometry::shannon_id;

/// Side of the home position the target appears on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    /// Horizontal sign applied to the condition distance.
    pub fn sign(&self) -> f64 {
        match self {
            Direction::Left => -1.0,
            Direction::Right => 1.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One (diameter, distance, direction) triple; the geometry of a single trial.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    #[serde(rename = "diameter_px")]
    pub diameter: f64,
    #[serde(rename = "distance_px")]
    pub distance: f64,
    pub direction: Direction,
}

impl Condition {
    pub fn new(diameter: f64, distance: f64, direction: Direction) -> Self {
        Self {
            diameter,
            distance,
            direction,
        }
    }

    pub fn radius(&self) -> f64 {
        self.diameter / 2.0
    }

    /// Signed horizontal offset of the target from the lab center.
    pub fn offset_x(&self) -> f64 {
        self.direction.sign() * self.distance
    }

    pub fn index_of_difficulty(&self) -> f64 {
        shannon_id(self.distance, self.diameter)
    }
}
