use serde::{Deserialize, Serialize};
use std::fmt;

use crate::participant::Device;
use crate::record::TrialRecord;

/// Aggregates reported at the end of a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub participant_id: String,
    pub device: Device,
    pub trials: usize,
    pub hits: usize,
    pub errors: usize,
    pub mean_movement_time_ms: f64,
    pub error_rate_pct: f64,
    pub mean_path_length_px: f64,
}

impl SessionSummary {
    /// Means over an empty record list are reported as zero.
    pub fn from_records(participant_id: &str, device: Device, records: &[TrialRecord]) -> Self {
        let trials = records.len();
        let hits = records.iter().filter(|r| r.hit).count();
        let mean = |f: fn(&TrialRecord) -> f64| {
            if trials == 0 {
                0.0
            } else {
                records.iter().map(f).sum::<f64>() / trials as f64
            }
        };
        let error_rate_pct = if trials == 0 {
            0.0
        } else {
            100.0 * (1.0 - hits as f64 / trials as f64)
        };

        Self {
            participant_id: participant_id.to_string(),
            device,
            trials,
            hits,
            errors: trials - hits,
            mean_movement_time_ms: mean(|r| r.movement_time_ms),
            error_rate_pct,
            mean_path_length_px: mean(|r| r.path_length_px),
        }
    }
}

impl fmt::Display for SessionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Participant: {}", self.participant_id)?;
        writeln!(f, "Device:      {}", self.device)?;
        writeln!(f, "Trials:      {}", self.trials)?;
        writeln!(f, "Mean MT:     {:.1} ms", self.mean_movement_time_ms)?;
        write!(f, "Error rate:  {:.1}%", self.error_rate_pct)
    }
}
