use std::collections::VecDeque;
use std::time::Duration;

/// Summary of the intervals between consecutive pointer samples.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SamplingStats {
    pub samples: usize,
    pub average_interval_ns: f64,
    pub jitter_ns: f64,
    pub min_interval_ns: f64,
    pub max_interval_ns: f64,
    pub effective_rate_hz: f64,
}

/// Bounded window of sample intervals; the oldest interval drops out once full.
#[derive(Debug, Clone)]
pub struct IntervalRecorder {
    intervals: VecDeque<Duration>,
    max_samples: usize,
}

impl IntervalRecorder {
    pub fn new(max_samples: usize) -> Self {
        Self {
            intervals: VecDeque::with_capacity(max_samples),
            max_samples,
        }
    }

    pub fn record(&mut self, d: Duration) {
        if self.max_samples == 0 {
            return;
        }
        if self.intervals.len() >= self.max_samples {
            self.intervals.pop_front();
        }
        self.intervals.push_back(d);
    }

    pub fn clear(&mut self) {
        self.intervals.clear();
    }

    pub fn stats(&self) -> SamplingStats {
        if self.intervals.is_empty() {
            return SamplingStats::default();
        }
        let times: Vec<f64> = self
            .intervals
            .iter()
            .map(|d| d.as_nanos() as f64)
            .collect();
        let n = times.len() as f64;
        let avg = times.iter().sum::<f64>() / n;
        let var = times.iter().map(|x| (x - avg).powi(2)).sum::<f64>() / n;
        let min = times.iter().copied().fold(f64::INFINITY, f64::min);
        let max = times.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        SamplingStats {
            samples: times.len(),
            average_interval_ns: avg,
            jitter_ns: var.sqrt(),
            min_interval_ns: min,
            max_interval_ns: max,
            effective_rate_hz: if avg > 0.0 { 1e9 / avg } else { 0.0 },
        }
    }
}

impl Default for IntervalRecorder {
    fn default() -> Self {
        Self::new(1000)
    }
}
