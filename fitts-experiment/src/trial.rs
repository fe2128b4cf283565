use fitts_core::{Condition, PathAccumulator, Point};

use crate::layout::LabLayout;

/// The three triggers the state machine reacts to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerInput {
    HomePressed,
    Moved(Point),
    Released { at: Point, on_home: bool },
}

impl PointerInput {
    /// A release at `at`. Releases only matter mid-trial, when home is held
    /// and drawn shrunken, so they are classified against the pressed circle.
    pub fn released(at: Point, layout: &LabLayout) -> Self {
        PointerInput::Released {
            at,
            on_home: layout.contains_pressed_home(at),
        }
    }
}

/// Lifecycle of the current trial. `Finished` is entered once the last block
/// is done and never left.
#[derive(Debug, Clone, PartialEq)]
pub enum TrialPhase {
    Ready,
    Running(ActiveTrial),
    Finished,
}

impl TrialPhase {
    pub fn is_ready(&self) -> bool {
        matches!(self, TrialPhase::Ready)
    }

    pub fn is_running(&self) -> bool {
        matches!(self, TrialPhase::Running(_))
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, TrialPhase::Finished)
    }
}

/// Transient state of a trial between the home press and the scoring release.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveTrial {
    pub condition: Condition,
    /// Where the target was placed; the drawn center may differ.
    pub target: Point,
    pub started_at: u64,
    pub path: PathAccumulator,
    pub last_sample_at: Option<u64>,
}

impl ActiveTrial {
    pub fn new(condition: Condition, target: Point, started_at: u64) -> Self {
        Self {
            condition,
            target,
            started_at,
            path: PathAccumulator::new(),
            last_sample_at: None,
        }
    }

    /// Milliseconds between the home press and `now`.
    pub fn movement_time_ms(&self, now: u64) -> f64 {
        now.saturating_sub(self.started_at) as f64 / 1_000_000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fitts_core::Direction;

    #[test]
    fn release_is_classified_against_home() {
        let layout = LabLayout::new(400.0, 300.0, 40.0);
        assert_eq!(
            PointerInput::released(Point::new(205.0, 150.0), &layout),
            PointerInput::Released {
                at: Point::new(205.0, 150.0),
                on_home: true
            }
        );
        assert!(matches!(
            PointerInput::released(Point::new(10.0, 10.0), &layout),
            PointerInput::Released { on_home: false, .. }
        ));
        assert!(matches!(
            PointerInput::released(Point::new(219.0, 150.0), &layout),
            PointerInput::Released { on_home: false, .. }
        ));
    }

    #[test]
    fn movement_time_in_ms() {
        let trial = ActiveTrial::new(
            Condition::new(20.0, 100.0, Direction::Left),
            Point::default(),
            1_000_000,
        );
        assert_eq!(trial.movement_time_ms(251_500_000), 250.5);
        assert_eq!(trial.movement_time_ms(0), 0.0);
    }
}
