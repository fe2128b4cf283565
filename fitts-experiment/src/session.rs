use fitts_core::{Condition, Participant, TrialRecord};
use rand::Rng;
use tracing::info;

use crate::config::ExperimentConfig;
use crate::schedule::Schedule;

/// What `prepare_next_trial` decided.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Sequencing {
    Next {
        condition: Condition,
        new_block: bool,
    },
    Complete,
}

/// Counters and records for one participant's session.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub participant: Participant,
    /// 0-based
    pub block_index: usize,
    /// 0-based
    pub trial_index: usize,
    pub current: Option<Condition>,
    pub errors: usize,
    pub records: Vec<TrialRecord>,
    pub schedule: Schedule,
}

impl SessionState {
    pub fn new(participant: Participant, schedule: Schedule) -> Self {
        Self {
            participant,
            block_index: 0,
            trial_index: 0,
            current: None,
            errors: 0,
            records: Vec::new(),
            schedule,
        }
    }

    /// Rolls over to the next block when the current one is used up, then
    /// picks the condition for the upcoming trial.
    pub fn prepare_next_trial<R: Rng>(
        &mut self,
        config: &ExperimentConfig,
        rng: &mut R,
    ) -> Sequencing {
        let mut new_block = false;
        if self.trial_index >= config.trials_per_block() {
            self.block_index += 1;
            if self.block_index >= config.blocks {
                self.current = None;
                return Sequencing::Complete;
            }
            self.schedule = Schedule::generate(config, rng);
            self.trial_index = 0;
            new_block = true;
            info!(block = self.block_number(), "block started with a fresh schedule");
        }

        match self.schedule.get(self.trial_index).copied() {
            Some(condition) => {
                self.current = Some(condition);
                Sequencing::Next {
                    condition,
                    new_block,
                }
            }
            None => {
                self.current = None;
                Sequencing::Complete
            }
        }
    }

    pub fn block_number(&self) -> usize {
        self.block_index + 1
    }

    pub fn trial_number(&self) -> usize {
        self.trial_index + 1
    }

    pub fn completed(&self) -> usize {
        self.records.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fitts_core::ParticipantEntry;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn participant() -> Participant {
        ParticipantEntry {
            participant_id: "P1".into(),
            device: "mouse".into(),
            consent: true,
        }
        .validate()
        .unwrap()
    }

    #[test]
    fn walks_every_block_then_completes() {
        let config = ExperimentConfig::default();
        let mut rng = StdRng::seed_from_u64(9);
        let mut session = SessionState::new(participant(), Schedule::generate(&config, &mut rng));

        let mut new_blocks = 0;
        let mut prepared = 0;
        loop {
            match session.prepare_next_trial(&config, &mut rng) {
                Sequencing::Next { new_block, .. } => {
                    prepared += 1;
                    new_blocks += usize::from(new_block);
                    session.trial_index += 1;
                }
                Sequencing::Complete => break,
            }
        }
        assert_eq!(prepared, 320);
        assert_eq!(new_blocks, 9);
        assert_eq!(session.block_index, 10);
        assert_eq!(session.current, None);
    }

    #[test]
    fn first_trial_comes_from_initial_schedule() {
        let config = ExperimentConfig::default();
        let mut rng = StdRng::seed_from_u64(3);
        let schedule = Schedule::generate(&config, &mut rng);
        let first = *schedule.get(0).unwrap();
        let mut session = SessionState::new(participant(), schedule);
        assert_eq!(
            session.prepare_next_trial(&config, &mut rng),
            Sequencing::Next {
                condition: first,
                new_block: false
            }
        );
        assert_eq!((session.block_number(), session.trial_number()), (1, 1));
    }
}
