use super::config::{ConfigError, ExperimentConfig};
use super::layout::LabLayout;
use super::schedule::Schedule;
use super::session::{SessionState, Sequencing};
use super::status::{DisplayStatus, feedback_banner, progress_banner};
use super::trial::{ActiveTrial, PointerInput, TrialPhase};
use fitts_core::{
    Condition, Participant, Point, SessionSummary, TargetSurface, TrialRecord, within_circle,
};
use fitts_timing::{IntervalRecorder, Timer};
use rand::Rng;
use std::time::Duration;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq)]
pub enum ExperimentEvent {
    TrialStarted {
        block: usize,
        trial: usize,
        target: Point,
        diameter: f64,
    },
    TrialScored(TrialRecord),
    BlockStarted {
        block: usize,
    },
    TrialReady {
        block: usize,
        trial: usize,
        condition: Condition,
    },
    SessionComplete(SessionSummary),
}

/// Drives one participant through every block of the experiment.
///
/// All state lives here and only changes inside [`handle_input`](Self::handle_input),
/// so the machine can be exercised without any window.
pub struct ExperimentStateMachine<T, R>
where
    T: Timer<Timestamp = u64>,
    R: Rng,
{
    pub timer: T,
    pub rng: R,
    pub config: ExperimentConfig,
    layout: LabLayout,
    session: SessionState,
    phase: TrialPhase,
    banner: String,
    sampling: IntervalRecorder,
    summary: Option<SessionSummary>,
}

impl<T, R> ExperimentStateMachine<T, R>
where
    T: Timer<Timestamp = u64>,
    R: Rng,
{
    /// Builds the first block's schedule and leaves the machine `Ready` at
    /// block 1, trial 1.
    pub fn new(
        config: ExperimentConfig,
        participant: Participant,
        layout: LabLayout,
        timer: T,
        mut rng: R,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let schedule = Schedule::generate(&config, &mut rng);
        let sampling = IntervalRecorder::new(config.max_pointer_samples);
        info!(
            participant = participant.id(),
            device = %participant.device(),
            blocks = config.blocks,
            trials_per_block = config.trials_per_block(),
            "session started"
        );

        let mut machine = Self {
            timer,
            rng,
            config,
            layout,
            session: SessionState::new(participant, schedule),
            phase: TrialPhase::Ready,
            banner: String::new(),
            sampling,
            summary: None,
        };
        let mut events = Vec::new();
        machine.prepare_next_trial(&mut events);
        machine.reset_banner();
        Ok(machine)
    }

    pub fn handle_input<S: TargetSurface>(
        &mut self,
        input: PointerInput,
        surface: &S,
    ) -> Vec<ExperimentEvent> {
        let mut events = Vec::new();
        match input {
            PointerInput::HomePressed => self.start_trial(&mut events),
            PointerInput::Moved(p) => self.track(p),
            PointerInput::Released { at, on_home } => {
                // Releasing on home (e.g. right after pressing it) keeps the trial alive.
                if !on_home {
                    self.score(at, surface, &mut events);
                }
            }
        }
        events
    }

    fn start_trial(&mut self, events: &mut Vec<ExperimentEvent>) {
        if !self.phase.is_ready() {
            return;
        }
        let Some(condition) = self.session.current else {
            return;
        };

        let target = self.layout.target_center(&condition);
        let now = self.timer.now();
        self.sampling.clear();
        self.phase = TrialPhase::Running(ActiveTrial::new(condition, target, now));

        debug!(x = target.x, y = target.y, diameter = condition.diameter, "target placed");
        info!(
            block = self.session.block_number(),
            trial = self.session.trial_number(),
            "trial started at {} ns",
            now
        );
        events.push(ExperimentEvent::TrialStarted {
            block: self.session.block_number(),
            trial: self.session.trial_number(),
            target,
            diameter: condition.diameter,
        });
    }

    fn track(&mut self, p: Point) {
        let TrialPhase::Running(trial) = &mut self.phase else {
            return;
        };
        let now = self.timer.now();
        if let Some(prev) = trial.last_sample_at {
            self.sampling
                .record(Duration::from_nanos(now.saturating_sub(prev)));
        }
        trial.last_sample_at = Some(now);
        trial.path.push(p);
    }

    fn score<S: TargetSurface>(
        &mut self,
        at: Point,
        surface: &S,
        events: &mut Vec<ExperimentEvent>,
    ) {
        if !self.phase.is_running() {
            return;
        }
        let TrialPhase::Running(trial) = std::mem::replace(&mut self.phase, TrialPhase::Ready)
        else {
            return;
        };

        let now = self.timer.now();
        let movement_time_ms = trial.movement_time_ms(now);
        let center = surface.rendered_target_center(trial.target, trial.condition.diameter);
        let hit = within_circle(at, center, trial.condition.radius());
        if !hit {
            self.session.errors += 1;
        }

        let participant = &self.session.participant;
        let record = TrialRecord {
            participant_id: participant.id().to_string(),
            device: participant.device(),
            block: self.session.block_number(),
            trial_in_block: self.session.trial_number(),
            condition: trial.condition,
            id_shannon: trial.condition.index_of_difficulty(),
            movement_time_ms,
            path_length_px: trial.path.length(),
            target_cx: center.x,
            target_cy: center.y,
            click_x: at.x,
            click_y: at.y,
            hit,
        };

        info!(
            block = record.block,
            trial = record.trial_in_block,
            hit,
            movement_time_ms,
            path_length_px = record.path_length_px,
            "trial scored"
        );
        let stats = self.sampling.stats();
        if stats.samples > 0 {
            debug!(
                samples = stats.samples,
                rate_hz = stats.effective_rate_hz,
                jitter_ms = stats.jitter_ns / 1_000_000.0,
                "pointer sampling"
            );
        }

        self.banner = feedback_banner(hit, movement_time_ms);
        self.session.records.push(record.clone());
        events.push(ExperimentEvent::TrialScored(record));

        self.session.trial_index += 1;
        self.prepare_next_trial(events);
    }

    /// Moves to the next condition, rolling blocks over and finishing the
    /// session when the last block is exhausted. Leaves the machine `Ready`
    /// (or `Finished`); the participant must press home to start the trial.
    fn prepare_next_trial(&mut self, events: &mut Vec<ExperimentEvent>) {
        self.sampling.clear();
        match self
            .session
            .prepare_next_trial(&self.config, &mut self.rng)
        {
            Sequencing::Next {
                condition,
                new_block,
            } => {
                if new_block {
                    events.push(ExperimentEvent::BlockStarted {
                        block: self.session.block_number(),
                    });
                }
                self.phase = TrialPhase::Ready;
                events.push(ExperimentEvent::TrialReady {
                    block: self.session.block_number(),
                    trial: self.session.trial_number(),
                    condition,
                });
            }
            Sequencing::Complete => self.finish(events),
        }
    }

    fn finish(&mut self, events: &mut Vec<ExperimentEvent>) {
        self.phase = TrialPhase::Finished;
        let participant = &self.session.participant;
        let summary = SessionSummary::from_records(
            participant.id(),
            participant.device(),
            &self.session.records,
        );
        info!(
            trials = summary.trials,
            mean_mt_ms = summary.mean_movement_time_ms,
            error_rate_pct = summary.error_rate_pct,
            "session complete"
        );
        self.summary = Some(summary.clone());
        events.push(ExperimentEvent::SessionComplete(summary));
    }

    /// Swaps the post-trial feedback for the progress line of the upcoming trial.
    pub fn reset_banner(&mut self) {
        self.banner = if self.phase.is_finished() {
            "Session complete".to_string()
        } else {
            progress_banner(
                self.session.block_number(),
                self.config.blocks,
                self.session.trial_number(),
                self.config.trials_per_block(),
            )
        };
    }

    pub fn status(&self) -> DisplayStatus {
        let finished = self.phase.is_finished();
        let participant = &self.session.participant;
        DisplayStatus {
            participant_id: participant.id().to_string(),
            device: participant.device().to_string(),
            block: self.session.block_number().min(self.config.blocks),
            blocks: self.config.blocks,
            trial: if finished {
                self.config.trials_per_block()
            } else {
                self.session.trial_number()
            },
            trials_per_block: self.config.trials_per_block(),
            index_of_difficulty: self.session.current.map(|c| c.index_of_difficulty()),
            completed: self.session.completed(),
            total: self.config.total_trials(),
            errors: self.session.errors,
            banner: self.banner.clone(),
        }
    }

    pub fn phase(&self) -> &TrialPhase {
        &self.phase
    }

    /// Pointer movement is sampled only while a trial is running.
    pub fn is_tracking(&self) -> bool {
        self.phase.is_running()
    }

    pub fn is_finished(&self) -> bool {
        self.phase.is_finished()
    }

    pub fn current_condition(&self) -> Option<&Condition> {
        self.session.current.as_ref()
    }

    /// Placement point and diameter of the visible target, if any.
    pub fn target(&self) -> Option<(Point, f64)> {
        match &self.phase {
            TrialPhase::Running(trial) => Some((trial.target, trial.condition.diameter)),
            _ => None,
        }
    }

    pub fn path_length(&self) -> Option<f64> {
        match &self.phase {
            TrialPhase::Running(trial) => Some(trial.path.length()),
            _ => None,
        }
    }

    pub fn layout(&self) -> &LabLayout {
        &self.layout
    }

    /// Takes effect from the next trial start; a running target keeps its placement.
    pub fn set_layout(&mut self, layout: LabLayout) {
        self.layout = layout;
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn participant(&self) -> &Participant {
        &self.session.participant
    }

    pub fn errors(&self) -> usize {
        self.session.errors
    }

    pub fn banner(&self) -> &str {
        &self.banner
    }

    pub fn records(&self) -> &[TrialRecord] {
        &self.session.records
    }

    pub fn into_records(self) -> Vec<TrialRecord> {
        self.session.records
    }

    /// Present once the session has finished.
    pub fn summary(&self) -> Option<&SessionSummary> {
        self.summary.as_ref()
    }
}
