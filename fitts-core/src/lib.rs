pub mod condition;
pub mod geometry;
pub mod participant;
pub mod record;
pub mod summary;
pub mod surface;

pub use condition::{Condition, Direction};
pub use geometry::{PathAccumulator, Point, shannon_id, within_circle};
pub use participant::{Device, EntryError, Participant, ParticipantEntry};
pub use record::TrialRecord;
pub use summary::SessionSummary;
pub use surface::{ExactSurface, HOME_PRESSED_SCALE, TargetSurface};
