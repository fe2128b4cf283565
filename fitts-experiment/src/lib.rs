pub mod config;
pub mod layout;
pub mod schedule;
pub mod session;
pub mod state;
pub mod status;
pub mod trial;
pub use config::{ConfigError, ExperimentConfig};
pub use layout::LabLayout;
pub use schedule::{Schedule, condition_universe, shuffle};
pub use session::{Sequencing, SessionState};
pub use state::{ExperimentEvent, ExperimentStateMachine};
pub use status::DisplayStatus;
pub use trial::{ActiveTrial, PointerInput, TrialPhase};
