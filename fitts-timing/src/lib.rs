pub mod sampling;
pub mod timer;

pub use sampling::{IntervalRecorder, SamplingStats};
pub use timer::{HighPrecisionTimer, ManualTimer, Timer};
