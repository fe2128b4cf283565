pub mod render;
pub use render::{FrameStats, LabRenderer, Scene};
