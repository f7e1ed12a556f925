pub mod clarity;
pub mod classifier;
pub mod pipeline;
pub mod pitch_estimate;
pub mod render;
