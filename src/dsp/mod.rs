pub mod energy;
pub mod pitch;
pub mod stats;
pub mod synth;
pub mod waveform;
pub mod windowing;
