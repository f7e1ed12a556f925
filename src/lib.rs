//! Perceived vocal gender from a short recorded utterance.
//!
//! The analysis runs in four stages over a decoded mono [`Waveform`]:
//! pitch tracking, energy profiling, a clarity gate, and a threshold
//! classifier. [`AnalysisPipeline`] runs them all.
//!
//! ```no_run
//! use voicegender::{AnalysisPipeline, Waveform};
//!
//! let samples: Vec<f32> = vec![0.0; 22050];
//! let waveform = Waveform::new(samples, 22050).unwrap();
//! let prediction = AnalysisPipeline::default().analyze(&waveform);
//! println!("{}", prediction.category());
//! ```

pub mod analysis;
pub mod audio;
pub mod config;
pub mod dsp;
pub mod paths;

pub use analysis::classifier::{Category, GenderPrediction};
pub use analysis::pipeline::{Analysis, AnalysisPipeline, PipelineConfig};
pub use dsp::waveform::{Waveform, WaveformError};
