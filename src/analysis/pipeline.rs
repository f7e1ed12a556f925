use std::thread;

use serde::Serialize;

use super::clarity::{self, ClarityAssessment, ClarityConfig};
use super::classifier::{self, ClassifierConfig, GenderPrediction};
use super::pitch_estimate::{self, PitchEstimate};
use crate::dsp::energy::{self, EnergyConfig};
use crate::dsp::pitch::PitchConfig;
use crate::dsp::waveform::Waveform;

/// Every tunable parameter of the analysis, grouped by stage.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineConfig {
    pub pitch: PitchConfig,
    pub energy: EnergyConfig,
    pub clarity: ClarityConfig,
    pub classifier: ClassifierConfig,
}

/// The prediction plus the intermediate results that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    pub prediction: GenderPrediction,
    pub clarity: ClarityAssessment,
    pub pitch: PitchEstimate,
}

/// Runs pitch estimation, energy profiling, the clarity gate and the
/// classifier over one waveform.
///
/// The pipeline holds only configuration, so one instance can be shared
/// between threads and called on any number of waveforms.
#[derive(Debug, Clone, Default)]
pub struct AnalysisPipeline {
    config: PipelineConfig,
}

impl AnalysisPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn analyze(&self, waveform: &Waveform) -> GenderPrediction {
        self.analyze_detailed(waveform).prediction
    }

    /// Analyze and keep the clarity and pitch figures for reporting.
    ///
    /// Pitch tracking is by far the most expensive stage and shares nothing
    /// with the energy path, so it runs on a scoped thread while this thread
    /// profiles energy and assesses clarity. A panic inside the tracker is
    /// reported as "no usable pitch" instead of taking the caller down.
    pub fn analyze_detailed(&self, waveform: &Waveform) -> Analysis {
        let cfg = &self.config;

        let (pitch, clarity) = thread::scope(|s| {
            let pitch_worker = s.spawn(|| pitch_estimate::estimate(waveform, &cfg.pitch));

            let profile = energy::profile(waveform, &cfg.energy);
            let clarity =
                clarity::assess(waveform, &profile, waveform.sample_rate(), &cfg.clarity);

            let pitch = pitch_worker.join().unwrap_or_else(|_| {
                tracing::warn!("pitch tracker panicked");
                PitchEstimate::tracking_failed("pitch tracker panicked")
            });

            (pitch, clarity)
        });

        let prediction = classifier::classify(&pitch, &clarity, &cfg.classifier);

        tracing::debug!(
            category = %prediction.category(),
            pitch_hz = ?prediction.pitch_hz(),
            duration_secs = waveform.duration_secs(),
            "analysis complete"
        );

        Analysis {
            prediction,
            clarity,
            pitch,
        }
    }
}
