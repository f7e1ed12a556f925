use serde::Serialize;

use crate::dsp::pitch::{self, PitchConfig};
use crate::dsp::stats;
use crate::dsp::waveform::Waveform;

/// Why an utterance produced no usable pitch.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NoPitch {
    /// Every frame was unvoiced (silence, noise, or too short to frame).
    NoVoicedFrames,
    /// The mean landed outside the plausible speaking range, which usually
    /// means an octave error or pitched noise.
    Implausible { mean_hz: f32 },
    /// The tracker could not run on this input.
    TrackingFailed { message: String },
}

/// Single representative pitch for an utterance.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PitchEstimate {
    Usable {
        mean_hz: f32,
        voiced_frames: usize,
        total_frames: usize,
    },
    Absent {
        reason: NoPitch,
        voiced_frames: usize,
        total_frames: usize,
    },
}

impl PitchEstimate {
    pub fn tracking_failed(message: impl Into<String>) -> Self {
        PitchEstimate::Absent {
            reason: NoPitch::TrackingFailed {
                message: message.into(),
            },
            voiced_frames: 0,
            total_frames: 0,
        }
    }

    /// The mean pitch, if it can be trusted.
    pub fn hz(&self) -> Option<f32> {
        match self {
            PitchEstimate::Usable { mean_hz, .. } => Some(*mean_hz),
            PitchEstimate::Absent { .. } => None,
        }
    }

    pub fn voiced_frames(&self) -> usize {
        match self {
            PitchEstimate::Usable { voiced_frames, .. }
            | PitchEstimate::Absent { voiced_frames, .. } => *voiced_frames,
        }
    }

    pub fn total_frames(&self) -> usize {
        match self {
            PitchEstimate::Usable { total_frames, .. }
            | PitchEstimate::Absent { total_frames, .. } => *total_frames,
        }
    }
}

/// Reduce a waveform to its mean pitch.
///
/// Unvoiced frames are dropped before averaging. If nothing is left, or (for
/// bands with a plausibility range) the mean falls outside that range, the
/// estimate is `Absent` rather than an extreme number. Tracker errors also
/// end up as `Absent`; this function never fails.
pub fn estimate(waveform: &Waveform, config: &PitchConfig) -> PitchEstimate {
    let contour = match pitch::extract_pitch_contour(waveform, config) {
        Ok(contour) => contour,
        Err(err) => {
            tracing::warn!(error = %err, "pitch tracking failed");
            return PitchEstimate::tracking_failed(err.to_string());
        }
    };

    let frequencies = pitch::voiced_frequencies(&contour);
    let voiced_frames = frequencies.len();
    let total_frames = contour.len();

    tracing::debug!(
        voiced_frames,
        total_frames,
        voiced_fraction = pitch::voiced_fraction(&contour),
        "pitch contour"
    );

    let Some(mean_hz) = stats::mean(&frequencies) else {
        return PitchEstimate::Absent {
            reason: NoPitch::NoVoicedFrames,
            voiced_frames,
            total_frames,
        };
    };

    if let Some((lo, hi)) = config.plausible_range {
        if mean_hz < lo || mean_hz > hi {
            tracing::debug!(mean_hz, lo, hi, "mean pitch outside plausible range");
            return PitchEstimate::Absent {
                reason: NoPitch::Implausible { mean_hz },
                voiced_frames,
                total_frames,
            };
        }
    }

    PitchEstimate::Usable {
        mean_hz,
        voiced_frames,
        total_frames,
    }
}
