use serde::Serialize;

use super::waveform::Waveform;

/// Framing for the energy profile.
#[derive(Debug, Clone, PartialEq)]
pub struct EnergyConfig {
    /// Analysis window duration in milliseconds.
    pub frame_size_ms: f32,
    /// How far to advance between frames, in milliseconds.
    /// Half the frame size gives 50% overlap.
    pub hop_size_ms: f32,
}

impl Default for EnergyConfig {
    fn default() -> Self {
        Self {
            frame_size_ms: 20.0,
            hop_size_ms: 10.0,
        }
    }
}

impl EnergyConfig {
    /// Frame and hop lengths in samples for a given sample rate, rounded to
    /// the nearest sample. Neither is allowed to reach zero.
    pub fn lengths(&self, sample_rate: u32) -> (usize, usize) {
        let sr = sample_rate as f32;
        let frame_len = (self.frame_size_ms / 1000.0 * sr).round() as usize;
        let hop_len = (self.hop_size_ms / 1000.0 * sr).round() as usize;
        (frame_len.max(1), hop_len.max(1))
    }
}

/// Per-frame RMS energy over a waveform.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnergyProfile {
    /// One RMS value per complete frame.
    pub frames: Vec<f32>,
    /// Frame length in samples.
    pub frame_len: usize,
    /// Distance between frame starts in samples.
    pub hop_len: usize,
}

impl EnergyProfile {
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }
}

/// Split the waveform into overlapping frames and compute RMS per frame.
///
/// Frames start at multiples of the hop length. A trailing partial frame is
/// dropped rather than zero-padded, so a waveform shorter than one frame gives
/// an empty profile.
pub fn profile(waveform: &Waveform, config: &EnergyConfig) -> EnergyProfile {
    let (frame_len, hop_len) = config.lengths(waveform.sample_rate());
    let samples = waveform.samples();

    let mut frames = Vec::new();
    let mut pos = 0;

    while pos + frame_len <= samples.len() {
        frames.push(frame_rms(&samples[pos..pos + frame_len]));
        pos += hop_len;
    }

    tracing::debug!(frame_len, hop_len, frames = frames.len(), "energy profile");

    EnergyProfile {
        frames,
        frame_len,
        hop_len,
    }
}

/// RMS of a sample buffer (linear, not dB).
pub fn frame_rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_sq: f32 = samples.iter().map(|&s| s * s).sum();
    (sum_sq / samples.len() as f32).sqrt()
}
