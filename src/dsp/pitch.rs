use pitch_detection::detector::mcleod::McLeodDetector;
use pitch_detection::detector::PitchDetector;
use serde::{Deserialize, Serialize};

use super::energy::frame_rms;
use super::waveform::Waveform;
use super::windowing;

/// C3 and C6 in Hz (A4 = 440 Hz equal temperament).
const C3_HZ: f32 = 130.812_78;
const C6_HZ: f32 = 1046.502_3;

/// Band of plausible speaking pitch. Used both as the narrow search band and
/// as the sanity check on the final mean.
pub const SPEECH_FLOOR_HZ: f32 = 75.0;
pub const SPEECH_CEILING_HZ: f32 = 300.0;

/// Which frequency range the tracker searches.
///
/// `Speech` is tuned for telling voices apart: narrow, and the mean is
/// sanity-checked against the same band. `Musical` spans C3..C6, which tracks
/// sung or high voices better but also lets through pitches no speaking voice
/// produces, so no sanity check is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PitchBand {
    Speech,
    Musical,
}

impl PitchBand {
    /// (floor, ceiling) in Hz.
    pub fn range(self) -> (f32, f32) {
        match self {
            PitchBand::Speech => (SPEECH_FLOOR_HZ, SPEECH_CEILING_HZ),
            PitchBand::Musical => (C3_HZ, C6_HZ),
        }
    }

    /// Range the mean pitch must fall in to be trusted, if any.
    pub fn plausible_range(self) -> Option<(f32, f32)> {
        match self {
            PitchBand::Speech => Some((SPEECH_FLOOR_HZ, SPEECH_CEILING_HZ)),
            PitchBand::Musical => None,
        }
    }
}

/// Which F0 tracker runs on each frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PitchAlgorithm {
    /// Cumulative mean normalized difference (de Cheveigné & Kawahara).
    Yin,
    /// McLeod Pitch Method from the `pitch-detection` crate.
    Mcleod,
}

/// Configuration for pitch extraction.
#[derive(Debug, Clone, PartialEq)]
pub struct PitchConfig {
    /// Minimum detectable frequency in Hz.
    pub pitch_floor_hz: f32,

    /// Maximum detectable frequency in Hz.
    pub pitch_ceiling_hz: f32,

    /// If set, a mean pitch outside this range counts as "no usable pitch".
    pub plausible_range: Option<(f32, f32)>,

    pub algorithm: PitchAlgorithm,

    /// Analysis window duration in milliseconds.
    /// 92.88 ms is 2048 samples at 22050 Hz: long enough for two full
    /// periods at 75 Hz.
    pub frame_size_ms: f32,

    /// How far to advance between frames, in milliseconds (512 samples at
    /// 22050 Hz, a quarter of the frame).
    pub hop_size_ms: f32,

    /// YIN absolute threshold on the normalized difference function.
    /// Lower = stricter about what counts as voiced.
    pub yin_threshold: f32,

    /// Frames with RMS below this are unvoiced without running the tracker
    /// (about -80 dBFS). Digital silence otherwise produces a flat difference
    /// function that YIN would happily accept.
    pub silence_rms: f32,

    /// McLeod power threshold.
    pub power_threshold: f64,

    /// McLeod clarity threshold, 0.0-1.0.
    pub clarity_threshold: f64,
}

impl PitchConfig {
    pub fn for_band(band: PitchBand) -> Self {
        let (floor, ceiling) = band.range();
        Self {
            pitch_floor_hz: floor,
            pitch_ceiling_hz: ceiling,
            plausible_range: band.plausible_range(),
            algorithm: PitchAlgorithm::Yin,
            frame_size_ms: 92.88,
            hop_size_ms: 23.22,
            yin_threshold: 0.1,
            silence_rms: 1e-4,
            power_threshold: 0.2,
            clarity_threshold: 0.2,
        }
    }
}

impl Default for PitchConfig {
    fn default() -> Self {
        Self::for_band(PitchBand::Speech)
    }
}

/// Reasons the tracker could not run at all.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum PitchError {
    #[error("pitch band {floor_hz}-{ceiling_hz} Hz is empty")]
    EmptyBand { floor_hz: f32, ceiling_hz: f32 },
    #[error(
        "a {frame_len}-sample frame cannot resolve periods up to {needed} samples; \
         raise frame_size_ms or the pitch floor"
    )]
    FrameTooShort { frame_len: usize, needed: usize },
}

/// A single point in a pitch contour: a timestamp and an optional frequency.
/// `None` means the frame was unvoiced (no detectable pitch).
#[derive(Debug, Clone, PartialEq)]
pub struct PitchFrame {
    /// Time in seconds of the frame start.
    pub time: f32,

    /// Detected fundamental frequency, or None if unvoiced.
    pub frequency: Option<f32>,
}

/// Period search limits for YIN, in samples (lag).
struct LagRange {
    min: usize,
    max: usize,
}

/// Extract a pitch contour from a waveform.
///
/// Slides a frame across the audio and runs the configured tracker on each
/// one. Frames whose detected pitch falls outside the configured band are
/// recorded as unvoiced, which rejects sub-bass rumble and octave jumps
/// out of range. Trailing samples that don't fill a frame are not analyzed.
pub fn extract_pitch_contour(
    waveform: &Waveform,
    config: &PitchConfig,
) -> Result<Vec<PitchFrame>, PitchError> {
    if config.pitch_floor_hz <= 0.0 || config.pitch_floor_hz >= config.pitch_ceiling_hz {
        return Err(PitchError::EmptyBand {
            floor_hz: config.pitch_floor_hz,
            ceiling_hz: config.pitch_ceiling_hz,
        });
    }

    let samples = waveform.samples();
    let sr = waveform.sample_rate() as f32;

    // Convert milliseconds to samples.
    // e.g., 92.88ms at 22050 Hz = 2048 samples
    let frame_len = ((config.frame_size_ms / 1000.0 * sr).round() as usize).max(2);
    let hop_len = ((config.hop_size_ms / 1000.0 * sr).round() as usize).max(1);

    // YIN compares the first half of the frame with lagged copies of
    // itself, so the longest lag it can test is what's left of the frame
    // after that half (minus one slot for the local-minimum lookahead).
    let window = frame_len / 2;
    let longest_period = (sr / config.pitch_floor_hz).ceil() as usize;
    let lags = LagRange {
        min: ((sr / config.pitch_ceiling_hz).floor() as usize).max(1),
        max: longest_period.min(frame_len.saturating_sub(window + 1)),
    };
    if lags.max < longest_period || lags.max <= lags.min {
        return Err(PitchError::FrameTooShort {
            frame_len,
            needed: 2 * longest_period + 1,
        });
    }

    let mut mcleod = match config.algorithm {
        PitchAlgorithm::Mcleod => Some(McLeodDetector::new(frame_len, frame_len / 2)),
        PitchAlgorithm::Yin => None,
    };

    let mut contour = Vec::new();
    let mut pos = 0;

    while pos + frame_len <= samples.len() {
        let time = pos as f32 / sr;
        let frame = &samples[pos..pos + frame_len];

        let frequency = if frame_rms(frame) < config.silence_rms {
            None
        } else {
            match mcleod.as_mut() {
                Some(detector) => mcleod_frame(detector, frame, waveform.sample_rate(), config),
                None => yin_frame(frame, sr, &lags, config.yin_threshold),
            }
        };

        // Filter: only accept pitches within the search band.
        let frequency =
            frequency.filter(|&f| f >= config.pitch_floor_hz && f <= config.pitch_ceiling_hz);

        contour.push(PitchFrame { time, frequency });
        pos += hop_len;
    }

    Ok(contour)
}

/// Estimate F0 of one frame with YIN.
///
///   1. Difference function d(τ) = Σ (x[j] - x[j+τ])² over the first half
///   2. Normalize by its running mean: d'(τ) = d(τ) · τ / Σ_{k≤τ} d(k)
///   3. Take the first lag where d' dips under the threshold, then follow it
///      down to the bottom of that dip
///   4. Refine the lag with a parabola through the dip and its neighbours
///
/// Returns None when no lag dips under the threshold (unvoiced).
fn yin_frame(frame: &[f32], sr: f32, lags: &LagRange, threshold: f32) -> Option<f32> {
    let window = frame.len() / 2;
    let last = lags.max + 1;

    let mut diff = vec![0.0f32; last + 1];
    for (tau, d) in diff.iter_mut().enumerate().skip(1) {
        *d = frame[..window]
            .iter()
            .zip(&frame[tau..tau + window])
            .map(|(&a, &b)| (a - b) * (a - b))
            .sum();
    }

    let mut cmnd = vec![1.0f32; last + 1];
    let mut running = 0.0f32;
    for tau in 1..=last {
        running += diff[tau];
        if running > 0.0 {
            cmnd[tau] = diff[tau] * tau as f32 / running;
        }
    }

    let mut tau = lags.min;
    while tau <= lags.max {
        if cmnd[tau] < threshold {
            while tau < lags.max && cmnd[tau + 1] < cmnd[tau] {
                tau += 1;
            }
            let period = parabolic_vertex(cmnd[tau - 1], cmnd[tau], cmnd[tau + 1], tau);
            return Some(sr / period);
        }
        tau += 1;
    }

    None
}

/// Sub-sample position of the minimum of a parabola through three equally
/// spaced points centred on `center`.
fn parabolic_vertex(a: f32, b: f32, c: f32, center: usize) -> f32 {
    let denom = a - 2.0 * b + c;
    let t = center as f32;
    if denom.abs() < 1e-12 {
        t
    } else {
        t + 0.5 * (a - c) / denom
    }
}

/// Estimate F0 of one frame with the McLeod Pitch Method.
fn mcleod_frame(
    detector: &mut McLeodDetector<f64>,
    frame: &[f32],
    sample_rate: u32,
    config: &PitchConfig,
) -> Option<f32> {
    let windowed = windowing::hann_f64(frame);
    detector
        .get_pitch(
            &windowed,
            sample_rate as usize,
            config.power_threshold,
            config.clarity_threshold,
        )
        .map(|p| p.frequency as f32)
}

/// Extract only the voiced frequencies from a pitch contour.
pub fn voiced_frequencies(contour: &[PitchFrame]) -> Vec<f32> {
    contour
        .iter()
        .filter_map(|frame| frame.frequency)
        .collect()
}

/// Compute the fraction of frames that are voiced (have a detected pitch).
/// Returns 0.0 if contour is empty.
pub fn voiced_fraction(contour: &[PitchFrame]) -> f32 {
    if contour.is_empty() {
        return 0.0;
    }
    let voiced = contour.iter().filter(|f| f.frequency.is_some()).count();
    voiced as f32 / contour.len() as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::synth;

    fn tone(freq_hz: f32, sample_rate: u32, secs: f32) -> Waveform {
        Waveform::new(synth::sine(freq_hz, sample_rate, secs, 0.5), sample_rate).unwrap()
    }

    fn mean_pitch(contour: &[PitchFrame]) -> f32 {
        let frequencies = voiced_frequencies(contour);
        assert!(!frequencies.is_empty(), "Should detect pitch in a pure sine wave");
        frequencies.iter().sum::<f32>() / frequencies.len() as f32
    }

    #[test]
    fn yin_detects_120hz_sine() {
        let contour = extract_pitch_contour(&tone(120.0, 22050, 1.0), &PitchConfig::default())
            .unwrap();
        let mean = mean_pitch(&contour);
        assert!((mean - 120.0).abs() < 2.0, "Mean pitch should be ~120 Hz, got {mean:.1} Hz");
        assert!(voiced_fraction(&contour) > 0.9);
    }

    #[test]
    fn yin_detects_220hz_sine() {
        let contour = extract_pitch_contour(&tone(220.0, 22050, 1.0), &PitchConfig::default())
            .unwrap();
        let mean = mean_pitch(&contour);
        assert!((mean - 220.0).abs() < 3.0, "Mean pitch should be ~220 Hz, got {mean:.1} Hz");
    }

    #[test]
    fn yin_works_at_44100() {
        let contour = extract_pitch_contour(&tone(150.0, 44100, 0.5), &PitchConfig::default())
            .unwrap();
        let mean = mean_pitch(&contour);
        assert!((mean - 150.0).abs() < 2.0, "got {mean:.1} Hz");
    }

    #[test]
    fn mcleod_detects_120hz_sine() {
        let config = PitchConfig {
            algorithm: PitchAlgorithm::Mcleod,
            ..PitchConfig::default()
        };
        let contour = extract_pitch_contour(&tone(120.0, 22050, 1.0), &config).unwrap();
        let mean = mean_pitch(&contour);
        assert!((mean - 120.0).abs() < 5.0, "got {mean:.1} Hz");
    }

    #[test]
    fn musical_band_tracks_a_high_note() {
        // 880 Hz is far outside the speech band but inside C3..C6
        let config = PitchConfig::for_band(PitchBand::Musical);
        let contour = extract_pitch_contour(&tone(880.0, 22050, 0.5), &config).unwrap();
        let mean = mean_pitch(&contour);
        assert!((mean - 880.0).abs() < 10.0, "got {mean:.1} Hz");
    }

    #[test]
    fn silence_is_unvoiced() {
        let wf = Waveform::new(vec![0.0; 22050], 22050).unwrap();
        let contour = extract_pitch_contour(&wf, &PitchConfig::default()).unwrap();
        assert!(!contour.is_empty());
        assert_eq!(voiced_fraction(&contour), 0.0);
    }

    #[test]
    fn short_input_gives_empty_contour() {
        let wf = Waveform::new(vec![0.1; 100], 22050).unwrap();
        let contour = extract_pitch_contour(&wf, &PitchConfig::default()).unwrap();
        assert!(contour.is_empty());
    }

    #[test]
    fn frame_too_short_for_floor_is_an_error() {
        let config = PitchConfig {
            frame_size_ms: 10.0,
            ..PitchConfig::default()
        };
        let err = extract_pitch_contour(&tone(120.0, 22050, 0.5), &config).unwrap_err();
        assert!(matches!(err, PitchError::FrameTooShort { .. }));
    }

    #[test]
    fn inverted_band_is_an_error() {
        let config = PitchConfig {
            pitch_floor_hz: 300.0,
            pitch_ceiling_hz: 75.0,
            ..PitchConfig::default()
        };
        let err = extract_pitch_contour(&tone(120.0, 22050, 0.5), &config).unwrap_err();
        assert!(matches!(err, PitchError::EmptyBand { .. }));
    }

    #[test]
    fn contour_timestamps_follow_hop() {
        let contour = extract_pitch_contour(&tone(120.0, 22050, 0.5), &PitchConfig::default())
            .unwrap();
        for pair in contour.windows(2) {
            let step = pair[1].time - pair[0].time;
            assert!((step - 512.0 / 22050.0).abs() < 1e-4);
        }
    }

    #[test]
    fn parabolic_vertex_of_symmetric_points() {
        assert_eq!(parabolic_vertex(1.0, 0.0, 1.0, 10), 10.0);
        // Lower on the right → vertex shifts right
        assert!(parabolic_vertex(1.0, 0.0, 0.5, 10) > 10.0);
    }

    #[test]
    fn voiced_fraction_empty() {
        assert_eq!(voiced_fraction(&[]), 0.0);
    }

    #[test]
    fn band_ranges() {
        assert_eq!(PitchBand::Speech.range(), (75.0, 300.0));
        let (lo, hi) = PitchBand::Musical.range();
        assert!((lo - 130.81).abs() < 0.01);
        assert!((hi - 1046.50).abs() < 0.01);
        assert!(PitchBand::Musical.plausible_range().is_none());
    }
}
