use serde::Serialize;

use crate::dsp::energy::EnergyProfile;
use crate::dsp::stats;
use crate::dsp::waveform::Waveform;

/// Stand-in level when there are no frames to measure.
pub const EPSILON_LEVEL: f32 = 1e-10;

/// Thresholds for the clarity gate.
///
/// The SNR and energy floors are empirical: they were tuned by listening, not
/// derived. Both are exposed so callers can retune them per microphone.
#[derive(Debug, Clone, PartialEq)]
pub struct ClarityConfig {
    /// Leading stretch of audio assumed to be background only (seconds).
    pub noise_window_secs: f32,
    /// Percentile (0-100) of frame RMS taken as the signal level.
    pub signal_percentile: f32,
    /// SNR below this is a noisy recording (dB).
    pub snr_floor_db: f32,
    /// Mean power below this is a quiet recording.
    pub energy_floor: f32,
}

impl Default for ClarityConfig {
    fn default() -> Self {
        Self {
            noise_window_secs: 0.5,
            signal_percentile: 90.0,
            snr_floor_db: 5.0,
            energy_floor: 0.001,
        }
    }
}

/// Outcome of the clarity gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Clear,
    NoisyBackground,
    TooQuiet,
}

impl Verdict {
    /// Human-readable explanation, used as the reason for an indeterminate
    /// prediction.
    pub fn description(self) -> &'static str {
        match self {
            Verdict::Clear => "recording is clear",
            Verdict::NoisyBackground => "too much background noise",
            Verdict::TooQuiet => "recording is too quiet",
        }
    }
}

/// Signal quality figures for one recording.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClarityAssessment {
    /// Mean frame RMS over the noise window.
    pub noise_floor: f32,
    /// Percentile frame RMS over the whole recording.
    pub signal_level: f32,
    /// 10·log10(signal / noise). `f32::INFINITY` when the noise floor is
    /// exactly zero (serialized as null in JSON).
    pub snr_db: f32,
    /// Mean of squared samples: average power, not RMS.
    pub total_energy: f32,
    pub verdict: Verdict,
}

/// Estimate noise floor, signal level and SNR, then decide whether the
/// recording is usable.
///
/// This is a coarse heuristic: the first half second is taken to be
/// background, and the loudest tenth of frames to be voice. It says nothing
/// useful about non-stationary noise, and a recording with no pause before
/// the voice starts will score close to 0 dB. The formulas are kept exactly
/// as they are because the default thresholds were tuned against them.
///
/// Verdict rules, first match wins:
///   1. no frames at all → TooQuiet
///   2. snr_db < snr_floor_db → NoisyBackground
///   3. total_energy < energy_floor → TooQuiet
///   4. otherwise Clear
pub fn assess(
    waveform: &Waveform,
    profile: &EnergyProfile,
    sample_rate: u32,
    config: &ClarityConfig,
) -> ClarityAssessment {
    let noise_floor = noise_floor(profile, sample_rate, config.noise_window_secs);
    let signal_level =
        stats::percentile(&profile.frames, config.signal_percentile).unwrap_or(EPSILON_LEVEL);
    let snr_db = snr_db(signal_level, noise_floor);
    let total_energy = waveform.mean_power();

    let verdict = if profile.is_empty() {
        Verdict::TooQuiet
    } else if snr_db < config.snr_floor_db {
        Verdict::NoisyBackground
    } else if total_energy < config.energy_floor {
        Verdict::TooQuiet
    } else {
        Verdict::Clear
    };

    tracing::debug!(
        noise_floor,
        signal_level,
        snr_db,
        total_energy,
        ?verdict,
        "clarity assessment"
    );

    ClarityAssessment {
        noise_floor,
        signal_level,
        snr_db,
        total_energy,
        verdict,
    }
}

/// Mean RMS of the frames covering the first `window_secs` of audio.
///
/// The window is converted to a frame count with the hop length and
/// truncated. With no frames in the window the epsilon level is used.
fn noise_floor(profile: &EnergyProfile, sample_rate: u32, window_secs: f32) -> f32 {
    let window_frames = (window_secs * sample_rate as f32 / profile.hop_len as f32) as usize;
    let frames = &profile.frames[..window_frames.min(profile.len())];
    stats::mean(frames).unwrap_or(EPSILON_LEVEL)
}

/// Decibel ratio of signal to noise; infinite for a noise floor of exactly
/// zero.
fn snr_db(signal_level: f32, noise_floor: f32) -> f32 {
    if noise_floor > 0.0 {
        10.0 * (signal_level / noise_floor).log10()
    } else {
        f32::INFINITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::energy::{self, EnergyConfig};
    use crate::dsp::synth;

    const SR: u32 = 22050;

    fn run(samples: Vec<f32>) -> ClarityAssessment {
        run_with(samples, &ClarityConfig::default())
    }

    fn run_with(samples: Vec<f32>, config: &ClarityConfig) -> ClarityAssessment {
        let wf = Waveform::new(samples, SR).unwrap();
        let profile = energy::profile(&wf, &EnergyConfig::default());
        assess(&wf, &profile, SR, config)
    }

    #[test]
    fn silence_is_too_quiet() {
        let a = run(synth::silence(SR, 1.0));
        assert_eq!(a.noise_floor, 0.0);
        assert!(a.snr_db.is_infinite());
        assert_eq!(a.total_energy, 0.0);
        assert_eq!(a.verdict, Verdict::TooQuiet);
    }

    #[test]
    fn empty_profile_is_too_quiet() {
        let a = run(Vec::new());
        assert_eq!(a.noise_floor, EPSILON_LEVEL);
        assert_eq!(a.signal_level, EPSILON_LEVEL);
        assert_eq!(a.verdict, Verdict::TooQuiet);
    }

    #[test]
    fn shorter_than_a_frame_is_too_quiet() {
        // Loud, but only 100 samples: no complete 20 ms frame
        let a = run(vec![0.9; 100]);
        assert_eq!(a.verdict, Verdict::TooQuiet);
    }

    #[test]
    fn tone_after_silence_is_clear() {
        let tone = synth::sine(150.0, SR, 1.0, 0.5);
        let a = run(synth::with_lead_in(&tone, SR, 0.75));
        assert_eq!(a.noise_floor, 0.0);
        assert!(a.snr_db.is_infinite());
        assert!(a.total_energy > 0.001);
        assert_eq!(a.verdict, Verdict::Clear);
    }

    #[test]
    fn tone_over_quiet_hiss_is_clear() {
        // Background at 0.01 std, voice at 0.5: SNR is roughly
        // 10·log10(0.35 / 0.01) ≈ 15 dB
        let mut samples = synth::with_lead_in(&synth::sine(150.0, SR, 1.0, 0.5), SR, 0.75);
        synth::add_gaussian_noise(&mut samples, 0.01, 3);
        let a = run(samples);
        assert!(a.snr_db.is_finite());
        assert!(a.snr_db > 10.0, "snr {:.1}", a.snr_db);
        assert_eq!(a.verdict, Verdict::Clear);
    }

    #[test]
    fn loud_noise_is_noisy_background() {
        let mut samples = synth::sine(150.0, SR, 1.0, 0.5);
        synth::add_gaussian_noise(&mut samples, 0.25, 11);
        let a = run(samples);
        assert!(a.snr_db < 5.0, "snr {:.1}", a.snr_db);
        assert_eq!(a.verdict, Verdict::NoisyBackground);
    }

    #[test]
    fn steady_tone_without_pause_scores_near_zero_db() {
        // The heuristic has no pause to learn the background from, so the
        // tone itself becomes the noise floor.
        let a = run(synth::sine(120.0, SR, 1.0, 0.5));
        assert!(a.snr_db.abs() < 1.0, "snr {:.2}", a.snr_db);
        assert_eq!(a.verdict, Verdict::NoisyBackground);
    }

    #[test]
    fn quiet_tone_is_too_quiet() {
        let tone = synth::sine(180.0, SR, 1.0, 0.01);
        let a = run(synth::with_lead_in(&tone, SR, 0.75));
        assert!(a.total_energy < 0.001);
        assert_eq!(a.verdict, Verdict::TooQuiet);
    }

    #[test]
    fn snr_check_wins_over_energy_check() {
        // Quiet and stationary: fails both tests, SNR is reported
        let a = run(synth::sine(180.0, SR, 1.0, 0.01));
        assert!(a.total_energy < 0.001);
        assert_eq!(a.verdict, Verdict::NoisyBackground);
    }

    #[test]
    fn thresholds_are_tunable() {
        let config = ClarityConfig {
            snr_floor_db: -1.0,
            ..ClarityConfig::default()
        };
        let a = run_with(synth::sine(120.0, SR, 1.0, 0.5), &config);
        assert_eq!(a.verdict, Verdict::Clear);

        let config = ClarityConfig {
            energy_floor: 0.5,
            ..ClarityConfig::default()
        };
        let tone = synth::sine(120.0, SR, 1.0, 0.5);
        let a = run_with(synth::with_lead_in(&tone, SR, 0.75), &config);
        assert_eq!(a.verdict, Verdict::TooQuiet);
    }

    #[test]
    fn zero_noise_window_uses_epsilon() {
        let config = ClarityConfig {
            noise_window_secs: 0.0,
            ..ClarityConfig::default()
        };
        let a = run_with(synth::sine(120.0, SR, 1.0, 0.5), &config);
        assert_eq!(a.noise_floor, EPSILON_LEVEL);
        assert!(a.snr_db > 50.0);
    }

    #[test]
    fn snr_formula() {
        assert!((snr_db(1.0, 0.1) - 10.0).abs() < 1e-5);
        assert!((snr_db(0.1, 0.1)).abs() < 1e-6);
        assert!(snr_db(0.1, 0.0).is_infinite());
    }

    #[test]
    fn verdict_descriptions_differ() {
        assert_ne!(
            Verdict::NoisyBackground.description(),
            Verdict::TooQuiet.description()
        );
    }
}
