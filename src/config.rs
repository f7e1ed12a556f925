use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::analysis::clarity::ClarityConfig;
use crate::analysis::classifier::ClassifierConfig;
use crate::analysis::pipeline::PipelineConfig;
use crate::dsp::energy::EnergyConfig;
use crate::dsp::pitch::{PitchAlgorithm, PitchBand, PitchConfig};
use crate::paths;

/// Application configuration, loaded from config.toml.
///
/// serde's `default` attribute means: if a field is missing from the TOML file,
/// use the value from the Default implementation instead of failing to parse.
/// Every field has a default, so the file itself is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub pitch: PitchSettings,
    pub energy: EnergySettings,
    pub clarity: ClaritySettings,
    pub classifier: ClassifierSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PitchSettings {
    /// "speech" (75-300 Hz, with sanity check) or "musical" (C3-C6).
    pub band: PitchBand,
    /// "yin" or "mcleod".
    pub algorithm: PitchAlgorithm,
    /// Overrides the band's floor when set.
    pub floor_hz: Option<f32>,
    /// Overrides the band's ceiling when set.
    pub ceiling_hz: Option<f32>,
    pub frame_size_ms: f32,
    pub hop_size_ms: f32,
    pub yin_threshold: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnergySettings {
    pub frame_size_ms: f32,
    pub hop_size_ms: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClaritySettings {
    /// Leading audio treated as background (seconds)
    pub noise_window_secs: f32,
    /// Percentile of frame RMS taken as the voice level (0-100)
    pub signal_percentile: f32,
    /// Below this SNR the background is too noisy (dB)
    pub snr_floor_db: f32,
    /// Below this mean power the recording is too quiet
    pub energy_floor: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierSettings {
    /// Mean pitch above this is classified female (Hz)
    pub threshold_hz: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default tracing filter, e.g. "warn" or "voicegender=debug".
    /// RUST_LOG takes precedence.
    pub level: String,
}

// --- Default implementations ---
// The DSP structs own the real defaults; these just mirror them so the
// file format and the analysis code can't drift apart.

impl Default for PitchSettings {
    fn default() -> Self {
        let pitch = PitchConfig::default();
        Self {
            band: PitchBand::Speech,
            algorithm: pitch.algorithm,
            floor_hz: None,
            ceiling_hz: None,
            frame_size_ms: pitch.frame_size_ms,
            hop_size_ms: pitch.hop_size_ms,
            yin_threshold: pitch.yin_threshold,
        }
    }
}

impl Default for EnergySettings {
    fn default() -> Self {
        let energy = EnergyConfig::default();
        Self {
            frame_size_ms: energy.frame_size_ms,
            hop_size_ms: energy.hop_size_ms,
        }
    }
}

impl Default for ClaritySettings {
    fn default() -> Self {
        let clarity = ClarityConfig::default();
        Self {
            noise_window_secs: clarity.noise_window_secs,
            signal_percentile: clarity.signal_percentile,
            snr_floor_db: clarity.snr_floor_db,
            energy_floor: clarity.energy_floor,
        }
    }
}

impl Default for ClassifierSettings {
    fn default() -> Self {
        Self {
            threshold_hz: ClassifierConfig::default().threshold_hz,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "warn".into(),
        }
    }
}

/// Convert the user-facing settings into the parameters the DSP code
/// expects.
impl From<&PitchSettings> for PitchConfig {
    fn from(s: &PitchSettings) -> Self {
        let base = PitchConfig::for_band(s.band);
        PitchConfig {
            pitch_floor_hz: s.floor_hz.unwrap_or(base.pitch_floor_hz),
            pitch_ceiling_hz: s.ceiling_hz.unwrap_or(base.pitch_ceiling_hz),
            algorithm: s.algorithm,
            frame_size_ms: s.frame_size_ms,
            hop_size_ms: s.hop_size_ms,
            yin_threshold: s.yin_threshold,
            ..base
        }
    }
}

impl From<&AppConfig> for PipelineConfig {
    fn from(cfg: &AppConfig) -> Self {
        PipelineConfig {
            pitch: (&cfg.pitch).into(),
            energy: EnergyConfig {
                frame_size_ms: cfg.energy.frame_size_ms,
                hop_size_ms: cfg.energy.hop_size_ms,
            },
            clarity: ClarityConfig {
                noise_window_secs: cfg.clarity.noise_window_secs,
                signal_percentile: cfg.clarity.signal_percentile,
                snr_floor_db: cfg.clarity.snr_floor_db,
                energy_floor: cfg.clarity.energy_floor,
            },
            classifier: ClassifierConfig {
                threshold_hz: cfg.classifier.threshold_hz,
            },
        }
    }
}

/// Load the config from the default location.
/// If the file doesn't exist, returns defaults.
pub fn load_config() -> Result<AppConfig> {
    let path = paths::config_file();
    if !path.exists() {
        return Ok(AppConfig::default());
    }
    load_config_from(&path)
}

/// Load the config from an explicit path. The file must exist.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    toml::from_str(&contents)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}
