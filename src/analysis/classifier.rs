use std::fmt;

use serde::Serialize;

use super::clarity::{ClarityAssessment, Verdict};
use super::pitch_estimate::PitchEstimate;

/// Reason given when the recording is clear but no pitch survived.
pub const NO_PITCH_REASON: &str = "no clear pitch detected";

#[derive(Debug, Clone, PartialEq)]
pub struct ClassifierConfig {
    /// Mean pitch strictly above this is Female; at or below is Male.
    /// 165 Hz sits between typical adult male (85-155 Hz) and female
    /// (165-255 Hz) speaking ranges.
    pub threshold_hz: f32,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            threshold_hz: 165.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Male,
    Female,
    Indeterminate,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Category::Male => "male",
            Category::Female => "female",
            Category::Indeterminate => "indeterminate",
        };
        f.write_str(label)
    }
}

/// Final answer for one utterance.
///
/// `pitch_hz` is set only for Male/Female; `reason` only for Indeterminate.
/// The fields are private so that combination can't be broken after the
/// fact.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenderPrediction {
    category: Category,
    pitch_hz: Option<f32>,
    reason: Option<String>,
}

impl GenderPrediction {
    fn decided(category: Category, pitch_hz: f32) -> Self {
        Self {
            category,
            pitch_hz: Some(pitch_hz),
            reason: None,
        }
    }

    fn indeterminate(reason: impl Into<String>) -> Self {
        Self {
            category: Category::Indeterminate,
            pitch_hz: None,
            reason: Some(reason.into()),
        }
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn pitch_hz(&self) -> Option<f32> {
        self.pitch_hz
    }

    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }
}

/// Map a pitch estimate to a category, gated on clarity.
pub fn classify(
    pitch: &PitchEstimate,
    clarity: &ClarityAssessment,
    config: &ClassifierConfig,
) -> GenderPrediction {
    if clarity.verdict != Verdict::Clear {
        return GenderPrediction::indeterminate(clarity.verdict.description());
    }

    let Some(hz) = pitch.hz() else {
        return GenderPrediction::indeterminate(NO_PITCH_REASON);
    };

    if hz > config.threshold_hz {
        GenderPrediction::decided(Category::Female, hz)
    } else {
        GenderPrediction::decided(Category::Male, hz)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::pitch_estimate::NoPitch;

    fn clarity(verdict: Verdict) -> ClarityAssessment {
        ClarityAssessment {
            noise_floor: 0.0,
            signal_level: 0.3,
            snr_db: f32::INFINITY,
            total_energy: 0.05,
            verdict,
        }
    }

    fn pitch(hz: f32) -> PitchEstimate {
        PitchEstimate::Usable {
            mean_hz: hz,
            voiced_frames: 10,
            total_frames: 12,
        }
    }

    fn classify_hz(hz: f32) -> GenderPrediction {
        classify(&pitch(hz), &clarity(Verdict::Clear), &ClassifierConfig::default())
    }

    #[test]
    fn low_pitch_is_male() {
        let p = classify_hz(120.0);
        assert_eq!(p.category(), Category::Male);
        assert_eq!(p.pitch_hz(), Some(120.0));
        assert_eq!(p.reason(), None);
    }

    #[test]
    fn high_pitch_is_female() {
        let p = classify_hz(220.0);
        assert_eq!(p.category(), Category::Female);
        assert_eq!(p.pitch_hz(), Some(220.0));
    }

    #[test]
    fn threshold_itself_is_male() {
        assert_eq!(classify_hz(165.0).category(), Category::Male);
    }

    #[test]
    fn just_above_threshold_is_female() {
        assert_eq!(classify_hz(165.0001).category(), Category::Female);
    }

    #[test]
    fn unclear_recording_is_indeterminate() {
        for verdict in [Verdict::NoisyBackground, Verdict::TooQuiet] {
            let p = classify(&pitch(120.0), &clarity(verdict), &ClassifierConfig::default());
            assert_eq!(p.category(), Category::Indeterminate);
            assert_eq!(p.pitch_hz(), None);
            assert_eq!(p.reason(), Some(verdict.description()));
        }
    }

    #[test]
    fn missing_pitch_is_indeterminate() {
        let absent = PitchEstimate::Absent {
            reason: NoPitch::NoVoicedFrames,
            voiced_frames: 0,
            total_frames: 40,
        };
        let p = classify(&absent, &clarity(Verdict::Clear), &ClassifierConfig::default());
        assert_eq!(p.category(), Category::Indeterminate);
        assert_eq!(p.reason(), Some(NO_PITCH_REASON));
        assert_eq!(p.pitch_hz(), None);
    }

    #[test]
    fn clarity_is_checked_before_pitch() {
        let absent = PitchEstimate::tracking_failed("boom");
        let p = classify(&absent, &clarity(Verdict::TooQuiet), &ClassifierConfig::default());
        assert_eq!(p.reason(), Some(Verdict::TooQuiet.description()));
    }

    #[test]
    fn custom_threshold() {
        let config = ClassifierConfig { threshold_hz: 200.0 };
        let p = classify(&pitch(180.0), &clarity(Verdict::Clear), &config);
        assert_eq!(p.category(), Category::Male);
    }

    #[test]
    fn category_display() {
        assert_eq!(Category::Female.to_string(), "female");
        assert_eq!(Category::Indeterminate.to_string(), "indeterminate");
    }
}
