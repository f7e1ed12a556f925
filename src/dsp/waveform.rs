/// Reasons a sample buffer cannot be treated as a waveform.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum WaveformError {
    #[error("sample rate must be greater than zero")]
    ZeroSampleRate,
    #[error("sample {index} is not a finite number")]
    NonFiniteSample { index: usize },
}

/// A decoded mono recording: samples in [-1.0, 1.0] plus the rate they were
/// captured at.
///
/// The fields are private so that every `Waveform` in the program has passed
/// through `new`, which is the only place input validation happens. Everything
/// downstream (pitch, energy, clarity) can assume a positive sample rate and
/// finite samples.
#[derive(Debug, Clone, PartialEq)]
pub struct Waveform {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl Waveform {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Result<Self, WaveformError> {
        if sample_rate == 0 {
            return Err(WaveformError::ZeroSampleRate);
        }
        if let Some(index) = samples.iter().position(|s| !s.is_finite()) {
            return Err(WaveformError::NonFiniteSample { index });
        }
        Ok(Self {
            samples,
            sample_rate,
        })
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration in seconds.
    pub fn duration_secs(&self) -> f32 {
        self.samples.len() as f32 / self.sample_rate as f32
    }

    /// Average power: mean of the squared samples over the whole recording.
    /// This is NOT RMS, so it lives on a different scale than frame energy.
    /// Returns 0.0 for an empty waveform.
    pub fn mean_power(&self) -> f32 {
        if self.samples.is_empty() {
            return 0.0;
        }
        // Accumulate in f64: long recordings would lose precision in f32.
        let sum_sq: f64 = self.samples.iter().map(|&s| (s as f64) * (s as f64)).sum();
        (sum_sq / self.samples.len() as f64) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_sample_rate() {
        let err = Waveform::new(vec![0.0; 10], 0).unwrap_err();
        assert_eq!(err, WaveformError::ZeroSampleRate);
    }

    #[test]
    fn rejects_nan_sample() {
        let err = Waveform::new(vec![0.0, 0.1, f32::NAN], 16000).unwrap_err();
        assert_eq!(err, WaveformError::NonFiniteSample { index: 2 });
    }

    #[test]
    fn rejects_infinite_sample() {
        let err = Waveform::new(vec![f32::INFINITY], 16000).unwrap_err();
        assert_eq!(err, WaveformError::NonFiniteSample { index: 0 });
    }

    #[test]
    fn empty_waveform_is_valid() {
        let wf = Waveform::new(Vec::new(), 22050).unwrap();
        assert!(wf.is_empty());
        assert_eq!(wf.duration_secs(), 0.0);
        assert_eq!(wf.mean_power(), 0.0);
    }

    #[test]
    fn mean_power_of_constant_signal() {
        // Constant 0.5 → power 0.25 (RMS would be 0.5)
        let wf = Waveform::new(vec![0.5; 100], 8000).unwrap();
        assert!((wf.mean_power() - 0.25).abs() < 1e-6);
    }

    #[test]
    fn duration_from_sample_rate() {
        let wf = Waveform::new(vec![0.0; 11025], 22050).unwrap();
        assert!((wf.duration_secs() - 0.5).abs() < 1e-6);
    }
}
