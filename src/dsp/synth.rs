use std::f32::consts::PI;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Generate a pure sine wave at a known frequency.
/// This is the ground truth for testing pitch detection.
pub fn sine(freq_hz: f32, sample_rate: u32, duration_secs: f32, amplitude: f32) -> Vec<f32> {
    let num_samples = (sample_rate as f32 * duration_secs) as usize;
    (0..num_samples)
        .map(|i| {
            let t = i as f32 / sample_rate as f32;
            amplitude * (2.0 * PI * freq_hz * t).sin()
        })
        .collect()
}

/// Digital silence of the given length.
pub fn silence(sample_rate: u32, duration_secs: f32) -> Vec<f32> {
    vec![0.0; (sample_rate as f32 * duration_secs) as usize]
}

/// Prepend `lead_in_secs` of silence, like the pause before a speaker starts.
pub fn with_lead_in(signal: &[f32], sample_rate: u32, lead_in_secs: f32) -> Vec<f32> {
    let mut out = silence(sample_rate, lead_in_secs);
    out.extend_from_slice(signal);
    out
}

/// Add zero-mean Gaussian noise with standard deviation `std_dev`.
///
/// Normal deviates come from the Box-Muller transform over a seeded
/// `StdRng`, so the same seed always produces the same noise.
pub fn add_gaussian_noise(signal: &mut [f32], std_dev: f32, seed: u64) {
    if std_dev <= 0.0 {
        return;
    }
    let mut rng = StdRng::seed_from_u64(seed);
    for s in signal.iter_mut() {
        // 1 - u keeps the log argument in (0, 1]
        let u1: f32 = 1.0 - rng.random::<f32>();
        let u2: f32 = rng.random::<f32>();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos();
        *s += std_dev * z;
    }
}
