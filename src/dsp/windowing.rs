use std::f64::consts::PI;

/// Apply a Hann window to a frame and widen it to f64 in one pass.
///
/// The McLeod detector in `pitch-detection` works on f64 buffers, so the
/// tracker needs both steps for every frame. The window tapers the frame to
/// zero at both edges, which keeps the autocorrelation from seeing a hard
/// discontinuity where the frame was cut out of the recording.
///
/// w(n) = 0.5 * (1 - cos(2π * n / (N - 1)))
pub fn hann_f64(frame: &[f32]) -> Vec<f64> {
    let n = frame.len();
    if n <= 1 {
        return frame.iter().map(|&s| s as f64).collect();
    }

    let scale = 2.0 * PI / (n - 1) as f64;

    frame
        .iter()
        .enumerate()
        .map(|(i, &s)| {
            let w = 0.5 * (1.0 - (scale * i as f64).cos());
            s as f64 * w
        })
        .collect()
}
