/// Arithmetic mean. Returns None for an empty slice.
pub fn mean(values: &[f32]) -> Option<f32> {
    if values.is_empty() {
        return None;
    }
    let sum: f64 = values.iter().map(|&v| v as f64).sum();
    Some((sum / values.len() as f64) as f32)
}

/// Percentile with linear interpolation between the two closest ranks.
///
/// `p` is on the 0-100 scale. The rank is `p/100 * (n - 1)`; when it lands
/// between two sorted values the result is interpolated between them. This is
/// the same definition numerical libraries use by default, so a threshold
/// tuned against those libraries keeps its meaning here.
///
/// The input does not need to be sorted. Returns None for an empty slice.
pub fn percentile(values: &[f32], p: f32) -> Option<f32> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let p = p.clamp(0.0, 100.0) as f64;
    let rank = p / 100.0 * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;

    let a = sorted[lo] as f64;
    let b = sorted[hi] as f64;
    Some((a + (b - a) * frac) as f32)
}
