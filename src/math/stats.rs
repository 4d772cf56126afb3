//! Basic statistics over fixed-length sample windows.

/// Arithmetic mean.
///
/// An empty slice is a caller error and yields NaN.
#[must_use]
pub fn mean(samples: &[f64]) -> f64 {
    samples.iter().sum::<f64>() / samples.len() as f64
}

/// Population standard deviation (denominator `N`).
#[must_use]
pub fn std_dev(samples: &[f64]) -> f64 {
    let m = mean(samples);
    let variance = samples.iter().map(|x| (x - m).powi(2)).sum::<f64>() / samples.len() as f64;
    variance.sqrt()
}
