//! Time-domain conditioning: detrending, z-scoring, FIR filtering and
//! running averages.
//!
//! Every function here is causal. Filtering shortens a signal by the kernel
//! length; detrending, normalization and smoothing preserve length.

use super::stats::{mean, std_dev};

/// Standard deviation below which [`normalize`] only centers the signal.
pub const NORMALIZE_MIN_STD: f64 = 0.01;

/// Remove a slow baseline with a causal running average of `window` samples.
///
/// Before the window fills, the running sum is padded with `samples[0]`
/// rather than zeros, so early outputs are measured against the first sample.
#[must_use]
pub fn detrend(samples: &[f64], window: usize) -> Vec<f64> {
    let Some(&first) = samples.first() else {
        return Vec::new();
    };
    let w = window.max(1) as f64;

    let mut average = first;
    samples
        .iter()
        .enumerate()
        .map(|(i, &x)| {
            let leaving = if i < window { first } else { samples[i - window] };
            average += (x - leaving) / w;
            x - average
        })
        .collect()
}

/// Z-score in place: subtract the mean, then divide by the population
/// standard deviation when it exceeds [`NORMALIZE_MIN_STD`].
///
/// Near-constant signals are left centered but unscaled, which keeps
/// all-zero input at exactly zero.
pub fn normalize(samples: &mut [f64]) {
    if samples.is_empty() {
        return;
    }
    let m = mean(samples);
    let sd = std_dev(samples);
    let scale = sd > NORMALIZE_MIN_STD;

    for x in samples.iter_mut() {
        *x -= m;
        if scale {
            *x /= sd;
        }
    }
}

/// Causal FIR convolution keeping only fully overlapping taps.
///
/// `output[i] = Σ_k samples[i + K - k] * kernel[k]` for `K = kernel.len()`,
/// so tap 0 multiplies the newest sample. The output has
/// `samples.len() - kernel.len()` entries, or none when the kernel is longer.
#[must_use]
pub fn apply_fir(samples: &[f64], kernel: &[f64]) -> Vec<f64> {
    let k_len = kernel.len();
    if samples.len() <= k_len {
        return Vec::new();
    }

    (k_len..samples.len())
        .map(|i| {
            kernel
                .iter()
                .enumerate()
                .map(|(k, &c)| samples[i - k] * c)
                .sum()
        })
        .collect()
}

/// Causal running mean of the last `window` samples, divided by `window`.
///
/// The first `window - 1` outputs are averaged against implicit zeros and
/// the result lags the input by about `window / 2` samples, so never use it
/// to locate a peak.
#[must_use]
pub fn smooth(samples: &[f64], window: usize) -> Vec<f64> {
    let window = window.max(1);
    let w = window as f64;
    let mut sum = 0.0;

    samples
        .iter()
        .enumerate()
        .map(|(i, &x)| {
            sum += x;
            if i >= window {
                sum -= samples[i - window];
            }
            sum / w
        })
        .collect()
}

/// First-order difference `d[i] = x[i+1] - x[i]`, one sample shorter than
/// the input.
#[must_use]
pub fn derivative(samples: &[f64]) -> Vec<f64> {
    samples.windows(2).map(|w| w[1] - w[0]).collect()
}

/// Detrend, z-score and filter one raw row.
#[must_use]
pub fn preprocess(samples: &[f64], detrend_window: usize, kernel: &[f64]) -> Vec<f64> {
    let mut detrended = detrend(samples, detrend_window);
    normalize(&mut detrended);
    apply_fir(&detrended, kernel)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Direct transcription of the running-sum recurrence.
    fn detrend_reference(samples: &[f64], window: usize) -> Vec<f64> {
        let w = window as f64;
        let mut average = samples[0];
        let mut out = Vec::with_capacity(samples.len());
        for i in 0..samples.len() {
            if i < window {
                average -= samples[0] / w;
            } else {
                average -= samples[i - window] / w;
            }
            average += samples[i] / w;
            out.push(samples[i] - average);
        }
        out
    }

    #[test]
    fn test_detrend_matches_recurrence() {
        let samples: Vec<f64> = (0..300)
            .map(|i| 0.01 * i as f64 + (i as f64 * 0.3).sin() + 2.0)
            .collect();
        let out = detrend(&samples, 128);
        let reference = detrend_reference(&samples, 128);

        assert_eq!(out.len(), samples.len());
        for (a, b) in out.iter().zip(reference.iter()) {
            assert_relative_eq!(a, b, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_detrend_pads_with_first_sample() {
        // With every sample equal to the first, the baseline never moves
        let out = detrend(&[5.0; 20], 8);
        assert!(out.iter().all(|&x| x.abs() < 1e-12));

        // A step after the first sample is seen against the padded baseline
        let mut step = vec![0.0; 10];
        step[1..].iter_mut().for_each(|x| *x = 4.0);
        let out = detrend(&step, 4);
        assert_relative_eq!(out[0], 0.0);
        assert_relative_eq!(out[1], 3.0);
        assert_relative_eq!(out[2], 2.0);
        assert_relative_eq!(out[4], 0.0);
    }

    #[test]
    fn test_normalize_unit_variance() {
        let mut samples: Vec<f64> = (0..100).map(|i| 3.0 * (i as f64 * 0.2).sin() + 7.0).collect();
        normalize(&mut samples);
        assert_relative_eq!(mean(&samples), 0.0, epsilon = 1e-12);
        assert_relative_eq!(std_dev(&samples), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_normalize_all_zero_stays_finite() {
        let mut samples = vec![0.0; 64];
        normalize(&mut samples);
        assert!(samples.iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_normalize_near_constant_is_only_centered() {
        let mut samples = vec![1.0, 1.001, 0.999, 1.0];
        normalize(&mut samples);
        assert_relative_eq!(samples[1], 0.001, epsilon = 1e-12);
        assert_relative_eq!(samples[2], -0.001, epsilon = 1e-12);
    }

    #[test]
    fn test_fir_output_length() {
        let kernel = [0.25, 0.5, 0.25];
        for n in [0, 2, 3, 4, 10, 57] {
            let out = apply_fir(&vec![1.0; n], &kernel);
            assert_eq!(out.len(), n.saturating_sub(kernel.len()));
        }
    }

    #[test]
    fn test_fir_impulse_response() {
        // An impulse at index 0 is never fully overlapped, so it vanishes.
        // Later impulses replay the taps in order because tap 0 meets the
        // newest sample first.
        let kernel = [1.0, 2.0, 3.0, 4.0];
        let mut impulse = vec![0.0; 12];
        impulse[0] = 1.0;
        let out = apply_fir(&impulse, &kernel);
        assert_eq!(out.len(), 8);
        assert_eq!(out, vec![0.0; 8]);

        let mut impulse = vec![0.0; 12];
        impulse[4] = 1.0;
        let out = apply_fir(&impulse, &kernel);
        assert_eq!(&out[..4], &[1.0, 2.0, 3.0, 4.0]);
        assert!(out[4..].iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_fir_matches_indexing_formula() {
        let kernel = [0.1, -0.4, 0.7, 0.2, -0.05];
        let samples: Vec<f64> = (0..40).map(|i| (i as f64 * 0.37).cos()).collect();
        let out = apply_fir(&samples, &kernel);
        let k = kernel.len();
        for (i, &y) in out.iter().enumerate() {
            let expected: f64 = (0..k).map(|j| samples[i + k - j] * kernel[j]).sum();
            assert_relative_eq!(y, expected, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_smooth_causal_window() {
        let out = smooth(&[6.0, 6.0, 6.0, 0.0, 0.0, 0.0], 3);
        assert_eq!(out.len(), 6);
        assert_relative_eq!(out[0], 2.0);
        assert_relative_eq!(out[1], 4.0);
        assert_relative_eq!(out[2], 6.0);
        assert_relative_eq!(out[3], 4.0);
        assert_relative_eq!(out[5], 0.0);
    }

    #[test]
    fn test_derivative() {
        assert_eq!(derivative(&[1.0, 3.0, 2.0, 2.0]), vec![2.0, -1.0, 0.0]);
        assert!(derivative(&[1.0]).is_empty());
    }

    #[test]
    fn test_preprocess_shrinks_by_kernel() {
        let samples: Vec<f64> = (0..200).map(|i| (i as f64 * 0.1).sin()).collect();
        let out = preprocess(&samples, 128, &[0.5, 0.5]);
        assert_eq!(out.len(), 198);
        assert!(out.iter().all(|x| x.is_finite()));
    }
}
