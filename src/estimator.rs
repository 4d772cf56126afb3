//! Rate estimation from motion windows.
//!
//! # Pipeline
//!
//! 1. Build the 6-row channel matrix, detecting an all-zero gyroscope
//! 2. Detrend, normalize and FIR-filter every row
//! 3. Separate the accelerometer rows (plus gyroscope rows when present)
//! 4. Score each component over the search band
//! 5. Select the best component and report its peak
//!
//! Rows in step 2 and components in step 4 are independent and fan out over
//! rayon when [`RateConfig::parallel`] is set.

use tracing::{debug, trace, warn};

use crate::channels::{ChannelMatrix, Vec3};
use crate::config::{ComponentSelection, RateConfig};
use crate::diagnostics::{ComponentDiagnostics, RateDiagnostics};
use crate::error::{PhysiologyError, Result};
use crate::ica::{Convergence, FastIca};
use crate::math::fft::{
    normalized_distribution_in_range, padded_len, padded_magnitude_spectrum, peak_in_range,
    spectral_kurtosis, Band,
};
use crate::math::filter::{preprocess, smooth};
use crate::reading::{BreathingReading, ComponentScore, HeartRateReading, RateEstimate};

/// Estimate heart rate with the heart rate preset.
///
/// # Errors
///
/// Returns an error if the windows differ in length, contain non-finite
/// samples, or are too short for the detrend window plus the kernel.
///
/// # Example
///
/// ```
/// use motion_physiology::estimate_heart_rate;
///
/// let accel: Vec<[f64; 3]> = (0..600)
///     .map(|i| {
///         let t = i as f64 / 60.0;
///         [(2.0 * std::f64::consts::PI * 1.2 * t).sin(), 0.0, 9.81]
///     })
///     .collect();
/// let gyro = vec![[0.0; 3]; 600];
///
/// let reading = estimate_heart_rate(&accel, &gyro, false).unwrap();
/// assert!((reading.rate_bpm - 72.0).abs() < 2.0);
/// ```
pub fn estimate_heart_rate(accel: &[Vec3], gyro: &[Vec3], debug: bool) -> Result<HeartRateReading> {
    estimate_heart_rate_with_config(accel, gyro, &RateConfig::heart_rate(), debug)
}

/// Estimate heart rate with a custom configuration.
///
/// # Errors
///
/// See [`estimate_rate`].
pub fn estimate_heart_rate_with_config(
    accel: &[Vec3],
    gyro: &[Vec3],
    config: &RateConfig,
    debug: bool,
) -> Result<HeartRateReading> {
    estimate_rate(accel, gyro, config, debug).map(HeartRateReading::from)
}

/// Estimate breathing rate with the breathing preset.
///
/// # Errors
///
/// Returns an error if the windows differ in length, contain non-finite
/// samples, or are too short for the detrend window plus the kernel.
pub fn estimate_breathing_rate(
    accel: &[Vec3],
    gyro: &[Vec3],
    parallel: bool,
    debug: bool,
) -> Result<BreathingReading> {
    let config = RateConfig::breathing().with_parallel(parallel);
    estimate_breathing_rate_with_config(accel, gyro, &config, debug)
}

/// Estimate breathing rate with a custom configuration.
///
/// # Errors
///
/// See [`estimate_rate`].
pub fn estimate_breathing_rate_with_config(
    accel: &[Vec3],
    gyro: &[Vec3],
    config: &RateConfig,
    debug: bool,
) -> Result<BreathingReading> {
    estimate_rate(accel, gyro, config, debug).map(BreathingReading::from)
}

/// Run the full rate pipeline.
///
/// Deterministic for a fixed [`RateConfig::ica_seed`]; parallel and
/// sequential runs give identical results.
///
/// # Errors
///
/// - [`PhysiologyError::InvalidConfig`] if `config` does not validate
/// - [`PhysiologyError::LengthMismatch`] if the windows differ in length
/// - [`PhysiologyError::NonFiniteSample`] on NaN or infinite input
/// - [`PhysiologyError::InsufficientSamples`] below [`RateConfig::min_input_len`]
/// - [`PhysiologyError::SeparationDidNotConverge`] if the separator hits its
///   limit and [`RateConfig::strict_convergence`] is set
pub fn estimate_rate(
    accel: &[Vec3],
    gyro: &[Vec3],
    config: &RateConfig,
    debug: bool,
) -> Result<RateEstimate> {
    config.validate()?;

    // ========================================
    // Step 1: Channel matrix
    // ========================================
    let matrix = ChannelMatrix::from_motion(accel, gyro)?;
    let required = config.min_input_len();
    if matrix.len() < required {
        return Err(PhysiologyError::insufficient_samples(required, matrix.len()));
    }

    let signal_count = matrix.signal_count();
    if !matrix.gyroscope_present() {
        warn!("gyroscope reported only zeros, separating accelerometer rows only");
    }
    debug!(
        samples = matrix.len(),
        signal_count,
        min_bpm = config.min_bpm,
        max_bpm = config.max_bpm,
        "estimating rate"
    );

    // ========================================
    // Step 2: Preprocess all six rows
    // ========================================
    let kernel = config.kernel.coefficients();
    let preprocessed = map_rows(matrix.rows(), config.parallel, |_, row| {
        preprocess(row, config.detrend_window, kernel)
    });

    // ========================================
    // Step 3: Source separation
    // ========================================
    let separation = FastIca::new()
        .with_max_iterations(config.ica_max_iterations)
        .with_tolerance(config.ica_tolerance)
        .with_seed(config.ica_seed)
        .separate(&preprocessed[..signal_count])?;

    if separation.convergence == Convergence::IterationLimit {
        if config.strict_convergence {
            return Err(PhysiologyError::SeparationDidNotConverge {
                iterations: separation.iterations,
            });
        }
        warn!(
            iterations = separation.iterations,
            "source separation hit its iteration limit"
        );
    }

    // ========================================
    // Step 4: Per-component spectral scoring
    // ========================================
    let band = config.band();
    let analyses = map_rows(&separation.components, config.parallel, |index, component| {
        analyze_component(index, component, config, &band)
    });
    for analysis in &analyses {
        let s = &analysis.score;
        trace!(
            component = s.index,
            rate_bpm = s.rate_bpm(),
            kurtosis = s.kurtosis,
            strength = s.strength,
            magnitude = s.magnitude,
            "component scored"
        );
    }

    // ========================================
    // Step 5: Selection
    // ========================================
    let scores: Vec<ComponentScore> = analyses.iter().map(|a| a.score).collect();
    let selected_index = select_component(&scores, config.selection);
    let selected = scores[selected_index];
    let spectrum_len = analyses[selected_index].spectrum.len();
    let distribution = analyses[selected_index].distribution.clone();

    debug!(
        selected = selected_index,
        rate_bpm = selected.rate_bpm(),
        kurtosis = selected.kurtosis,
        strength = selected.strength,
        "component selected"
    );

    let diagnostics = debug.then(|| RateDiagnostics {
        raw: matrix.into_rows(),
        preprocessed,
        components: analyses
            .into_iter()
            .zip(separation.components)
            .map(|(analysis, signal)| ComponentDiagnostics {
                signal,
                spectrum: analysis.spectrum,
                distribution: analysis.distribution,
                smoothed_distribution: analysis.smoothed_distribution,
                score: analysis.score,
            })
            .collect(),
        selected_index,
    });

    Ok(RateEstimate {
        rate_hz: selected.rate_hz,
        strength: selected.strength,
        magnitude: selected.magnitude,
        kurtosis: selected.kurtosis,
        selected_index,
        peak_index: selected.peak_index,
        spectrum_len,
        signal_count,
        distribution,
        scores,
        iterations: separation.iterations,
        convergence: separation.convergence,
        diagnostics,
    })
}

/// Spectral buffers and score of one component.
struct ComponentAnalysis {
    spectrum: Vec<f64>,
    distribution: Vec<f64>,
    smoothed_distribution: Vec<f64>,
    score: ComponentScore,
}

fn analyze_component(
    index: usize,
    component: &[f64],
    config: &RateConfig,
    band: &Band,
) -> ComponentAnalysis {
    let len = padded_len(component.len(), config.spectral_padding);
    let spectrum = padded_magnitude_spectrum(component, len);
    let peak = peak_in_range(&spectrum, band);
    let distribution = normalized_distribution_in_range(&spectrum, band);
    let smoothed_distribution = smooth(&distribution, config.kurtosis_smoothing_window);
    let kurtosis = spectral_kurtosis(&smoothed_distribution, band);

    let score = if peak.is_found() {
        ComponentScore {
            index,
            peak_index: peak.index,
            rate_hz: band.bin_hz(peak.index, spectrum.len()),
            strength: distribution[peak.index],
            magnitude: peak.amplitude,
            kurtosis,
        }
    } else {
        ComponentScore {
            index,
            peak_index: 0,
            rate_hz: 0.0,
            strength: 0.0,
            magnitude: 0.0,
            kurtosis,
        }
    };

    ComponentAnalysis {
        spectrum,
        distribution,
        smoothed_distribution,
        score,
    }
}

/// Index of the best-scoring component.
///
/// Scanning in order, a component replaces the current best when its score is
/// `>=`, so exact ties go to the later component. A component without any
/// in-band peak never replaces one that has a peak.
fn select_component(scores: &[ComponentScore], selection: ComponentSelection) -> usize {
    let key = |s: &ComponentScore| match selection {
        ComponentSelection::Kurtosis => s.kurtosis,
        ComponentSelection::PeakMagnitude => s.magnitude,
    };

    let mut best = 0;
    for (i, candidate) in scores.iter().enumerate().skip(1) {
        let current = &scores[best];
        let replace = if candidate.has_peak() == current.has_peak() {
            key(candidate) >= key(current)
        } else {
            candidate.has_peak()
        };
        if replace {
            best = i;
        }
    }
    best
}

/// Apply `f` to every row, on the rayon pool when `parallel` is set.
fn map_rows<T, F>(rows: &[Vec<f64>], parallel: bool, f: F) -> Vec<T>
where
    T: Send,
    F: Fn(usize, &[f64]) -> T + Sync + Send,
{
    #[cfg(feature = "parallel")]
    {
        if parallel {
            use rayon::prelude::*;
            return rows
                .par_iter()
                .enumerate()
                .map(|(i, row)| f(i, row))
                .collect();
        }
    }
    #[cfg(not(feature = "parallel"))]
    let _ = parallel;

    rows.iter().enumerate().map(|(i, row)| f(i, row)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn score(index: usize, kurtosis: f64, magnitude: f64) -> ComponentScore {
        ComponentScore {
            index,
            peak_index: if magnitude > 0.0 { 10 } else { 0 },
            rate_hz: 1.0,
            strength: 0.1,
            magnitude,
            kurtosis,
        }
    }

    fn pulse_window(n: usize, bpm: f64) -> (Vec<Vec3>, Vec<Vec3>) {
        let hz = bpm / 60.0;
        let accel = (0..n)
            .map(|i| {
                let t = i as f64 / 60.0;
                [
                    (2.0 * PI * hz * t).sin(),
                    0.3 * (i as f64 * 1.3).sin(),
                    0.2 * (i as f64 * 2.1).cos() + 9.81,
                ]
            })
            .collect();
        let gyro = (0..n)
            .map(|i| {
                [
                    0.1 * (i as f64 * 0.9).sin(),
                    0.1 * (i as f64 * 1.7).cos(),
                    0.05 * (i as f64 * 2.6).sin(),
                ]
            })
            .collect();
        (accel, gyro)
    }

    #[test]
    fn test_select_kurtosis_ties_go_to_later() {
        let scores = [score(0, 3.0, 1.0), score(1, 5.0, 1.0), score(2, 5.0, 1.0)];
        assert_eq!(select_component(&scores, ComponentSelection::Kurtosis), 2);

        let scores = [score(0, 9.0, 1.0), score(1, 5.0, 1.0)];
        assert_eq!(select_component(&scores, ComponentSelection::Kurtosis), 0);
    }

    #[test]
    fn test_select_peak_magnitude() {
        let scores = [score(0, 9.0, 1.0), score(1, 0.0, 4.0), score(2, 1.0, 2.0)];
        assert_eq!(select_component(&scores, ComponentSelection::PeakMagnitude), 1);
    }

    #[test]
    fn test_select_skips_components_without_peak() {
        let scores = [score(0, -0.5, 1.0), score(1, 0.0, 0.0), score(2, -0.2, 0.0)];
        assert_eq!(select_component(&scores, ComponentSelection::Kurtosis), 0);

        let silent = [score(0, 0.0, 0.0), score(1, 0.0, 0.0)];
        assert_eq!(select_component(&silent, ComponentSelection::Kurtosis), 1);
    }

    #[test]
    fn test_analyze_pure_tone() {
        let config = RateConfig::heart_rate();
        let band = config.band();
        let component: Vec<f64> = (0..480)
            .map(|i| (2.0 * PI * 1.25 * i as f64 / 60.0).sin())
            .collect();
        let analysis = analyze_component(4, &component, &config, &band);

        assert_eq!(analysis.spectrum.len(), 2048);
        assert_eq!(analysis.score.index, 4);
        assert!((analysis.score.rate_bpm() - 75.0).abs() < 1.0);
        assert!(analysis.score.strength > 0.0);
        assert!(analysis.score.kurtosis > 0.0);
    }

    #[test]
    fn test_analyze_silent_component() {
        let config = RateConfig::heart_rate();
        let band = config.band();
        let analysis = analyze_component(0, &[0.0; 300], &config, &band);
        assert!(!analysis.score.has_peak());
        assert_eq!(analysis.score.rate_hz, 0.0);
        assert_eq!(analysis.score.kurtosis, 0.0);
        assert!(analysis.distribution.iter().all(|&p| p == 0.0));
    }

    #[test]
    fn test_estimate_rate_reports_pipeline_shape() {
        let (accel, gyro) = pulse_window(600, 66.0);
        let estimate = estimate_rate(&accel, &gyro, &RateConfig::heart_rate(), true).unwrap();

        assert_eq!(estimate.signal_count, 6);
        assert_eq!(estimate.scores.len(), 6);
        assert_eq!(estimate.spectrum_len, 4096);
        assert!((estimate.rate_bpm() - 66.0).abs() < 2.0);

        let diagnostics = estimate.diagnostics.unwrap();
        assert_eq!(diagnostics.raw.len(), 6);
        assert_eq!(diagnostics.preprocessed[0].len(), 600 - 61);
        assert_eq!(diagnostics.components.len(), 6);
        assert_eq!(diagnostics.selected_index, estimate.selected_index);
    }

    #[test]
    fn test_too_short_window() {
        let (accel, gyro) = pulse_window(189, 70.0);
        let err = estimate_rate(&accel, &gyro, &RateConfig::heart_rate(), false).unwrap_err();
        assert_eq!(err, PhysiologyError::insufficient_samples(190, 189));

        let (accel, gyro) = pulse_window(190, 70.0);
        assert!(estimate_rate(&accel, &gyro, &RateConfig::heart_rate(), false).is_ok());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let (accel, gyro) = pulse_window(600, 70.0);
        let config = RateConfig::heart_rate().with_band(90.0, 60.0);
        assert!(matches!(
            estimate_rate(&accel, &gyro, &config, false),
            Err(PhysiologyError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_strict_convergence() {
        let (accel, gyro) = pulse_window(600, 70.0);
        let mut config = RateConfig::heart_rate()
            .with_ica_max_iterations(1)
            .with_strict_convergence(true);
        config.ica_tolerance = 1e-15;

        assert_eq!(
            estimate_rate(&accel, &gyro, &config, false).unwrap_err(),
            PhysiologyError::SeparationDidNotConverge { iterations: 1 }
        );

        config.strict_convergence = false;
        let estimate = estimate_rate(&accel, &gyro, &config, false).unwrap();
        assert_eq!(estimate.convergence, Convergence::IterationLimit);
    }
}
