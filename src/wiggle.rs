//! Motion-intensity ("wiggle") index.
//!
//! A pure time-domain score: the mean absolute first-order derivative over
//! the accelerometer axes, plus the gyroscope axes when one is present.
//! The first sample has no derivative and is dropped, so the per-sample trace
//! is one sample shorter than the input.

use tracing::debug;

use crate::channels::{is_all_zero, validate_motion, Channel, Vec3};
use crate::config::WiggleConfig;
use crate::diagnostics::WiggleDiagnostics;
use crate::error::{PhysiologyError, Result};
use crate::math::filter::{derivative, smooth};
use crate::math::stats::{mean, std_dev};
use crate::reading::WiggleReading;

/// Wiggle index on raw derivatives.
///
/// A gyroscope window of exact zeros is treated as absent.
///
/// # Errors
///
/// Returns an error if the gyroscope window differs in length, a sample is
/// non-finite, or fewer than two samples are given.
///
/// # Example
///
/// ```
/// use motion_physiology::estimate_wiggle;
///
/// let still = vec![[0.1, 0.2, 9.8]; 120];
/// let reading = estimate_wiggle(&still, None, false).unwrap();
/// assert_eq!(reading.wiggle, 0.0);
/// ```
pub fn estimate_wiggle(accel: &[Vec3], gyro: Option<&[Vec3]>, debug: bool) -> Result<WiggleReading> {
    estimate_wiggle_with_config(accel, gyro, &WiggleConfig::default(), debug)
}

/// Wiggle index with a custom configuration.
///
/// # Errors
///
/// See [`estimate_wiggle`]; also fails if `config` does not validate or the
/// window is shorter than [`WiggleConfig::min_input_len`].
pub fn estimate_wiggle_with_config(
    accel: &[Vec3],
    gyro: Option<&[Vec3]>,
    config: &WiggleConfig,
    debug: bool,
) -> Result<WiggleReading> {
    config.validate()?;
    validate_motion(accel, gyro)?;

    let required = config.min_input_len();
    if accel.len() < required {
        return Err(PhysiologyError::insufficient_samples(required, accel.len()));
    }

    let gyro = gyro.filter(|g| !is_all_zero(g));
    let gyroscope_used = gyro.is_some();
    let channels: &[Channel] = if gyroscope_used {
        &Channel::ALL
    } else {
        &Channel::ACCEL
    };

    let mut smoothed = Vec::new();
    let mut derivatives = Vec::with_capacity(channels.len());

    for &channel in channels {
        let source = if channel.is_gyro() { gyro.unwrap_or(&[]) } else { accel };
        let axis = channel.index() % 3;
        let row: Vec<f64> = source.iter().map(|s| s[axis]).collect();

        let row = match config.smoothing_window {
            Some(window) => {
                // Drop the warm-up outputs averaged against implicit zeros
                let settled = smooth(&row, window).split_off(window - 1);
                if debug {
                    smoothed.push((channel, settled.clone()));
                }
                settled
            }
            None => row,
        };

        let magnitude: Vec<f64> = derivative(&row).into_iter().map(f64::abs).collect();
        derivatives.push((channel, magnitude));
    }

    let count = derivatives.len() as f64;
    let trace_len = derivatives.first().map_or(0, |(_, d)| d.len());
    let trace: Vec<f64> = (0..trace_len)
        .map(|i| config.scale * derivatives.iter().map(|(_, d)| d[i]).sum::<f64>() / count)
        .collect();

    let wiggle = mean(&trace);
    let derivative_spread = config.scale
        * derivatives
            .iter()
            .map(|(_, d)| std_dev(d))
            .sum::<f64>();

    debug!(
        samples = accel.len(),
        channels = channels.len(),
        gyroscope_used,
        wiggle,
        "wiggle estimated"
    );

    let diagnostics = debug.then(|| WiggleDiagnostics {
        smoothed,
        derivatives,
        trace: trace.clone(),
    });

    Ok(WiggleReading {
        wiggle,
        derivative_spread,
        trace,
        gyroscope_used,
        diagnostics,
    })
}
