//! FFT spectral analysis for rate estimation.
//!
//! This module provides magnitude spectra and the band-limited scores built on
//! them: peak extraction, normalized distributions, power spectra, spectral
//! centroid and spectral kurtosis.
//!
//! ## Bands
//!
//! A [`Band`] is expressed in beats per minute and converted to Hz by `/ 60`.
//! Bin `i` of an `M`-point spectrum sits at `sample_rate_hz / M * i`, and only
//! bins strictly inside `(min_bpm / 60, max_bpm / 60)` count as in-band.

use num_complex::Complex64;
use rustfft::FftPlanner;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Physiological search band over a spectrum.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Band {
    /// Lower bound in beats per minute (exclusive).
    pub min_bpm: f64,
    /// Upper bound in beats per minute (exclusive).
    pub max_bpm: f64,
    /// Sampling rate of the analysed signal in Hz.
    pub sample_rate_hz: f64,
}

impl Band {
    /// Create a band.
    #[must_use]
    pub const fn new(min_bpm: f64, max_bpm: f64, sample_rate_hz: f64) -> Self {
        Self {
            min_bpm,
            max_bpm,
            sample_rate_hz,
        }
    }

    /// Frequency of bin `index` in an `len`-point spectrum.
    #[must_use]
    pub fn bin_hz(&self, index: usize, len: usize) -> f64 {
        bin_to_hz(index, len, self.sample_rate_hz)
    }

    /// Whether bin `index` lies strictly inside the band.
    #[must_use]
    pub fn contains_bin(&self, index: usize, len: usize) -> bool {
        let hz = self.bin_hz(index, len);
        self.min_bpm / 60.0 < hz && hz < self.max_bpm / 60.0
    }
}

/// Largest in-band spectral bin.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Peak {
    /// Bin index, 0 when nothing in the band is above zero.
    pub index: usize,
    /// Magnitude at `index`, 0 when no peak was found.
    pub amplitude: f64,
}

impl Peak {
    /// Whether an in-band peak was found.
    #[must_use]
    pub fn is_found(&self) -> bool {
        self.amplitude > 0.0
    }
}

/// Frequency in Hz of bin `index` in an `len`-point spectrum.
#[must_use]
pub fn bin_to_hz(index: usize, len: usize, sample_rate_hz: f64) -> f64 {
    sample_rate_hz / len as f64 * index as f64
}

/// Length to zero-pad a `len`-sample signal to before transforming.
///
/// A factor of 1 or less disables padding.
#[must_use]
pub fn padded_len(len: usize, factor: usize) -> usize {
    if factor <= 1 || len == 0 {
        len
    } else {
        (len * factor).next_power_of_two()
    }
}

/// Magnitude spectrum `sqrt(re² + im²)` of a real signal, same length as the
/// input.
#[must_use]
pub fn magnitude_spectrum(signal: &[f64]) -> Vec<f64> {
    padded_magnitude_spectrum(signal, signal.len())
}

/// Magnitude spectrum of `signal` zero-padded to `len` points.
///
/// `len` below the signal length is raised to the signal length.
#[must_use]
pub fn padded_magnitude_spectrum(signal: &[f64], len: usize) -> Vec<f64> {
    let n = len.max(signal.len());
    if n == 0 {
        return Vec::new();
    }

    let mut buffer: Vec<Complex64> = signal
        .iter()
        .map(|&x| Complex64::new(x, 0.0))
        .chain(std::iter::repeat(Complex64::new(0.0, 0.0)))
        .take(n)
        .collect();

    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(n);
    fft.process(&mut buffer);

    buffer.iter().map(|c| c.norm()).collect()
}

/// Largest in-band bin, first occurrence winning ties.
///
/// Returns index 0 with amplitude 0 when no in-band bin is above zero; treat
/// that as "no signal", not as a valid peak.
#[must_use]
pub fn peak_in_range(spectrum: &[f64], band: &Band) -> Peak {
    let len = spectrum.len();
    let mut peak = Peak {
        index: 0,
        amplitude: 0.0,
    };

    for (i, &magnitude) in spectrum.iter().enumerate() {
        if band.contains_bin(i, len) && magnitude > peak.amplitude {
            peak = Peak {
                index: i,
                amplitude: magnitude,
            };
        }
    }

    peak
}

/// In-band magnitudes divided by their sum, zero elsewhere.
///
/// Sums to 1 over the band, or is all zeros when the band holds no energy.
#[must_use]
pub fn normalized_distribution_in_range(spectrum: &[f64], band: &Band) -> Vec<f64> {
    let len = spectrum.len();
    let total: f64 = spectrum
        .iter()
        .enumerate()
        .filter(|&(i, _)| band.contains_bin(i, len))
        .map(|(_, &m)| m)
        .sum();

    if total <= 0.0 {
        return vec![0.0; len];
    }

    spectrum
        .iter()
        .enumerate()
        .map(|(i, &m)| if band.contains_bin(i, len) { m / total } else { 0.0 })
        .collect()
}

/// Squared magnitude inside the band, zero elsewhere.
#[must_use]
pub fn power_spectrum_in_range(spectrum: &[f64], band: &Band) -> Vec<f64> {
    let len = spectrum.len();
    spectrum
        .iter()
        .enumerate()
        .map(|(i, &m)| if band.contains_bin(i, len) { m * m } else { 0.0 })
        .collect()
}

/// Power-weighted mean frequency `Σ(p·f) / Σp` over the whole spectrum.
///
/// Returns 0 for a spectrum without power.
#[must_use]
pub fn spectral_centroid(power: &[f64], band: &Band) -> f64 {
    let len = power.len();
    let (weighted, total) = power
        .iter()
        .enumerate()
        .fold((0.0, 0.0), |(weighted, total), (i, &p)| {
            (weighted + p * band.bin_hz(i, len), total + p)
        });

    if total > 0.0 {
        weighted / total
    } else {
        0.0
    }
}

/// Peakedness of the in-band power around its centroid.
///
/// Fourth central moment over the squared second moment, minus 2. A single
/// dominant frequency scores high; broadband spread scores near zero. Returns
/// 0 when the band holds no power or all power sits in one bin.
#[must_use]
pub fn spectral_kurtosis(spectrum: &[f64], band: &Band) -> f64 {
    let power = power_spectrum_in_range(spectrum, band);
    let total: f64 = power.iter().sum();
    if total <= 0.0 {
        return 0.0;
    }

    let centroid = spectral_centroid(&power, band);
    let len = power.len();
    let (m2, m4) = power
        .iter()
        .enumerate()
        .fold((0.0, 0.0), |(m2, m4), (i, &p)| {
            let d = band.bin_hz(i, len) - centroid;
            let d2 = d * d;
            (m2 + p * d2, m4 + p * d2 * d2)
        });
    let m2 = m2 / total;
    let m4 = m4 / total;

    if m2 <= f64::EPSILON * centroid.abs().max(1.0) {
        return 0.0;
    }

    m4 / (m2 * m2) - 2.0
}
