//! Typed estimation outputs.
//!
//! A zero rate or zero confidence means no in-band signal was found. Treat it
//! as "no reliable estimate", never as a physiological value.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::diagnostics::{RateDiagnostics, WiggleDiagnostics};
use crate::ica::Convergence;

/// Spectral score of one separated component.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ComponentScore {
    /// Position of the component in the separator output.
    pub index: usize,
    /// In-band peak bin, 0 when nothing was found.
    pub peak_index: usize,
    /// Frequency of the peak bin in Hz.
    pub rate_hz: f64,
    /// Normalized in-band distribution at the peak bin.
    pub strength: f64,
    /// Raw FFT magnitude at the peak bin.
    pub magnitude: f64,
    /// Spectral kurtosis of the smoothed distribution.
    pub kurtosis: f64,
}

impl ComponentScore {
    /// Whether the component has any in-band peak.
    #[must_use]
    pub fn has_peak(&self) -> bool {
        self.magnitude > 0.0
    }

    /// Peak frequency in beats per minute.
    #[must_use]
    pub fn rate_bpm(&self) -> f64 {
        self.rate_hz * 60.0
    }
}

/// Result of one rate estimation pass.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RateEstimate {
    /// Peak frequency of the selected component in Hz.
    pub rate_hz: f64,

    /// Unsmoothed normalized distribution at the peak bin.
    pub strength: f64,

    /// Raw FFT magnitude at the peak bin.
    pub magnitude: f64,

    /// Spectral kurtosis of the selected component.
    pub kurtosis: f64,

    /// Index of the selected component in the separator output.
    pub selected_index: usize,

    /// Peak bin of the selected component.
    pub peak_index: usize,

    /// Length of the (padded) spectra.
    pub spectrum_len: usize,

    /// Number of rows that took part in separation (3 or 6).
    pub signal_count: usize,

    /// In-band distribution of the selected component.
    pub distribution: Vec<f64>,

    /// Scores of every component, in separator order.
    pub scores: Vec<ComponentScore>,

    /// Separator iterations.
    pub iterations: usize,

    /// Whether the separator converged.
    pub convergence: Convergence,

    /// Intermediate buffers, present when requested.
    pub diagnostics: Option<RateDiagnostics>,
}

impl RateEstimate {
    /// Rate in beats per minute.
    #[must_use]
    pub fn rate_bpm(&self) -> f64 {
        self.rate_hz * 60.0
    }

    /// Whether an in-band peak was found on the selected component.
    #[must_use]
    pub fn has_signal(&self) -> bool {
        self.magnitude > 0.0
    }
}

/// Heart rate estimate.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HeartRateReading {
    /// Heart rate in beats per minute.
    pub rate_bpm: f64,
    /// Share of in-band spectral mass at the peak, in `[0, 1]`.
    pub confidence: f64,
    /// Spectral kurtosis of the selected component.
    pub kurtosis: f64,
    /// Whether the separator converged.
    pub convergence: Convergence,
    /// Intermediate buffers, present when requested.
    pub diagnostics: Option<RateDiagnostics>,
}

impl From<RateEstimate> for HeartRateReading {
    fn from(estimate: RateEstimate) -> Self {
        Self {
            rate_bpm: estimate.rate_bpm(),
            confidence: estimate.strength,
            kurtosis: estimate.kurtosis,
            convergence: estimate.convergence,
            diagnostics: estimate.diagnostics,
        }
    }
}

/// Breathing rate estimate.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BreathingReading {
    /// Breathing rate in breaths per minute.
    pub rate_bpm: f64,
    /// Raw FFT magnitude at the peak of the selected component.
    pub magnitude: f64,
    /// Whether the separator converged.
    pub convergence: Convergence,
    /// Intermediate buffers, present when requested.
    pub diagnostics: Option<RateDiagnostics>,
}

impl From<RateEstimate> for BreathingReading {
    fn from(estimate: RateEstimate) -> Self {
        Self {
            rate_bpm: estimate.rate_bpm(),
            magnitude: estimate.magnitude,
            convergence: estimate.convergence,
            diagnostics: estimate.diagnostics,
        }
    }
}

/// Motion-intensity index.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WiggleReading {
    /// Mean of the per-sample trace; 0 for a perfectly still device.
    pub wiggle: f64,
    /// Sum over channels of the standard deviation of `|derivative|`.
    pub derivative_spread: f64,
    /// Per-sample mean `|derivative|` across the used channels.
    pub trace: Vec<f64>,
    /// Whether gyroscope channels contributed.
    pub gyroscope_used: bool,
    /// Intermediate buffers, present when requested.
    pub diagnostics: Option<WiggleDiagnostics>,
}
