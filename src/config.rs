//! Configuration for physiology estimation.
//!
//! This module provides [`RateConfig`], which centralizes the parameters of a
//! rate estimation pass, and [`WiggleConfig`] for the motion-intensity index.
//! Filter coefficients are fixed; only the choice among the named kernels is
//! configurable.
//!
//! # Example
//!
//! ```
//! use motion_physiology::RateConfig;
//!
//! // Presets for the two physiological bands
//! let heart = RateConfig::heart_rate();
//! let breathing = RateConfig::breathing().with_parallel(false);
//!
//! assert!(heart.validate().is_ok());
//! assert_eq!(breathing.min_input_len(), 128 + 93 + 1);
//! ```

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{PhysiologyError, Result};
use crate::math::fft::Band;
use crate::math::kernels::FirKernel;

/// Sampling rate assumed by the presets.
pub const DEFAULT_SAMPLE_RATE_HZ: f64 = 60.0;

/// How the best component is chosen after separation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ComponentSelection {
    /// Highest spectral kurtosis of the smoothed in-band distribution.
    /// Confidence is the unsmoothed distribution at the peak bin.
    #[default]
    Kurtosis,
    /// Largest raw FFT magnitude at the in-band peak.
    PeakMagnitude,
}

/// Configuration for one rate estimation pass.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RateConfig {
    /// Sampling rate of the motion windows in Hz.
    pub sample_rate_hz: f64,

    // Search band
    /// Lower edge of the physiological band in BPM (exclusive).
    pub min_bpm: f64,

    /// Upper edge of the physiological band in BPM (exclusive).
    pub max_bpm: f64,

    // Preprocessing
    /// FIR kernel applied after detrending and normalization.
    pub kernel: FirKernel,

    /// Running-average window used by detrending.
    pub detrend_window: usize,

    // Scoring
    /// Window of the running mean applied to distributions before kurtosis.
    pub kurtosis_smoothing_window: usize,

    /// Component selection policy.
    pub selection: ComponentSelection,

    /// Zero-padding factor before the FFT.
    /// - 1: no padding, one bin per `sample_rate_hz / len`
    /// - 4: default, padded to the next power of two of `4 * len`
    pub spectral_padding: usize,

    // Source separation
    /// Iteration limit of the fixed-point separator.
    pub ica_max_iterations: usize,

    /// Convergence tolerance on `|<w_new, w_old>| - 1`.
    pub ica_tolerance: f64,

    /// Seed of the deterministic unmixing initialization.
    pub ica_seed: u64,

    /// Whether hitting the iteration limit is an error instead of a status.
    pub strict_convergence: bool,

    /// Fan per-channel and per-component work out over a thread pool.
    /// Has no effect without the `parallel` feature.
    pub parallel: bool,
}

impl Default for RateConfig {
    fn default() -> Self {
        Self::heart_rate()
    }
}

impl RateConfig {
    /// Create a new configuration with default (heart rate) values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Preset for heart rate: 50-130 BPM on the ballistocardiography band,
    /// kurtosis selection.
    #[must_use]
    pub const fn heart_rate() -> Self {
        Self {
            sample_rate_hz: DEFAULT_SAMPLE_RATE_HZ,
            min_bpm: 50.0,
            max_bpm: 130.0,
            kernel: FirKernel::Ballistocardiography,
            detrend_window: 128,
            kurtosis_smoothing_window: 6,
            selection: ComponentSelection::Kurtosis,
            spectral_padding: 4,
            ica_max_iterations: 200,
            ica_tolerance: 1e-4,
            ica_seed: 42,
            strict_convergence: false,
            parallel: false,
        }
    }

    /// Preset for breathing: 8-45 BPM on the respiration low-pass, peak
    /// magnitude selection.
    #[must_use]
    pub const fn breathing() -> Self {
        Self {
            min_bpm: 8.0,
            max_bpm: 45.0,
            kernel: FirKernel::LowPassRespiration,
            selection: ComponentSelection::PeakMagnitude,
            parallel: true,
            ..Self::heart_rate()
        }
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any parameter is out of valid range.
    pub fn validate(&self) -> Result<()> {
        if !self.sample_rate_hz.is_finite() || self.sample_rate_hz <= 0.0 {
            return Err(PhysiologyError::invalid_config(
                "sample_rate_hz must be positive",
            ));
        }
        if self.min_bpm.is_nan() || self.min_bpm < 0.0 || self.min_bpm >= self.max_bpm {
            return Err(PhysiologyError::invalid_config(
                "min_bpm must be non-negative and below max_bpm",
            ));
        }
        if self.max_bpm / 60.0 > self.sample_rate_hz / 2.0 {
            return Err(PhysiologyError::invalid_config(
                "max_bpm must not exceed the Nyquist frequency",
            ));
        }
        if self.detrend_window < 1 {
            return Err(PhysiologyError::invalid_config(
                "detrend_window must be at least 1",
            ));
        }
        if self.kurtosis_smoothing_window < 1 {
            return Err(PhysiologyError::invalid_config(
                "kurtosis_smoothing_window must be at least 1",
            ));
        }
        if self.spectral_padding < 1 {
            return Err(PhysiologyError::invalid_config(
                "spectral_padding must be at least 1",
            ));
        }
        if self.ica_max_iterations < 1 {
            return Err(PhysiologyError::invalid_config(
                "ica_max_iterations must be at least 1",
            ));
        }
        if self.ica_tolerance.is_nan() || self.ica_tolerance <= 0.0 {
            return Err(PhysiologyError::invalid_config(
                "ica_tolerance must be positive",
            ));
        }
        Ok(())
    }

    /// Search band of this configuration.
    #[must_use]
    pub const fn band(&self) -> Band {
        Band::new(self.min_bpm, self.max_bpm, self.sample_rate_hz)
    }

    /// Smallest window accepted by rate estimation.
    ///
    /// Detrending needs a full window and filtering removes one sample per
    /// tap, so the window must be strictly longer than both together.
    #[must_use]
    pub const fn min_input_len(&self) -> usize {
        self.kernel.len() + self.detrend_window + 1
    }

    /// Set the sampling rate.
    #[must_use]
    pub const fn with_sample_rate(mut self, sample_rate_hz: f64) -> Self {
        self.sample_rate_hz = sample_rate_hz;
        self
    }

    /// Set the search band in BPM.
    #[must_use]
    pub const fn with_band(mut self, min_bpm: f64, max_bpm: f64) -> Self {
        self.min_bpm = min_bpm;
        self.max_bpm = max_bpm;
        self
    }

    /// Set the FIR kernel.
    #[must_use]
    pub const fn with_kernel(mut self, kernel: FirKernel) -> Self {
        self.kernel = kernel;
        self
    }

    /// Set the component selection policy.
    #[must_use]
    pub const fn with_selection(mut self, selection: ComponentSelection) -> Self {
        self.selection = selection;
        self
    }

    /// Set the zero-padding factor.
    #[must_use]
    pub const fn with_spectral_padding(mut self, factor: usize) -> Self {
        self.spectral_padding = factor;
        self
    }

    /// Set the separator seed.
    #[must_use]
    pub const fn with_ica_seed(mut self, seed: u64) -> Self {
        self.ica_seed = seed;
        self
    }

    /// Set the separator iteration limit.
    #[must_use]
    pub const fn with_ica_max_iterations(mut self, iterations: usize) -> Self {
        self.ica_max_iterations = iterations;
        self
    }

    /// Treat separator non-convergence as an error.
    #[must_use]
    pub const fn with_strict_convergence(mut self, strict: bool) -> Self {
        self.strict_convergence = strict;
        self
    }

    /// Enable/disable parallel fan-out.
    #[must_use]
    pub const fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

/// Configuration for the wiggle index.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WiggleConfig {
    /// Running-mean window applied to each channel before differencing.
    /// `None` works on raw derivatives.
    pub smoothing_window: Option<usize>,

    /// Multiplier applied to the per-sample and overall index.
    pub scale: f64,
}

impl Default for WiggleConfig {
    fn default() -> Self {
        Self {
            smoothing_window: None,
            scale: 1.0,
        }
    }
}

impl WiggleConfig {
    /// Create a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Smoothed variant: window-16 running mean before differencing, with the
    /// smoothing warm-up dropped.
    #[must_use]
    pub const fn legacy() -> Self {
        Self {
            smoothing_window: Some(16),
            scale: 1.0,
        }
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the window is zero or the scale is not finite and
    /// non-negative.
    pub fn validate(&self) -> Result<()> {
        if self.smoothing_window == Some(0) {
            return Err(PhysiologyError::invalid_config(
                "smoothing_window must be at least 1",
            ));
        }
        if !self.scale.is_finite() || self.scale < 0.0 {
            return Err(PhysiologyError::invalid_config(
                "scale must be finite and non-negative",
            ));
        }
        Ok(())
    }

    /// Smallest window that yields a non-empty trace.
    #[must_use]
    pub const fn min_input_len(&self) -> usize {
        match self.smoothing_window {
            Some(w) => w + 1,
            None => 2,
        }
    }

    /// Set the scale.
    #[must_use]
    pub const fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    /// Set the smoothing window.
    #[must_use]
    pub const fn with_smoothing_window(mut self, window: Option<usize>) -> Self {
        self.smoothing_window = window;
        self
    }
}
