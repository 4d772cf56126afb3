//! Mathematical utilities for physiology estimation.
//!
//! This module provides:
//! - [`stats`]: mean and population standard deviation
//! - [`filter`]: detrending, normalization, FIR filtering and smoothing
//! - [`kernels`]: fixed FIR kernel tables
//! - [`fft`]: FFT spectral analysis and band scores
//! - [`linalg`]: whitening and symmetric decorrelation

pub mod fft;
pub mod filter;
pub mod kernels;
pub mod linalg;
pub mod stats;

pub use fft::{
    magnitude_spectrum, normalized_distribution_in_range, padded_magnitude_spectrum,
    peak_in_range, power_spectrum_in_range, spectral_centroid, spectral_kurtosis, Band, Peak,
};
pub use filter::{apply_fir, derivative, detrend, normalize, preprocess, smooth};
pub use kernels::FirKernel;
pub use linalg::{symmetric_decorrelation, whiten, Whitening};
pub use stats::{mean, std_dev};
