//! Motion Physiology Library
//!
//! Heart rate, breathing rate and motion intensity from a handheld device's
//! accelerometer and gyroscope, using only the mechanical vibration carried
//! through the hand.
//!
//! # Features
//!
//! - **Source separation**: FastICA unmixes up to six correlated motion axes
//! - **Band scoring**: FFT peak, normalized distribution and spectral kurtosis
//! - **Fixed kernels**: physiology-specific FIR tables, selected by name
//! - **Wiggle index**: time-domain motion intensity, no FFT involved
//! - **Typed diagnostics**: intermediate buffers behind typed keys
//!
//! # Quick Start
//!
//! ```
//! use motion_physiology::{estimate_heart_rate, estimate_wiggle};
//! use std::f64::consts::PI;
//!
//! // 10 s at 60 Hz with a 70 BPM pulse on the accelerometer X axis
//! let accel: Vec<[f64; 3]> = (0..600)
//!     .map(|i| {
//!         let t = i as f64 / 60.0;
//!         [(2.0 * PI * 70.0 / 60.0 * t).sin(), 0.0, 9.81]
//!     })
//!     .collect();
//! let gyro = vec![[0.0; 3]; 600];
//!
//! let heart = estimate_heart_rate(&accel, &gyro, false)?;
//! assert!((heart.rate_bpm - 70.0).abs() < 2.0);
//!
//! let wiggle = estimate_wiggle(&accel, Some(&gyro), false)?;
//! assert!(wiggle.wiggle > 0.0);
//! # Ok::<(), motion_physiology::PhysiologyError>(())
//! ```
//!
//! # Presets
//!
//! | Preset | Band (BPM) | Kernel | Selection |
//! |--------|------------|--------|-----------|
//! | [`RateConfig::heart_rate`] | 50-130 | ballistocardiography | kurtosis |
//! | [`RateConfig::breathing`] | 8-45 | respiration low-pass | peak magnitude |
//!
//! A zero rate or confidence means no in-band signal was found, not a
//! physiological reading of zero.

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

pub mod channels;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod estimator;
pub mod ica;
pub mod math;
pub mod reading;
pub mod wiggle;

// Re-exports for convenient access
pub use channels::{Channel, ChannelMatrix, Vec3};
pub use config::{ComponentSelection, RateConfig, WiggleConfig, DEFAULT_SAMPLE_RATE_HZ};
pub use diagnostics::{ComponentDiagnostics, DiagnosticBuffer, RateDiagnostics, WiggleDiagnostics};
pub use error::{PhysiologyError, Result};
pub use estimator::{
    estimate_breathing_rate, estimate_breathing_rate_with_config, estimate_heart_rate,
    estimate_heart_rate_with_config, estimate_rate,
};
pub use ica::{Convergence, FastIca, Separation};
pub use math::kernels::FirKernel;
pub use reading::{BreathingReading, ComponentScore, HeartRateReading, RateEstimate, WiggleReading};
pub use wiggle::{estimate_wiggle, estimate_wiggle_with_config};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
