//! Error types for physiology estimation.
//!
//! Every public entry point returns [`Result`]. Precondition violations are
//! reported before any processing starts; numerical degeneracy is handled by
//! explicit guards inside the pipeline and only surfaces here when it cannot
//! be absorbed.

use thiserror::Error;

use crate::channels::Channel;

/// Main error type for physiology estimation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PhysiologyError {
    /// Accelerometer and gyroscope windows differ in length.
    #[error("Length mismatch: {accel} accelerometer samples vs {gyro} gyroscope samples")]
    LengthMismatch { accel: usize, gyro: usize },

    /// Window is too short for the detrend window plus the FIR kernel.
    #[error("Insufficient samples: need at least {required}, got {actual}")]
    InsufficientSamples { required: usize, actual: usize },

    /// A raw sample was NaN or infinite.
    #[error("Non-finite sample on {channel} at index {index}")]
    NonFiniteSample { channel: Channel, index: usize },

    /// Configuration validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The source separator hit its iteration limit in strict mode.
    #[error("Source separation did not converge within {iterations} iterations")]
    SeparationDidNotConverge { iterations: usize },

    /// Numerical computation produced NaN or Inf.
    #[error("Numerical instability: {context}")]
    NumericalInstability { context: String },
}

/// Result type alias for physiology estimation.
pub type Result<T> = std::result::Result<T, PhysiologyError>;

impl PhysiologyError {
    /// Create a length mismatch error.
    #[must_use]
    pub const fn length_mismatch(accel: usize, gyro: usize) -> Self {
        Self::LengthMismatch { accel, gyro }
    }

    /// Create an insufficient samples error.
    #[must_use]
    pub const fn insufficient_samples(required: usize, actual: usize) -> Self {
        Self::InsufficientSamples { required, actual }
    }

    /// Create a non-finite sample error.
    #[must_use]
    pub const fn non_finite(channel: Channel, index: usize) -> Self {
        Self::NonFiniteSample { channel, index }
    }

    /// Create an invalid configuration error.
    #[must_use]
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create a numerical instability error.
    #[must_use]
    pub fn numerical_instability(context: impl Into<String>) -> Self {
        Self::NumericalInstability {
            context: context.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PhysiologyError::insufficient_samples(190, 50);
        assert!(err.to_string().contains("190"));
        assert!(err.to_string().contains("50"));

        let err = PhysiologyError::non_finite(Channel::GyroY, 7);
        assert_eq!(err.to_string(), "Non-finite sample on GyroY at index 7");
    }

    #[test]
    fn test_error_constructors() {
        let _ = PhysiologyError::length_mismatch(10, 20);
        let _ = PhysiologyError::invalid_config("min_bpm must be below max_bpm");
        let _ = PhysiologyError::numerical_instability("nan in whitening");
        let err = PhysiologyError::SeparationDidNotConverge { iterations: 200 };
        assert!(err.to_string().contains("200"));
    }
}
