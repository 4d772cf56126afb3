//! Channel matrix construction from raw motion vectors.
//!
//! The pipeline works on one row per sensor axis. Row order is fixed and
//! meaningful: accelerometer X, Y, Z followed by gyroscope X, Y, Z.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{PhysiologyError, Result};

/// One tri-axial sample `[x, y, z]`.
pub type Vec3 = [f64; 3];

/// A single sensor axis, in row order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Channel {
    AccelX,
    AccelY,
    AccelZ,
    GyroX,
    GyroY,
    GyroZ,
}

impl Channel {
    /// All channels in row order.
    pub const ALL: [Self; 6] = [
        Self::AccelX,
        Self::AccelY,
        Self::AccelZ,
        Self::GyroX,
        Self::GyroY,
        Self::GyroZ,
    ];

    /// Accelerometer channels only.
    pub const ACCEL: [Self; 3] = [Self::AccelX, Self::AccelY, Self::AccelZ];

    /// Row index of this channel in a [`ChannelMatrix`].
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Whether the channel comes from the gyroscope.
    #[must_use]
    pub const fn is_gyro(self) -> bool {
        matches!(self, Self::GyroX | Self::GyroY | Self::GyroZ)
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::AccelX => "AccelX",
            Self::AccelY => "AccelY",
            Self::AccelZ => "AccelZ",
            Self::GyroX => "GyroX",
            Self::GyroY => "GyroY",
            Self::GyroZ => "GyroZ",
        };
        f.write_str(name)
    }
}

/// Six equal-length rows built from an accelerometer and a gyroscope window.
///
/// A gyroscope that reports exact zeros on every axis for the whole window is
/// treated as absent: all six rows are still carried, but only the
/// accelerometer rows take part in source separation.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelMatrix {
    rows: Vec<Vec<f64>>,
    gyroscope_present: bool,
}

impl ChannelMatrix {
    /// Build the matrix, validating lengths and sample values.
    ///
    /// # Errors
    ///
    /// Returns an error if the windows differ in length or contain a
    /// non-finite sample.
    pub fn from_motion(accel: &[Vec3], gyro: &[Vec3]) -> Result<Self> {
        validate_motion(accel, Some(gyro))?;

        let mut rows = vec![Vec::with_capacity(accel.len()); 6];
        for (a, g) in accel.iter().zip(gyro.iter()) {
            for axis in 0..3 {
                rows[axis].push(a[axis]);
                rows[axis + 3].push(g[axis]);
            }
        }

        let gyroscope_present = !is_all_zero(gyro);

        Ok(Self {
            rows,
            gyroscope_present,
        })
    }

    /// Number of samples per row.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows[0].len()
    }

    /// Whether the rows are empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Row for one channel.
    #[must_use]
    pub fn row(&self, channel: Channel) -> &[f64] {
        &self.rows[channel.index()]
    }

    /// All six rows in channel order.
    #[must_use]
    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    /// Consume the matrix, returning its rows.
    #[must_use]
    pub fn into_rows(self) -> Vec<Vec<f64>> {
        self.rows
    }

    /// Whether the gyroscope reported any non-zero sample.
    #[must_use]
    pub const fn gyroscope_present(&self) -> bool {
        self.gyroscope_present
    }

    /// Number of rows that take part in source separation (3 or 6).
    #[must_use]
    pub const fn signal_count(&self) -> usize {
        if self.gyroscope_present {
            6
        } else {
            3
        }
    }
}

/// Validate raw motion windows.
///
/// # Errors
///
/// Returns [`PhysiologyError::LengthMismatch`] when a gyroscope window is given
/// with a different length, or [`PhysiologyError::NonFiniteSample`] on NaN/Inf.
pub fn validate_motion(accel: &[Vec3], gyro: Option<&[Vec3]>) -> Result<()> {
    if let Some(gyro) = gyro {
        if gyro.len() != accel.len() {
            return Err(PhysiologyError::length_mismatch(accel.len(), gyro.len()));
        }
        check_finite(gyro, &Channel::ALL[3..])?;
    }
    check_finite(accel, &Channel::ACCEL)
}

/// Whether every axis of every sample is exactly zero.
#[must_use]
pub fn is_all_zero(samples: &[Vec3]) -> bool {
    samples.iter().all(|s| s[0] == 0.0 && s[1] == 0.0 && s[2] == 0.0)
}

fn check_finite(samples: &[Vec3], channels: &[Channel]) -> Result<()> {
    for (i, s) in samples.iter().enumerate() {
        for (axis, &channel) in channels.iter().enumerate() {
            if !s[axis].is_finite() {
                return Err(PhysiologyError::non_finite(channel, i));
            }
        }
    }
    Ok(())
}
