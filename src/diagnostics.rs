//! Intermediate buffers exposed in debug mode.
//!
//! Each buffer is addressed by a typed [`DiagnosticBuffer`] key whose display
//! name is stable, e.g. `RawAccelX`, `PreprocessedGyroZ` or `Component3`.
//! The buffers themselves are not a stability contract; their contents may
//! change whenever the pipeline does.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::channels::Channel;
use crate::reading::ComponentScore;

/// Key of one diagnostic buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DiagnosticBuffer {
    /// Raw input row.
    Raw(Channel),
    /// Detrended, normalized and filtered row.
    Preprocessed(Channel),
    /// Separated component signal.
    Component(usize),
    /// Magnitude spectrum of a component.
    Spectrum(usize),
    /// In-band normalized distribution of a component.
    Distribution(usize),
    /// Smoothed distribution used for kurtosis.
    SmoothedDistribution(usize),
    /// Smoothed row before differencing (smoothed wiggle only).
    Smoothed(Channel),
    /// First-order derivative of a row.
    Derivative(Channel),
    /// Per-sample wiggle index.
    WiggleTrace,
}

impl fmt::Display for DiagnosticBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Raw(channel) => write!(f, "Raw{channel}"),
            Self::Preprocessed(channel) => write!(f, "Preprocessed{channel}"),
            Self::Component(i) => write!(f, "Component{i}"),
            Self::Spectrum(i) => write!(f, "Spectrum{i}"),
            Self::Distribution(i) => write!(f, "Distribution{i}"),
            Self::SmoothedDistribution(i) => write!(f, "SmoothedDistribution{i}"),
            Self::Smoothed(channel) => write!(f, "Smoothed{channel}"),
            Self::Derivative(channel) => write!(f, "Derivative{channel}"),
            Self::WiggleTrace => f.write_str("WiggleTrace"),
        }
    }
}

/// Buffers of one separated component.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ComponentDiagnostics {
    pub signal: Vec<f64>,
    pub spectrum: Vec<f64>,
    pub distribution: Vec<f64>,
    pub smoothed_distribution: Vec<f64>,
    pub score: ComponentScore,
}

/// Intermediate buffers of a rate estimation pass.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RateDiagnostics {
    /// Six raw rows in channel order.
    pub raw: Vec<Vec<f64>>,
    /// Six preprocessed rows in channel order.
    pub preprocessed: Vec<Vec<f64>>,
    /// Per-component buffers in separator order.
    pub components: Vec<ComponentDiagnostics>,
    /// Index of the selected component.
    pub selected_index: usize,
}

impl RateDiagnostics {
    /// Look up one buffer.
    #[must_use]
    pub fn buffer(&self, key: DiagnosticBuffer) -> Option<&[f64]> {
        match key {
            DiagnosticBuffer::Raw(channel) => self.raw.get(channel.index()).map(Vec::as_slice),
            DiagnosticBuffer::Preprocessed(channel) => {
                self.preprocessed.get(channel.index()).map(Vec::as_slice)
            }
            DiagnosticBuffer::Component(i) => self.components.get(i).map(|c| c.signal.as_slice()),
            DiagnosticBuffer::Spectrum(i) => self.components.get(i).map(|c| c.spectrum.as_slice()),
            DiagnosticBuffer::Distribution(i) => {
                self.components.get(i).map(|c| c.distribution.as_slice())
            }
            DiagnosticBuffer::SmoothedDistribution(i) => self
                .components
                .get(i)
                .map(|c| c.smoothed_distribution.as_slice()),
            DiagnosticBuffer::Smoothed(_)
            | DiagnosticBuffer::Derivative(_)
            | DiagnosticBuffer::WiggleTrace => None,
        }
    }

    /// Every buffer with its key, rows first then components.
    pub fn buffers(&self) -> impl Iterator<Item = (DiagnosticBuffer, &[f64])> + '_ {
        let rows = Channel::ALL.into_iter().flat_map(move |channel| {
            [
                DiagnosticBuffer::Raw(channel),
                DiagnosticBuffer::Preprocessed(channel),
            ]
        });
        let components = (0..self.components.len()).flat_map(|i| {
            [
                DiagnosticBuffer::Component(i),
                DiagnosticBuffer::Spectrum(i),
                DiagnosticBuffer::Distribution(i),
                DiagnosticBuffer::SmoothedDistribution(i),
            ]
        });
        rows.chain(components)
            .filter_map(move |key| self.buffer(key).map(|b| (key, b)))
    }
}

/// Intermediate buffers of a wiggle pass.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WiggleDiagnostics {
    /// Smoothed rows of the used channels (smoothed variant only).
    pub smoothed: Vec<(Channel, Vec<f64>)>,
    /// Derivative rows of the used channels.
    pub derivatives: Vec<(Channel, Vec<f64>)>,
    /// Per-sample wiggle index.
    pub trace: Vec<f64>,
}

impl WiggleDiagnostics {
    /// Look up one buffer.
    #[must_use]
    pub fn buffer(&self, key: DiagnosticBuffer) -> Option<&[f64]> {
        match key {
            DiagnosticBuffer::Smoothed(channel) => find_row(&self.smoothed, channel),
            DiagnosticBuffer::Derivative(channel) => find_row(&self.derivatives, channel),
            DiagnosticBuffer::WiggleTrace => Some(&self.trace),
            _ => None,
        }
    }

    /// Every buffer with its key.
    pub fn buffers(&self) -> impl Iterator<Item = (DiagnosticBuffer, &[f64])> + '_ {
        let smoothed = self
            .smoothed
            .iter()
            .map(|(c, row)| (DiagnosticBuffer::Smoothed(*c), row.as_slice()));
        let derivatives = self
            .derivatives
            .iter()
            .map(|(c, row)| (DiagnosticBuffer::Derivative(*c), row.as_slice()));
        smoothed
            .chain(derivatives)
            .chain(std::iter::once((
                DiagnosticBuffer::WiggleTrace,
                self.trace.as_slice(),
            )))
    }
}

fn find_row(rows: &[(Channel, Vec<f64>)], wanted: Channel) -> Option<&[f64]> {
    rows.iter()
        .find(|(channel, _)| *channel == wanted)
        .map(|(_, row)| row.as_slice())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(index: usize) -> ComponentScore {
        ComponentScore {
            index,
            peak_index: 0,
            rate_hz: 0.0,
            strength: 0.0,
            magnitude: 0.0,
            kurtosis: 0.0,
        }
    }

    #[test]
    fn test_buffer_names() {
        assert_eq!(DiagnosticBuffer::Raw(Channel::AccelX).to_string(), "RawAccelX");
        assert_eq!(
            DiagnosticBuffer::Preprocessed(Channel::GyroZ).to_string(),
            "PreprocessedGyroZ"
        );
        assert_eq!(DiagnosticBuffer::Component(3).to_string(), "Component3");
        assert_eq!(DiagnosticBuffer::Derivative(Channel::GyroY).to_string(), "DerivativeGyroY");
        assert_eq!(DiagnosticBuffer::WiggleTrace.to_string(), "WiggleTrace");
    }

    #[test]
    fn test_rate_diagnostics_lookup() {
        let diagnostics = RateDiagnostics {
            raw: (0..6).map(|i| vec![i as f64; 3]).collect(),
            preprocessed: vec![vec![0.5; 2]; 6],
            components: (0..3)
                .map(|i| ComponentDiagnostics {
                    signal: vec![i as f64],
                    spectrum: vec![1.0; 4],
                    distribution: vec![0.25; 4],
                    smoothed_distribution: vec![0.1; 4],
                    score: score(i),
                })
                .collect(),
            selected_index: 1,
        };

        assert_eq!(
            diagnostics.buffer(DiagnosticBuffer::Raw(Channel::GyroX)),
            Some(&[3.0, 3.0, 3.0][..])
        );
        assert_eq!(
            diagnostics.buffer(DiagnosticBuffer::Component(2)),
            Some(&[2.0][..])
        );
        assert_eq!(diagnostics.buffer(DiagnosticBuffer::Component(3)), None);
        assert_eq!(diagnostics.buffer(DiagnosticBuffer::WiggleTrace), None);

        // 6 raw + 6 preprocessed + 3 components x 4 buffers
        assert_eq!(diagnostics.buffers().count(), 24);
    }

    #[test]
    fn test_wiggle_diagnostics_lookup() {
        let diagnostics = WiggleDiagnostics {
            smoothed: Vec::new(),
            derivatives: vec![(Channel::AccelY, vec![1.0, 2.0])],
            trace: vec![0.5],
        };
        assert_eq!(
            diagnostics.buffer(DiagnosticBuffer::Derivative(Channel::AccelY)),
            Some(&[1.0, 2.0][..])
        );
        assert_eq!(diagnostics.buffer(DiagnosticBuffer::Derivative(Channel::GyroX)), None);
        assert_eq!(diagnostics.buffer(DiagnosticBuffer::WiggleTrace), Some(&[0.5][..]));
        assert_eq!(diagnostics.buffers().count(), 2);
    }
}
