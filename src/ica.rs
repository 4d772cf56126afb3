//! Blind source separation with FastICA.
//!
//! The separator whitens its input rows with PCA, then runs the symmetric
//! fixed-point iteration with the log-cosh contrast (`g = tanh`,
//! `g' = 1 - tanh²`):
//!
//! ```text
//! W⁺ = E[g(W z) zᵀ] - diag(E[g'(W z)]) W
//! W  = (W⁺ W⁺ᵀ)^{-1/2} W⁺
//! ```
//!
//! Iteration stops once every row of `W` is stable up to sign, i.e.
//! `max_i ||<w⁺_i, w_i>| - 1| < tolerance`.
//!
//! Component order and sign are arbitrary. Treat the output as an unordered
//! set and score it; never index it by physical channel.
//!
//! # Determinism
//!
//! The unmixing matrix is initialized from a fixed-seed LCG, so identical
//! input and seed always give identical components.

use nalgebra::DMatrix;
use tracing::trace;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{PhysiologyError, Result};
use crate::math::linalg::{matrix_to_rows, rows_to_matrix, symmetric_decorrelation, whiten};

/// Outcome of the fixed-point iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Convergence {
    /// The unmixing matrix stabilized within tolerance.
    #[default]
    Converged,
    /// The iteration limit was reached first; the components are the last
    /// iterate and may be only partially separated.
    IterationLimit,
}

impl Convergence {
    /// Whether the iteration converged.
    #[must_use]
    pub const fn is_converged(self) -> bool {
        matches!(self, Self::Converged)
    }
}

/// Separated components.
#[derive(Debug, Clone, PartialEq)]
pub struct Separation {
    /// One row per input row, same length as the input. Rows beyond the rank
    /// of the input are all zeros.
    pub components: Vec<Vec<f64>>,

    /// Fixed-point iterations performed.
    pub iterations: usize,

    /// Whether the iteration converged.
    pub convergence: Convergence,

    /// Number of directions with non-negligible variance.
    pub rank: usize,
}

/// FastICA separator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FastIca {
    max_iterations: usize,
    tolerance: f64,
    seed: u64,
}

impl Default for FastIca {
    fn default() -> Self {
        Self {
            max_iterations: 200,
            tolerance: 1e-4,
            seed: 42,
        }
    }
}

impl FastIca {
    /// Create a separator with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the iteration limit.
    #[must_use]
    pub const fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Set the convergence tolerance.
    #[must_use]
    pub const fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Set the initialization seed.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Separate equal-length rows into as many independent components.
    ///
    /// Rank-deficient input (for example two identical rows, or an all-zero
    /// window) is separated within its rank; the remaining components are
    /// zero rows rather than NaN.
    ///
    /// # Errors
    ///
    /// Returns [`PhysiologyError::InvalidConfig`] if rows differ in length, or
    /// [`PhysiologyError::NumericalInstability`] if the iteration produces a
    /// non-finite unmixing matrix.
    pub fn separate(&self, rows: &[Vec<f64>]) -> Result<Separation> {
        let n_rows = rows.len();
        let n_samples = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|r| r.len() != n_samples) {
            return Err(PhysiologyError::invalid_config(
                "all rows passed to separation must have the same length",
            ));
        }

        let data = rows_to_matrix(rows);
        let (whitening, whitened) = whiten(&data)?;
        let rank = whitening.rank();

        if rank == 0 || n_samples == 0 {
            return Ok(Separation {
                components: vec![vec![0.0; n_samples]; n_rows],
                iterations: 0,
                convergence: Convergence::Converged,
                rank,
            });
        }

        // Whitening sorts directions by variance, so the live ones come first
        let z = whitened.rows(0, rank).into_owned();
        let (w, iterations, convergence) = self.fixed_point(&z)?;

        let sources = &w * &z;
        let mut components = matrix_to_rows(&sources);
        components.resize(n_rows, vec![0.0; n_samples]);

        trace!(rank, iterations, ?convergence, "separation finished");

        Ok(Separation {
            components,
            iterations,
            convergence,
            rank,
        })
    }

    fn fixed_point(&self, z: &DMatrix<f64>) -> Result<(DMatrix<f64>, usize, Convergence)> {
        let dim = z.nrows();
        let n = z.ncols() as f64;

        let mut rng = Lcg::new(self.seed);
        let init = DMatrix::from_fn(dim, dim, |_, _| rng.next_symmetric());
        let mut w = symmetric_decorrelation(&init);

        for iteration in 1..=self.max_iterations {
            let projected = &w * z;
            let g = projected.map(f64::tanh);
            let g_prime_mean: Vec<f64> = g
                .row_iter()
                .map(|row| row.iter().map(|v| 1.0 - v * v).sum::<f64>() / n)
                .collect();

            let mut updated = (&g * z.transpose()) / n;
            for (i, &beta) in g_prime_mean.iter().enumerate() {
                let scaled = w.row(i) * beta;
                let mut row = updated.row_mut(i);
                row -= scaled;
            }
            let updated = symmetric_decorrelation(&updated);

            if updated.iter().any(|v| !v.is_finite()) {
                return Err(PhysiologyError::numerical_instability(format!(
                    "non-finite unmixing matrix at iteration {iteration}"
                )));
            }

            let limit = (0..dim)
                .map(|i| (updated.row(i).dot(&w.row(i)).abs() - 1.0).abs())
                .fold(0.0, f64::max);
            w = updated;

            if limit < self.tolerance {
                return Ok((w, iteration, Convergence::Converged));
            }
        }

        Ok((w, self.max_iterations, Convergence::IterationLimit))
    }
}

/// 64-bit linear congruential generator for reproducible initialization.
#[derive(Debug, Clone)]
struct Lcg(u64);

impl Lcg {
    const MULTIPLIER: u64 = 6_364_136_223_846_793_005;
    const INCREMENT: u64 = 1_442_695_040_888_963_407;

    const fn new(seed: u64) -> Self {
        Self(seed)
    }

    /// Uniform value in `[-1, 1)`.
    fn next_symmetric(&mut self) -> f64 {
        self.0 = self
            .0
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT);
        let unit = (self.0 >> 11) as f64 / (1u64 << 53) as f64;
        2.0 * unit - 1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::stats::{mean, std_dev};

    fn correlation(a: &[f64], b: &[f64]) -> f64 {
        let (ma, mb) = (mean(a), mean(b));
        let cov = a
            .iter()
            .zip(b.iter())
            .map(|(x, y)| (x - ma) * (y - mb))
            .sum::<f64>()
            / a.len() as f64;
        cov / (std_dev(a) * std_dev(b))
    }

    fn sources(n: usize) -> (Vec<f64>, Vec<f64>) {
        let sine = (0..n).map(|i| (i as f64 * 0.05).sin()).collect();
        let saw = (0..n).map(|i| (i % 37) as f64 / 37.0 - 0.5).collect();
        (sine, saw)
    }

    #[test]
    fn test_recovers_mixed_sources() {
        let (sine, saw) = sources(2000);
        let rows = vec![
            sine.iter().zip(&saw).map(|(a, b)| a + 0.6 * b).collect(),
            sine.iter().zip(&saw).map(|(a, b)| 0.4 * a + b).collect(),
        ];

        let separation = FastIca::new().separate(&rows).unwrap();
        assert_eq!(separation.components.len(), 2);
        assert_eq!(separation.rank, 2);
        assert!(separation.convergence.is_converged());

        for source in [&sine, &saw] {
            let best = separation
                .components
                .iter()
                .map(|c| correlation(c, source).abs())
                .fold(0.0, f64::max);
            assert!(best > 0.95, "best correlation {best}");
        }
    }

    #[test]
    fn test_deterministic_for_fixed_seed() {
        let (sine, saw) = sources(500);
        let rows = vec![
            sine.iter().zip(&saw).map(|(a, b)| a - b).collect(),
            sine.iter().zip(&saw).map(|(a, b)| a + 2.0 * b).collect(),
        ];
        let first = FastIca::new().with_seed(7).separate(&rows).unwrap();
        let second = FastIca::new().with_seed(7).separate(&rows).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_all_zero_input() {
        let rows = vec![vec![0.0; 64]; 3];
        let separation = FastIca::new().separate(&rows).unwrap();
        assert_eq!(separation.rank, 0);
        assert_eq!(separation.components, rows);
        assert_eq!(separation.iterations, 0);
    }

    #[test]
    fn test_rank_deficient_input_is_finite() {
        let (sine, saw) = sources(400);
        let mixed: Vec<f64> = sine.iter().zip(&saw).map(|(a, b)| a + b).collect();
        let rows = vec![sine.clone(), mixed.clone(), mixed];

        let separation = FastIca::new().separate(&rows).unwrap();
        assert_eq!(separation.rank, 2);
        assert_eq!(separation.components.len(), 3);
        assert!(separation
            .components
            .iter()
            .flatten()
            .all(|v| v.is_finite()));
        assert!(separation.components[2].iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_iteration_limit_is_reported() {
        let (sine, saw) = sources(600);
        let rows = vec![
            sine.iter().zip(&saw).map(|(a, b)| a + 0.5 * b).collect(),
            sine.iter().zip(&saw).map(|(a, b)| 0.7 * a - b).collect(),
        ];
        let separation = FastIca::new()
            .with_max_iterations(1)
            .with_tolerance(1e-15)
            .separate(&rows)
            .unwrap();
        assert_eq!(separation.convergence, Convergence::IterationLimit);
        assert_eq!(separation.iterations, 1);
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let rows = vec![vec![0.0; 10], vec![0.0; 9]];
        assert!(FastIca::new().separate(&rows).is_err());
    }

    #[test]
    fn test_lcg_range() {
        let mut rng = Lcg::new(42);
        for _ in 0..1000 {
            let v = rng.next_symmetric();
            assert!((-1.0..1.0).contains(&v));
        }
    }
}
