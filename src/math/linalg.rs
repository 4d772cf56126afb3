//! Linear algebra utilities for source separation.
//!
//! This module provides covariance, PCA whitening and symmetric
//! decorrelation using nalgebra for eigendecomposition.

use nalgebra::{DMatrix, SymmetricEigen};

use crate::error::{PhysiologyError, Result};

/// Eigenvalues at or below this are treated as empty directions.
pub const EIGENVALUE_FLOOR: f64 = 1e-10;

/// PCA whitening of a set of rows.
#[derive(Debug, Clone)]
pub struct Whitening {
    /// Per-row means removed before whitening.
    pub means: Vec<f64>,

    /// Covariance eigenvalues sorted in descending order.
    pub eigenvalues: Vec<f64>,

    /// Whitening matrix `D^{-1/2} Eᵀ`, one row per principal direction.
    /// Rows for eigenvalues below [`EIGENVALUE_FLOOR`] are zero.
    pub matrix: DMatrix<f64>,
}

impl Whitening {
    /// Number of directions with non-negligible variance.
    #[must_use]
    pub fn rank(&self) -> usize {
        self.eigenvalues
            .iter()
            .filter(|&&v| v > EIGENVALUE_FLOOR)
            .count()
    }
}

/// Stack equal-length rows into a `rows × samples` matrix.
#[must_use]
pub fn rows_to_matrix(rows: &[Vec<f64>]) -> DMatrix<f64> {
    let n_rows = rows.len();
    let n_cols = rows.first().map_or(0, Vec::len);
    DMatrix::from_fn(n_rows, n_cols, |r, c| rows[r][c])
}

/// Split a matrix back into rows.
#[must_use]
pub fn matrix_to_rows(m: &DMatrix<f64>) -> Vec<Vec<f64>> {
    m.row_iter().map(|r| r.iter().copied().collect()).collect()
}

/// Remove the mean of each row in place, returning the means.
pub fn center_rows(data: &mut DMatrix<f64>) -> Vec<f64> {
    let n = data.ncols().max(1) as f64;
    let mut means = Vec::with_capacity(data.nrows());
    for mut row in data.row_iter_mut() {
        let m = row.sum() / n;
        row.add_scalar_mut(-m);
        means.push(m);
    }
    means
}

/// Covariance `X Xᵀ / N` of already-centered rows.
#[must_use]
pub fn covariance(centered: &DMatrix<f64>) -> DMatrix<f64> {
    let n = centered.ncols().max(1) as f64;
    (centered * centered.transpose()) / n
}

/// Center and whiten `data` (rows are signals, columns are samples).
///
/// Returns the whitening transform and the whitened data, whose covariance is
/// the identity on every direction with variance above [`EIGENVALUE_FLOOR`]
/// and zero elsewhere.
///
/// # Errors
///
/// Returns [`PhysiologyError::NumericalInstability`] if the covariance is not
/// finite.
pub fn whiten(data: &DMatrix<f64>) -> Result<(Whitening, DMatrix<f64>)> {
    let mut centered = data.clone();
    let means = center_rows(&mut centered);
    let cov = covariance(&centered);

    if cov.iter().any(|v| !v.is_finite()) {
        return Err(PhysiologyError::numerical_instability(
            "non-finite covariance before whitening",
        ));
    }

    let eigen = SymmetricEigen::new(cov);

    let mut order: Vec<usize> = (0..eigen.eigenvalues.len()).collect();
    order.sort_by(|&a, &b| {
        eigen.eigenvalues[b]
            .partial_cmp(&eigen.eigenvalues[a])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let dim = data.nrows();
    let mut matrix = DMatrix::zeros(dim, dim);
    let mut eigenvalues = Vec::with_capacity(dim);

    for (out_row, &idx) in order.iter().enumerate() {
        let value = eigen.eigenvalues[idx];
        eigenvalues.push(value);
        if value > EIGENVALUE_FLOOR {
            let scale = 1.0 / value.sqrt();
            let vector = eigen.eigenvectors.column(idx);
            for c in 0..dim {
                matrix[(out_row, c)] = vector[c] * scale;
            }
        }
    }

    let whitened = &matrix * &centered;

    Ok((
        Whitening {
            means,
            eigenvalues,
            matrix,
        },
        whitened,
    ))
}

/// Inverse square root `M^{-1/2}` of a symmetric positive semi-definite
/// matrix.
///
/// Directions with eigenvalue at or below [`EIGENVALUE_FLOOR`] map to zero.
#[must_use]
pub fn symmetric_inverse_sqrt(m: &DMatrix<f64>) -> DMatrix<f64> {
    let eigen = SymmetricEigen::new(m.clone());
    let scaled = eigen.eigenvalues.map(|v| {
        if v > EIGENVALUE_FLOOR {
            1.0 / v.sqrt()
        } else {
            0.0
        }
    });
    let e = &eigen.eigenvectors;
    e * DMatrix::from_diagonal(&scaled) * e.transpose()
}

/// Symmetric decorrelation `W ← (W Wᵀ)^{-1/2} W`.
///
/// Makes the rows of `w` orthonormal without privileging any of them.
#[must_use]
pub fn symmetric_decorrelation(w: &DMatrix<f64>) -> DMatrix<f64> {
    symmetric_inverse_sqrt(&(w * w.transpose())) * w
}
