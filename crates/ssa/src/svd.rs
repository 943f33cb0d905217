//! Singular value decomposition of the trajectory matrix.
//!
//! The factorization follows the lag-covariance route: the symmetric
//! eigenproblem of the `m x m` Gram matrix `S = X X^T` (or `X^T X` when
//! `K < L`) is solved with `nalgebra`, its eigenvectors give one set of
//! singular vectors, and projecting `X` onto them gives the other set
//! together with `sigma_i = ||X^T U_i||`. Computing `sigma_i` from the
//! projection keeps it accurate to rounding of `X` itself, so exactly
//! low-rank trajectories (constant or geometric series) factor exactly.

use nalgebra::{DMatrix, SymmetricEigen};
use ndarray::{Array2, ArrayView1};
use tracing::debug;

use crate::embed::TrajectoryMatrix;
use crate::error::SsaError;

/// QR sweeps allowed per eigenvalue before giving up.
const SWEEPS_PER_SINGULAR_VALUE: usize = 100;

/// Floor for the iteration budget of very small matrices.
const MIN_SWEEPS: usize = 1_000;

/// Largest accepted `||X - U_d diag(sigma) V_d^T||_F / ||X||_F`.
const RESIDUAL_TOLERANCE: f64 = 1e-8;

/// Thin SVD `X = U diag(sigma) V^T` of a trajectory matrix.
///
/// `U` is `L x m` and `V` is `K x m` with `m = min(L, K)`. Column `i` of
/// `U` and `V` belongs to `singular_values()[i]`, which are sorted in
/// descending order. Columns past the numerical rank `d` carry no signal:
/// their singular values are at rounding level and the matching columns of
/// the projected factor are zero.
#[derive(Clone, Debug)]
pub struct SvdResult {
    u: Array2<f64>,
    singular_values: Vec<f64>,
    v: Array2<f64>,
    rank: usize,
}

impl SvdResult {
    /// Returns the left singular vectors as columns (`L x m`).
    pub fn u(&self) -> &Array2<f64> {
        &self.u
    }

    /// Returns the singular values in descending order.
    pub fn singular_values(&self) -> &[f64] {
        &self.singular_values
    }

    /// Returns the right singular vectors as columns (`K x m`).
    pub fn v(&self) -> &Array2<f64> {
        &self.v
    }

    /// Returns the numerical rank `d`.
    pub fn rank(&self) -> usize {
        self.rank
    }

    /// Returns the `i`-th singular triplet `(sigma_i, U_i, V_i)`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= min(L, K)`.
    pub fn triplet(&self, i: usize) -> (f64, ArrayView1<'_, f64>, ArrayView1<'_, f64>) {
        (
            self.singular_values[i],
            self.u.column(i),
            self.v.column(i),
        )
    }

    /// Consumes the result, returning `(U, sigma, V, d)`.
    pub fn into_parts(self) -> (Array2<f64>, Vec<f64>, Array2<f64>, usize) {
        (self.u, self.singular_values, self.v, self.rank)
    }
}

/// Decomposes a trajectory matrix with the default iteration budget.
///
/// # Errors
///
/// | Variant | Trigger |
/// |---------|---------|
/// | [`SsaError::DecompositionFailed`] | the eigensolver did not converge, the matrix has rank 0, or the factors do not reproduce the matrix |
pub fn decompose(trajectory: &TrajectoryMatrix) -> Result<SvdResult, SsaError> {
    decompose_with_budget(trajectory, None)
}

/// Decomposes a trajectory matrix, allowing at most `max_iterations` QR
/// sweeps of the symmetric eigensolver (`None` selects a budget scaled to
/// the matrix size).
///
/// # Errors
///
/// Same as [`decompose`], plus [`SsaError::InvalidIterationBudget`] for
/// `Some(0)`.
pub fn decompose_with_budget(
    trajectory: &TrajectoryMatrix,
    max_iterations: Option<usize>,
) -> Result<SvdResult, SsaError> {
    if max_iterations == Some(0) {
        return Err(SsaError::InvalidIterationBudget);
    }
    let x = trajectory.view();
    let (l, k) = x.dim();
    let m = l.min(k);
    let budget = max_iterations.unwrap_or_else(|| (SWEEPS_PER_SINGULAR_VALUE * m).max(MIN_SWEEPS));

    // X is divided by its largest entry so the Gram matrix cannot overflow;
    // the singular values are scaled back at the end.
    let peak = x.iter().fold(0.0_f64, |m, v| m.max(v.abs()));
    if peak == 0.0 {
        return Err(SsaError::DecompositionFailed(
            "trajectory matrix has numerical rank 0".into(),
        ));
    }
    let matrix = DMatrix::from_fn(l, k, |r, c| x[[r, c]] / peak);

    // `a` is the m-row orientation of X, so the Gram matrix is m x m.
    let transposed = l > k;
    let a = if transposed {
        matrix.transpose()
    } else {
        matrix.clone()
    };
    let gram = &a * a.transpose();

    let eigen = SymmetricEigen::try_new(gram, f64::EPSILON, budget).ok_or_else(|| {
        SsaError::DecompositionFailed(format!(
            "eigendecomposition of {m}x{m} lag-covariance matrix did not converge within {budget} iterations"
        ))
    })?;

    // Column i of `projected` is sigma_i times the paired singular vector.
    let basis = eigen.eigenvectors;
    let projected = a.transpose() * &basis;
    let norms: Vec<f64> = (0..m).map(|i| projected.column(i).norm()).collect();

    // The eigensolver returns eigenpairs unordered.
    let mut order: Vec<usize> = (0..m).collect();
    order.sort_by(|&p, &q| norms[q].total_cmp(&norms[p]));
    let singular_values: Vec<f64> = order.iter().map(|&i| norms[i]).collect();

    let rank = numerical_rank(&singular_values, l, k);
    if rank == 0 {
        return Err(SsaError::DecompositionFailed(
            "trajectory matrix has numerical rank 0".into(),
        ));
    }

    let n_rows = a.nrows();
    let n_cols = a.ncols();
    let basis = Array2::from_shape_fn((n_rows, m), |(r, c)| basis[(r, order[c])]);
    let paired = Array2::from_shape_fn((n_cols, m), |(r, c)| {
        if c < rank {
            projected[(r, order[c])] / singular_values[c]
        } else {
            0.0
        }
    });
    let (u, v) = if transposed {
        (paired, basis)
    } else {
        (basis, paired)
    };

    let residual = residual_norm(&matrix, &u, &singular_values, &v, rank);
    let scale = matrix.norm();
    if residual.is_nan() || residual > RESIDUAL_TOLERANCE * scale {
        return Err(SsaError::DecompositionFailed(format!(
            "factors reproduce the trajectory matrix only to {residual:.3e} (norm {scale:.3e})"
        )));
    }
    let singular_values: Vec<f64> = singular_values.iter().map(|s| s * peak).collect();

    debug!(
        window = l,
        n_windows = k,
        rank,
        leading = singular_values[0],
        relative_residual = residual / scale,
        "trajectory matrix decomposed"
    );

    Ok(SvdResult {
        u,
        singular_values,
        v,
        rank,
    })
}

/// Frobenius norm of `X - sum_{i < d} sigma_i U_i V_i^T`.
fn residual_norm(
    matrix: &DMatrix<f64>,
    u: &Array2<f64>,
    singular_values: &[f64],
    v: &Array2<f64>,
    rank: usize,
) -> f64 {
    let scaled_u = DMatrix::from_fn(u.nrows(), rank, |r, c| u[[r, c]] * singular_values[c]);
    let v_d = DMatrix::from_fn(v.nrows(), rank, |r, c| v[[r, c]]);
    (matrix - scaled_u * v_d.transpose()).norm()
}

/// Counts singular values above the default rank tolerance
/// `max(sigma) * max(rows, cols) * eps`.
pub(crate) fn numerical_rank(singular_values: &[f64], rows: usize, cols: usize) -> usize {
    let largest = singular_values.iter().copied().fold(0.0_f64, f64::max);
    let tol = largest * rows.max(cols) as f64 * f64::EPSILON;
    singular_values.iter().filter(|&&s| s > tol).count()
}
