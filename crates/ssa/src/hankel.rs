//! Diagonal averaging (Hankelization) of elementary matrices.
//!
//! Every singular triplet `(sigma_i, U_i, V_i)` defines an elementary
//! rank-1 matrix `X_i = sigma_i * U_i V_i^T` of shape `L x K`. Averaging the
//! anti-diagonals of `X_i` maps it back to a series of length
//! `N = L + K - 1`, the `i`-th reconstructed component.
//!
//! Two strategies produce identical components:
//!
//! - [`hankelize_retained`] materializes all `d` elementary matrices as a
//!   `d x L x K` array and averages them in parallel.
//! - [`hankelize_transient`] refills a single `L x K` scratch matrix per
//!   component and never holds more than one elementary matrix.

use ndarray::{Array2, Array3, ArrayView1, ArrayView2, ArrayViewMut2, Axis, s};
use rayon::prelude::*;

use crate::svd::SvdResult;

/// Averages the anti-diagonals of `matrix`, returning `rows + cols - 1` values.
///
/// The matrix is flipped along its first axis; the diagonals of the flipped
/// matrix at offsets `-(rows - 1) ..= cols - 1` are then exactly the
/// anti-diagonals of the original, ordered from the top-left corner to the
/// bottom-right corner. Entry `t` of the result is the mean of all
/// `matrix[[r, c]]` with `r + c == t`.
///
/// The result is invariant under transposition, so both `L x K` and `K x L`
/// layouts give the same series.
///
/// # Example
///
/// ```ignore
/// use caterpillar_ssa::diagonal_average;
/// use ndarray::array;
///
/// let x = array![[1.0, 2.0, 3.0], [2.0, 3.0, 4.0]];
/// assert_eq!(diagonal_average(x.view()), vec![1.0, 2.0, 3.0, 4.0]);
/// ```
pub fn diagonal_average(matrix: ArrayView2<'_, f64>) -> Vec<f64> {
    let (rows, cols) = matrix.dim();
    if rows == 0 || cols == 0 {
        return Vec::new();
    }
    let reversed = matrix.slice(s![..;-1, ..]);
    let last_row = rows as isize - 1;

    (-last_row..cols as isize)
        .map(|offset| {
            // rows r of the flipped matrix with 0 <= r + offset < cols
            let first = (-offset).max(0);
            let end = (rows as isize).min(cols as isize - offset);
            let sum: f64 = (first..end)
                .map(|r| reversed[[r as usize, (r + offset) as usize]])
                .sum();
            sum / (end - first) as f64
        })
        .collect()
}

/// Builds the elementary matrix `sigma * u v^T`.
pub fn elementary_matrix(
    sigma: f64,
    u: ArrayView1<'_, f64>,
    v: ArrayView1<'_, f64>,
) -> Array2<f64> {
    let mut out = Array2::zeros((u.len(), v.len()));
    fill_elementary(out.view_mut(), sigma, u, v);
    out
}

/// Overwrites `out` with `sigma * u v^T`.
///
/// Shared by both strategies so retained and transient elementary matrices
/// are bit-for-bit identical.
fn fill_elementary(
    mut out: ArrayViewMut2<'_, f64>,
    sigma: f64,
    u: ArrayView1<'_, f64>,
    v: ArrayView1<'_, f64>,
) {
    for ((r, c), value) in out.indexed_iter_mut() {
        *value = sigma * u[r] * v[c];
    }
}

/// Materializes all `d` elementary matrices and averages each one.
///
/// Returns the `d x L x K` elementary array together with one component per
/// singular triplet.
pub(crate) fn hankelize_retained(svd: &SvdResult) -> (Array3<f64>, Vec<Vec<f64>>) {
    let d = svd.rank();
    let l = svd.u().nrows();
    let k = svd.v().nrows();

    let mut elementary = Array3::zeros((d, l, k));
    elementary
        .axis_iter_mut(Axis(0))
        .into_par_iter()
        .enumerate()
        .for_each(|(i, slab)| {
            let (sigma, u, v) = svd.triplet(i);
            fill_elementary(slab, sigma, u, v);
        });

    let components = (0..d)
        .into_par_iter()
        .map(|i| diagonal_average(elementary.index_axis(Axis(0), i)))
        .collect();

    (elementary, components)
}

/// Recomputes each elementary matrix into one reused scratch buffer and
/// averages it before moving on to the next component.
///
/// Peak memory is a single `L x K` matrix plus the `d` output series.
pub(crate) fn hankelize_transient(svd: &SvdResult) -> Vec<Vec<f64>> {
    let d = svd.rank();
    let mut scratch = Array2::zeros((svd.u().nrows(), svd.v().nrows()));

    (0..d)
        .map(|i| {
            let (sigma, u, v) = svd.triplet(i);
            fill_elementary(scratch.view_mut(), sigma, u, v);
            diagonal_average(scratch.view())
        })
        .collect()
}
