//! Weighted correlation (w-correlation) between reconstructed components.
//!
//! Sample `t` of a reconstructed series is the average of
//! `w[t] = min(t + 1, L, K, N - t)` entries of the elementary matrix. The
//! w-correlation weights every sample by that count:
//!
//! ```text
//! <F_i, F_j>_w = sum_t w[t] F_i[t] F_j[t]
//! rho_ij       = |<F_i, F_j>_w| / (||F_i||_w ||F_j||_w)
//! ```
//!
//! Values close to 0 mean the two components are well separated; values
//! close to 1 suggest they belong in the same group.

use std::ops::Range;

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, s};
use rayon::prelude::*;

use crate::components::ComponentsTable;
use crate::error::SsaError;

/// Returns the weight vector `w[t] = min(t + 1, L, K, N - t)` for a series of
/// length `n` embedded with window length `window`.
///
/// The formula is symmetric in `L` and `K`, so it also covers `K < L`: the
/// plateau then sits at `K` instead of `L`.
pub fn wcorr_weights(n: usize, window: usize) -> Vec<f64> {
    let k = (n + 1).saturating_sub(window);
    let plateau = window.min(k);
    (0..n)
        .map(|t| (t + 1).min(plateau).min(n - t) as f64)
        .collect()
}

/// Symmetric `d x d` matrix of w-correlations with a unit diagonal.
#[derive(Clone, Debug, PartialEq)]
pub struct WCorrelationMatrix {
    matrix: Array2<f64>,
}

impl WCorrelationMatrix {
    /// Returns the number of components `d`.
    pub fn n_components(&self) -> usize {
        self.matrix.nrows()
    }

    /// Returns entry `(i, j)`, or `None` when either index is out of range.
    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        self.matrix.get((i, j)).copied()
    }

    /// Returns a view of the full matrix.
    pub fn view(&self) -> ArrayView2<'_, f64> {
        self.matrix.view()
    }

    /// Returns the square block for the components in `range`.
    ///
    /// # Errors
    ///
    /// Returns [`SsaError::IndexOutOfRange`] if `range` ends beyond `d`.
    pub fn block(&self, range: Range<usize>) -> Result<Array2<f64>, SsaError> {
        let d = self.n_components();
        if range.end > d {
            return Err(SsaError::IndexOutOfRange {
                index: range.end - 1,
                rank: d,
            });
        }
        let range = range.start.min(range.end)..range.end;
        Ok(self.matrix.slice(s![range.clone(), range]).to_owned())
    }

    /// Returns the matrix as nested rows.
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.matrix.rows().into_iter().map(|r| r.to_vec()).collect()
    }

    /// Returns the largest off-diagonal entry (0 for a single component).
    pub fn max_off_diagonal(&self) -> f64 {
        self.matrix
            .indexed_iter()
            .filter(|((i, j), _)| i != j)
            .map(|(_, &v)| v)
            .fold(0.0, f64::max)
    }
}

/// Computes the w-correlation matrix of all components in `table`.
///
/// Each component is divided by its largest absolute value before the
/// weighted products are formed. The w-correlation is scale-invariant, so
/// this changes nothing except keeping the sums finite for components near
/// the `f64` range.
///
/// Norms and rows of the matrix are computed in parallel; every task only
/// reads component columns and returns its own values, which are written
/// into the matrix afterwards.
///
/// # Errors
///
/// | Variant | Trigger |
/// |---------|---------|
/// | [`SsaError::DegenerateComponent`] | a component has zero weighted norm |
/// | [`SsaError::NonFiniteData`] | a component or a correlation is not finite |
/// | [`SsaError::InvalidWindowLength`] | `window` does not fit the table length |
pub fn w_correlation(
    table: &ComponentsTable,
    window: usize,
) -> Result<WCorrelationMatrix, SsaError> {
    let n = table.len();
    if window == 0 || window > n {
        return Err(SsaError::InvalidWindowLength {
            window,
            len: n,
            max: n,
        });
    }
    let weights = wcorr_weights(n, window);
    let components = table.view();
    let d = components.ncols();

    let unit: Vec<Array1<f64>> = (0..d)
        .into_par_iter()
        .map(|i| {
            let column = components.column(i);
            let peak = column.iter().fold(0.0_f64, |m, v| m.max(v.abs()));
            if !peak.is_finite() || column.iter().any(|v| !v.is_finite()) {
                return Err(SsaError::NonFiniteData);
            }
            if peak == 0.0 {
                return Err(SsaError::DegenerateComponent { index: i });
            }
            Ok(column.mapv(|v| v / peak))
        })
        .collect::<Result<_, _>>()?;

    let inv_norms: Vec<f64> = unit
        .par_iter()
        .enumerate()
        .map(|(i, column)| {
            let norm_sq = weighted_inner(&weights, column.view(), column.view());
            if norm_sq.is_finite() && norm_sq > 0.0 {
                Ok(norm_sq.sqrt().recip())
            } else {
                Err(SsaError::DegenerateComponent { index: i })
            }
        })
        .collect::<Result<_, _>>()?;

    let upper: Vec<Vec<f64>> = (0..d)
        .into_par_iter()
        .map(|i| {
            ((i + 1)..d)
                .map(|j| {
                    let inner = weighted_inner(&weights, unit[i].view(), unit[j].view());
                    let rho = inner.abs() * inv_norms[i] * inv_norms[j];
                    if !rho.is_finite() {
                        return Err(SsaError::NonFiniteData);
                    }
                    // rounding can push |rho| marginally above one
                    Ok(if rho > 1.0 { 1.0 } else { rho })
                })
                .collect::<Result<Vec<_>, _>>()
        })
        .collect::<Result<_, _>>()?;

    let mut matrix = Array2::eye(d);
    for (i, row) in upper.iter().enumerate() {
        for (offset, &value) in row.iter().enumerate() {
            let j = i + 1 + offset;
            matrix[[i, j]] = value;
            matrix[[j, i]] = value;
        }
    }

    Ok(WCorrelationMatrix { matrix })
}

fn weighted_inner(weights: &[f64], a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>) -> f64 {
    weights
        .iter()
        .zip(a.iter().zip(b.iter()))
        .map(|(w, (x, y))| w * x * y)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::SeriesIndex;
    use approx::assert_abs_diff_eq;

    fn table(columns: &[Vec<f64>]) -> ComponentsTable {
        ComponentsTable::from_columns(columns, SeriesIndex::Ordinal(columns[0].len()))
    }

    #[test]
    fn weights_plateau_at_window() {
        // N = 10, L = 3, K = 8
        let w = wcorr_weights(10, 3);
        assert_eq!(w, vec![1.0, 2.0, 3.0, 3.0, 3.0, 3.0, 3.0, 3.0, 2.0, 1.0]);
    }

    #[test]
    fn weights_plateau_at_k_when_k_smaller() {
        // N = 10, L = 8, K = 3
        let w = wcorr_weights(10, 8);
        assert_eq!(w, vec![1.0, 2.0, 3.0, 3.0, 3.0, 3.0, 3.0, 3.0, 2.0, 1.0]);
        assert_eq!(w, wcorr_weights(10, 3));
    }

    #[test]
    fn weights_without_plateau() {
        // N = 6, L = 3, K = 4: rise to 3 then fall
        assert_eq!(wcorr_weights(6, 3), vec![1.0, 2.0, 3.0, 3.0, 2.0, 1.0]);
        // N = 5, L = 3, K = 3
        assert_eq!(wcorr_weights(5, 3), vec![1.0, 2.0, 3.0, 2.0, 1.0]);
    }

    #[test]
    fn weights_count_matrix_entries() {
        // The weights sum to the number of entries of the L x K matrix.
        for (n, l) in [(20, 5), (21, 10), (100, 20), (9, 7)] {
            let k = n - l + 1;
            let total: f64 = wcorr_weights(n, l).iter().sum();
            assert_eq!(total as usize, l * k, "n = {n}, l = {l}");
        }
    }

    #[test]
    fn orthogonal_components_are_uncorrelated() {
        let t = table(&[
            vec![1.0, 1.0, 1.0, 1.0, 1.0, 1.0],
            vec![1.0, -1.0, 0.0, 0.0, 1.0, -1.0],
        ]);
        let m = w_correlation(&t, 3).unwrap();
        assert_eq!(m.get(0, 0), Some(1.0));
        assert_eq!(m.get(1, 1), Some(1.0));
        assert_abs_diff_eq!(m.get(0, 1).unwrap(), 0.0, epsilon = 1e-15);
    }

    #[test]
    fn proportional_components_are_fully_correlated() {
        let base = vec![0.3, -1.2, 2.0, 0.7, -0.4, 1.1, 0.0, 0.9];
        let scaled: Vec<f64> = base.iter().map(|v| -2.5 * v).collect();
        let m = w_correlation(&table(&[base, scaled]), 3).unwrap();
        assert_abs_diff_eq!(m.get(0, 1).unwrap(), 1.0, epsilon = 1e-12);
        assert!(m.get(0, 1).unwrap() <= 1.0);
    }

    #[test]
    fn matrix_is_symmetric_and_bounded() {
        let columns: Vec<Vec<f64>> = (0..4)
            .map(|i| {
                (0..30)
                    .map(|t| ((t * (i + 2)) as f64 * 0.37).sin() + i as f64 * 0.1)
                    .collect()
            })
            .collect();
        let m = w_correlation(&table(&columns), 10).unwrap();
        assert_eq!(m.n_components(), 4);
        for i in 0..4 {
            assert_eq!(m.get(i, i), Some(1.0));
            for j in 0..4 {
                let v = m.get(i, j).unwrap();
                assert_eq!(v, m.get(j, i).unwrap());
                assert!((0.0..=1.0).contains(&v), "entry ({i},{j}) = {v}");
            }
        }
        assert!(m.max_off_diagonal() <= 1.0);
    }

    #[test]
    fn huge_components_do_not_overflow() {
        let base: Vec<f64> = (0..40).map(|t| 3.0 + (2.5 * t as f64).cos()).collect();
        let other: Vec<f64> = (0..40).map(|t| (0.7 * t as f64).sin()).collect();
        let reference = w_correlation(&table(&[base.clone(), other.clone()]), 10).unwrap();
        for scale in [1e150, 1e160, 1e300] {
            let scaled: Vec<Vec<f64>> = [&base, &other]
                .iter()
                .map(|c| c.iter().map(|v| v * scale).collect())
                .collect();
            let m = w_correlation(&table(&scaled), 10).unwrap();
            assert_abs_diff_eq!(
                m.get(0, 1).unwrap(),
                reference.get(0, 1).unwrap(),
                epsilon = 1e-12
            );
            assert!(m.get(0, 1).unwrap() < 0.5);
        }
    }

    #[test]
    fn non_finite_component_rejected() {
        let t = table(&[vec![1.0, 2.0, 3.0, 4.0], vec![1.0, f64::INFINITY, 0.0, 1.0]]);
        assert_eq!(w_correlation(&t, 2).unwrap_err(), SsaError::NonFiniteData);
        let t = table(&[vec![1.0, 2.0, 3.0, 4.0], vec![1.0, f64::NAN, 0.0, 1.0]]);
        assert_eq!(w_correlation(&t, 2).unwrap_err(), SsaError::NonFiniteData);
    }

    #[test]
    fn zero_component_is_degenerate() {
        let t = table(&[vec![1.0, 2.0, 3.0, 4.0], vec![0.0; 4]]);
        let err = w_correlation(&t, 2).unwrap_err();
        assert_eq!(err, SsaError::DegenerateComponent { index: 1 });
    }

    #[test]
    fn block_extracts_square_submatrix() {
        let columns: Vec<Vec<f64>> = (0..3)
            .map(|i| (0..12).map(|t| ((t + i) as f64).cos()).collect())
            .collect();
        let m = w_correlation(&table(&columns), 4).unwrap();
        let b = m.block(1..3).unwrap();
        assert_eq!(b.dim(), (2, 2));
        assert_eq!(b[[0, 1]], m.get(1, 2).unwrap());
        assert!(m.block(1..4).is_err());
    }

    #[test]
    fn to_rows_matches_view() {
        let t = table(&[vec![1.0, 0.0, 2.0, 1.0], vec![0.0, 1.0, 1.0, 3.0]]);
        let m = w_correlation(&t, 2).unwrap();
        let rows = m.to_rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0][1], m.view()[[0, 1]]);
    }
}
