//! Embedding: window-length validation and trajectory-matrix construction.

use ndarray::{Array2, ArrayView2};

use crate::error::SsaError;
use crate::series::TimeSeries;

/// Returns the largest admissible window length for a series of length `n`.
///
/// This is `n / 2`, floored for odd `n`.
pub fn max_window_length(n: usize) -> usize {
    n / 2
}

/// Checks that `window` satisfies `2 <= window <= n / 2`.
///
/// # Errors
///
/// Returns [`SsaError::InvalidWindowLength`] when the window lies outside
/// the admissible interval.
pub fn validate_window_length(window: usize, n: usize) -> Result<(), SsaError> {
    let max = max_window_length(n);
    if window < 2 || window > max {
        return Err(SsaError::InvalidWindowLength {
            window,
            len: n,
            max,
        });
    }
    Ok(())
}

/// The `L x K` trajectory (Hankel) matrix of a series.
///
/// Column `k` holds the length-`L` window starting at offset `k`, so every
/// anti-diagonal of the matrix is constant.
#[derive(Clone, Debug)]
pub struct TrajectoryMatrix {
    matrix: Array2<f64>,
}

impl TrajectoryMatrix {
    /// Returns the window length `L` (number of rows).
    pub fn window_length(&self) -> usize {
        self.matrix.nrows()
    }

    /// Returns the number of lagged windows `K = N - L + 1` (number of columns).
    pub fn n_windows(&self) -> usize {
        self.matrix.ncols()
    }

    /// Returns the length `N = L + K - 1` of the embedded series.
    pub fn series_length(&self) -> usize {
        self.window_length() + self.n_windows() - 1
    }

    /// Returns a view of the underlying matrix.
    pub fn view(&self) -> ArrayView2<'_, f64> {
        self.matrix.view()
    }

    /// Consumes the trajectory matrix, returning the underlying array.
    pub fn into_array(self) -> Array2<f64> {
        self.matrix
    }
}

/// Embeds `series` into its `L x K` trajectory matrix.
///
/// # Errors
///
/// | Variant | Trigger |
/// |---------|---------|
/// | [`SsaError::InvalidWindowLength`] | `window` outside `[2, N/2]` |
///
/// # Example
///
/// ```ignore
/// use caterpillar_ssa::{TimeSeries, embed};
///
/// let ts = TimeSeries::new(vec![1.0, 2.0, 3.0, 4.0, 5.0])?;
/// let x = embed(&ts, 2)?;
/// assert_eq!((x.window_length(), x.n_windows()), (2, 4));
/// ```
pub fn embed(series: &TimeSeries, window: usize) -> Result<TrajectoryMatrix, SsaError> {
    let data = series.as_slice();
    let n = data.len();
    validate_window_length(window, n)?;

    let k = n - window + 1;
    let matrix = Array2::from_shape_fn((window, k), |(row, col)| data[row + col]);
    Ok(TrajectoryMatrix { matrix })
}
