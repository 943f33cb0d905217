//! The table of reconstructed components.

use ndarray::{Array2, ArrayView1, ArrayView2, s};

use crate::error::SsaError;
use crate::reconstruct::ComponentSelection;
use crate::series::{SeriesIndex, TimeSeries};

/// `N x d` table whose column `i` is the diagonal-averaged elementary
/// matrix `i`, with rows aligned to the index of the original series.
///
/// Columns are named `F0, F1, ..., F{d-1}`.
#[derive(Clone, Debug, PartialEq)]
pub struct ComponentsTable {
    values: Array2<f64>,
    index: SeriesIndex,
}

impl ComponentsTable {
    /// Assembles a table from per-component series of equal length.
    pub(crate) fn from_columns(columns: &[Vec<f64>], index: SeriesIndex) -> Self {
        let n = index.len();
        let mut values = Array2::zeros((n, columns.len()));
        for (mut target, column) in values.columns_mut().into_iter().zip(columns) {
            debug_assert_eq!(column.len(), n);
            target.assign(&ArrayView1::from(column.as_slice()));
        }
        Self { values, index }
    }

    /// Returns the number of components (columns).
    pub fn n_components(&self) -> usize {
        self.values.ncols()
    }

    /// Returns the number of rows (series length `N`).
    pub fn len(&self) -> usize {
        self.values.nrows()
    }

    /// Returns `true` if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the row index shared with the original series.
    pub fn index(&self) -> &SeriesIndex {
        &self.index
    }

    /// Returns the column names `F0 .. F{d-1}`.
    pub fn names(&self) -> Vec<String> {
        (0..self.n_components()).map(component_name).collect()
    }

    /// Returns component `i`, or `None` if it does not exist.
    pub fn column(&self, i: usize) -> Option<ArrayView1<'_, f64>> {
        (i < self.n_components()).then(|| self.values.column(i))
    }

    /// Returns a view of the whole `N x d` table.
    pub fn view(&self) -> ArrayView2<'_, f64> {
        self.values.view()
    }

    /// Returns a table with the first `n` components, or all of them when
    /// `n == 0`. Requests beyond the rank are capped at the rank.
    pub fn leading(&self, n: usize) -> ComponentsTable {
        let d = self.n_components();
        let n = if n == 0 { d } else { n.min(d) };
        Self {
            values: self.values.slice(s![.., ..n]).to_owned(),
            index: self.index.clone(),
        }
    }

    /// Sums the selected components into one series aligned to the index.
    ///
    /// An empty selection yields the zero series.
    ///
    /// # Errors
    ///
    /// Returns [`SsaError::IndexOutOfRange`] if the selection names a
    /// component `>= d`.
    pub fn reconstruct(
        &self,
        selection: impl Into<ComponentSelection>,
    ) -> Result<TimeSeries, SsaError> {
        let indices = selection.into().resolve(self.n_components())?;
        let mut sum = vec![0.0; self.len()];
        for i in indices {
            for (acc, &value) in sum.iter_mut().zip(self.values.column(i)) {
                *acc += value;
            }
        }
        Ok(TimeSeries::from_parts(sum, self.index.clone()))
    }
}

/// Column name of component `i`.
pub fn component_name(i: usize) -> String {
    format!("F{i}")
}
