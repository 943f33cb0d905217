//! The decomposition pipeline: embed, factorize, average, tabulate.

use ndarray::{Array2, Array3};
use tracing::{debug, warn};

use crate::components::ComponentsTable;
use crate::config::{MemoryMode, SsaConfig};
use crate::embed::embed;
use crate::error::SsaError;
use crate::hankel::{hankelize_retained, hankelize_transient};
use crate::reconstruct::{ComponentGroup, ComponentSelection, GroupedReconstruction};
use crate::retained::{NotRetainedReason, Retained};
use crate::series::{SeriesInput, TimeSeries};
use crate::svd::decompose_with_budget;
use crate::wcorr::{WCorrelationMatrix, w_correlation};

/// Elementary-array size (in `f64` entries) above which retain mode logs a warning.
const LARGE_ELEMENTARY_ARRAY: usize = 50_000_000;

/// A completed Singular Spectrum Analysis of one series.
///
/// Everything is computed in [`Ssa::new`]; all other methods are read-only
/// queries on the result, so an `Ssa` can be shared freely between threads.
///
/// # Example
///
/// ```ignore
/// use caterpillar_ssa::{Ssa, SsaConfig};
///
/// let ssa = Ssa::new(data, &SsaConfig::new(20))?;
/// let trend = ssa.reconstruct(0)?;
/// let seasonal = ssa.reconstruct([1, 2])?;
/// let wcorr = ssa.w_correlation()?;
/// ```
#[derive(Clone, Debug)]
pub struct Ssa {
    series: TimeSeries,
    window_length: usize,
    memory_mode: MemoryMode,
    singular_values: Vec<f64>,
    u: Array2<f64>,
    v: Retained<Array2<f64>>,
    elementary: Retained<Array3<f64>>,
    components: ComponentsTable,
}

impl Ssa {
    /// Decomposes `series` with the window length and memory mode of `config`.
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`SsaError::EmptySeries`] | the series has no observations |
    /// | [`SsaError::NonFiniteData`] | the series contains NaN or infinity |
    /// | [`SsaError::IndexLengthMismatch`] | labeled input with mismatched lengths |
    /// | [`SsaError::InvalidWindowLength`] | `L` outside `[2, N/2]` |
    /// | [`SsaError::InvalidIterationBudget`] | an explicit SVD iteration budget of 0 |
    /// | [`SsaError::DecompositionFailed`] | the SVD did not converge, the rank is 0, or the factors do not reproduce the trajectory matrix |
    pub fn new(series: impl Into<SeriesInput>, config: &SsaConfig) -> Result<Self, SsaError> {
        let input = series.into();
        let kind = input.kind();
        let series = TimeSeries::try_from(input)?;
        let n = series.len();
        config.validate(n)?;

        let window_length = config.window_length();
        let memory_mode = config.memory_mode();
        debug!(input = kind, n, window = window_length, mode = ?memory_mode, "starting SSA");

        let trajectory = embed(&series, window_length)?;
        let svd = decompose_with_budget(&trajectory, config.max_svd_iterations())?;
        drop(trajectory);

        let d = svd.rank();
        let k = n - window_length + 1;

        let (columns, elementary) = match memory_mode {
            MemoryMode::Retain => {
                let size = d * window_length * k;
                if size > LARGE_ELEMENTARY_ARRAY {
                    warn!(
                        rank = d,
                        window = window_length,
                        n_windows = k,
                        entries = size,
                        "retaining a large elementary-matrix array; consider memory-saving mode"
                    );
                }
                let (elementary, columns) = hankelize_retained(&svd);
                (columns, Retained::Available(elementary))
            }
            MemoryMode::Saving => (
                hankelize_transient(&svd),
                Retained::NotRetained(NotRetainedReason::MemorySaving),
            ),
        };

        let components = ComponentsTable::from_columns(&columns, series.index().clone());
        let (u, singular_values, v, _) = svd.into_parts();
        let v = match memory_mode {
            MemoryMode::Retain => Retained::Available(v),
            MemoryMode::Saving => Retained::NotRetained(NotRetainedReason::MemorySaving),
        };

        debug!(rank = d, "SSA components reconstructed");

        Ok(Self {
            series,
            window_length,
            memory_mode,
            singular_values,
            u,
            v,
            elementary,
            components,
        })
    }

    /// Returns the original series.
    pub fn series(&self) -> &TimeSeries {
        &self.series
    }

    /// Returns the window length `L`.
    pub fn window_length(&self) -> usize {
        self.window_length
    }

    /// Returns the series length `N`.
    pub fn series_length(&self) -> usize {
        self.series.len()
    }

    /// Returns the number of lagged windows `K = N - L + 1`.
    pub fn n_windows(&self) -> usize {
        self.series_length() - self.window_length + 1
    }

    /// Returns the numerical rank `d` of the trajectory matrix.
    pub fn rank(&self) -> usize {
        self.components.n_components()
    }

    /// Returns the memory mode the decomposition ran in.
    pub fn memory_mode(&self) -> MemoryMode {
        self.memory_mode
    }

    /// Returns all `min(L, K)` singular values in descending order.
    pub fn singular_values(&self) -> &[f64] {
        &self.singular_values
    }

    /// Returns the left singular vectors as columns (`L x min(L, K)`).
    pub fn left_singular_vectors(&self) -> &Array2<f64> {
        &self.u
    }

    /// Returns the right singular vectors as columns (`K x min(L, K)`),
    /// available in [`MemoryMode::Retain`] only. Columns past the rank `d`
    /// are zero.
    pub fn right_singular_vectors(&self) -> Retained<&Array2<f64>> {
        self.v.as_ref()
    }

    /// Returns the `d x L x K` elementary matrices, available in
    /// [`MemoryMode::Retain`] only.
    pub fn elementary_matrices(&self) -> Retained<&Array3<f64>> {
        self.elementary.as_ref()
    }

    /// Returns the full `N x d` components table.
    pub fn components(&self) -> &ComponentsTable {
        &self.components
    }

    /// Returns the first `n` components, or all `d` when `n == 0`.
    pub fn components_table(&self, n: usize) -> ComponentsTable {
        self.components.leading(n)
    }

    /// Sums the selected components into a series aligned to the original index.
    ///
    /// # Errors
    ///
    /// Returns [`SsaError::IndexOutOfRange`] if any selected index is `>= d`.
    pub fn reconstruct(
        &self,
        selection: impl Into<ComponentSelection>,
    ) -> Result<TimeSeries, SsaError> {
        self.components.reconstruct(selection)
    }

    /// Reconstructs each caller-defined group of components.
    ///
    /// # Errors
    ///
    /// Returns [`SsaError::IndexOutOfRange`] if a group references a missing component.
    pub fn reconstruct_groups(
        &self,
        groups: &[ComponentGroup],
    ) -> Result<GroupedReconstruction, SsaError> {
        GroupedReconstruction::from_table(&self.components, groups)
    }

    /// Computes the w-correlation matrix of the `d` components.
    ///
    /// # Errors
    ///
    /// Returns [`SsaError::DegenerateComponent`] if a component has zero weighted norm.
    pub fn w_correlation(&self) -> Result<WCorrelationMatrix, SsaError> {
        w_correlation(&self.components, self.window_length)
    }

    /// Returns the share `sigma_i^2 / sum_j sigma_j^2` of each of the `d`
    /// components.
    pub fn contributions(&self) -> Vec<f64> {
        let total: f64 = self.singular_values.iter().map(|s| s * s).sum();
        self.singular_values[..self.rank()]
            .iter()
            .map(|s| if total > 0.0 { s * s / total } else { 0.0 })
            .collect()
    }

    /// Returns the running sum of [`contributions`](Self::contributions).
    pub fn cumulative_contributions(&self) -> Vec<f64> {
        self.contributions()
            .into_iter()
            .scan(0.0, |acc, c| {
                *acc += c;
                Some(*acc)
            })
            .collect()
    }

    /// Returns the largest absolute difference between the original series
    /// and the sum of all components.
    pub fn reconstruction_error(&self) -> f64 {
        self.components
            .view()
            .rows()
            .into_iter()
            .zip(self.series.as_slice())
            .map(|(row, &x)| (row.sum() - x).abs())
            .fold(0.0, f64::max)
    }
}
