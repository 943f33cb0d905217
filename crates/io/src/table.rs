//! Named-column tables handed to the writers.

use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, RecordBatch, StringArray, UInt64Array};
use arrow::datatypes::{DataType, Field, Schema};
use caterpillar_ssa::{
    ComponentsTable, GroupedReconstruction, SeriesIndex, TimeSeries, WCorrelationMatrix,
    component_name,
};

use crate::error::IoError;
use crate::validate::{validate_column_lengths, validate_column_names};

/// Name of the index column written in front of the data columns.
pub const INDEX_COLUMN: &str = "index";

/// Name of the column holding the input series next to its reconstructions.
pub const ORIGINAL_COLUMN: &str = "original";

/// An index column followed by named `f64` columns of equal length.
///
/// Ordinal indices are written as unsigned integers, label indices as
/// strings.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedTable {
    index: SeriesIndex,
    columns: Vec<(String, Vec<f64>)>,
}

impl NamedTable {
    /// Creates an empty table over `index`.
    pub fn new(index: SeriesIndex) -> Self {
        Self {
            index,
            columns: Vec::new(),
        }
    }

    /// Appends a column.
    pub fn with_column(mut self, name: impl Into<String>, values: Vec<f64>) -> Self {
        self.columns.push((name.into(), values));
        self
    }

    /// Inserts the input series as the first data column, named
    /// [`ORIGINAL_COLUMN`].
    pub fn with_original(mut self, series: &TimeSeries) -> Self {
        self.columns
            .insert(0, (ORIGINAL_COLUMN.to_string(), series.as_slice().to_vec()));
        self
    }

    /// One column per component, named `F0 .. F{n-1}`.
    pub fn from_components(table: &ComponentsTable) -> Self {
        let columns = (0..table.n_components())
            .filter_map(|i| table.column(i).map(|c| (component_name(i), c.to_vec())))
            .collect();
        Self {
            index: table.index().clone(),
            columns,
        }
    }

    /// One column per reconstructed group, in group order.
    pub fn from_groups(groups: &GroupedReconstruction) -> Self {
        let columns = groups
            .iter()
            .map(|(name, values)| (name.to_string(), values.to_vec()))
            .collect();
        Self {
            index: groups.index().clone(),
            columns,
        }
    }

    /// The w-correlation matrix with rows and columns named `F0 .. F{d-1}`.
    pub fn from_wcorr(matrix: &WCorrelationMatrix) -> Self {
        let d = matrix.n_components();
        let view = matrix.view();
        let columns = (0..d)
            .map(|j| (component_name(j), view.column(j).to_vec()))
            .collect();
        Self {
            index: SeriesIndex::Labels((0..d).map(component_name).collect()),
            columns,
        }
    }

    /// Returns the row index.
    pub fn index(&self) -> &SeriesIndex {
        &self.index
    }

    /// Returns the number of rows.
    pub fn n_rows(&self) -> usize {
        self.index.len()
    }

    /// Returns the number of data columns (excluding the index).
    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    /// Returns the data column names in order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Returns the column called `name`.
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_slice())
    }

    /// Checks column names and lengths.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::Validation`] listing every empty or duplicate
    /// name (including a clash with the index column) and every column whose
    /// length differs from the index.
    pub fn validate(&self) -> Result<(), IoError> {
        let names =
            std::iter::once(INDEX_COLUMN).chain(self.columns.iter().map(|(n, _)| n.as_str()));
        let mut c = validate_column_names(names);
        c.extend(validate_column_lengths(
            self.n_rows(),
            self.columns.iter().map(|(n, v)| (n.as_str(), v.len())),
        ));
        c.finish()
    }

    /// Builds the Arrow schema: the index column then one `Float64` per column.
    pub(crate) fn schema(&self) -> Schema {
        let index_type = match self.index {
            SeriesIndex::Ordinal(_) => DataType::UInt64,
            SeriesIndex::Labels(_) => DataType::Utf8,
        };
        let fields: Vec<Field> = std::iter::once(Field::new(INDEX_COLUMN, index_type, false))
            .chain(
                self.columns
                    .iter()
                    .map(|(name, _)| Field::new(name.as_str(), DataType::Float64, false)),
            )
            .collect();
        Schema::new(fields)
    }

    /// Converts the table into a single Arrow [`RecordBatch`].
    pub(crate) fn to_record_batch(&self) -> Result<RecordBatch, IoError> {
        self.validate()?;
        let index_col: ArrayRef = match &self.index {
            SeriesIndex::Ordinal(n) => Arc::new(UInt64Array::from_iter_values(0..*n as u64)),
            SeriesIndex::Labels(labels) => Arc::new(StringArray::from_iter_values(labels)),
        };
        let columns: Vec<ArrayRef> = std::iter::once(index_col)
            .chain(
                self.columns
                    .iter()
                    .map(|(_, values)| Arc::new(Float64Array::from(values.clone())) as ArrayRef),
            )
            .collect();
        Ok(RecordBatch::try_new(Arc::new(self.schema()), columns)?)
    }
}
