//! High-level series reader configuration and orchestration.

use std::path::Path;

use arrow::array::{Array, AsArray, RecordBatch};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type};
use caterpillar_ssa::SeriesInput;
use tracing::{debug, info};

use crate::csv_read;
use crate::error::IoError;
use crate::format::FileFormat;
use crate::parquet_read;
use crate::validate::{ValidationCollector, validate_column_names, validate_non_null};

/// Configuration for reading one series from a CSV or Parquet file.
///
/// Use the builder methods (`with_*`) to choose the value and index
/// columns. The [`Default`] implementation reads the column `value` with an
/// ordinal index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReaderConfig {
    /// Name of the numeric column holding the observations.
    value_column: String,
    /// Optional name of the column holding row labels.
    index_column: Option<String>,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            value_column: "value".into(),
            index_column: None,
        }
    }
}

impl ReaderConfig {
    /// Set the value column name.
    pub fn with_value_column(mut self, name: impl Into<String>) -> Self {
        self.value_column = name.into();
        self
    }

    /// Set the index column name, or `None` for an ordinal index.
    pub fn with_index_column(mut self, name: Option<impl Into<String>>) -> Self {
        self.index_column = name.map(Into::into);
        self
    }

    /// Returns the value column name.
    pub fn value_column(&self) -> &str {
        &self.value_column
    }

    /// Returns the index column name, if any.
    pub fn index_column(&self) -> Option<&str> {
        self.index_column.as_deref()
    }

    /// Validate that the configuration is internally consistent.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::Validation`] if a column name is empty or the
    /// value and index columns coincide.
    pub fn validate(&self) -> Result<(), IoError> {
        let names = std::iter::once(self.value_column.as_str()).chain(self.index_column());
        validate_column_names(names).finish()
    }
}

/// Read one series from a CSV or Parquet file, chosen by extension.
///
/// The value column is cast to `f64` (integer columns are accepted); the
/// index column, when configured, is cast to strings. Without an index
/// column the result is [`SeriesInput::List`], otherwise
/// [`SeriesInput::Labeled`].
///
/// # Errors
///
/// Returns [`IoError`] on an invalid configuration, an unsupported
/// extension, a missing file or column, a non-numeric value column, or
/// null cells in either column.
pub fn read_series(path: &Path, config: &ReaderConfig) -> Result<SeriesInput, IoError> {
    config.validate()?;

    let format = FileFormat::from_path(path)?;
    let batches = match format {
        FileFormat::Csv => csv_read::read_batches(path)?,
        FileFormat::Parquet => parquet_read::read_batches(path)?,
    };
    debug!(path = %path.display(), ?format, n_batches = batches.len(), "read record batches");

    let values = extract_values(&batches, &config.value_column, path)?;

    let input = match &config.index_column {
        Some(name) => {
            let index = extract_labels(&batches, name, path)?;
            SeriesInput::Labeled { index, values }
        }
        None => SeriesInput::List(values),
    };

    info!(
        path = %path.display(),
        column = %config.value_column,
        n = batches.iter().map(RecordBatch::num_rows).sum::<usize>(),
        "loaded series"
    );
    Ok(input)
}

/// Looks up `name` in every batch, failing if any batch lacks it.
fn column_in<'a>(
    batch: &'a RecordBatch,
    name: &str,
    path: &Path,
) -> Result<&'a dyn Array, IoError> {
    batch
        .column_by_name(name)
        .map(|c| c.as_ref())
        .ok_or_else(|| IoError::MissingColumn {
            name: name.to_string(),
            path: path.to_path_buf(),
        })
}

fn extract_values(batches: &[RecordBatch], name: &str, path: &Path) -> Result<Vec<f64>, IoError> {
    let mut values = Vec::new();
    let mut nulls = Vec::new();
    let mut invalid = ValidationCollector::new();

    for batch in batches {
        let column = column_in(batch, name, path)?;
        if !column.data_type().is_numeric() {
            invalid.push(format!(
                "column '{name}' has type {}, expected a numeric type",
                column.data_type()
            ));
            break;
        }
        let floats = cast(column, &DataType::Float64)?;
        let floats = floats.as_primitive::<Float64Type>();
        let offset = values.len();
        for (row, value) in floats.iter().enumerate() {
            match value {
                Some(v) => values.push(v),
                None => {
                    nulls.push(offset + row);
                    values.push(f64::NAN);
                }
            }
        }
    }

    invalid.extend(validate_non_null(name, nulls));
    invalid.finish()?;
    Ok(values)
}

fn extract_labels(
    batches: &[RecordBatch],
    name: &str,
    path: &Path,
) -> Result<Vec<String>, IoError> {
    let mut labels = Vec::new();
    let mut nulls = Vec::new();

    for batch in batches {
        let column = column_in(batch, name, path)?;
        let strings = cast(column, &DataType::Utf8)?;
        let strings = strings.as_string::<i32>();
        let offset = labels.len();
        for (row, label) in strings.iter().enumerate() {
            match label {
                Some(s) => labels.push(s.to_string()),
                None => {
                    nulls.push(offset + row);
                    labels.push(String::new());
                }
            }
        }
    }

    validate_non_null(name, nulls).finish()?;
    Ok(labels)
}
