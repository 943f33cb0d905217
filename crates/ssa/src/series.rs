//! Validated time-series wrapper and the accepted input representations.

use ndarray::Array1;
use serde_json::Value;

use crate::error::SsaError;

/// Row index of a [`TimeSeries`].
///
/// Either a plain ordinal index `0..n` or one label per observation
/// (timestamps, dates, or any other caller-supplied key).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SeriesIndex {
    /// Ordinal index `0..n`.
    Ordinal(usize),
    /// One label per observation.
    Labels(Vec<String>),
}

impl SeriesIndex {
    /// Returns the number of rows covered by the index.
    pub fn len(&self) -> usize {
        match self {
            Self::Ordinal(n) => *n,
            Self::Labels(labels) => labels.len(),
        }
    }

    /// Returns `true` if the index covers no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` for an ordinal index.
    pub fn is_ordinal(&self) -> bool {
        matches!(self, Self::Ordinal(_))
    }

    /// Returns the label of row `t`, or `None` if `t` is out of range.
    ///
    /// Ordinal rows are labelled by their position.
    pub fn label(&self, t: usize) -> Option<String> {
        match self {
            Self::Ordinal(n) => (t < *n).then(|| t.to_string()),
            Self::Labels(labels) => labels.get(t).cloned(),
        }
    }

    /// Returns all row labels in order.
    pub fn labels(&self) -> Vec<String> {
        match self {
            Self::Ordinal(n) => (0..*n).map(|t| t.to_string()).collect(),
            Self::Labels(labels) => labels.clone(),
        }
    }
}

/// A validated time series of finite `f64` values with its row index.
///
/// Guarantees:
/// - length >= 1
/// - all values are finite (no NaN or infinity)
/// - the index has exactly one row per value
///
/// # Example
///
/// ```ignore
/// use caterpillar_ssa::TimeSeries;
///
/// let ts = TimeSeries::new(vec![1.0, 2.0, 3.0])?;
/// assert_eq!(ts.len(), 3);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct TimeSeries {
    values: Vec<f64>,
    index: SeriesIndex,
}

impl TimeSeries {
    /// Creates a new `TimeSeries` with an ordinal index.
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`SsaError::EmptySeries`] | `values` is empty |
    /// | [`SsaError::NonFiniteData`] | any element is NaN or infinite |
    pub fn new(values: Vec<f64>) -> Result<Self, SsaError> {
        let n = values.len();
        Self::with_index(values, SeriesIndex::Ordinal(n))
    }

    /// Creates a new `TimeSeries` with an explicit index.
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`SsaError::EmptySeries`] | `values` is empty |
    /// | [`SsaError::IndexLengthMismatch`] | `index.len() != values.len()` |
    /// | [`SsaError::NonFiniteData`] | any element is NaN or infinite |
    pub fn with_index(values: Vec<f64>, index: SeriesIndex) -> Result<Self, SsaError> {
        if values.is_empty() {
            return Err(SsaError::EmptySeries);
        }
        if index.len() != values.len() {
            return Err(SsaError::IndexLengthMismatch {
                index: index.len(),
                values: values.len(),
            });
        }
        if !values.iter().all(|v| v.is_finite()) {
            return Err(SsaError::NonFiniteData);
        }
        Ok(Self { values, index })
    }

    /// Builds a series from values already known to match `index`.
    ///
    /// Used for reconstructions, which are sums of finite components.
    pub(crate) fn from_parts(values: Vec<f64>, index: SeriesIndex) -> Self {
        debug_assert_eq!(values.len(), index.len());
        Self { values, index }
    }

    /// Returns the values as a slice.
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Returns the row index.
    pub fn index(&self) -> &SeriesIndex {
        &self.index
    }

    /// Returns the number of observations.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the series is empty.
    ///
    /// Note: a validated `TimeSeries` is never empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Consumes the series, returning its values and index.
    pub fn into_parts(self) -> (Vec<f64>, SeriesIndex) {
        (self.values, self.index)
    }
}

impl AsRef<[f64]> for TimeSeries {
    fn as_ref(&self) -> &[f64] {
        &self.values
    }
}

/// The closed set of series representations accepted at the decomposition
/// boundary.
///
/// Every variant is normalized into a [`TimeSeries`] before embedding.
/// Dynamic data (for example JSON received by an outer surface) goes through
/// [`SeriesInput::from_json`], which rejects any other shape with
/// [`SsaError::UnsupportedInputType`].
#[derive(Clone, Debug, PartialEq)]
pub enum SeriesInput {
    /// Fixed-size numeric array.
    Array(Array1<f64>),
    /// Values with one label per observation.
    Labeled {
        /// Row labels.
        index: Vec<String>,
        /// Observed values.
        values: Vec<f64>,
    },
    /// Plain ordered numeric list.
    List(Vec<f64>),
}

impl SeriesInput {
    /// Short name of the representation, used in log output.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Array(_) => "array",
            Self::Labeled { .. } => "labeled",
            Self::List(_) => "list",
        }
    }

    /// Parses a dynamic JSON value into a recognized representation.
    ///
    /// Accepted shapes:
    /// - an array of numbers: `[1.0, 2.5, 3.0]`
    /// - an object with `values` (array of numbers) and optional `index`
    ///   (array of strings or numbers): `{"index": ["a", "b"], "values": [1, 2]}`
    ///
    /// # Errors
    ///
    /// Returns [`SsaError::UnsupportedInputType`] for any other shape.
    pub fn from_json(value: &Value) -> Result<Self, SsaError> {
        match value {
            Value::Array(items) => Ok(Self::List(json_numbers(items, "array")?)),
            Value::Object(map) => {
                let values = match map.get("values") {
                    Some(Value::Array(items)) => json_numbers(items, "values")?,
                    Some(other) => {
                        return Err(SsaError::UnsupportedInputType(format!(
                            "'values' is {}",
                            json_kind(other)
                        )));
                    }
                    None => {
                        return Err(SsaError::UnsupportedInputType(
                            "object without a 'values' field".into(),
                        ));
                    }
                };
                match map.get("index") {
                    None | Some(Value::Null) => Ok(Self::List(values)),
                    Some(Value::Array(labels)) => Ok(Self::Labeled {
                        index: json_labels(labels)?,
                        values,
                    }),
                    Some(other) => Err(SsaError::UnsupportedInputType(format!(
                        "'index' is {}",
                        json_kind(other)
                    ))),
                }
            }
            other => Err(SsaError::UnsupportedInputType(json_kind(other).into())),
        }
    }
}

impl From<Vec<f64>> for SeriesInput {
    fn from(values: Vec<f64>) -> Self {
        Self::List(values)
    }
}

impl From<&[f64]> for SeriesInput {
    fn from(values: &[f64]) -> Self {
        Self::List(values.to_vec())
    }
}

impl From<Array1<f64>> for SeriesInput {
    fn from(values: Array1<f64>) -> Self {
        Self::Array(values)
    }
}

impl From<TimeSeries> for SeriesInput {
    fn from(series: TimeSeries) -> Self {
        match series.index {
            SeriesIndex::Ordinal(_) => Self::List(series.values),
            SeriesIndex::Labels(index) => Self::Labeled {
                index,
                values: series.values,
            },
        }
    }
}

impl TryFrom<SeriesInput> for TimeSeries {
    type Error = SsaError;

    fn try_from(input: SeriesInput) -> Result<Self, Self::Error> {
        match input {
            SeriesInput::Array(values) => TimeSeries::new(values.to_vec()),
            SeriesInput::Labeled { index, values } => {
                TimeSeries::with_index(values, SeriesIndex::Labels(index))
            }
            SeriesInput::List(values) => TimeSeries::new(values),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn json_numbers(items: &[Value], what: &str) -> Result<Vec<f64>, SsaError> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            item.as_f64().ok_or_else(|| {
                SsaError::UnsupportedInputType(format!(
                    "{what} element {i} is {}",
                    json_kind(item)
                ))
            })
        })
        .collect()
}

fn json_labels(items: &[Value]) -> Result<Vec<String>, SsaError> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| match item {
            Value::String(s) => Ok(s.clone()),
            Value::Number(n) => Ok(n.to_string()),
            other => Err(SsaError::UnsupportedInputType(format!(
                "index element {i} is {}",
                json_kind(other)
            ))),
        })
        .collect()
}
