//! Accumulated validation utilities.
//!
//! Provides [`ValidationCollector`] for gathering multiple validation errors
//! into a single [`IoError::Validation`], plus helpers that check the shape
//! of tables and columns before they are written or handed to the core.

use std::collections::HashSet;

use crate::error::IoError;

/// Upper bound on per-row messages recorded by one helper; the rest are summarized.
const MAX_ROW_MESSAGES: usize = 10;

/// Accumulates validation errors and converts them into a single
/// [`IoError::Validation`].
pub(crate) struct ValidationCollector {
    errors: Vec<String>,
}

impl ValidationCollector {
    /// Create an empty collector.
    pub(crate) fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Record one validation error.
    pub(crate) fn push(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    /// Move every error recorded in `other` into `self`.
    pub(crate) fn extend(&mut self, other: ValidationCollector) {
        self.errors.extend(other.errors);
    }

    /// Returns `true` when no errors have been recorded.
    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the number of recorded errors.
    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.errors.len()
    }

    /// Consume the collector and return `Ok(())` if no errors were recorded,
    /// or `Err(IoError::Validation { count, details })` otherwise.
    ///
    /// The `details` string joins all messages with `"; "`.
    pub(crate) fn finish(self) -> Result<(), IoError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(IoError::Validation {
                count: self.errors.len(),
                details: self.errors.join("; "),
            })
        }
    }
}

/// Check that column names are non-empty and unique.
pub(crate) fn validate_column_names<'a>(
    names: impl IntoIterator<Item = &'a str>,
) -> ValidationCollector {
    let mut c = ValidationCollector::new();
    let mut seen = HashSet::new();

    for name in names {
        if name.is_empty() {
            c.push("empty column name");
        } else if !seen.insert(name) {
            c.push(format!("duplicate column '{name}'"));
        }
    }

    c
}

/// Check that every column has `expected` rows.
pub(crate) fn validate_column_lengths<'a>(
    expected: usize,
    columns: impl IntoIterator<Item = (&'a str, usize)>,
) -> ValidationCollector {
    let mut c = ValidationCollector::new();

    for (name, len) in columns {
        if len != expected {
            c.push(format!("column '{name}' has {len} rows, expected {expected}"));
        }
    }

    c
}

/// Record one message per null row of `column`, capped at a handful of rows.
pub(crate) fn validate_non_null(
    column: &str,
    null_rows: impl IntoIterator<Item = usize>,
) -> ValidationCollector {
    let mut c = ValidationCollector::new();
    let rows: Vec<usize> = null_rows.into_iter().collect();

    for &row in rows.iter().take(MAX_ROW_MESSAGES) {
        c.push(format!("null value in column '{column}' at row {row}"));
    }
    if rows.len() > MAX_ROW_MESSAGES {
        c.push(format!(
            "{} more null values in column '{column}'",
            rows.len() - MAX_ROW_MESSAGES
        ));
    }

    c
}
