//! Low-level CSV writing.

use std::path::Path;

use arrow::array::RecordBatch;
use arrow::csv::WriterBuilder;

use crate::error::IoError;

/// Writes one [`RecordBatch`] to a CSV file at `path`, with a header row.
///
/// # Errors
///
/// Returns [`IoError::Csv`] if the file cannot be created, or
/// [`IoError::Arrow`] if serialization fails.
pub(crate) fn write_batch(path: &Path, batch: &RecordBatch) -> Result<(), IoError> {
    let file = std::fs::File::create(path).map_err(|e| IoError::Csv {
        reason: e.to_string(),
    })?;
    let mut writer = WriterBuilder::new().with_header(true).build(file);
    writer.write(batch)?;
    Ok(())
}
