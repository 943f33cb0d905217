//! Low-level CSV reading into Arrow record batches.

use std::fs::File;
use std::io::Seek;
use std::path::Path;
use std::sync::Arc;

use arrow::array::RecordBatch;
use arrow::csv::ReaderBuilder;
use arrow::csv::reader::Format;

use crate::error::IoError;

/// Rows sampled for schema inference.
const INFER_ROWS: usize = 1_000;

/// Reads all record batches from a CSV file with a header row.
///
/// Column types are inferred from the first rows; the caller casts the
/// columns it needs.
///
/// # Errors
///
/// Returns [`IoError::FileNotFound`] if the file does not exist,
/// [`IoError::Csv`] if it cannot be opened, or [`IoError::Arrow`] if
/// parsing fails.
pub(crate) fn read_batches(path: &Path) -> Result<Vec<RecordBatch>, IoError> {
    if !path.exists() {
        return Err(IoError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let mut file = File::open(path).map_err(|e| IoError::Csv {
        reason: e.to_string(),
    })?;

    let format = Format::default().with_header(true);
    let (schema, _) = format.infer_schema(&mut file, Some(INFER_ROWS))?;
    file.rewind().map_err(|e| IoError::Csv {
        reason: e.to_string(),
    })?;

    let reader = ReaderBuilder::new(Arc::new(schema))
        .with_format(format)
        .build(file)?;

    let batches = reader.collect::<Result<Vec<_>, _>>()?;
    Ok(batches)
}
