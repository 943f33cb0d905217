//! Error types for caterpillar-io.

use std::path::PathBuf;

/// Error type for all fallible operations in the caterpillar-io crate.
///
/// Covers missing files, unrecognized extensions, format-specific failures
/// from the CSV, Arrow and Parquet layers, missing columns, and validation
/// problems found in the data being read or written.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// Returned when a required file does not exist on disk.
    #[error("file not found: {}", path.display())]
    FileNotFound {
        /// Path that could not be found.
        path: PathBuf,
    },

    /// Returned when the file extension is neither CSV nor Parquet.
    #[error("unsupported file format: {} (expected .csv, .parquet or .pq)", path.display())]
    UnsupportedFormat {
        /// Path with the unrecognized extension.
        path: PathBuf,
    },

    /// Wraps a CSV parsing or file-system failure while handling a CSV file.
    #[error("csv error: {reason}")]
    Csv {
        /// Description of the underlying CSV failure.
        reason: String,
    },

    /// Wraps an error originating from the Arrow library.
    #[error("arrow error: {reason}")]
    Arrow {
        /// Description of the underlying Arrow failure.
        reason: String,
    },

    /// Wraps an error originating from the Parquet library.
    #[error("parquet error: {reason}")]
    Parquet {
        /// Description of the underlying Parquet failure.
        reason: String,
    },

    /// Returned when one or more validation checks fail.
    #[error("{count} validation error(s): {details}")]
    Validation {
        /// Number of accumulated validation failures.
        count: usize,
        /// Human-readable summary of the failures.
        details: String,
    },

    /// Returned when a required column is not present in a file.
    #[error("column '{name}' not found in {}", path.display())]
    MissingColumn {
        /// Name of the missing column.
        name: String,
        /// Path to the file that was inspected.
        path: PathBuf,
    },
}

impl From<arrow::error::ArrowError> for IoError {
    fn from(e: arrow::error::ArrowError) -> Self {
        IoError::Arrow {
            reason: e.to_string(),
        }
    }
}

impl From<parquet::errors::ParquetError> for IoError {
    fn from(e: parquet::errors::ParquetError) -> Self {
        IoError::Parquet {
            reason: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_file_not_found() {
        let err = IoError::FileNotFound {
            path: PathBuf::from("/tmp/missing.csv"),
        };
        assert_eq!(err.to_string(), "file not found: /tmp/missing.csv");
    }

    #[test]
    fn display_unsupported_format() {
        let err = IoError::UnsupportedFormat {
            path: PathBuf::from("series.xlsx"),
        };
        assert_eq!(
            err.to_string(),
            "unsupported file format: series.xlsx (expected .csv, .parquet or .pq)"
        );
    }

    #[test]
    fn display_csv() {
        let err = IoError::Csv {
            reason: "unterminated quote".to_string(),
        };
        assert_eq!(err.to_string(), "csv error: unterminated quote");
    }

    #[test]
    fn display_arrow() {
        let err = IoError::Arrow {
            reason: "schema mismatch".to_string(),
        };
        assert_eq!(err.to_string(), "arrow error: schema mismatch");
    }

    #[test]
    fn display_parquet() {
        let err = IoError::Parquet {
            reason: "corrupt footer".to_string(),
        };
        assert_eq!(err.to_string(), "parquet error: corrupt footer");
    }

    #[test]
    fn display_validation() {
        let err = IoError::Validation {
            count: 2,
            details: "column 'F1' has 9 rows, expected 10; duplicate column 'F0'".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "2 validation error(s): column 'F1' has 9 rows, expected 10; duplicate column 'F0'"
        );
    }

    #[test]
    fn display_missing_column() {
        let err = IoError::MissingColumn {
            name: "Nilai".to_string(),
            path: PathBuf::from("/data/series.csv"),
        };
        assert_eq!(
            err.to_string(),
            "column 'Nilai' not found in /data/series.csv"
        );
    }

    #[test]
    fn from_arrow_error() {
        let arrow_err = arrow::error::ArrowError::CsvError("bad row".to_string());
        let err: IoError = arrow_err.into();
        assert!(matches!(err, IoError::Arrow { .. }));
        assert!(err.to_string().contains("bad row"));
    }

    #[test]
    fn from_parquet_error() {
        let pq_err = parquet::errors::ParquetError::General("test pq error".to_string());
        let err: IoError = pq_err.into();
        assert!(matches!(err, IoError::Parquet { .. }));
        assert!(err.to_string().contains("test pq error"));
    }

    #[test]
    fn error_is_send_sync_and_std_error() {
        fn assert_bounds<T: Send + Sync + std::error::Error>() {}
        assert_bounds::<IoError>();
    }
}
