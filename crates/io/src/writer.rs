//! High-level table writer configuration and orchestration.

use std::path::Path;

use parquet::file::properties::WriterProperties;
use tracing::info;

use crate::csv_write;
use crate::error::IoError;
use crate::format::FileFormat;
use crate::parquet_write;
use crate::table::NamedTable;

/// Compression algorithm for Parquet output. Ignored for CSV.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Compression {
    /// No compression.
    None,
    /// Snappy compression (fast, moderate ratio).
    #[default]
    Snappy,
    /// Zstd compression (slower, better ratio).
    Zstd,
}

impl Compression {
    /// Converts to the corresponding `parquet::basic::Compression` variant.
    fn to_parquet(self) -> Result<parquet::basic::Compression, IoError> {
        Ok(match self {
            Self::None => parquet::basic::Compression::UNCOMPRESSED,
            Self::Snappy => parquet::basic::Compression::SNAPPY,
            Self::Zstd => {
                let level =
                    parquet::basic::ZstdLevel::try_new(3).map_err(|e| IoError::Parquet {
                        reason: e.to_string(),
                    })?;
                parquet::basic::Compression::ZSTD(level)
            }
        })
    }
}

/// Configuration for writing tables to CSV or Parquet.
#[derive(Debug, Clone)]
pub struct WriterConfig {
    /// Compression algorithm to use for Parquet.
    compression: Compression,
    /// Maximum number of rows per Parquet row group.
    row_group_size: usize,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            compression: Compression::default(),
            row_group_size: 1_000_000,
        }
    }
}

impl WriterConfig {
    /// Sets the compression algorithm.
    pub fn with_compression(mut self, comp: Compression) -> Self {
        self.compression = comp;
        self
    }

    /// Sets the maximum number of rows per row group.
    pub fn with_row_group_size(mut self, size: usize) -> Self {
        self.row_group_size = size;
        self
    }

    /// Returns the compression algorithm.
    pub fn compression(&self) -> Compression {
        self.compression
    }

    /// Validates this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::Validation`] if `row_group_size` is zero.
    pub fn validate(&self) -> Result<(), IoError> {
        if self.row_group_size == 0 {
            return Err(IoError::Validation {
                count: 1,
                details: "row_group_size must be greater than 0".to_string(),
            });
        }
        Ok(())
    }
}

/// Write a [`NamedTable`] to `path` as CSV or Parquet, chosen by extension.
///
/// # Errors
///
/// Returns [`IoError::Validation`] if the configuration or table is
/// invalid, [`IoError::UnsupportedFormat`] for an unknown extension, or a
/// format-specific error if writing fails.
pub fn write_table(path: &Path, table: &NamedTable, config: &WriterConfig) -> Result<(), IoError> {
    config.validate()?;
    let format = FileFormat::from_path(path)?;
    let batch = table.to_record_batch()?;

    match format {
        FileFormat::Csv => csv_write::write_batch(path, &batch)?,
        FileFormat::Parquet => {
            let props = WriterProperties::builder()
                .set_compression(config.compression.to_parquet()?)
                .set_max_row_group_size(config.row_group_size)
                .build();
            parquet_write::write_batch(path, &batch, props)?;
        }
    }

    info!(
        path = %path.display(),
        rows = table.n_rows(),
        columns = table.n_columns(),
        "wrote table"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let config = WriterConfig::default();
        assert_eq!(config.compression, Compression::Snappy);
        assert_eq!(config.row_group_size, 1_000_000);
    }

    #[test]
    fn builder_methods() {
        let config = WriterConfig::default()
            .with_compression(Compression::Zstd)
            .with_row_group_size(500);
        assert_eq!(config.compression(), Compression::Zstd);
        assert_eq!(config.row_group_size, 500);
    }

    #[test]
    fn validate_zero_row_group_size() {
        let config = WriterConfig::default().with_row_group_size(0);
        let err = config.validate().unwrap_err();
        match err {
            IoError::Validation { count, details } => {
                assert_eq!(count, 1);
                assert!(details.contains("row_group_size"));
            }
            _ => panic!("expected Validation error"),
        }
    }

    #[test]
    fn compression_maps_to_parquet() {
        assert_eq!(
            Compression::None.to_parquet().unwrap(),
            parquet::basic::Compression::UNCOMPRESSED
        );
        assert_eq!(
            Compression::Snappy.to_parquet().unwrap(),
            parquet::basic::Compression::SNAPPY
        );
        assert!(matches!(
            Compression::Zstd.to_parquet().unwrap(),
            parquet::basic::Compression::ZSTD(_)
        ));
    }
}
