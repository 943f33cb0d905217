//! File format detection by extension.

use std::path::Path;

use crate::error::IoError;

/// On-disk table format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// Comma-separated values with a header row.
    Csv,
    /// Apache Parquet.
    Parquet,
}

impl FileFormat {
    /// Detects the format from the (case-insensitive) file extension.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::UnsupportedFormat`] for any extension other than
    /// `.csv`, `.parquet` or `.pq`.
    pub fn from_path(path: &Path) -> Result<Self, IoError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("csv") => Ok(Self::Csv),
            Some("parquet" | "pq") => Ok(Self::Parquet),
            _ => Err(IoError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }

    /// Returns the canonical file extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Parquet => "parquet",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_known_extensions() {
        assert_eq!(FileFormat::from_path(Path::new("a.csv")).unwrap(), FileFormat::Csv);
        assert_eq!(FileFormat::from_path(Path::new("a.CSV")).unwrap(), FileFormat::Csv);
        assert_eq!(
            FileFormat::from_path(Path::new("dir/a.parquet")).unwrap(),
            FileFormat::Parquet
        );
        assert_eq!(FileFormat::from_path(Path::new("a.pq")).unwrap(), FileFormat::Parquet);
    }

    #[test]
    fn rejects_unknown_extension() {
        for p in ["a.xlsx", "a", "a.nc"] {
            let err = FileFormat::from_path(Path::new(p)).unwrap_err();
            assert!(matches!(err, IoError::UnsupportedFormat { .. }), "{p}");
        }
    }

    #[test]
    fn extension_round_trips() {
        for format in [FileFormat::Csv, FileFormat::Parquet] {
            let path = format!("out.{}", format.extension());
            assert_eq!(FileFormat::from_path(Path::new(&path)).unwrap(), format);
        }
    }
}
