//! # caterpillar-io
//!
//! Read a univariate series from CSV or Parquet and write component,
//! group and w-correlation tables back out. Bridges external file formats
//! into the [`SeriesInput`](caterpillar_ssa::SeriesInput) boundary of
//! `caterpillar-ssa`.
//!
//! ```ignore
//! use caterpillar_io::{NamedTable, ReaderConfig, WriterConfig, read_series, write_table};
//!
//! let input = read_series(Path::new("series.csv"), &ReaderConfig::default())?;
//! let ssa = Ssa::new(input, &SsaConfig::new(20))?;
//! let table = NamedTable::from_components(&ssa.components_table(0));
//! write_table(Path::new("components.parquet"), &table, &WriterConfig::default())?;
//! ```

mod csv_read;
mod csv_write;
mod error;
mod format;
mod parquet_read;
mod parquet_write;
mod reader;
mod table;
mod validate;
mod writer;

pub use error::IoError;
pub use format::FileFormat;
pub use reader::{ReaderConfig, read_series};
pub use table::{INDEX_COLUMN, NamedTable, ORIGINAL_COLUMN};
pub use writer::{Compression, WriterConfig, write_table};
