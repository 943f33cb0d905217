//! Pure conversion functions: TOML config structs -> crate API config types.

use anyhow::{Result, bail};

use crate::config::*;

use caterpillar_io::{
    Compression, FileFormat, INDEX_COLUMN, ORIGINAL_COLUMN, ReaderConfig, WriterConfig,
};
use caterpillar_ssa::{ComponentGroup, ComponentSelection, SsaConfig, max_window_length};

/// Smallest window length proposed when none is configured.
const MIN_DEFAULT_WINDOW: usize = 5;

/// Parses a compression algorithm name string into the corresponding enum variant.
pub fn parse_compression(s: &str) -> Result<Compression> {
    match s.to_lowercase().as_str() {
        "none" => Ok(Compression::None),
        "snappy" => Ok(Compression::Snappy),
        "zstd" => Ok(Compression::Zstd),
        other => bail!("unknown compression: {other:?}"),
    }
}

/// Parses an output format name string into the corresponding enum variant.
pub fn parse_format(s: &str) -> Result<FileFormat> {
    match s.to_lowercase().as_str() {
        "csv" => Ok(FileFormat::Csv),
        "parquet" | "pq" => Ok(FileFormat::Parquet),
        other => bail!("unknown output format: {other:?}"),
    }
}

/// Converts a TOML group definition into a [`ComponentGroup`].
///
/// Exactly one of `components` or `from` must be set.
pub fn parse_group(g: &GroupToml) -> Result<ComponentGroup> {
    let selection = match (&g.components, g.from) {
        (Some(indices), None) => ComponentSelection::Set(indices.clone()),
        (None, Some(start)) => ComponentSelection::Tail(start),
        (Some(_), Some(_)) => {
            bail!(
                "group {:?} must have exactly one of components or from, got both",
                g.name
            )
        }
        (None, None) => {
            bail!(
                "group {:?} must have exactly one of components or from, got neither",
                g.name
            )
        }
    };
    Ok(ComponentGroup::new(&g.name, selection))
}

/// Converts every configured group, rejecting duplicate names and the
/// column names reserved in the groups table.
pub fn build_groups(groups: &[GroupToml]) -> Result<Vec<ComponentGroup>> {
    let mut out: Vec<ComponentGroup> = Vec::with_capacity(groups.len());
    for g in groups {
        if g.name == INDEX_COLUMN || g.name == ORIGINAL_COLUMN {
            bail!("group name {:?} is reserved", g.name);
        }
        if out.iter().any(|existing| existing.name() == g.name) {
            bail!("duplicate group name: {:?}", g.name);
        }
        out.push(parse_group(g)?);
    }
    Ok(out)
}

/// Window length halfway between a small floor and `N / 2`.
pub fn default_window_length(n: usize) -> usize {
    let max = max_window_length(n);
    (MIN_DEFAULT_WINDOW.min(max) + max) / 2
}

/// Builds a [`ReaderConfig`] from the TOML I/O configuration.
pub fn build_reader_config(io: &IoToml) -> ReaderConfig {
    ReaderConfig::default()
        .with_value_column(&io.value_column)
        .with_index_column(io.index_column.as_ref())
}

/// Builds an [`SsaConfig`] from the TOML decomposition configuration.
///
/// `n` is the series length, used when no window length is configured.
pub fn build_ssa_config(ssa: &SsaToml, n: usize) -> SsaConfig {
    let window = ssa.window_length.unwrap_or_else(|| default_window_length(n));
    let mut cfg = SsaConfig::new(window).with_retain(ssa.retain);
    if let Some(iterations) = ssa.max_svd_iterations {
        cfg = cfg.with_max_svd_iterations(iterations);
    }
    cfg
}

/// Builds a [`WriterConfig`] from the TOML output configuration.
pub fn build_writer_config(output: &OutputToml) -> Result<WriterConfig> {
    let compression = parse_compression(&output.compression)?;
    Ok(WriterConfig::default()
        .with_compression(compression)
        .with_row_group_size(output.row_group_size))
}
