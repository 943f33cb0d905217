use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Top-level caterpillar configuration.
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct CaterpillarConfig {
    /// Input settings.
    #[serde(default)]
    pub io: IoToml,

    /// Decomposition settings.
    #[serde(default)]
    pub ssa: SsaToml,

    /// Output settings.
    #[serde(default)]
    pub output: OutputToml,

    /// Named component groups to reconstruct.
    #[serde(default)]
    pub groups: Vec<GroupToml>,
}

impl CaterpillarConfig {
    /// Reads and parses a TOML configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let toml_str = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        toml::from_str(&toml_str).context("failed to parse TOML config")
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IoToml {
    pub input: Option<PathBuf>,
    #[serde(default = "default_value_column")]
    pub value_column: String,
    #[serde(default)]
    pub index_column: Option<String>,
}

impl Default for IoToml {
    fn default() -> Self {
        Self {
            input: None,
            value_column: default_value_column(),
            index_column: None,
        }
    }
}

fn default_value_column() -> String {
    "value".to_string()
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct SsaToml {
    /// Window length `L`; derived from the series length when absent.
    #[serde(default)]
    pub window_length: Option<usize>,
    #[serde(default)]
    pub retain: bool,
    #[serde(default)]
    pub max_svd_iterations: Option<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputToml {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
    #[serde(default = "default_format")]
    pub format: String,
    #[serde(default = "default_compression")]
    pub compression: String,
    #[serde(default = "default_row_group_size")]
    pub row_group_size: usize,
    /// Leading components to write; 0 writes all of them.
    #[serde(default)]
    pub n_components: usize,
}

impl Default for OutputToml {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            format: default_format(),
            compression: default_compression(),
            row_group_size: default_row_group_size(),
            n_components: 0,
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}
fn default_format() -> String {
    "csv".to_string()
}
fn default_compression() -> String {
    "snappy".to_string()
}
fn default_row_group_size() -> usize {
    1_000_000
}

/// Group definition: exactly one of `components` or `from` should be set.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GroupToml {
    pub name: String,
    /// Explicit component indices.
    pub components: Option<Vec<usize>>,
    /// Every component from this index up to the rank.
    pub from: Option<usize>,
}
