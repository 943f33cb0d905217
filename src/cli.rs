use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Caterpillar singular spectrum analysis.
#[derive(Parser)]
#[command(
    name = "caterpillar",
    version,
    about = "Singular Spectrum Analysis of univariate time series"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Decompose a series and write components, groups and a summary.
    Decompose(DecomposeArgs),
    /// Compute only the w-correlation matrix.
    Wcorr(WcorrArgs),
}

/// Arguments for the `decompose` subcommand.
#[derive(clap::Args)]
pub struct DecomposeArgs {
    /// Path to TOML configuration file.
    #[arg(short, long, default_value = "caterpillar.toml")]
    pub config: PathBuf,

    /// Override input series path from config.
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Override output directory from config.
    #[arg(short, long = "output-dir")]
    pub output_dir: Option<PathBuf>,

    /// Override window length from config.
    #[arg(short = 'L', long = "window-length")]
    pub window_length: Option<usize>,

    /// Keep V and the elementary matrices (more memory).
    #[arg(long)]
    pub retain: bool,
}

/// Arguments for the `wcorr` subcommand.
#[derive(clap::Args)]
pub struct WcorrArgs {
    /// Path to TOML configuration file.
    #[arg(short, long, default_value = "caterpillar.toml")]
    pub config: PathBuf,

    /// Override input series path from config.
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Override window length from config.
    #[arg(short = 'L', long = "window-length")]
    pub window_length: Option<usize>,

    /// Path for the JSON output (default: `<output.dir>/wcorr.json`).
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}
