//! Decompose command: read a series, run SSA, write tables and a summary.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use tracing::{info, info_span};

use caterpillar_io::{NamedTable, read_series, write_table};
use caterpillar_ssa::{Ssa, TimeSeries};

use crate::cli::DecomposeArgs;
use crate::config::CaterpillarConfig;
use crate::convert;
use crate::summary::{DecompositionSummary, GroupSummary, to_json};

/// Run the decomposition pipeline.
pub fn run(args: DecomposeArgs) -> Result<()> {
    let _cmd = info_span!("decompose").entered();

    // 1. Load project TOML and apply CLI overrides
    let mut config = CaterpillarConfig::load(&args.config)?;
    if let Some(input) = args.input {
        config.io.input = Some(input);
    }
    if let Some(dir) = args.output_dir {
        config.output.dir = dir;
    }
    if let Some(l) = args.window_length {
        config.ssa.window_length = Some(l);
    }
    if args.retain {
        config.ssa.retain = true;
    }

    let written = execute(&config)?;
    for path in &written {
        info!(path = %path.display(), "output written");
    }
    Ok(())
}

/// Runs the pipeline for an already-resolved configuration and returns the
/// paths of every file written.
pub fn execute(config: &CaterpillarConfig) -> Result<Vec<PathBuf>> {
    // 2. Build library configs
    let format = convert::parse_format(&config.output.format)?;
    let writer_cfg = convert::build_writer_config(&config.output)?;
    let groups = convert::build_groups(&config.groups)?;

    // 3. Read and decompose
    let (input, ssa) = load_and_decompose(config)?;
    info!(
        path = %input.display(),
        n = ssa.series_length(),
        window = ssa.window_length(),
        rank = ssa.rank(),
        "decomposition complete"
    );

    // 4. Components and groups
    std::fs::create_dir_all(&config.output.dir).with_context(|| {
        format!(
            "failed to create output directory: {}",
            config.output.dir.display()
        )
    })?;
    let mut written = Vec::new();

    let components = ssa.components_table(config.output.n_components);
    let path = output_path(&config.output.dir, "components", format.extension());
    write_table(&path, &NamedTable::from_components(&components), &writer_cfg)
        .with_context(|| format!("failed to write components: {}", path.display()))?;
    written.push(path);

    let mut group_summaries = Vec::with_capacity(groups.len());
    if !groups.is_empty() {
        let grouped = ssa
            .reconstruct_groups(&groups)
            .context("failed to reconstruct groups")?;
        for group in &groups {
            group_summaries.push(GroupSummary {
                name: group.name().to_string(),
                components: group.selection().resolve(ssa.rank())?,
            });
        }
        let path = output_path(&config.output.dir, "groups", format.extension());
        let table = NamedTable::from_groups(&grouped).with_original(ssa.series());
        write_table(&path, &table, &writer_cfg)
            .with_context(|| format!("failed to write groups: {}", path.display()))?;
        written.push(path);
    }

    // 5. Summary
    let wcorr = ssa
        .w_correlation()
        .context("failed to compute w-correlation")?;
    let summary = DecompositionSummary::new(&ssa, &wcorr, group_summaries);
    let path = output_path(&config.output.dir, "summary", "json");
    std::fs::write(&path, to_json(&summary)?)
        .with_context(|| format!("failed to write summary: {}", path.display()))?;
    written.push(path);

    Ok(written)
}

/// Reads the configured series and decomposes it. Shared with `wcorr`.
pub fn load_and_decompose(config: &CaterpillarConfig) -> Result<(PathBuf, Ssa)> {
    let input = config
        .io
        .input
        .clone()
        .ok_or_else(|| anyhow!("no input path: set [io].input in config or use --input"))?;
    let reader_cfg = convert::build_reader_config(&config.io);

    info!(path = %input.display(), "reading series");
    let series = read_series(&input, &reader_cfg)
        .with_context(|| format!("failed to read series: {}", input.display()))?;
    let series = TimeSeries::try_from(series).context("invalid input series")?;

    let ssa_cfg = convert::build_ssa_config(&config.ssa, series.len());
    let ssa = Ssa::new(series, &ssa_cfg)
        .with_context(|| format!("decomposition failed (L = {})", ssa_cfg.window_length()))?;
    Ok((input, ssa))
}

fn output_path(dir: &Path, stem: &str, ext: &str) -> PathBuf {
    dir.join(format!("{stem}.{ext}"))
}
