//! W-correlation command: decompose and write only the w-correlation matrix.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{info, info_span};

use caterpillar_io::{FileFormat, NamedTable, write_table};

use crate::cli::WcorrArgs;
use crate::config::CaterpillarConfig;
use crate::convert;
use crate::decompose_cmd::load_and_decompose;
use crate::summary::{WCorrelationOutput, to_json};

/// Run the w-correlation pipeline.
pub fn run(args: WcorrArgs) -> Result<()> {
    let _cmd = info_span!("wcorr").entered();

    let mut config = CaterpillarConfig::load(&args.config)?;
    if let Some(input) = args.input {
        config.io.input = Some(input);
    }
    if let Some(l) = args.window_length {
        config.ssa.window_length = Some(l);
    }

    let path = execute(&config, args.output)?;
    info!(path = %path.display(), "w-correlation written");
    Ok(())
}

/// Computes the w-correlation and writes it to `output`, or to
/// `<output.dir>/wcorr.json` when no path is given.
///
/// A `.csv` or `.parquet` output path gets a square table with an `F0 ..`
/// row index; any other extension gets JSON.
pub fn execute(config: &CaterpillarConfig, output: Option<PathBuf>) -> Result<PathBuf> {
    let (_, ssa) = load_and_decompose(config)?;
    let wcorr = ssa
        .w_correlation()
        .context("failed to compute w-correlation")?;
    info!(
        rank = ssa.rank(),
        max_off_diagonal = wcorr.max_off_diagonal(),
        "w-correlation computed"
    );

    let path = match output {
        Some(path) => path,
        None => {
            std::fs::create_dir_all(&config.output.dir).with_context(|| {
                format!(
                    "failed to create output directory: {}",
                    config.output.dir.display()
                )
            })?;
            config.output.dir.join("wcorr.json")
        }
    };
    if FileFormat::from_path(&path).is_ok() {
        let writer_cfg = convert::build_writer_config(&config.output)?;
        write_table(&path, &NamedTable::from_wcorr(&wcorr), &writer_cfg)
            .with_context(|| format!("failed to write w-correlation: {}", path.display()))?;
    } else {
        std::fs::write(&path, to_json(&WCorrelationOutput::new(&wcorr))?)
            .with_context(|| format!("failed to write w-correlation: {}", path.display()))?;
    }
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_square_matrix() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("s.csv");
        let body: String = std::iter::once("value\n".to_string())
            .chain((0..30).map(|t| format!("{}\n", (t as f64 * 0.5).cos() + 2.0)))
            .collect();
        std::fs::write(&input, body).unwrap();

        let mut config = CaterpillarConfig::default();
        config.io.input = Some(input);
        config.ssa.window_length = Some(6);

        let out = dir.path().join("w.json");
        let path = execute(&config, Some(out.clone())).unwrap();
        assert_eq!(path, out);

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        let matrix = json["matrix"].as_array().unwrap();
        assert_eq!(matrix.len(), json["components"].as_array().unwrap().len());
        assert_eq!(matrix[0][0], 1.0);
    }

    #[test]
    fn csv_output_is_a_table() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("s.csv");
        let body: String = std::iter::once("value\n".to_string())
            .chain((0..24).map(|t| format!("{}\n", (t as f64 * 0.7).sin() + 0.1 * t as f64)))
            .collect();
        std::fs::write(&input, body).unwrap();

        let mut config = CaterpillarConfig::default();
        config.io.input = Some(input);
        config.ssa.window_length = Some(5);

        let out = dir.path().join("w.csv");
        execute(&config, Some(out.clone())).unwrap();

        let text = std::fs::read_to_string(&out).unwrap();
        let mut lines = text.lines();
        assert!(lines.next().unwrap().starts_with("index,F0"));
        assert!(lines.next().unwrap().starts_with("F0,"));
    }
}
