//! JSON output structures for decomposition results.

use anyhow::{Context, Result};
use serde::Serialize;

use caterpillar_ssa::{MemoryMode, Ssa, WCorrelationMatrix, component_name};

/// Top-level decomposition summary written to `summary.json`.
#[derive(Debug, Serialize)]
pub struct DecompositionSummary {
    pub series_length: usize,
    pub window_length: usize,
    pub n_windows: usize,
    pub rank: usize,
    pub memory_mode: &'static str,
    pub singular_values: Vec<f64>,
    pub contributions: Vec<f64>,
    pub cumulative_contributions: Vec<f64>,
    pub reconstruction_error: f64,
    pub groups: Vec<GroupSummary>,
    pub wcorr: WCorrelationOutput,
}

/// One configured group and the components it resolved to.
#[derive(Debug, Clone, Serialize)]
pub struct GroupSummary {
    pub name: String,
    pub components: Vec<usize>,
}

/// W-correlation matrix with its component labels.
#[derive(Debug, Clone, Serialize)]
pub struct WCorrelationOutput {
    pub components: Vec<String>,
    pub matrix: Vec<Vec<f64>>,
    pub max_off_diagonal: f64,
}

impl WCorrelationOutput {
    pub fn new(matrix: &WCorrelationMatrix) -> Self {
        Self {
            components: (0..matrix.n_components()).map(component_name).collect(),
            matrix: matrix.to_rows(),
            max_off_diagonal: matrix.max_off_diagonal(),
        }
    }
}

impl DecompositionSummary {
    pub fn new(ssa: &Ssa, wcorr: &WCorrelationMatrix, groups: Vec<GroupSummary>) -> Self {
        Self {
            series_length: ssa.series_length(),
            window_length: ssa.window_length(),
            n_windows: ssa.n_windows(),
            rank: ssa.rank(),
            memory_mode: match ssa.memory_mode() {
                MemoryMode::Saving => "saving",
                MemoryMode::Retain => "retain",
            },
            singular_values: ssa.singular_values()[..ssa.rank()].to_vec(),
            contributions: ssa.contributions(),
            cumulative_contributions: ssa.cumulative_contributions(),
            reconstruction_error: ssa.reconstruction_error(),
            groups,
            wcorr: WCorrelationOutput::new(wcorr),
        }
    }
}

/// Serialize any output structure to pretty JSON.
pub fn to_json<T: Serialize>(output: &T) -> Result<String> {
    serde_json::to_string_pretty(output).context("failed to serialize JSON output")
}

#[cfg(test)]
mod tests {
    use super::*;
    use caterpillar_ssa::SsaConfig;

    #[test]
    fn summary_fields_match_decomposition() {
        let data: Vec<f64> = (0..40).map(|t| (t as f64 * 0.6).sin() + 1.0).collect();
        let ssa = Ssa::new(data, &SsaConfig::new(8)).unwrap();
        let wcorr = ssa.w_correlation().unwrap();
        let summary = DecompositionSummary::new(&ssa, &wcorr, Vec::new());

        assert_eq!(summary.series_length, 40);
        assert_eq!(summary.n_windows, 33);
        assert_eq!(summary.singular_values.len(), ssa.rank());
        assert_eq!(summary.wcorr.matrix.len(), ssa.rank());
        assert_eq!(summary.memory_mode, "saving");

        let json: serde_json::Value = serde_json::from_str(&to_json(&summary).unwrap()).unwrap();
        assert_eq!(json["window_length"], 8);
        assert_eq!(json["wcorr"]["components"][0], "F0");
    }
}
