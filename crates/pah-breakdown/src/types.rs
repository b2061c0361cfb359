use chrono::Local;
use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Aggregate view of the derived breakdown column.
///
/// Zero start concentrations and `end > start` rows are kept as-is; these
/// counts only make them visible.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakdownStats {
    /// Number of records.
    pub rows: usize,
    /// Rates that are infinite or NaN (zero start concentration).
    pub non_finite: usize,
    /// Rates that are null (empty concentration cells).
    pub missing: usize,
    /// Records whose end concentration exceeds the start.
    pub implausible: usize,
}

impl BreakdownStats {
    /// True if every rate is a finite number.
    pub fn all_finite(&self) -> bool {
        self.non_finite == 0 && self.missing == 0
    }
}

/// Summary of a single pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    /// Timestamp when the run finished
    pub generated_at: String,
    /// Path the records were read from
    pub input_file: PathBuf,
    /// Path the augmented table was written to, if saved
    pub output_file: Option<PathBuf>,
    /// Whether the input was synthesized because it was missing
    pub sample_data_generated: bool,
    /// Name of the normalizer applied
    pub normalizer: String,
    /// Number of records written
    pub rows: usize,
    /// Output columns, in order
    pub columns: Vec<String>,
    /// Statistics of the derived breakdown column
    pub breakdown: BreakdownStats,
    /// Total execution time in milliseconds
    pub duration_ms: u64,
}

impl RunSummary {
    pub fn new(input_file: impl Into<PathBuf>, normalizer: impl Into<String>) -> Self {
        Self {
            generated_at: Local::now().to_rfc3339(),
            input_file: input_file.into(),
            output_file: None,
            sample_data_generated: false,
            normalizer: normalizer.into(),
            rows: 0,
            columns: Vec::new(),
            breakdown: BreakdownStats::default(),
            duration_ms: 0,
        }
    }
}

/// Outcome of [`crate::Pipeline::run`].
#[derive(Debug, Clone)]
pub struct PipelineResult {
    /// The fully augmented table.
    pub data: DataFrame,
    /// What happened during the run.
    pub summary: RunSummary,
}

impl PipelineResult {
    /// Path of the written output, if the run saved to disk.
    pub fn output_path(&self) -> Option<&PathBuf> {
        self.summary.output_file.as_ref()
    }
}
