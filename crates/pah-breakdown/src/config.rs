//! Configuration for the breakdown pipeline.
//!
//! Defaults reproduce the fixed-path behavior: read
//! `data/experiment_data.csv`, write `data/processed_results.csv`, and
//! synthesize 20 seeded samples when the input is absent.

use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};

/// Default input path, relative to the working directory.
pub const DEFAULT_INPUT_PATH: &str = "data/experiment_data.csv";

/// Default output path, relative to the working directory.
pub const DEFAULT_OUTPUT_PATH: &str = "data/processed_results.csv";

/// Rows shown in the stdout preview.
pub const DEFAULT_PREVIEW_ROWS: usize = 5;

/// Seed for the sample data generator.
pub const DEFAULT_SAMPLE_SEED: u32 = 42;

/// Number of synthetic records.
pub const DEFAULT_SAMPLE_COUNT: usize = 20;

/// Sample ids are `S` plus three digits.
const MAX_SAMPLE_COUNT: usize = 999;

/// Configuration for the breakdown pipeline.
///
/// Use [`PipelineConfig::builder()`] to override individual fields.
///
/// # Example
///
/// ```rust,ignore
/// use pah_breakdown::PipelineConfig;
///
/// let config = PipelineConfig::builder()
///     .input_path("runs/2024-05/experiment_data.csv")
///     .preview_rows(10)
///     .build()?;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Delimited input table with a header row.
    /// Default: "data/experiment_data.csv"
    pub input_path: PathBuf,

    /// Destination of the augmented table. Overwritten on every run.
    /// Default: "data/processed_results.csv"
    pub output_path: PathBuf,

    /// Number of rows shown in the preview.
    /// Default: 5
    pub preview_rows: usize,

    /// Whether to synthesize sample data when the input file is absent.
    /// If false, a missing input is an error.
    /// Default: true
    pub generate_sample_data: bool,

    /// Seed for the sample data generator.
    /// Default: 42
    pub sample_seed: u32,

    /// Number of synthetic records.
    /// Default: 20
    pub sample_count: usize,

    /// Whether to write the augmented table to `output_path`.
    /// When false, results are kept in memory only.
    /// Default: true
    pub save_to_disk: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from(DEFAULT_INPUT_PATH),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            preview_rows: DEFAULT_PREVIEW_ROWS,
            generate_sample_data: true,
            sample_seed: DEFAULT_SAMPLE_SEED,
            sample_count: DEFAULT_SAMPLE_COUNT,
            save_to_disk: true,
        }
    }
}

impl PipelineConfig {
    /// Create a new configuration builder.
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.preview_rows == 0 {
            return Err(ConfigValidationError::InvalidPreviewRows(self.preview_rows));
        }

        if !(1..=MAX_SAMPLE_COUNT).contains(&self.sample_count) {
            return Err(ConfigValidationError::InvalidSampleCount(self.sample_count));
        }

        if same_location(&self.input_path, &self.output_path) {
            return Err(ConfigValidationError::OutputOverwritesInput(
                self.input_path.clone(),
            ));
        }

        Ok(())
    }
}

/// Whether two paths name the same file.
///
/// Existing paths are compared after canonicalization, others lexically with
/// `.` components ignored.
fn same_location(a: &Path, b: &Path) -> bool {
    if let (Ok(a), Ok(b)) = (a.canonicalize(), b.canonicalize()) {
        return a == b;
    }
    fn lexical(p: &Path) -> Vec<Component<'_>> {
        p.components()
            .filter(|c| !matches!(c, Component::CurDir))
            .collect::<Vec<_>>()
    }
    lexical(a) == lexical(b)
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid preview rows: {0} (must be at least 1)")]
    InvalidPreviewRows(usize),

    #[error("Invalid sample count: {0} (must be between 1 and 999)")]
    InvalidSampleCount(usize),

    #[error("Output path '{}' would overwrite the input", .0.display())]
    OutputOverwritesInput(PathBuf),
}

/// Builder for [`PipelineConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct PipelineConfigBuilder {
    input_path: Option<PathBuf>,
    output_path: Option<PathBuf>,
    preview_rows: Option<usize>,
    generate_sample_data: Option<bool>,
    sample_seed: Option<u32>,
    sample_count: Option<usize>,
    save_to_disk: Option<bool>,
}

impl PipelineConfigBuilder {
    /// Set the input table path.
    pub fn input_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.input_path = Some(path.into());
        self
    }

    /// Set the output table path.
    pub fn output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = Some(path.into());
        self
    }

    /// Set the number of preview rows.
    pub fn preview_rows(mut self, rows: usize) -> Self {
        self.preview_rows = Some(rows);
        self
    }

    /// Enable or disable the sample data fallback.
    pub fn generate_sample_data(mut self, generate: bool) -> Self {
        self.generate_sample_data = Some(generate);
        self
    }

    /// Set the sample data seed.
    pub fn sample_seed(mut self, seed: u32) -> Self {
        self.sample_seed = Some(seed);
        self
    }

    /// Set the number of synthetic records.
    pub fn sample_count(mut self, count: usize) -> Self {
        self.sample_count = Some(count);
        self
    }

    /// Enable or disable writing the output table.
    pub fn save_to_disk(mut self, save: bool) -> Self {
        self.save_to_disk = Some(save);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `PipelineConfig` or an error if validation fails.
    pub fn build(self) -> Result<PipelineConfig, ConfigValidationError> {
        let config = PipelineConfig {
            input_path: self
                .input_path
                .unwrap_or_else(|| PathBuf::from(DEFAULT_INPUT_PATH)),
            output_path: self
                .output_path
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_PATH)),
            preview_rows: self.preview_rows.unwrap_or(DEFAULT_PREVIEW_ROWS),
            generate_sample_data: self.generate_sample_data.unwrap_or(true),
            sample_seed: self.sample_seed.unwrap_or(DEFAULT_SAMPLE_SEED),
            sample_count: self.sample_count.unwrap_or(DEFAULT_SAMPLE_COUNT),
            save_to_disk: self.save_to_disk.unwrap_or(true),
        };

        config.validate()?;
        Ok(config)
    }
}
