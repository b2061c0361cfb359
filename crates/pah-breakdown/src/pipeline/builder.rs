//! The breakdown pipeline and its builder.

use crate::breakdown::compute_breakdown_rate;
use crate::config::PipelineConfig;
use crate::error::{Result, ResultExt};
use crate::loader::{load_data, validate_schema};
use crate::normalize::{Normalizer, PassThroughNormalizer};
use crate::pipeline::progress::{
    ClosureProgressReporter, PipelineStage, ProgressReporter, ProgressUpdate,
};
use crate::report::write_results;
use crate::sample_data::SampleDataGenerator;
use crate::types::{BreakdownStats, PipelineResult, RunSummary};
use polars::prelude::*;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Loader → breakdown calculator → normalizer → writer.
///
/// # Example
///
/// ```rust,ignore
/// use pah_breakdown::{Pipeline, PipelineConfig};
///
/// let result = Pipeline::builder()
///     .config(PipelineConfig::default())
///     .on_progress(|update| println!("[{}] {}", update.stage.display_name(), update.message))
///     .build()?
///     .run()?;
///
/// println!("{}", result.data);
/// ```
pub struct Pipeline {
    config: PipelineConfig,
    normalizer: Arc<dyn Normalizer>,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
}

static_assertions::assert_impl_all!(Pipeline: Send);

impl Pipeline {
    /// Create a new pipeline builder.
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Name of the configured normalizer.
    pub fn normalizer_name(&self) -> &str {
        self.normalizer.name()
    }

    /// Validate, derive and normalize an in-memory table.
    ///
    /// Row count and order are preserved; two columns are appended.
    pub fn process(&self, df: DataFrame) -> Result<DataFrame> {
        validate_schema(&df)?;

        self.report_progress(ProgressUpdate::new(
            PipelineStage::ComputingBreakdown,
            0.0,
            "Computing breakdown rate...",
        ));
        let df = compute_breakdown_rate(&df)?;
        self.report_progress(ProgressUpdate::new(
            PipelineStage::ComputingBreakdown,
            1.0,
            "Breakdown rate computed",
        ));

        self.report_progress(ProgressUpdate::new(
            PipelineStage::Normalizing,
            0.0,
            format!("Normalizing ({})...", self.normalizer.name()),
        ));
        let df = self.normalizer.normalize(df)?;
        self.report_progress(ProgressUpdate::new(
            PipelineStage::Normalizing,
            1.0,
            "Normalization complete",
        ));

        Ok(df)
    }

    /// Run end to end: ensure the input exists, load, process and write.
    pub fn run(&self) -> Result<PipelineResult> {
        match self.run_internal() {
            Ok(result) => {
                self.report_progress(ProgressUpdate::complete("Pipeline completed successfully"));
                Ok(result)
            }
            Err(e) => {
                self.report_progress(ProgressUpdate::failed(e.to_string()));
                error!("Pipeline error: {}", e);
                Err(e)
            }
        }
    }

    fn report_progress(&self, update: ProgressUpdate) {
        if let Some(reporter) = &self.progress_reporter {
            reporter.report(update);
        }
    }

    fn run_internal(&self) -> Result<PipelineResult> {
        let start_time = Instant::now();
        let input = &self.config.input_path;
        let mut summary = RunSummary::new(input, self.normalizer.name());

        self.report_progress(ProgressUpdate::new(
            PipelineStage::Initializing,
            0.0,
            "Starting breakdown pipeline...",
        ));

        if !input.exists() && self.config.generate_sample_data {
            info!("Input {} absent, writing sample data", input.display());
            self.report_progress(ProgressUpdate::new(
                PipelineStage::GeneratingSampleData,
                0.0,
                "Creating dummy data for demonstration...",
            ));
            SampleDataGenerator::from_config(&self.config)
                .write_csv(input)
                .context("Failed to create sample data")?;
            summary.sample_data_generated = true;
            self.report_progress(ProgressUpdate::new(
                PipelineStage::GeneratingSampleData,
                1.0,
                "Sample data written",
            ));
        }

        self.report_progress(ProgressUpdate::new(
            PipelineStage::Loading,
            0.0,
            format!("Loading {}", input.display()),
        ));
        let df = load_data(input)?;
        self.report_progress(ProgressUpdate::new(
            PipelineStage::Loading,
            1.0,
            format!("Loaded {} records", df.height()),
        ));

        let df = self.process(df)?;

        let stats = BreakdownStats::from_frame(&df)?;
        debug!("Breakdown stats: {:?}", stats);
        if stats.non_finite > 0 {
            warn!(
                "{} records have a non-finite breakdown rate (zero start concentration)",
                stats.non_finite
            );
        }
        if stats.implausible > 0 {
            warn!(
                "{} records have an end concentration above the start",
                stats.implausible
            );
        }

        if self.config.save_to_disk {
            self.report_progress(ProgressUpdate::new(
                PipelineStage::Writing,
                0.0,
                format!("Writing {}", self.config.output_path.display()),
            ));
            let written = write_results(&df, &self.config.output_path)?;
            summary.output_file = Some(written);
            self.report_progress(ProgressUpdate::new(
                PipelineStage::Writing,
                1.0,
                "Results written",
            ));
        } else {
            info!("Skipping output file (save_to_disk disabled)");
        }

        summary.rows = df.height();
        summary.columns = df
            .get_column_names()
            .iter()
            .map(|c| c.to_string())
            .collect();
        summary.breakdown = stats;
        summary.duration_ms = start_time.elapsed().as_millis() as u64;

        info!(
            "Processed {} records in {}ms",
            summary.rows, summary.duration_ms
        );

        Ok(PipelineResult { data: df, summary })
    }
}

/// Builder for [`Pipeline`].
#[derive(Default)]
pub struct PipelineBuilder {
    config: Option<PipelineConfig>,
    normalizer: Option<Arc<dyn Normalizer>>,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
}

impl PipelineBuilder {
    /// Set the pipeline configuration.
    pub fn config(mut self, config: PipelineConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Replace the default [`PassThroughNormalizer`].
    pub fn normalizer(mut self, normalizer: Arc<dyn Normalizer>) -> Self {
        self.normalizer = Some(normalizer);
        self
    }

    /// Set a progress reporter.
    pub fn progress_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.progress_reporter = Some(reporter);
        self
    }

    /// Report progress through a closure.
    pub fn on_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(ProgressUpdate) + Send + Sync + 'static,
    {
        self.progress_reporter = Some(Arc::new(ClosureProgressReporter::new(callback)));
        self
    }

    /// Build the pipeline, validating the configuration.
    pub fn build(self) -> Result<Pipeline> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        Ok(Pipeline {
            config,
            normalizer: self
                .normalizer
                .unwrap_or_else(|| Arc::new(PassThroughNormalizer) as Arc<dyn Normalizer>),
            progress_reporter: self.progress_reporter,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BreakdownError;
    use crate::schema::*;
    use std::sync::Mutex;

    fn records() -> DataFrame {
        df!(
            SAMPLE_ID => ["S001", "S002"],
            SOIL_MOISTURE_PCT => [12.5, 20.0],
            PAH_CONCENTRATION_START => [200.0, 400.0],
            PAH_CONCENTRATION_END => [50.0, 100.0]
        )
        .unwrap()
    }

    struct Halving;

    impl Normalizer for Halving {
        fn name(&self) -> &str {
            "halving"
        }

        fn normalize(&self, df: DataFrame) -> Result<DataFrame> {
            let out = df
                .lazy()
                .with_column((col(BREAKDOWN_RATE_RAW) / lit(2.0)).alias(BREAKDOWN_RATE_NORMALIZED))
                .collect()?;
            Ok(out)
        }
    }

    #[test]
    fn test_process_appends_two_columns() {
        let pipeline = Pipeline::builder().build().unwrap();
        let out = pipeline.process(records()).unwrap();
        assert_eq!(out.shape(), (2, 6));
        assert_eq!(pipeline.normalizer_name(), "pass_through");
    }

    #[test]
    fn test_process_rejects_missing_column() {
        let df = records().drop(SOIL_MOISTURE_PCT).unwrap();
        let err = Pipeline::builder().build().unwrap().process(df).unwrap_err();
        assert_eq!(err.missing_column(), Some(SOIL_MOISTURE_PCT));
    }

    #[test]
    fn test_custom_normalizer() {
        let pipeline = Pipeline::builder()
            .normalizer(Arc::new(Halving))
            .build()
            .unwrap();
        let out = pipeline.process(records()).unwrap();
        let normalized = out
            .column(BREAKDOWN_RATE_NORMALIZED)
            .unwrap()
            .as_materialized_series()
            .f64()
            .unwrap()
            .get(0);
        assert_eq!(normalized, Some(37.5));
    }

    #[test]
    fn test_build_rejects_invalid_config() {
        let config = PipelineConfig {
            preview_rows: 0,
            ..Default::default()
        };
        let result = Pipeline::builder().config(config).build();
        assert!(matches!(result, Err(BreakdownError::Config(_))));
    }

    #[test]
    fn test_run_reports_stages() {
        let dir = tempfile::tempdir().unwrap();
        let config = PipelineConfig::builder()
            .input_path(dir.path().join("experiment_data.csv"))
            .output_path(dir.path().join("processed_results.csv"))
            .build()
            .unwrap();

        let stages = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&stages);
        Pipeline::builder()
            .config(config)
            .on_progress(move |u| sink.lock().unwrap().push(u.stage))
            .build()
            .unwrap()
            .run()
            .unwrap();

        let stages = stages.lock().unwrap();
        assert_eq!(stages.first(), Some(&PipelineStage::Initializing));
        assert!(stages.contains(&PipelineStage::GeneratingSampleData));
        assert!(stages.contains(&PipelineStage::Writing));
        assert_eq!(stages.last(), Some(&PipelineStage::Complete));
    }

    #[test]
    fn test_run_without_fallback_fails_on_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let config = PipelineConfig::builder()
            .input_path(dir.path().join("experiment_data.csv"))
            .output_path(dir.path().join("processed_results.csv"))
            .generate_sample_data(false)
            .build()
            .unwrap();

        let failed = Arc::new(Mutex::new(false));
        let flag = Arc::clone(&failed);
        let err = Pipeline::builder()
            .config(config)
            .on_progress(move |u| {
                if u.stage == PipelineStage::Failed {
                    *flag.lock().unwrap() = true;
                }
            })
            .build()
            .unwrap()
            .run()
            .unwrap_err();

        assert_eq!(err.error_code(), "INPUT_NOT_FOUND");
        assert!(*failed.lock().unwrap());
        assert!(!dir.path().join("processed_results.csv").exists());
    }

    #[test]
    fn test_run_in_memory_only() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("processed_results.csv");
        let config = PipelineConfig::builder()
            .input_path(dir.path().join("experiment_data.csv"))
            .output_path(&output)
            .save_to_disk(false)
            .build()
            .unwrap();

        let result = Pipeline::builder().config(config).build().unwrap().run().unwrap();
        assert_eq!(result.data.height(), 20);
        assert!(result.output_path().is_none());
        assert!(!output.exists());
    }
}
