//! Progress reporting for the breakdown pipeline.
//!
//! The pipeline emits a [`ProgressUpdate`] at the start and end of every
//! stage. Register a reporter through
//! [`PipelineBuilder::on_progress`](crate::PipelineBuilder::on_progress) or
//! [`PipelineBuilder::progress_reporter`](crate::PipelineBuilder::progress_reporter).

use serde::{Deserialize, Serialize};

/// Stages of a pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    /// Run is starting
    Initializing,
    /// Input file was absent; writing synthetic records
    GeneratingSampleData,
    /// Reading and validating the input table
    Loading,
    /// Deriving `breakdown_rate_raw`
    ComputingBreakdown,
    /// Deriving `breakdown_rate_normalized`
    Normalizing,
    /// Writing the augmented table
    Writing,
    /// Run completed successfully
    Complete,
    /// Run failed with an error
    Failed,
}

impl PipelineStage {
    /// Returns a human-readable name for the stage.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Initializing => "Initializing",
            Self::GeneratingSampleData => "Generating Sample Data",
            Self::Loading => "Loading Data",
            Self::ComputingBreakdown => "Computing Breakdown Rate",
            Self::Normalizing => "Normalizing",
            Self::Writing => "Writing Results",
            Self::Complete => "Complete",
            Self::Failed => "Failed",
        }
    }
}

/// A single progress notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressUpdate {
    /// Current pipeline stage
    pub stage: PipelineStage,

    /// Progress within current stage (0.0 - 1.0)
    pub stage_progress: f32,

    /// Human-readable message describing current activity
    pub message: String,
}

impl ProgressUpdate {
    pub fn new(stage: PipelineStage, stage_progress: f32, message: impl Into<String>) -> Self {
        Self {
            stage,
            stage_progress: stage_progress.clamp(0.0, 1.0),
            message: message.into(),
        }
    }

    pub fn complete(message: impl Into<String>) -> Self {
        Self {
            stage: PipelineStage::Complete,
            stage_progress: 1.0,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            stage: PipelineStage::Failed,
            stage_progress: 0.0,
            message: message.into(),
        }
    }
}

/// Receives progress updates from a running pipeline.
///
/// Implementations must be `Send + Sync` so the pipeline itself stays `Send`.
pub trait ProgressReporter: Send + Sync {
    fn report(&self, update: ProgressUpdate);
}

/// [`ProgressReporter`] backed by a closure.
pub struct ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    callback: F,
}

impl<F> ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> ProgressReporter for ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    fn report(&self, update: ProgressUpdate) {
        (self.callback)(update);
    }
}

static_assertions::assert_impl_all!(ProgressUpdate: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_stage_progress_is_clamped() {
        let update = ProgressUpdate::new(PipelineStage::Loading, 2.0, "over");
        assert_eq!(update.stage_progress, 1.0);
        assert_eq!(update.stage, PipelineStage::Loading);
        assert_eq!(ProgressUpdate::complete("done").stage_progress, 1.0);
    }

    #[test]
    fn test_closure_reporter() {
        let seen = Mutex::new(Vec::new());
        let reporter = ClosureProgressReporter::new(|u: ProgressUpdate| {
            seen.lock().unwrap().push(u.stage);
        });
        reporter.report(ProgressUpdate::complete("done"));
        reporter.report(ProgressUpdate::failed("boom"));
        assert_eq!(
            *seen.lock().unwrap(),
            vec![PipelineStage::Complete, PipelineStage::Failed]
        );
    }

    #[test]
    fn test_stage_serializes_snake_case() {
        let json = serde_json::to_string(&PipelineStage::ComputingBreakdown).unwrap();
        assert_eq!(json, "\"computing_breakdown\"");
    }
}
