//! Pipeline module.
//!
//! Orchestrates loading, derivation, normalization and persistence.

mod builder;
pub mod progress;

pub use builder::{Pipeline, PipelineBuilder};
pub use progress::{ClosureProgressReporter, PipelineStage, ProgressReporter, ProgressUpdate};
