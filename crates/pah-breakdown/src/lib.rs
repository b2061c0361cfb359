//! PAH Breakdown Pipeline Library
//!
//! Derives per-sample breakdown rates of polycyclic aromatic hydrocarbons
//! (PAH) from soil experiment measurements, built on Polars.
//!
//! # Overview
//!
//! A run is a linear pipeline over one CSV table:
//!
//! - **Loading**: read the table and check the four required columns
//!   (`sample_id`, `soil_moisture_pct`, `pah_concentration_start`,
//!   `pah_concentration_end`); extra columns pass through
//! - **Breakdown rate**: `breakdown_rate_raw = (start - end) / start * 100`
//! - **Normalization**: `breakdown_rate_normalized`, currently a copy of the
//!   raw rate, pluggable through [`Normalizer`]
//! - **Output**: preview selected columns and write the augmented table
//! - **Sample data**: a seeded synthetic table when the input is missing
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use pah_breakdown::{Pipeline, PipelineConfig, report};
//!
//! let config = PipelineConfig::default();
//! let result = Pipeline::builder().config(config.clone()).build()?.run()?;
//!
//! println!("{}", report::preview(&result.data, config.preview_rows)?);
//! ```
//!
//! The stages are also usable on their own:
//!
//! ```rust,ignore
//! use pah_breakdown::{compute_breakdown_rate, load_data, normalize_by_moisture};
//!
//! let df = load_data("data/experiment_data.csv")?;
//! let df = normalize_by_moisture(compute_breakdown_rate(&df)?)?;
//! ```

pub mod breakdown;
pub mod config;
pub mod error;
pub mod loader;
pub mod normalize;
pub mod pipeline;
pub mod report;
pub mod sample_data;
pub mod schema;
pub mod types;

// Re-exports for convenient access
pub use breakdown::{breakdown_rate, compute_breakdown_rate};
pub use config::{ConfigValidationError, PipelineConfig, PipelineConfigBuilder};
pub use error::{BreakdownError, Result as BreakdownResult, ResultExt};
pub use loader::{load_data, parse_table, validate_schema};
pub use normalize::{Normalizer, PassThroughNormalizer, normalize_by_moisture};
pub use pipeline::{
    ClosureProgressReporter, Pipeline, PipelineBuilder, PipelineStage, ProgressReporter,
    ProgressUpdate,
};
pub use report::{preview, write_results};
pub use sample_data::SampleDataGenerator;
pub use types::{BreakdownStats, PipelineResult, RunSummary};
