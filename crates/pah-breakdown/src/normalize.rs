//! Moisture normalization of the breakdown rate.
//!
//! No moisture-correction model exists yet. [`PassThroughNormalizer`] copies
//! the raw rate unchanged; a real model plugs in through [`Normalizer`].

use crate::error::{BreakdownError, Result};
use crate::schema::{BREAKDOWN_RATE_NORMALIZED, BREAKDOWN_RATE_RAW};
use polars::prelude::*;

/// Produces `breakdown_rate_normalized` from a frame that already carries
/// `breakdown_rate_raw`.
///
/// Implementations must be `Send + Sync` so the pipeline stays `Send`.
pub trait Normalizer: Send + Sync {
    /// Name recorded in the run summary.
    fn name(&self) -> &str;

    /// Append the normalized column.
    fn normalize(&self, df: DataFrame) -> Result<DataFrame>;
}

/// Identity normalization: the normalized rate equals the raw rate.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThroughNormalizer;

impl Normalizer for PassThroughNormalizer {
    fn name(&self) -> &str {
        "pass_through"
    }

    fn normalize(&self, df: DataFrame) -> Result<DataFrame> {
        normalize_by_moisture(df)
    }
}

/// Copy `breakdown_rate_raw` into `breakdown_rate_normalized`.
pub fn normalize_by_moisture(mut df: DataFrame) -> Result<DataFrame> {
    let raw = df
        .column(BREAKDOWN_RATE_RAW)
        .map_err(|_| BreakdownError::MissingColumn(BREAKDOWN_RATE_RAW.to_string()))?
        .clone()
        .with_name(BREAKDOWN_RATE_NORMALIZED.into());

    df.with_column(raw)?;
    Ok(df)
}
