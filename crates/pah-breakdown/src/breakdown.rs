//! Breakdown rate derivation.
//!
//! `breakdown_rate_raw = ((start - end) / start) * 100`, evaluated per row in
//! `f64`. A zero start concentration is not guarded: `start = 0, end > 0`
//! gives `-inf`, `start = 0, end = 0` gives `NaN`. In the written CSV these
//! appear as `-inf` and an empty cell.

use crate::error::{BreakdownError, Result};
use crate::schema::{BREAKDOWN_RATE_RAW, PAH_CONCENTRATION_END, PAH_CONCENTRATION_START};
use crate::types::BreakdownStats;
use polars::prelude::*;
use tracing::debug;

/// Append `breakdown_rate_raw` to a copy of `df`.
pub fn compute_breakdown_rate(df: &DataFrame) -> Result<DataFrame> {
    for name in [PAH_CONCENTRATION_START, PAH_CONCENTRATION_END] {
        if df.get_column_index(name).is_none() {
            return Err(BreakdownError::MissingColumn(name.to_string()));
        }
    }

    let start = col(PAH_CONCENTRATION_START).cast(DataType::Float64);
    let end = col(PAH_CONCENTRATION_END).cast(DataType::Float64);
    let rate = ((start.clone() - end) / start * lit(100.0)).alias(BREAKDOWN_RATE_RAW);

    let out = df.clone().lazy().with_column(rate).collect()?;
    debug!("Computed {} for {} rows", BREAKDOWN_RATE_RAW, out.height());
    Ok(out)
}

/// Breakdown rate of a single measurement pair.
#[inline]
pub fn breakdown_rate(start: f64, end: f64) -> f64 {
    (start - end) / start * 100.0
}

impl BreakdownStats {
    /// Summarise the derived column of a frame produced by
    /// [`compute_breakdown_rate`].
    pub fn from_frame(df: &DataFrame) -> Result<Self> {
        let rates = df.column(BREAKDOWN_RATE_RAW)?.cast(&DataType::Float64)?;
        let rates = rates.as_materialized_series().f64()?.clone();
        let start = df.column(PAH_CONCENTRATION_START)?.cast(&DataType::Float64)?;
        let start = start.as_materialized_series().f64()?.clone();
        let end = df.column(PAH_CONCENTRATION_END)?.cast(&DataType::Float64)?;
        let end = end.as_materialized_series().f64()?.clone();

        let mut stats = BreakdownStats {
            rows: df.height(),
            ..Default::default()
        };

        for rate in rates.into_iter() {
            match rate {
                None => stats.missing += 1,
                Some(r) if !r.is_finite() => stats.non_finite += 1,
                Some(_) => {}
            }
        }

        stats.implausible = start
            .into_iter()
            .zip(end.into_iter())
            .filter(|(s, e)| matches!((s, e), (Some(s), Some(e)) if e > s))
            .count();

        Ok(stats)
    }
}
