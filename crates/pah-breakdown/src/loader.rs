//! Loading and validating sample record tables.

use crate::error::{BreakdownError, Result, ResultExt};
use crate::schema::{NUMERIC_COLUMNS, REQUIRED_COLUMNS};
use polars::io::csv::read::CsvReadOptions;
use polars::prelude::*;
use std::io::Cursor;
use std::path::Path;
use tracing::{debug, info};

/// Rows scanned when inferring column types.
const INFER_SCHEMA_ROWS: usize = 100;

/// Load a sample record table from a CSV file with a header row.
///
/// Fails with [`BreakdownError::InputNotFound`] if the file is absent and
/// with [`BreakdownError::MissingColumn`] if a required column is missing.
/// Extra columns are kept untouched.
pub fn load_data(path: impl AsRef<Path>) -> Result<DataFrame> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(BreakdownError::InputNotFound(path.to_path_buf()));
    }

    info!("Loading dataset from: {}", path.display());
    let df = CsvReadOptions::default()
        .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .context(format!("Failed to open {}", path.display()))?
        .finish()
        .context(format!("Failed to parse {}", path.display()))?;

    validate_table(&df)?;
    info!("Dataset loaded successfully: {:?}", df.shape());
    Ok(df)
}

/// Parse an in-memory CSV document and validate it like [`load_data`].
pub fn parse_table(content: impl Into<Vec<u8>>) -> Result<DataFrame> {
    let df = CsvReadOptions::default()
        .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
        .with_has_header(true)
        .into_reader_with_file_handle(Cursor::new(content.into()))
        .finish()?;

    validate_table(&df)?;
    Ok(df)
}

/// Check that every required column is present.
///
/// Columns are checked in [`REQUIRED_COLUMNS`] order and the first absent
/// one is reported.
pub fn validate_schema(df: &DataFrame) -> Result<()> {
    for name in REQUIRED_COLUMNS {
        if df.get_column_index(name).is_none() {
            return Err(BreakdownError::MissingColumn(name.to_string()));
        }
    }
    Ok(())
}

/// Check that the numeric required columns parse as `f64`.
///
/// The frame is not modified; values are only trial-cast.
pub fn validate_numeric_columns(df: &DataFrame) -> Result<()> {
    for name in NUMERIC_COLUMNS {
        let series = df.column(name)?.as_materialized_series();
        if let Err(e) = series.strict_cast(&DataType::Float64) {
            return Err(BreakdownError::TypeConversionFailed {
                column: name.to_string(),
                target_type: "Float64".to_string(),
                reason: e.to_string(),
            });
        }
        debug!("Column '{}' ({}) parses as Float64", name, series.dtype());
    }
    Ok(())
}

fn validate_table(df: &DataFrame) -> Result<()> {
    validate_schema(df)?;
    validate_numeric_columns(df)
}
