//! Preview and persistence of the augmented table.

use crate::error::{BreakdownError, Result, ResultExt};
use crate::schema::PREVIEW_COLUMNS;
use polars::prelude::*;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// First `rows` rows of the preview columns.
pub fn preview(df: &DataFrame, rows: usize) -> Result<DataFrame> {
    for name in PREVIEW_COLUMNS {
        if df.get_column_index(name).is_none() {
            return Err(BreakdownError::MissingColumn(name.to_string()));
        }
    }
    Ok(df.select(PREVIEW_COLUMNS)?.head(Some(rows)))
}

/// Write every column of `df` to `path` as CSV with a header and no index.
///
/// Floating-point `NaN` is written as an empty cell and infinities as `inf`
/// and `-inf`. The in-memory frame is left as it is.
///
/// The table goes to a sibling `.tmp` file first and is renamed over `path`
/// once complete, so an existing output is either replaced whole or left
/// as it was.
pub fn write_results(df: &DataFrame, path: impl AsRef<Path>) -> Result<PathBuf> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).context(format!("Failed to create {}", parent.display()))?;
    }

    let mut df = nan_as_null(df)?;
    let tmp_path = temp_path_for(path);
    debug!("Writing {} rows to {}", df.height(), tmp_path.display());

    let written = File::create(&tmp_path)
        .context(format!("Failed to create {}", tmp_path.display()))
        .and_then(|mut file| {
            CsvWriter::new(&mut file)
                .include_header(true)
                .with_separator(b',')
                .with_quote_char(b'"')
                .finish(&mut df)
                .context(format!("Failed to write {}", tmp_path.display()))?;
            file.sync_all()
                .context(format!("Failed to flush {}", tmp_path.display()))
        });

    if let Err(e) = written {
        let _ = fs::remove_file(&tmp_path);
        return Err(e);
    }

    fs::rename(&tmp_path, path).context(format!("Failed to replace {}", path.display()))?;
    info!("Processed results saved: {}", path.display());
    Ok(path.to_path_buf())
}

/// Copy of `df` with every float `NaN` replaced by null.
fn nan_as_null(df: &DataFrame) -> Result<DataFrame> {
    let mut out = df.clone();
    for column in df.get_columns() {
        let series = column.as_materialized_series();
        let cleared = match series.dtype() {
            DataType::Float64 => series
                .f64()?
                .into_iter()
                .map(|v| v.filter(|x| !x.is_nan()))
                .collect::<Float64Chunked>()
                .with_name(series.name().clone())
                .into_series(),
            DataType::Float32 => series
                .f32()?
                .into_iter()
                .map(|v| v.filter(|x| !x.is_nan()))
                .collect::<Float32Chunked>()
                .with_name(series.name().clone())
                .into_series(),
            _ => continue,
        };
        out.with_column(cleared)?;
    }
    Ok(out)
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::*;

    fn augmented(rows: usize) -> DataFrame {
        let ids: Vec<String> = (1..=rows).map(|i| format!("S{i:03}")).collect();
        let values: Vec<f64> = (0..rows).map(|i| i as f64).collect();
        df!(
            SAMPLE_ID => ids,
            "site" => vec!["north"; rows],
            SOIL_MOISTURE_PCT => values.clone(),
            PAH_CONCENTRATION_START => values.clone(),
            PAH_CONCENTRATION_END => values.clone(),
            BREAKDOWN_RATE_RAW => values.clone(),
            BREAKDOWN_RATE_NORMALIZED => values
        )
        .unwrap()
    }

    #[test]
    fn test_preview_selects_columns_and_caps_rows() {
        let out = preview(&augmented(8), 5).unwrap();
        assert_eq!(out.height(), 5);
        let names: Vec<&str> = out.get_column_names().iter().map(|c| c.as_str()).collect();
        assert_eq!(names, PREVIEW_COLUMNS.to_vec());
    }

    #[test]
    fn test_preview_of_short_table() {
        let out = preview(&augmented(2), 5).unwrap();
        assert_eq!(out.height(), 2);
    }

    #[test]
    fn test_preview_requires_derived_columns() {
        let df = df!(SAMPLE_ID => ["S001"], SOIL_MOISTURE_PCT => [1.0]).unwrap();
        let err = preview(&df, 5).unwrap_err();
        assert_eq!(err.missing_column(), Some(BREAKDOWN_RATE_RAW));
    }

    #[test]
    fn test_write_results_overwrites_without_index() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("processed_results.csv");
        fs::write(&path, "stale\n").unwrap();

        let written = write_results(&augmented(3), &path).unwrap();
        assert_eq!(written, path);

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(
            lines[0],
            "sample_id,site,soil_moisture_pct,pah_concentration_start,\
             pah_concentration_end,breakdown_rate_raw,breakdown_rate_normalized"
        );
        assert!(lines[1].starts_with("S001,north,"));
        assert!(!temp_path_for(&path).exists());
    }

    #[test]
    fn test_write_results_creates_parent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("processed_results.csv");
        write_results(&augmented(1), &path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_nan_written_as_empty_cell() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("processed_results.csv");
        let df = df!(
            SAMPLE_ID => ["S001", "S002"],
            BREAKDOWN_RATE_RAW => [f64::NAN, f64::NEG_INFINITY]
        )
        .unwrap();

        write_results(&df, &path).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[1], "S001,");
        assert_eq!(lines[2], "S002,-inf");

        let kept = df.column(BREAKDOWN_RATE_RAW).unwrap().as_materialized_series();
        assert!(kept.f64().unwrap().get(0).unwrap().is_nan());
    }

    #[test]
    fn test_temp_path_is_sibling() {
        let tmp = temp_path_for(Path::new("data/processed_results.csv"));
        assert_eq!(tmp, PathBuf::from("data/processed_results.csv.tmp"));
    }
}
