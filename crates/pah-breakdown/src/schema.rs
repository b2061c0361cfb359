//! Column names of a sample record table.

/// Free-form sample identifier.
pub const SAMPLE_ID: &str = "sample_id";

/// Soil moisture, percent.
pub const SOIL_MOISTURE_PCT: &str = "soil_moisture_pct";

/// PAH concentration at the start of the experiment.
pub const PAH_CONCENTRATION_START: &str = "pah_concentration_start";

/// PAH concentration at the end of the experiment.
pub const PAH_CONCENTRATION_END: &str = "pah_concentration_end";

/// Derived: percentage decrease from start to end.
pub const BREAKDOWN_RATE_RAW: &str = "breakdown_rate_raw";

/// Derived: moisture-normalized breakdown rate.
pub const BREAKDOWN_RATE_NORMALIZED: &str = "breakdown_rate_normalized";

/// Columns every input table must carry, in validation order.
pub const REQUIRED_COLUMNS: [&str; 4] = [
    SAMPLE_ID,
    SOIL_MOISTURE_PCT,
    PAH_CONCENTRATION_START,
    PAH_CONCENTRATION_END,
];

/// Required columns that must parse as numbers.
pub const NUMERIC_COLUMNS: [&str; 3] = [
    SOIL_MOISTURE_PCT,
    PAH_CONCENTRATION_START,
    PAH_CONCENTRATION_END,
];

/// Columns shown in the stdout preview.
pub const PREVIEW_COLUMNS: [&str; 4] = [
    SAMPLE_ID,
    SOIL_MOISTURE_PCT,
    BREAKDOWN_RATE_RAW,
    BREAKDOWN_RATE_NORMALIZED,
];
