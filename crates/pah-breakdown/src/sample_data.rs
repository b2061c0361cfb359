//! Seeded synthetic sample records.
//!
//! Used when the expected input file is absent so a run can proceed without
//! real measurements. Values come from a 32-bit Mersenne Twister seeded with
//! `init_genrand(seed)`, each double built from two draws with 53-bit
//! resolution and each column drawn in full before the next. The default seed
//! therefore reproduces the reference dataset whose first record is
//! `S001,17.5,344.74,33.19`.

use crate::config::{DEFAULT_SAMPLE_COUNT, DEFAULT_SAMPLE_SEED, PipelineConfig};
use crate::error::{Result, ResultExt};
use crate::schema::{
    PAH_CONCENTRATION_END, PAH_CONCENTRATION_START, SAMPLE_ID, SOIL_MOISTURE_PCT,
};
use polars::prelude::*;
use rand_mt::Mt;
use std::fs::{self, File};
use std::ops::Range;
use std::path::Path;
use tracing::info;

const MOISTURE_RANGE: Range<f64> = 10.0..30.0;
const START_RANGE: Range<f64> = 100.0..500.0;
const END_RANGE: Range<f64> = 10.0..200.0;

/// Generates a reproducible synthetic dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleDataGenerator {
    pub seed: u32,
    pub sample_count: usize,
}

impl Default for SampleDataGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_SAMPLE_SEED, DEFAULT_SAMPLE_COUNT)
    }
}

impl SampleDataGenerator {
    pub fn new(seed: u32, sample_count: usize) -> Self {
        Self { seed, sample_count }
    }

    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(config.sample_seed, config.sample_count)
    }

    /// Build the synthetic table in memory.
    ///
    /// End concentrations are drawn independently of start concentrations
    /// and may exceed them.
    pub fn generate(&self) -> Result<DataFrame> {
        let mut rng = Mt::new(self.seed);
        let n = self.sample_count;

        let ids: Vec<String> = (1..=n).map(|i| format!("S{i:03}")).collect();
        let moisture = Self::draw(&mut rng, n, MOISTURE_RANGE, 1);
        let start = Self::draw(&mut rng, n, START_RANGE, 2);
        let end = Self::draw(&mut rng, n, END_RANGE, 2);

        let df = df!(
            SAMPLE_ID => ids,
            SOIL_MOISTURE_PCT => moisture,
            PAH_CONCENTRATION_START => start,
            PAH_CONCENTRATION_END => end
        )?;
        Ok(df)
    }

    /// Generate the table and write it to `path`, creating parent
    /// directories as needed.
    pub fn write_csv(&self, path: impl AsRef<Path>) -> Result<DataFrame> {
        let path = path.as_ref();
        let mut df = self.generate()?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .context(format!("Failed to create {}", parent.display()))?;
        }

        let mut file =
            File::create(path).context(format!("Failed to create {}", path.display()))?;
        CsvWriter::new(&mut file)
            .include_header(true)
            .with_separator(b',')
            .finish(&mut df)?;

        info!(
            "Wrote {} synthetic samples (seed {}) to {}",
            df.height(),
            self.seed,
            path.display()
        );
        Ok(df)
    }

    fn draw(rng: &mut Mt, n: usize, range: Range<f64>, decimals: i32) -> Vec<f64> {
        (0..n)
            .map(|_| {
                let x = unit_interval(rng);
                round_to(range.start + (range.end - range.start) * x, decimals)
            })
            .collect()
    }
}

/// Uniform double in `[0, 1)` from the top 27 and 26 bits of two draws.
fn unit_interval(rng: &mut Mt) -> f64 {
    let a = rng.next_u32() >> 5;
    let b = rng.next_u32() >> 6;
    (f64::from(a) * 67_108_864.0 + f64::from(b)) / 9_007_199_254_740_992.0
}

/// Round half to even at `decimals` places.
fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}
