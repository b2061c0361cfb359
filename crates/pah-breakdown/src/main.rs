//! CLI entry point for the PAH breakdown pipeline.

use anyhow::Result;
use clap::Parser;
use pah_breakdown::config::{DEFAULT_INPUT_PATH, DEFAULT_OUTPUT_PATH};
use pah_breakdown::{Pipeline, PipelineConfig, PipelineResult, report};
use std::path::PathBuf;
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(
    version,
    about = "PAH breakdown-rate analysis for soil experiments",
    long_about = "Reads soil/PAH measurements, derives the breakdown rate per sample and \
                  writes the augmented table.\n\n\
                  If the input file is missing, a seeded synthetic dataset is written to \
                  the input path first.\n\n\
                  EXAMPLES:\n  \
                  # Default paths (data/experiment_data.csv -> data/processed_results.csv)\n  \
                  pah-breakdown\n\n  \
                  # Custom paths, longer preview\n  \
                  pah-breakdown -i field/site_a.csv -o field/site_a_processed.csv --preview-rows 10\n\n  \
                  # Machine-readable run summary\n  \
                  pah-breakdown --json | jq .breakdown"
)]
struct Args {
    /// Path to the experiment CSV
    #[arg(short, long, default_value = DEFAULT_INPUT_PATH)]
    input: PathBuf,

    /// Path of the processed CSV (overwritten)
    #[arg(short, long, default_value = DEFAULT_OUTPUT_PATH)]
    output: PathBuf,

    /// Number of rows shown in the preview
    #[arg(long, default_value = "5")]
    preview_rows: usize,

    /// Seed for the synthetic dataset
    #[arg(long, default_value = "42")]
    seed: u32,

    /// Fail instead of generating sample data when the input is missing
    #[arg(long)]
    no_sample_data: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Only log warnings and errors
    #[arg(short, long)]
    quiet: bool,

    /// Print the run summary as JSON instead of the preview table
    #[arg(long)]
    json: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// With `json_output` no subscriber is installed so stdout only carries JSON.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level, args.quiet, args.json);

    let config = PipelineConfig::builder()
        .input_path(&args.input)
        .output_path(&args.output)
        .preview_rows(args.preview_rows)
        .sample_seed(args.seed)
        .generate_sample_data(!args.no_sample_data)
        .build()?;

    let mut builder = Pipeline::builder().config(config.clone());
    if !args.quiet {
        builder = builder.on_progress(|update| {
            debug!(
                "[{}] {}",
                update.stage.display_name(),
                update.message
            );
        });
    }

    let result = builder.build()?.run()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result.summary)?);
        return Ok(());
    }

    print_results(&result, config.preview_rows)
}

/// Print the fallback notice, the preview table and the output location.
fn print_results(result: &PipelineResult, preview_rows: usize) -> Result<()> {
    if result.summary.sample_data_generated {
        println!("Data file not found: {}", result.summary.input_file.display());
        println!("Creating dummy data for demonstration...");
    }

    println!("Breakdown analysis results:");
    println!("{}", report::preview(&result.data, preview_rows)?);

    match result.output_path() {
        Some(path) => println!("\nProcessed results saved to: {}", path.display()),
        None => info!("Results kept in memory only"),
    }
    Ok(())
}
