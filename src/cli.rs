use acis_prep::config::{DEFAULT_INPUT_PATH, DEFAULT_OUTPUT_PATH, PrepareConfig};
use acis_prep::rating::run_prepare;
use anyhow::{Context as _, Result};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "acis-prep", about = "Process ACIS insurance data.")]
pub struct Cli {
    /// Path to the raw data file.
    #[arg(long, default_value = DEFAULT_INPUT_PATH)]
    pub input: PathBuf,

    /// Path to save the processed data file.
    #[arg(long, default_value = DEFAULT_OUTPUT_PATH)]
    pub output: PathBuf,
}

impl Cli {
    pub fn into_config(self) -> PrepareConfig {
        PrepareConfig {
            input: self.input,
            output: self.output,
        }
    }
}

pub fn run(cli: Cli) -> Result<()> {
    let config = cli.into_config();
    let summary = run_prepare(&config).context("Data preparation failed")?;

    if let Some(summary) = summary {
        tracing::info!(
            "Done: {} of {} rows kept, {} columns, {} nulls remaining",
            summary.rows_out,
            summary.rows_in,
            summary.columns_out,
            summary.remaining_nulls
        );
    }
    Ok(())
}
