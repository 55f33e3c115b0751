use super::columns::total_null_count;
use super::features::engineer_features;
use super::imputation::handle_missing_values;
use super::io::{load_raw_table, save_table};
use super::naming::normalize_columns;
use crate::config::PrepareConfig;
use crate::error::Result;
use polars::prelude::DataFrame;
use std::path::PathBuf;

/// What a completed preparation run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrepareSummary {
    pub rows_in: usize,
    pub rows_out: usize,
    pub columns_out: usize,
    pub remaining_nulls: usize,
    pub output: PathBuf,
}

/// Normalizes column names, engineers features and imputes missing values.
///
/// # Errors
///
/// Returns [`crate::error::PrepError::MissingColumn`] if a required source
/// column is absent, or any polars failure.
pub fn prepare_table(df: DataFrame) -> Result<DataFrame> {
    let df = normalize_columns(df)?;
    let df = engineer_features(df)?;
    handle_missing_values(df)
}

/// Loads, prepares and saves one raw extract.
///
/// A load failure is logged and returns `Ok(None)` without writing any
/// output. Failures after loading propagate.
///
/// # Errors
///
/// Returns error if a stage or the save fails.
pub fn run_prepare(config: &PrepareConfig) -> Result<Option<PrepareSummary>> {
    tracing::info!("Loading raw data from {}...", config.input.display());
    let raw = match load_raw_table(&config.input) {
        Ok(df) => df,
        Err(e) => {
            tracing::error!("Failed to load data: {e}");
            return Ok(None);
        }
    };
    let rows_in = raw.height();
    tracing::info!(
        "Raw data loaded successfully: {rows_in} rows, {} columns.",
        raw.width()
    );

    let mut df = prepare_table(raw)?;
    save_table(&mut df, &config.output)?;
    tracing::info!("Processed data saved to {}", config.output.display());

    Ok(Some(PrepareSummary {
        rows_in,
        rows_out: df.height(),
        columns_out: df.width(),
        remaining_nulls: total_null_count(&df),
        output: config.output.clone(),
    }))
}
