use super::columns::{coerce_numeric, has_column, require_column, text_values};
use crate::config::{
    FINANCIAL_COLUMNS, HAS_CLAIM_COL, LOSS_RATIO_COL, LOSS_RATIO_EPSILON, MARGIN_COL,
    REGISTRATION_YEAR_COL, TOTAL_CLAIMS_COL, TOTAL_PREMIUM_COL, TRANSACTION_DATE_COL,
    TRANSACTION_MONTH_COL, TRANSACTION_MONTH_FORMAT, VEHICLE_AGE_COL,
};
use crate::error::{PrepError, Result};
use chrono::{Datelike as _, NaiveDate};
use polars::prelude::*;

/// Days from 0001-01-01 to the Unix epoch, as counted by `num_days_from_ce`.
const EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// How well the month-year column parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateParseReport {
    pub parsed: usize,
    pub total: usize,
}

impl DateParseReport {
    pub fn failed(&self) -> usize {
        self.total - self.parsed
    }

    /// Every row failed to parse. An empty table never counts as failed.
    pub fn all_failed(&self) -> bool {
        self.total > 0 && self.parsed == 0
    }
}

/// Parses an abbreviated month-year value such as `Jan-23` to the first day
/// of that month.
pub fn parse_transaction_month(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(
        &format!("01-{value}"),
        &format!("%d-{TRANSACTION_MONTH_FORMAT}"),
    )
    .ok()
}

fn days_since_epoch(date: NaiveDate) -> i32 {
    date.num_days_from_ce() - EPOCH_DAYS_FROM_CE
}

/// Adds `transactiondate` parsed from `transactionmonth`.
///
/// Values that do not parse become null rather than failing the run.
///
/// # Errors
///
/// Returns [`PrepError::MissingColumn`] if `transactionmonth` is absent.
pub fn derive_transaction_date(df: DataFrame) -> Result<(DataFrame, DateParseReport)> {
    let mut df = df;

    if !has_column(&df, TRANSACTION_MONTH_COL) {
        tracing::error!(
            "'{TRANSACTION_MONTH_COL}' column not found! Cannot create '{TRANSACTION_DATE_COL}'."
        );
        return Err(PrepError::MissingColumn(TRANSACTION_MONTH_COL.to_owned()));
    }

    tracing::info!("Creating '{TRANSACTION_DATE_COL}' column...");
    let months = text_values(require_column(&df, TRANSACTION_MONTH_COL)?)?;
    let days: Vec<Option<i32>> = months
        .iter()
        .map(|month| {
            month
                .as_deref()
                .and_then(parse_transaction_month)
                .map(days_since_epoch)
        })
        .collect();

    let report = DateParseReport {
        parsed: days.iter().filter(|d| d.is_some()).count(),
        total: days.len(),
    };

    let dates = Series::new(TRANSACTION_DATE_COL.into(), days).cast(&DataType::Date)?;
    df.with_column(dates)?;

    tracing::info!(
        "Successfully parsed {}/{} dates. ({} rows have no date).",
        report.parsed,
        report.total,
        report.failed()
    );
    if report.all_failed() {
        tracing::warn!(
            "All date parsing failed. The '{TRANSACTION_DATE_COL}' column will be all null. \
             Check the '{TRANSACTION_MONTH_FORMAT}' format against the raw values."
        );
    }

    Ok((df, report))
}

/// Casts the financial columns that are present to `Float64`.
///
/// # Errors
///
/// Returns error if polars cannot cast a column.
pub fn coerce_financial_columns(df: DataFrame) -> Result<DataFrame> {
    let mut df = df;
    for name in FINANCIAL_COLUMNS {
        if !has_column(&df, name) {
            continue;
        }
        let before = require_column(&df, name)?.null_count();
        let coerced = coerce_numeric(require_column(&df, name)?)?;
        let coerced_nulls = coerced.null_count().saturating_sub(before);
        if coerced_nulls > 0 {
            tracing::info!("'{name}': {coerced_nulls} non-numeric values set to null");
        }
        df.with_column(coerced)?;
    }
    Ok(df)
}

/// Drops rows without a premium or a claims amount.
///
/// # Errors
///
/// Returns [`PrepError::MissingColumn`] if either column is absent.
pub fn drop_rows_missing_financials(df: DataFrame) -> Result<DataFrame> {
    let premium = require_column(&df, TOTAL_PREMIUM_COL)?;
    let claims = require_column(&df, TOTAL_CLAIMS_COL)?;
    let mask = premium.is_not_null() & claims.is_not_null();

    let filtered = df.filter(&mask)?;
    let dropped = df.height() - filtered.height();
    if dropped > 0 {
        tracing::info!(
            "Dropped {dropped} rows missing '{TOTAL_PREMIUM_COL}' or '{TOTAL_CLAIMS_COL}'"
        );
    }
    Ok(filtered)
}

/// Adds `hasclaim`, `margin` and `lossratio`.
///
/// Rows must already have non-null premium and claims; see
/// [`drop_rows_missing_financials`].
///
/// # Errors
///
/// Returns error if the financial columns are absent.
pub fn derive_claim_features(df: DataFrame) -> Result<DataFrame> {
    require_column(&df, TOTAL_PREMIUM_COL)?;
    require_column(&df, TOTAL_CLAIMS_COL)?;

    let premium = col(TOTAL_PREMIUM_COL).cast(DataType::Float64);
    let claims = col(TOTAL_CLAIMS_COL).cast(DataType::Float64);

    let df = df
        .lazy()
        .with_columns([
            claims
                .clone()
                .gt(lit(0.0))
                .cast(DataType::Int32)
                .alias(HAS_CLAIM_COL),
            (premium.clone() - claims.clone()).alias(MARGIN_COL),
            (claims / (premium + lit(LOSS_RATIO_EPSILON))).alias(LOSS_RATIO_COL),
        ])
        .collect()?;
    Ok(df)
}

/// Adds `vehicleage` as `current_year - registrationyear` when the
/// registration year is present. Non-numeric years give a null age.
///
/// # Errors
///
/// Returns error if polars cannot cast the registration year.
pub fn derive_vehicle_age(df: DataFrame, current_year: i32) -> Result<DataFrame> {
    if !has_column(&df, REGISTRATION_YEAR_COL) {
        tracing::info!("'{REGISTRATION_YEAR_COL}' not present, skipping '{VEHICLE_AGE_COL}'");
        return Ok(df);
    }

    let df = df
        .lazy()
        .with_column(
            (lit(f64::from(current_year)) - col(REGISTRATION_YEAR_COL).cast(DataType::Float64))
                .alias(VEHICLE_AGE_COL),
        )
        .collect()?;
    Ok(df)
}

/// Runs every feature step in order, using today's year for vehicle age.
///
/// # Errors
///
/// Returns [`PrepError::MissingColumn`] when `transactionmonth`,
/// `totalpremium` or `totalclaims` is absent. Callers should treat this as
/// fatal.
pub fn engineer_features(df: DataFrame) -> Result<DataFrame> {
    engineer_features_at(df, chrono::Local::now().year())
}

/// [`engineer_features`] with an explicit current year.
///
/// # Errors
///
/// See [`engineer_features`].
pub fn engineer_features_at(df: DataFrame, current_year: i32) -> Result<DataFrame> {
    tracing::info!("Starting feature engineering...");

    let (df, _report) = derive_transaction_date(df)?;
    let df = coerce_financial_columns(df)?;
    let df = drop_rows_missing_financials(df)?;
    let df = derive_claim_features(df)?;
    let df = derive_vehicle_age(df, current_year)?;

    tracing::info!("Finished feature engineering. {} rows remain.", df.height());
    Ok(df)
}
