use crate::error::PrepError;
use crate::rating::features::*;
use anyhow::Result;
use chrono::NaiveDate;
use polars::prelude::*;

fn raw_frame(months: &[&str], premiums: &[&str], claims: &[&str]) -> Result<DataFrame> {
    Ok(DataFrame::new(vec![
        Column::from(Series::new("transactionmonth".into(), months.to_vec())),
        Column::from(Series::new("totalpremium".into(), premiums.to_vec())),
        Column::from(Series::new("totalclaims".into(), claims.to_vec())),
    ])?)
}

fn f64_at(df: &DataFrame, name: &str, idx: usize) -> Result<Option<f64>> {
    Ok(df
        .column(name)?
        .as_materialized_series()
        .cast(&DataType::Float64)?
        .f64()?
        .get(idx))
}

#[test]
fn test_parse_transaction_month() {
    assert_eq!(
        parse_transaction_month("Jan-23"),
        NaiveDate::from_ymd_opt(2023, 1, 1)
    );
    assert_eq!(
        parse_transaction_month("Dec-15"),
        NaiveDate::from_ymd_opt(2015, 12, 1)
    );
    assert_eq!(parse_transaction_month("bad"), None);
    assert_eq!(parse_transaction_month("2015-03-01 00:00:00"), None);
    assert_eq!(parse_transaction_month("Jan-2023"), None);
    assert_eq!(parse_transaction_month(""), None);
}

#[test]
fn test_all_valid_months_parse() -> Result<()> {
    let df = raw_frame(
        &["Mar-24", "Apr-24", "May-24"],
        &["1", "2", "3"],
        &["0", "0", "0"],
    )?;
    let (df, report) = derive_transaction_date(df)?;

    assert_eq!(report, DateParseReport { parsed: 3, total: 3 });
    assert!(!report.all_failed());

    let dates = df.column("transactiondate")?.as_materialized_series();
    assert_eq!(dates.dtype(), &DataType::Date);
    assert_eq!(dates.null_count(), 0);

    let text = dates.cast(&DataType::String)?;
    assert_eq!(text.str()?.get(0), Some("2024-03-01"));
    Ok(())
}

#[test]
fn test_all_malformed_months_flag_failure() -> Result<()> {
    let df = raw_frame(&["13/2024", "bad"], &["1", "2"], &["0", "0"])?;
    let (df, report) = derive_transaction_date(df)?;

    assert_eq!(report.parsed, 0);
    assert_eq!(report.failed(), 2);
    assert!(report.all_failed());
    assert_eq!(
        df.column("transactiondate")?.as_materialized_series().null_count(),
        2
    );
    Ok(())
}

#[test]
fn test_empty_table_is_not_a_parse_failure() -> Result<()> {
    let df = raw_frame(&[], &[], &[])?;
    let (_, report) = derive_transaction_date(df)?;
    assert_eq!(report.total, 0);
    assert!(!report.all_failed());
    Ok(())
}

#[test]
fn test_missing_transaction_month_is_fatal() -> Result<()> {
    let df = DataFrame::new(vec![Column::from(Series::new(
        "totalpremium".into(),
        vec!["1"],
    ))])?;

    let result = engineer_features(df);
    assert!(
        matches!(result, Err(PrepError::MissingColumn(ref name)) if name == "transactionmonth")
    );
    Ok(())
}

#[test]
fn test_end_to_end_claim_features() -> Result<()> {
    let df = raw_frame(&["Jan-24", "bad"], &["100", "200"], &["50", "0"])?;
    let df = engineer_features(df)?;

    assert_eq!(df.height(), 2);

    let has_claim = df.column("hasclaim")?.as_materialized_series();
    assert_eq!(has_claim.dtype(), &DataType::Int32);
    assert_eq!(has_claim.i32()?.get(0), Some(1));
    assert_eq!(has_claim.i32()?.get(1), Some(0));

    assert_eq!(f64_at(&df, "margin", 0)?, Some(50.0));
    assert_eq!(f64_at(&df, "margin", 1)?, Some(200.0));

    let ratio0 = f64_at(&df, "lossratio", 0)?.expect("loss ratio present");
    let ratio1 = f64_at(&df, "lossratio", 1)?.expect("loss ratio present");
    assert!((ratio0 - 0.5).abs() < 1e-6);
    assert!(ratio1.abs() < 1e-12);

    let dates = df.column("transactiondate")?.as_materialized_series();
    assert!(!dates.is_null().get(0).unwrap_or(true));
    assert!(dates.is_null().get(1).unwrap_or(false));
    Ok(())
}

#[test]
fn test_rows_without_financials_are_dropped() -> Result<()> {
    let df = raw_frame(
        &["Jan-24", "Feb-24", "Mar-24", "Apr-24"],
        &["100", "", "n/a", "40"],
        &["0", "10", "5", "not a number"],
    )?;
    let df = engineer_features(df)?;

    assert_eq!(df.height(), 1);
    assert_eq!(
        df.column("totalpremium")?.as_materialized_series().null_count(),
        0
    );
    assert_eq!(
        df.column("totalclaims")?.as_materialized_series().null_count(),
        0
    );
    assert_eq!(f64_at(&df, "totalpremium", 0)?, Some(100.0));
    Ok(())
}

#[test]
fn test_loss_ratio_finite_with_zero_premium() -> Result<()> {
    let df = raw_frame(&["Jan-24", "Feb-24"], &["0", "0"], &["0", "25"])?;
    let df = engineer_features(df)?;

    let ratios = df.column("lossratio")?.as_materialized_series();
    assert!(ratios.f64()?.iter().flatten().all(f64::is_finite));
    assert_eq!(f64_at(&df, "lossratio", 0)?, Some(0.0));
    Ok(())
}

#[test]
fn test_custom_value_estimate_coerced() -> Result<()> {
    let df = DataFrame::new(vec![
        Column::from(Series::new("transactionmonth".into(), vec!["Jan-24", "Jan-24"])),
        Column::from(Series::new("totalpremium".into(), vec!["10", "20"])),
        Column::from(Series::new("totalclaims".into(), vec!["0", "0"])),
        Column::from(Series::new("customvalueestimate".into(), vec!["119300", "abc"])),
    ])?;
    let df = engineer_features(df)?;

    let estimate = df.column("customvalueestimate")?.as_materialized_series();
    assert_eq!(estimate.dtype(), &DataType::Float64);
    assert_eq!(estimate.f64()?.get(0), Some(119_300.0));
    assert_eq!(estimate.f64()?.get(1), None);
    Ok(())
}

#[test]
fn test_vehicle_age() -> Result<()> {
    let df = DataFrame::new(vec![
        Column::from(Series::new("transactionmonth".into(), vec!["Jan-24", "Jan-24", "Jan-24"])),
        Column::from(Series::new("totalpremium".into(), vec!["10", "20", "30"])),
        Column::from(Series::new("totalclaims".into(), vec!["0", "0", "0"])),
        Column::from(Series::new("registrationyear".into(), vec!["2004", "unknown", "2030"])),
    ])?;
    let df = engineer_features_at(df, 2025)?;

    assert_eq!(f64_at(&df, "vehicleage", 0)?, Some(21.0));
    assert_eq!(f64_at(&df, "vehicleage", 1)?, None);
    assert_eq!(f64_at(&df, "vehicleage", 2)?, Some(-5.0));
    Ok(())
}

#[test]
fn test_vehicle_age_skipped_without_registration_year() -> Result<()> {
    let df = raw_frame(&["Jan-24"], &["10"], &["0"])?;
    let df = engineer_features(df)?;
    assert!(df.column("vehicleage").is_err());
    Ok(())
}
