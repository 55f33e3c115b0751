use super::columns::{is_text_kind, total_null_count};
use crate::error::Result;
use polars::prelude::*;

/// How a column's gaps are filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FillKind {
    Mode,
    Median,
}

impl FillKind {
    /// Text, categorical and boolean columns take the mode, numeric columns
    /// the median. Anything else (dates) is left alone.
    fn of(dtype: &DataType) -> Option<Self> {
        if is_text_kind(dtype) || dtype == &DataType::Boolean {
            Some(Self::Mode)
        } else if dtype.is_primitive_numeric() {
            Some(Self::Median)
        } else {
            None
        }
    }
}

/// Most frequent non-null value of `values`. Ties go to the smallest value so
/// the choice is stable.
pub fn mode_of(values: Expr) -> Expr {
    values
        .drop_nulls()
        .mode()
        .sort(SortOptions::default())
        .first()
}

/// `values` as `Float64` with NaN treated as missing.
pub fn numeric_values(values: Expr) -> Expr {
    values.cast(DataType::Float64).fill_nan(lit(NULL))
}

fn fill_expr(name: &str, kind: FillKind, dtype: &DataType) -> Expr {
    match kind {
        FillKind::Mode => {
            let values = if dtype == &DataType::Boolean {
                col(name)
            } else {
                col(name).cast(DataType::String)
            };
            values.clone().fill_null(mode_of(values))
        }
        FillKind::Median => {
            let values = numeric_values(col(name));
            values.clone().fill_null(values.median())
        }
    }
}

fn single_column_stat(series: &Series, stat: Expr) -> Result<Series> {
    let out = DataFrame::new(vec![Column::from(series.clone())])?
        .lazy()
        .select([stat.alias("stat")])
        .collect()?;
    Ok(out.column("stat")?.as_materialized_series().clone())
}

/// Mode of the non-null values of a column, read as text.
///
/// # Errors
///
/// Returns error if the column cannot be cast to text.
pub fn column_mode(series: &Series) -> Result<Option<String>> {
    let stat = single_column_stat(
        series,
        mode_of(col(series.name().as_str()).cast(DataType::String)),
    )?;
    Ok(stat.str()?.get(0).map(str::to_owned))
}

/// Median of the non-null values of a column, read as numbers.
///
/// # Errors
///
/// Returns error if the column cannot be cast to `Float64`.
pub fn column_median(series: &Series) -> Result<Option<f64>> {
    let stat = single_column_stat(
        series,
        numeric_values(col(series.name().as_str())).median(),
    )?;
    Ok(stat.f64()?.get(0))
}

/// Fills nulls per column: text, categorical and boolean columns with their
/// mode, numeric columns with their median. Date columns are left as they
/// are.
///
/// A fillable column with no values at all in a non-empty table has nothing
/// to take a statistic from and is dropped with a warning.
///
/// # Errors
///
/// Returns error if polars cannot evaluate a fill.
pub fn handle_missing_values(df: DataFrame) -> Result<DataFrame> {
    tracing::info!("Handling missing values...");

    let height = df.height();
    let mut exprs = Vec::with_capacity(df.width());

    for column in df.get_columns() {
        let name = column.name().as_str();
        let nulls = column.null_count();
        let kind = FillKind::of(column.dtype());

        match kind {
            Some(_) if nulls > 0 && nulls == height => {
                tracing::warn!("Column '{name}' has no values, dropping it");
            }
            Some(kind) if nulls > 0 => {
                tracing::debug!("Filling {nulls} missing values in '{name}' ({kind:?})");
                exprs.push(fill_expr(name, kind, column.dtype()));
            }
            _ => exprs.push(col(name)),
        }
    }

    let df = df.lazy().select(exprs).collect()?;
    tracing::info!(
        "Missing values handled. Remaining nulls: {}",
        total_null_count(&df)
    );
    Ok(df)
}
