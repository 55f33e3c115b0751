use crate::error::{PrepError, Result};
use polars::prelude::*;

pub fn has_column(df: &DataFrame, name: &str) -> bool {
    df.get_column_index(name).is_some()
}

/// Borrows a column as a series, failing with [`PrepError::MissingColumn`].
pub fn require_column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Series> {
    if !has_column(df, name) {
        return Err(PrepError::MissingColumn(name.to_owned()));
    }
    Ok(df.column(name)?.as_materialized_series())
}

/// Non-strict cast to `Float64`: anything that is not a number becomes null.
pub fn coerce_numeric(series: &Series) -> Result<Series> {
    Ok(series.cast(&DataType::Float64)?)
}

pub fn float_values(series: &Series) -> Result<Vec<Option<f64>>> {
    let numeric = coerce_numeric(series)?;
    Ok(numeric.f64()?.iter().collect())
}

pub fn text_values(series: &Series) -> Result<Vec<Option<String>>> {
    let text = series.cast(&DataType::String)?;
    Ok(text.str()?.iter().map(|v| v.map(str::to_owned)).collect())
}

pub fn is_text_kind(dtype: &DataType) -> bool {
    matches!(dtype, DataType::String | DataType::Categorical(..))
}

pub fn total_null_count(df: &DataFrame) -> usize {
    df.get_columns().iter().map(Column::null_count).sum()
}
