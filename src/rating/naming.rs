use crate::error::Result;
use polars::prelude::*;
use std::collections::HashSet;

/// Trims, lowercases and turns spaces and hyphens into underscores.
///
/// `"Total Premium"` becomes `"total_premium"`, `"Post-Code"` becomes
/// `"post_code"`. Already-clean names pass through unchanged.
pub fn normalize_column_name(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .collect()
}

/// Normalizes every name, suffixing `_1`, `_2`, ... where two raw names collide.
pub fn normalize_column_names(names: &[String]) -> Vec<String> {
    let mut cleaned_names = Vec::with_capacity(names.len());
    let mut seen = HashSet::new();

    for name in names {
        let clean_base = normalize_column_name(name);
        let mut clean = clean_base.clone();
        let mut count = 0;

        while seen.contains(&clean) {
            count += 1;
            clean = format!("{clean_base}_{count}");
        }

        seen.insert(clean.clone());
        cleaned_names.push(clean);
    }
    cleaned_names
}

/// Renames every column of `df` with [`normalize_column_names`].
///
/// # Errors
///
/// Returns error if polars rejects the rebuilt frame.
pub fn normalize_columns(df: DataFrame) -> Result<DataFrame> {
    tracing::info!("Cleaning column names...");

    let original: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();
    let cleaned = normalize_column_names(&original);

    tracing::info!("Original columns: {original:?}");
    tracing::info!("Cleaned columns: {cleaned:?}");

    let columns = df
        .take_columns()
        .into_iter()
        .zip(cleaned)
        .map(|(mut column, name)| {
            column.rename(name.into());
            column
        })
        .collect();

    Ok(DataFrame::new(columns)?)
}
