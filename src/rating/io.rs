use crate::config::{RAW_NULL_VALUES, RAW_SEPARATOR};
use crate::error::{PrepError, Result, ResultExt as _};
use polars::prelude::*;
use std::path::Path;

/// Reads the pipe-delimited raw extract. The header row names the columns
/// and the schema is inferred from the whole file, so a late non-numeric
/// value keeps its column as text instead of failing the read. Empty fields
/// and placeholders such as `NA` or `NULL` load as nulls.
///
/// # Errors
///
/// Returns error if the file is missing, unreadable or malformed.
pub fn load_raw_table(path: &Path) -> Result<DataFrame> {
    if !path.is_file() {
        return Err(PrepError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("{} does not exist or is not a file", path.display()),
        )));
    }

    LazyCsvReader::new(path)
        .with_has_header(true)
        .with_separator(RAW_SEPARATOR)
        .with_infer_schema_length(None)
        .with_null_values(Some(NullValues::AllColumns(
            RAW_NULL_VALUES.iter().map(|v| (*v).into()).collect(),
        )))
        .finish()
        .context("Failed to scan raw table")?
        .collect()
        .context("Failed to read raw table")
}

/// Writes `df` as comma-delimited text with a header row, creating parent
/// directories as needed. Dates are written as `YYYY-MM-DD`.
///
/// # Errors
///
/// Returns error if the directory or file cannot be created or written.
pub fn save_table(df: &mut DataFrame, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).with_context(|| {
            format!("Failed to create output directory {}", parent.display())
        })?;
    }

    let file = std::fs::File::create(path).context("Failed to create CSV file")?;
    CsvWriter::new(file)
        .include_header(true)
        .finish(df)
        .context("Failed to write CSV file")?;

    Ok(())
}
