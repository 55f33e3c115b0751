//! Error types for the rating data preparation pipeline.
//!
//! Library code returns [`Result`], whose error is [`PrepError`]. Conversions
//! from the underlying crates are implemented with `From`, so `?` works on
//! polars, I/O and JSON results directly:
//!
//! ```no_run
//! use acis_prep::error::Result;
//! use acis_prep::rating::load_raw_table;
//!
//! fn row_count(path: &std::path::Path) -> Result<usize> {
//!     let df = load_raw_table(path)?;
//!     Ok(df.height())
//! }
//! ```
//!
//! Only structural problems are errors here. Bad individual values (an
//! unparseable date, a non-numeric premium) become nulls and are reported
//! through the logs instead.

use std::fmt;

/// Main error type for preparation and preprocessing operations.
#[derive(Debug)]
pub enum PrepError {
    /// I/O errors (opening, creating or writing files)
    Io(std::io::Error),

    /// Data processing errors raised by polars or by value conversion
    DataProcessing(String),

    /// A column the operation cannot work without is absent
    MissingColumn(String),

    /// Invalid configuration (feature lists, config files)
    Config(String),

    /// Generic error with context
    Other(String),
}

impl fmt::Display for PrepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::DataProcessing(msg) => write!(f, "Data processing error: {msg}"),
            Self::MissingColumn(name) => {
                write!(f, "Missing column: '{name}' is missing from the data")
            }
            Self::Config(msg) => write!(f, "Configuration error: {msg}"),
            Self::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for PrepError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for PrepError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<anyhow::Error> for PrepError {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}

impl From<serde_json::Error> for PrepError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(format!("JSON error: {err}"))
    }
}

impl From<polars::error::PolarsError> for PrepError {
    fn from(err: polars::error::PolarsError) -> Self {
        Self::DataProcessing(err.to_string())
    }
}

impl From<ndarray::ShapeError> for PrepError {
    fn from(err: ndarray::ShapeError) -> Self {
        Self::DataProcessing(format!("matrix shape error: {err}"))
    }
}

/// Result type alias for preparation operations.
pub type Result<T> = std::result::Result<T, PrepError>;

/// Extension trait to add context to results.
pub trait ResultExt<T> {
    /// Add context to an error.
    fn context(self, msg: impl Into<String>) -> Result<T>;

    /// Add context using a closure (lazy evaluation).
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<PrepError>,
{
    fn context(self, msg: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let err: PrepError = e.into();
            PrepError::Other(format!("{}: {}", msg.into(), err))
        })
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let err: PrepError = e.into();
            PrepError::Other(format!("{}: {}", f(), err))
        })
    }
}
