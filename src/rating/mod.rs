//! Preparation stages for the raw rating extract.
//!
//! ```text
//! raw table ─> normalize_columns ─> engineer_features ─> handle_missing_values ─> save_table
//! ```
//!
//! Every stage takes the `DataFrame` by value and returns a new one.

pub mod columns;
pub mod features;
pub mod flows;
pub mod imputation;
pub mod io;
pub mod naming;

pub use features::{DateParseReport, derive_transaction_date, engineer_features};
pub use flows::{PrepareSummary, prepare_table, run_prepare};
pub use imputation::{column_median, column_mode, handle_missing_values};
pub use io::{load_raw_table, save_table};
pub use naming::{normalize_column_name, normalize_column_names, normalize_columns};
