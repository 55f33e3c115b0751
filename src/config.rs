//! Configuration for the preparation run and the modeling feature lists.

use crate::error::{PrepError, Result, ResultExt as _};
use crate::modeling::Preprocessor;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_INPUT_PATH: &str = "data/raw/MachineLearningRating_v3.txt";
pub const DEFAULT_OUTPUT_PATH: &str = "data/processed/MachineLearningRating_v3.txt";

/// Field separator of the raw extract.
pub const RAW_SEPARATOR: u8 = b'|';

/// Placeholder tokens read as missing values in the raw extract.
pub const RAW_NULL_VALUES: [&str; 18] = [
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Month-year source column, e.g. `Jan-23`.
pub const TRANSACTION_MONTH_COL: &str = "transactionmonth";
pub const TRANSACTION_DATE_COL: &str = "transactiondate";
/// Abbreviated month and two-digit year.
pub const TRANSACTION_MONTH_FORMAT: &str = "%b-%y";

pub const TOTAL_PREMIUM_COL: &str = "totalpremium";
pub const TOTAL_CLAIMS_COL: &str = "totalclaims";
pub const CUSTOM_VALUE_ESTIMATE_COL: &str = "customvalueestimate";
pub const REGISTRATION_YEAR_COL: &str = "registrationyear";

/// Columns coerced to numbers before the derived features are computed.
pub const FINANCIAL_COLUMNS: [&str; 3] = [
    TOTAL_PREMIUM_COL,
    TOTAL_CLAIMS_COL,
    CUSTOM_VALUE_ESTIMATE_COL,
];

pub const HAS_CLAIM_COL: &str = "hasclaim";
pub const MARGIN_COL: &str = "margin";
pub const LOSS_RATIO_COL: &str = "lossratio";
pub const VEHICLE_AGE_COL: &str = "vehicleage";

/// Added to the premium so the loss ratio never divides by zero.
pub const LOSS_RATIO_EPSILON: f64 = 1e-6;

/// Where a preparation run reads from and writes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrepareConfig {
    pub input: PathBuf,
    pub output: PathBuf,
}

impl Default for PrepareConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT_PATH),
            output: PathBuf::from(DEFAULT_OUTPUT_PATH),
        }
    }
}

/// Feature lists handed to the modeling preprocessor.
///
/// Stored as JSON by the training side:
///
/// ```json
/// {
///   "numeric_features": ["totalpremium", "vehicleage"],
///   "categorical_features": ["province", "vehicletype"]
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureConfig {
    #[serde(default)]
    pub numeric_features: Vec<String>,
    #[serde(default)]
    pub categorical_features: Vec<String>,
}

impl FeatureConfig {
    /// # Errors
    ///
    /// Returns error if the JSON is malformed.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// # Errors
    ///
    /// Returns error if the file cannot be read or is not valid JSON.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read feature config {}", path.display()))?;
        Self::from_json(&content)
            .with_context(|| format!("Failed to parse feature config {}", path.display()))
    }

    /// # Errors
    ///
    /// Returns error if the lists are both empty or share a column.
    pub fn build_preprocessor(&self) -> Result<Preprocessor> {
        if self.numeric_features.is_empty() && self.categorical_features.is_empty() {
            return Err(PrepError::Config(
                "feature config names no numeric or categorical features".to_owned(),
            ));
        }
        Preprocessor::new(
            self.numeric_features.clone(),
            self.categorical_features.clone(),
        )
    }
}
