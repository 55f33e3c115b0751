//! Preprocessing transform for the modeling pipeline.
//!
//! A [`Preprocessor`] names the numeric and categorical feature columns.
//! Fitting it on a training table learns, per column:
//!
//! - numeric: the median used to fill gaps, then the mean and standard
//!   deviation used to standardize;
//! - categorical: the most frequent value used to fill gaps, then the
//!   categories used for one-hot encoding.
//!
//! The resulting [`FittedPreprocessor`] turns any table with those columns
//! into a dense `f64` matrix using only what it learned. Columns not named
//! in either list never reach the output.
//!
//! ```no_run
//! use acis_prep::modeling::create_modeling_pipeline;
//! # fn example(train: &polars::prelude::DataFrame) -> acis_prep::error::Result<()> {
//! let preprocessor = create_modeling_pipeline(
//!     vec!["totalpremium".to_owned(), "vehicleage".to_owned()],
//!     vec!["province".to_owned()],
//! )?;
//! let fitted = preprocessor.fit(train)?;
//! let matrix = fitted.transform(train)?;
//! assert_eq!(matrix.ncols(), fitted.feature_names().len());
//! # Ok(())
//! # }
//! ```

use crate::error::{PrepError, Result};
use crate::rating::columns::{float_values, require_column, text_values};
use crate::rating::imputation::{mode_of, numeric_values};
use ndarray::Array2;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Unfitted transform: the allow-list of feature columns per branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preprocessor {
    numeric_features: Vec<String>,
    categorical_features: Vec<String>,
}

/// Builds a [`Preprocessor`] from the two feature lists.
///
/// # Errors
///
/// Returns [`PrepError::Config`] if a column appears in both lists or twice
/// in one.
pub fn create_modeling_pipeline(
    numeric_features: Vec<String>,
    categorical_features: Vec<String>,
) -> Result<Preprocessor> {
    Preprocessor::new(numeric_features, categorical_features)
}

impl Preprocessor {
    /// # Errors
    ///
    /// Returns [`PrepError::Config`] if a column is listed more than once.
    pub fn new(numeric_features: Vec<String>, categorical_features: Vec<String>) -> Result<Self> {
        let mut seen = HashSet::new();
        for name in numeric_features.iter().chain(&categorical_features) {
            if !seen.insert(name.as_str()) {
                return Err(PrepError::Config(format!(
                    "feature '{name}' is listed more than once"
                )));
            }
        }
        Ok(Self {
            numeric_features,
            categorical_features,
        })
    }

    pub fn numeric_features(&self) -> &[String] {
        &self.numeric_features
    }

    pub fn categorical_features(&self) -> &[String] {
        &self.categorical_features
    }

    /// Learns imputation, scaling and encoding statistics from `df`.
    ///
    /// # Errors
    ///
    /// Returns [`PrepError::MissingColumn`] if a configured column is absent
    /// and [`PrepError::DataProcessing`] if one has no values to learn from.
    pub fn fit(&self, df: &DataFrame) -> Result<FittedPreprocessor> {
        let numeric = self
            .numeric_features
            .iter()
            .map(|name| NumericScaler::fit(df, name))
            .collect::<Result<Vec<_>>>()?;
        let categorical = self
            .categorical_features
            .iter()
            .map(|name| CategoricalEncoder::fit(df, name))
            .collect::<Result<Vec<_>>>()?;

        let fitted = FittedPreprocessor {
            numeric,
            categorical,
        };
        tracing::info!(
            "Fitted preprocessor on {} rows: {} numeric, {} categorical, {} output features",
            df.height(),
            fitted.numeric.len(),
            fitted.categorical.len(),
            fitted.n_features_out()
        );
        Ok(fitted)
    }

    /// [`Self::fit`] followed by [`FittedPreprocessor::transform`] on the same table.
    ///
    /// # Errors
    ///
    /// See [`Self::fit`].
    pub fn fit_transform(&self, df: &DataFrame) -> Result<(FittedPreprocessor, Array2<f64>)> {
        let fitted = self.fit(df)?;
        let matrix = fitted.transform(df)?;
        Ok((fitted, matrix))
    }
}

/// Median imputation followed by standardization for one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericScaler {
    pub column: String,
    pub median: f64,
    pub mean: f64,
    pub scale: f64,
}

impl NumericScaler {
    fn fit(df: &DataFrame, column: &str) -> Result<Self> {
        require_column(df, column)?;
        let values = numeric_values(col(column));
        let imputed = values.clone().fill_null(values.clone().median());

        let stats = df
            .clone()
            .lazy()
            .select([
                values.median().alias("median"),
                imputed.clone().mean().alias("mean"),
                imputed.std(0).alias("std"),
            ])
            .collect()?;
        let stat = |name: &str| -> Result<Option<f64>> {
            Ok(stats.column(name)?.as_materialized_series().f64()?.get(0))
        };

        let median = stat("median")?.ok_or_else(|| {
            PrepError::DataProcessing(format!("numeric feature '{column}' has no values"))
        })?;
        let mean = stat("mean")?.unwrap_or(median);
        let std = stat("std")?.unwrap_or(0.0);
        // Constant columns are centred but not scaled.
        let scale = if std > 0.0 { std } else { 1.0 };

        Ok(Self {
            column: column.to_owned(),
            median,
            mean,
            scale,
        })
    }

    /// Standardizes one value; missing and NaN values take the median.
    pub fn apply(&self, value: Option<f64>) -> f64 {
        let value = value.filter(|v| !v.is_nan()).unwrap_or(self.median);
        (value - self.mean) / self.scale
    }
}

/// Mode imputation followed by one-hot encoding for one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoricalEncoder {
    pub column: String,
    pub mode: String,
    /// Sorted; one output column each.
    pub categories: Vec<String>,
}

impl CategoricalEncoder {
    fn fit(df: &DataFrame, column: &str) -> Result<Self> {
        require_column(df, column)?;
        let values = col(column).cast(DataType::String);

        let stats = df
            .clone()
            .lazy()
            .select([mode_of(values.clone()).alias("mode")])
            .collect()?;
        let mode = stats
            .column("mode")?
            .as_materialized_series()
            .str()?
            .get(0)
            .map(str::to_owned)
            .ok_or_else(|| {
                PrepError::DataProcessing(format!("categorical feature '{column}' has no values"))
            })?;

        let categories = df
            .clone()
            .lazy()
            .select([values
                .fill_null(lit(mode.clone()))
                .unique()
                .sort(SortOptions::default())
                .alias("categories")])
            .collect()?;
        let categories = categories
            .column("categories")?
            .as_materialized_series()
            .str()?
            .into_no_null_iter()
            .map(str::to_owned)
            .collect();

        Ok(Self {
            column: column.to_owned(),
            mode,
            categories,
        })
    }

    /// Index of the indicator to set, or `None` for an unseen category.
    pub fn position(&self, value: Option<&str>) -> Option<usize> {
        let value = value.unwrap_or(self.mode.as_str());
        self.categories
            .binary_search_by(|c| c.as_str().cmp(value))
            .ok()
    }
}

/// Transform with learned statistics, ready to apply to new tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedPreprocessor {
    pub numeric: Vec<NumericScaler>,
    pub categorical: Vec<CategoricalEncoder>,
}

impl FittedPreprocessor {
    pub fn n_features_out(&self) -> usize {
        self.numeric.len()
            + self
                .categorical
                .iter()
                .map(|enc| enc.categories.len())
                .sum::<usize>()
    }

    /// Output column names: numeric columns as-is, then `<column>_<category>`.
    pub fn feature_names(&self) -> Vec<String> {
        let numeric = self.numeric.iter().map(|s| s.column.clone());
        let categorical = self.categorical.iter().flat_map(|enc| {
            enc.categories
                .iter()
                .map(move |cat| format!("{}_{cat}", enc.column))
        });
        numeric.chain(categorical).collect()
    }

    /// Transforms `df` into a `rows x n_features_out` matrix.
    ///
    /// Missing values take the learned fill values and unseen categories
    /// encode as all zeros.
    ///
    /// # Errors
    ///
    /// Returns [`PrepError::MissingColumn`] if a fitted column is absent.
    pub fn transform(&self, df: &DataFrame) -> Result<Array2<f64>> {
        let rows = df.height();
        let width = self.n_features_out();

        let numeric = self
            .numeric
            .iter()
            .map(|scaler| float_values(require_column(df, &scaler.column)?))
            .collect::<Result<Vec<_>>>()?;
        let categorical = self
            .categorical
            .iter()
            .map(|enc| text_values(require_column(df, &enc.column)?))
            .collect::<Result<Vec<_>>>()?;

        let mut data = Vec::with_capacity(rows * width);
        for row in 0..rows {
            for (scaler, values) in self.numeric.iter().zip(&numeric) {
                let value = values.get(row).copied().flatten();
                data.push(scaler.apply(value));
            }
            for (enc, values) in self.categorical.iter().zip(&categorical) {
                let value = values.get(row).and_then(Option::as_deref);
                let hot = enc.position(value);
                data.extend((0..enc.categories.len()).map(|i| {
                    if hot == Some(i) { 1.0 } else { 0.0 }
                }));
            }
        }

        Ok(Array2::from_shape_vec((rows, width), data)?)
    }

    /// # Errors
    ///
    /// Returns error if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// # Errors
    ///
    /// Returns error if `json` is not a serialized [`FittedPreprocessor`].
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
