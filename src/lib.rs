//! # acis_prep - Insurance Rating Data Preparation
//!
//! Turns the raw pipe-delimited ACIS rating extract into a clean,
//! comma-delimited dataset for risk and profitability modeling, and builds
//! the preprocessing transform the modeling side fits on that dataset.
//!
//! ## Quick Start
//!
//! ```no_run
//! use acis_prep::config::PrepareConfig;
//! use acis_prep::rating;
//!
//! # fn example() -> acis_prep::error::Result<()> {
//! let config = PrepareConfig::default();
//! if let Some(summary) = rating::run_prepare(&config)? {
//!     println!("{} rows written to {}", summary.rows_out, summary.output.display());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Core Modules
//!
//! - [`rating`]: Column normalization, feature engineering, imputation and I/O
//! - [`modeling`]: Numeric/categorical preprocessing transform (fit, then transform)
//! - [`config`]: Paths, column names and feature-list configuration
//! - [`error`]: Error types and handling utilities
//! - [`logging`]: Console logging setup
//!
//! ## Derived Features
//!
//! | column            | definition                                   |
//! |-------------------|----------------------------------------------|
//! | `transactiondate` | `transactionmonth` (`Jan-23`) as a date      |
//! | `hasclaim`        | `1` if `totalclaims > 0`                     |
//! | `margin`          | `totalpremium - totalclaims`                 |
//! | `lossratio`       | `totalclaims / (totalpremium + 1e-6)`        |
//! | `vehicleage`      | current year - `registrationyear`            |

#![warn(clippy::all, rust_2018_idioms)]

pub mod config;
pub mod error;
pub mod logging;
pub mod modeling;
pub mod rating;
