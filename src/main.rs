//! # acis-prep
//!
//! Command-line entry point for preparing the raw rating extract.
//!
//! ```bash
//! acis-prep
//! acis-prep --input data/raw/extract.txt --output data/processed/extract.csv
//! ```
//!
//! A file that cannot be loaded is logged and nothing is written. A raw
//! table without `transactionmonth` stops the run with an error.

#![warn(clippy::all, rust_2018_idioms)]

mod cli;

use anyhow::Result;
use clap::Parser as _;

fn main() -> Result<()> {
    acis_prep::logging::init()?;

    let cli = cli::Cli::parse();
    cli::run(cli)
}
