//! scoremerge: attach photo-insert scores to a record collection and export CSV.
//!
//! Reads a base dataset (one JSON array of records) and a scores file (JSON
//! Lines, one scored record per line), left-joins them on `id`, flattens list
//! and mapping values into single cells, and writes the result as CSV for
//! spreadsheet review.
//!
//! # Output columns
//!
//! The header is the first base record's fields, in document order, followed
//! by six derived columns:
//!
//! - `photo_insert_score`, `photo_insert_bucket`, `photo_insert_reasoning`
//! - `photo_scoring_provider`, `photo_scoring_model`, `photo_scoring_prompt_version`
//!
//! Records without a score get empty derived cells.
//!
//! # Examples
//!
//! ```bash
//! scoremerge \
//!     --input docs/data/index.json \
//!     --scores docs/data/photo_scored.jsonl \
//!     --output docs/data/index_enriched.csv
//! ```
//!
//! # Crate Structure
//!
//! - [`core`]: loading, join, flattening, CSV export, and terminal output

pub mod cli;
pub mod core;

use clap::Parser;
use cli::Cli;
use crate::core::output::{OutputFormat, Reporter};
use crate::core::{error, merge};

pub fn run() -> Result<(), error::MergeError> {
    let cli = Cli::parse();
    let opts = cli.merge_options();
    let reporter = Reporter::new(cli.format);

    let summary = merge::merge_files(&opts, &reporter)?;

    if reporter.format() == OutputFormat::Json {
        println!("{}", summary.envelope(&opts.output)?);
    }
    Ok(())
}
