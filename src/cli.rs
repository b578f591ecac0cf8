//! CLI struct definitions for the scoremerge command-line interface.
//!
//! All clap-derived types live here. The run logic lives in `core::merge`.

use crate::core::merge::MergeOptions;
use crate::core::output::OutputFormat;

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(
    name = "scoremerge",
    version = env!("CARGO_PKG_VERSION"),
    about = "Merge photo scores into the main dataset and export CSV"
)]
pub(crate) struct Cli {
    /// Input JSON file with original records.
    #[clap(long)]
    pub input: PathBuf,
    /// Input JSONL file with photo scores.
    #[clap(long)]
    pub scores: PathBuf,
    /// Output CSV file.
    #[clap(long)]
    pub output: PathBuf,
    /// Output format: 'text' progress lines or a single 'json' summary.
    #[clap(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

impl Cli {
    pub(crate) fn merge_options(&self) -> MergeOptions {
        MergeOptions {
            input: self.input.clone(),
            scores: self.scores.clone(),
            output: self.output.clone(),
        }
    }
}
