//! Terminal rendering for the merge command.
//!
//! Progress milestones go to stdout in text mode and are suppressed in JSON
//! mode, where a single summary envelope is printed instead.

use colored::Colorize;
use serde::Serialize;

/// How the CLI reports progress and results.
#[derive(clap::ValueEnum, Clone, Copy, Debug, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Collapse newlines/extra whitespace and bound length for terminal display.
pub fn compact_line(input: &str, max_chars: usize) -> String {
    let collapsed = input.split_whitespace().collect::<Vec<_>>().join(" ");
    let mut chars = collapsed.chars();
    let preview: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{}...", preview)
    } else {
        preview
    }
}

/// Prints run milestones prefixed with `[merge]`.
///
/// Milestones appear only in text mode. A quiet reporter prints nothing in
/// any mode.
#[derive(Debug, Clone, Copy)]
pub struct Reporter {
    format: OutputFormat,
    quiet: bool,
}

impl Reporter {
    pub fn new(format: OutputFormat) -> Self {
        Reporter {
            format,
            quiet: false,
        }
    }

    /// A reporter that prints nothing, for library callers and tests.
    pub fn silent() -> Self {
        Reporter {
            format: OutputFormat::Text,
            quiet: true,
        }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    fn prints_progress(&self) -> bool {
        !self.quiet && self.format == OutputFormat::Text
    }

    pub fn milestone(&self, message: &str) {
        if self.prints_progress() {
            println!("{} {}", "[merge]".dimmed(), message);
        }
    }

    pub fn note(&self, message: &str) {
        if self.prints_progress() {
            println!("{} {}", "[merge]".dimmed(), message.yellow());
        }
    }

    pub fn done(&self, matched: usize, total: usize) {
        if self.prints_progress() {
            println!(
                "{} {}",
                "[merge]".dimmed(),
                format!("Done! Matched {}/{} records with scores", matched, total).bright_green()
            );
        }
    }
}
