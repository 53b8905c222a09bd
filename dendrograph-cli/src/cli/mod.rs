//! Command-line host for the dendrogram layout engine.
//!
//! The `layout` command loads a JSON linkage dataset, optionally narrows it to
//! one category, fits the plot area and prints the resulting rows and shapes.

mod commands;
mod dataset;

pub use commands::{
    Cli, CliError, Command, LayoutCommand, LayoutSummary, OutputFormat, render_summary, run_cli,
};
pub use dataset::{Dataset, LeafRecord};

#[cfg(test)]
mod test_helpers;
