//! Command implementations and argument parsing for the dendrograph CLI.

use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use dendrograph_core::{
    Dendrogram, DendrogramError, IndexedPalette, LayoutConfig, LayoutError, LinearAxis, NodeRow,
    RenderedNode, Shape, Stroke,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{Span, field, info, instrument};

use super::dataset::Dataset;

const DEFAULT_WIDTH: f64 = 800.0;
const DEFAULT_HEIGHT: f64 = 400.0;
const DEFAULT_PADDING: f64 = 4.0;

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(name = "dendrograph", about = "Lay out hierarchical-clustering dendrograms.")]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Build the tree, apply an optional category filter and print the layout.
    Layout(LayoutCommand),
}

/// Options accepted by the `layout` command.
#[derive(Debug, Args, Clone)]
pub struct LayoutCommand {
    /// Path to a JSON dataset with `data` rows and `extras` leaves.
    pub path: PathBuf,

    /// Restrict the view to leaves of this category.
    #[arg(long)]
    pub category: Option<usize>,

    /// Plot width in pixels.
    #[arg(long, default_value_t = DEFAULT_WIDTH)]
    pub width: f64,

    /// Plot height in pixels.
    #[arg(long, default_value_t = DEFAULT_HEIGHT)]
    pub height: f64,

    /// Padding around rectangles framing pure sub-clusters.
    #[arg(long, default_value_t = DEFAULT_PADDING)]
    pub padding: f64,

    /// Output format written to stdout.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One line per row and per shape.
    Text,
    /// A single JSON document.
    Json,
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// The dataset file could not be opened.
    #[error("failed to open `{path}`: {source}")]
    Io {
        /// Path that triggered the failure.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// The dataset file is not valid JSON of the expected shape.
    #[error("failed to parse `{path}`: {source}")]
    Json {
        /// Path that triggered the failure.
        path: PathBuf,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },
    /// The plot area is empty or not finite.
    #[error("plot area must be positive and finite (got {width}x{height})")]
    InvalidPlotArea {
        /// Requested width.
        width: f64,
        /// Requested height.
        height: f64,
    },
    /// Tree construction rejected the dataset.
    #[error(transparent)]
    Dendrogram(#[from] DendrogramError),
    /// Layout configuration or rendering failed.
    #[error(transparent)]
    Layout(#[from] LayoutError),
}

impl CliError {
    /// Stable code of the underlying library error, if any.
    #[must_use]
    pub const fn code(&self) -> Option<&'static str> {
        match self {
            Self::Dendrogram(err) => Some(err.code().as_str()),
            Self::Layout(err) => Some(err.code().as_str()),
            _ => None,
        }
    }

    /// Stable code of the row decoding failure behind a malformed dataset.
    #[must_use]
    pub const fn linkage_code(&self) -> Option<&'static str> {
        match self {
            Self::Dendrogram(err) => match err.linkage_code() {
                Some(code) => Some(code.as_str()),
                None => None,
            },
            _ => None,
        }
    }
}

/// Everything the `layout` command computed, detached from the dataset.
#[derive(Debug, Clone)]
pub struct LayoutSummary {
    /// Name derived from the dataset file.
    pub data_source: String,
    /// Requested output format.
    pub format: OutputFormat,
    /// Category the view was restricted to.
    pub category: Option<usize>,
    /// Active labels in rendering order.
    pub labels: Vec<String>,
    /// Active merges in input order.
    pub rows: Vec<NodeRow>,
    /// One shape per active merge.
    pub shapes: Vec<RenderedNode>,
}

/// Executes the CLI command represented by `cli`.
///
/// # Errors
/// Returns [`CliError`] when loading, building or rendering fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use dendrograph_cli::cli::{Cli, Command, LayoutCommand, OutputFormat, run_cli};
/// # use tempfile::NamedTempFile;
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let file = NamedTempFile::new()?;
/// std::fs::write(
///     file.path(),
///     r#"{"data": [[1, -1, -2, 0.3]],
///         "extras": [{"label": "a", "order": 1, "clust": 0},
///                    {"label": "b", "order": 2, "clust": 0}]}"#,
/// )?;
/// let cli = Cli {
///     command: Command::Layout(LayoutCommand {
///         path: file.path().to_path_buf(),
///         category: None,
///         width: 200.0,
///         height: 100.0,
///         padding: 4.0,
///         format: OutputFormat::Text,
///     }),
/// };
/// let summary = run_cli(cli)?;
/// assert_eq!(summary.labels, ["a", "b"]);
/// assert_eq!(summary.shapes.len(), 1);
/// # Ok(())
/// # }
/// ```
#[instrument(name = "cli.run", err, skip(cli), fields(command = field::Empty))]
pub fn run_cli(cli: Cli) -> Result<LayoutSummary, CliError> {
    match cli.command {
        Command::Layout(layout) => {
            Span::current().record("command", field::display("layout"));
            run_layout(layout)
        }
    }
}

#[instrument(
    name = "cli.layout",
    err,
    skip(command),
    fields(
        path = field::Empty,
        category = field::Empty,
        leaves = field::Empty,
        merges = field::Empty,
    ),
)]
pub(super) fn run_layout(command: LayoutCommand) -> Result<LayoutSummary, CliError> {
    let LayoutCommand {
        path,
        category,
        width,
        height,
        padding,
        format,
    } = command;
    let span = Span::current();
    span.record("path", field::display(path.display()));
    span.record("category", field::display(category_label(category)));

    if !(width > 0.0 && width.is_finite() && height > 0.0 && height.is_finite()) {
        return Err(CliError::InvalidPlotArea { width, height });
    }
    let config = LayoutConfig::builder().with_rect_padding(padding).build()?;

    let (leaves, rows) = load_dataset(&path)?.into_parts();
    let dendrogram = Dendrogram::from_rows(leaves, rows)?;
    let view = dendrogram.rebuild(category.as_ref());

    let max_value = view
        .node_rows()
        .iter()
        .map(|row| row.value)
        .fold(0.0, f64::max);
    let axis = LinearAxis::fit(width, height, view.labels().len(), max_value);
    let shapes = view.render_all(&axis, &IndexedPalette::default(), &config)?;

    span.record("leaves", view.labels().len());
    span.record("merges", shapes.len());
    info!(
        leaves = view.labels().len(),
        merges = shapes.len(),
        "layout completed"
    );

    Ok(LayoutSummary {
        data_source: derive_data_source_name(&path),
        format,
        category,
        labels: view.labels().to_vec(),
        rows: view.node_rows().to_vec(),
        shapes,
    })
}

#[instrument(name = "cli.load_dataset", err, fields(path = field::Empty))]
pub(super) fn load_dataset(path: &Path) -> Result<Dataset, CliError> {
    Span::current().record("path", field::display(path.display()));
    let file = File::open(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| CliError::Json {
        path: path.to_path_buf(),
        source,
    })
}

pub(super) fn derive_data_source_name(path: &Path) -> String {
    path.file_stem()
        .and_then(|value| value.to_str())
        .map_or_else(|| "dataset".to_owned(), ToOwned::to_owned)
}

fn category_label(category: Option<usize>) -> String {
    category.map_or_else(|| "all".to_owned(), |category| category.to_string())
}

#[derive(Serialize)]
struct JsonReport<'a> {
    data_source: &'a str,
    category: Option<usize>,
    labels: &'a [String],
    node_rows: Vec<[f64; 8]>,
    shapes: &'a [RenderedNode],
}

/// Renders `summary` to `writer` in the format it was requested in.
///
/// # Errors
/// Returns [`io::Error`] if writing to the supplied writer fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use dendrograph_cli::cli::{LayoutSummary, OutputFormat, render_summary};
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let summary = LayoutSummary {
///     data_source: "demo".into(),
///     format: OutputFormat::Text,
///     category: Some(2),
///     labels: vec!["a".into()],
///     rows: Vec::new(),
///     shapes: Vec::new(),
/// };
/// let mut buffer = Vec::new();
/// render_summary(&summary, &mut buffer)?;
/// assert_eq!(
///     String::from_utf8(buffer)?,
///     "data source: demo\ncategory: 2\nleaves: a\nmerges: 0\n"
/// );
/// # Ok(())
/// # }
/// ```
pub fn render_summary(summary: &LayoutSummary, mut writer: impl Write) -> io::Result<()> {
    match summary.format {
        OutputFormat::Text => render_text(summary, writer),
        OutputFormat::Json => {
            let report = JsonReport {
                data_source: &summary.data_source,
                category: summary.category,
                labels: &summary.labels,
                node_rows: summary.rows.iter().map(NodeRow::to_array).collect(),
                shapes: &summary.shapes,
            };
            serde_json::to_writer_pretty(&mut writer, &report)?;
            writeln!(writer)
        }
    }
}

fn render_text(summary: &LayoutSummary, mut writer: impl Write) -> io::Result<()> {
    writeln!(writer, "data source: {}", summary.data_source)?;
    writeln!(writer, "category: {}", category_label(summary.category))?;
    writeln!(writer, "leaves: {}", summary.labels.join(", "))?;
    writeln!(writer, "merges: {}", summary.rows.len())?;
    for row in &summary.rows {
        let cells: Vec<String> = row.to_array().iter().map(f64::to_string).collect();
        writeln!(writer, "{}", cells.join("\t"))?;
    }
    for rendered in &summary.shapes {
        writeln!(
            writer,
            "merge {}: {}",
            rendered.merge_id,
            describe_shape(&rendered.shape)
        )?;
    }
    Ok(())
}

fn describe_shape(shape: &Shape) -> String {
    let stroke = match &shape.polyline().stroke {
        Stroke::Solid { color } => format!("solid {color}"),
        Stroke::Dashed { color, .. } => format!("dashed {color}"),
    };
    let frames: Vec<String> = shape
        .rects()
        .iter()
        .map(|frame| format!("merge {} ({})", frame.merge_id, frame.stroke))
        .collect();
    if frames.is_empty() {
        stroke
    } else {
        format!("{stroke} framing {}", frames.join(", "))
    }
}
